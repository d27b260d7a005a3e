use itertools::Itertools;
use serde::ser::SerializeStruct;
use serde::Serialize;
use serde::Serializer;

/// Annotation left on a result by a modifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Flag {
    Explode,
    Compound,
    Penetrate,
    ReRoll,
    ReRollOnce,
    Drop,
    TargetSuccess,
    TargetFailure,
    CriticalSuccess,
    CriticalFailure,
    Min,
    Max,
    Unique,
    UniqueOnce,
}

impl Flag {
    /// Short marker appended to the value when rendering
    pub fn symbol(&self) -> &'static str {
        match self {
            Flag::Explode => "!",
            Flag::Compound => "!!",
            Flag::Penetrate => "p",
            Flag::ReRoll => "r",
            Flag::ReRollOnce => "ro",
            Flag::Drop => "d",
            Flag::TargetSuccess => "*",
            Flag::TargetFailure => "_",
            Flag::CriticalSuccess => "**",
            Flag::CriticalFailure => "__",
            Flag::Min => "^",
            Flag::Max => "v",
            Flag::Unique => "u",
            Flag::UniqueOnce => "uo",
        }
    }
}

/// Keep one dice result with the marks modifiers left on it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollResult {
    value: i64,
    initial_value: i64,
    calculation_value: Option<i64>,
    use_in_total: bool,
    flags: Vec<Flag>,
}

impl RollResult {
    pub fn new(value: i64) -> Self {
        RollResult {
            value,
            initial_value: value,
            calculation_value: None,
            use_in_total: true,
            flags: Vec::new(),
        }
    }

    /// New with flags already set, used for results built out of several throws
    pub fn with_flags(value: i64, flags: impl IntoIterator<Item = Flag>) -> Self {
        let mut result = Self::new(value);
        flags.into_iter().for_each(|flag| result.add_flag(flag));
        result
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    /// Overwrite the face value, the initial value is kept
    pub fn set_value(&mut self, value: i64) {
        self.value = value;
    }

    pub fn initial_value(&self) -> i64 {
        self.initial_value
    }

    /// Value that counts toward the total
    pub fn calculation_value(&self) -> i64 {
        self.calculation_value.unwrap_or(self.value)
    }

    pub fn set_calculation_value(&mut self, value: i64) {
        self.calculation_value = Some(value);
    }

    pub fn use_in_total(&self) -> bool {
        self.use_in_total
    }

    /// Exclude from the total without removing the entry
    pub fn discard(&mut self) {
        self.use_in_total = false;
        self.add_flag(Flag::Drop);
    }

    pub fn flags(&self) -> &[Flag] {
        &self.flags
    }

    pub fn has_flag(&self, flag: Flag) -> bool {
        self.flags.contains(&flag)
    }

    pub fn add_flag(&mut self, flag: Flag) {
        if !self.has_flag(flag) {
            self.flags.push(flag);
        }
    }

    /// Concatenated flag symbols, a compound explosion is shown once as `!!`
    pub fn flag_symbols(&self) -> String {
        let compound = self.has_flag(Flag::Compound);
        self.flags
            .iter()
            .filter(|flag| !(compound && **flag == Flag::Compound))
            .map(|flag| match flag {
                Flag::Explode if compound => Flag::Compound.symbol(),
                flag => flag.symbol(),
            })
            .join("")
    }
}

impl std::fmt::Display for RollResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.value, self.flag_symbols())
    }
}

impl Serialize for RollResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("RollResult", 7)?;
        state.serialize_field("calculationValue", &self.calculation_value())?;
        state.serialize_field("initialValue", &self.initial_value)?;
        state.serialize_field("modifierFlags", &self.flag_symbols())?;
        state.serialize_field("modifiers", &self.flags)?;
        state.serialize_field("type", "result")?;
        state.serialize_field("useInTotal", &self.use_in_total)?;
        state.serialize_field("value", &self.value)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn flags_are_unique_and_ordered() {
        let mut result = RollResult::new(6);
        result.add_flag(Flag::Explode);
        result.add_flag(Flag::CriticalSuccess);
        result.add_flag(Flag::Explode);
        assert_eq!(&[Flag::Explode, Flag::CriticalSuccess], result.flags());
        assert_eq!("6!**", result.to_string());
    }

    #[test]
    fn compound_renders_double_bang() {
        let result = RollResult::with_flags(14, [Flag::Explode, Flag::Compound, Flag::Penetrate]);
        assert_eq!("14!!p", result.to_string());
    }

    #[test]
    fn discard_excludes_from_total() {
        let mut result = RollResult::new(3);
        result.discard();
        assert!(!result.use_in_total());
        assert_eq!(3, result.value());
        assert_eq!("3d", result.to_string());
    }

    #[test]
    fn set_value_keeps_initial() {
        let mut result = RollResult::new(1);
        result.set_value(4);
        assert_eq!(4, result.value());
        assert_eq!(1, result.initial_value());
        assert_eq!(4, result.calculation_value());
    }

    #[test]
    fn json_output() {
        let mut result = RollResult::new(5);
        result.set_calculation_value(1);
        result.add_flag(Flag::TargetSuccess);
        assert_eq!(
            json!({
                "calculationValue": 1,
                "initialValue": 5,
                "modifierFlags": "*",
                "modifiers": ["target-success"],
                "type": "result",
                "useInTotal": true,
                "value": 5,
            }),
            serde_json::to_value(&result).unwrap()
        );
    }
}

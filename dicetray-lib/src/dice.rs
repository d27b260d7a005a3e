pub mod modifier;

use crate::error::Error;
use crate::error::Result;
use crate::roll::RandomSource;
use crate::roll::RollResult;
use crate::roll::RollResults;
use crate::roll::Source;
use modifier::Modifiers;
use rand::Rng;
use serde::ser::SerializeStruct;
use serde::Serialize;
use serde::Serializer;
use tracing::debug;

/// Description of the faces of a die
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sides {
    /// Numbered faces from 1
    Count(u64),
    /// Fudge die with the given amount of non-blank faces per sign
    Fudge(u8),
    /// Percentile die written with `%`
    Percent,
}

impl std::fmt::Display for Sides {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sides::Count(n) => write!(f, "{n}"),
            Sides::Fudge(n) => write!(f, "F.{n}"),
            Sides::Percent => write!(f, "%"),
        }
    }
}

impl Serialize for Sides {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Sides::Count(n) => serializer.serialize_u64(*n),
            sides => serializer.collect_str(sides),
        }
    }
}

/// Value mapping of a die variant: bounds and how a throw becomes a face value
pub trait Face: std::fmt::Debug {
    fn name(&self) -> &'static str;
    fn sides(&self) -> Sides;
    fn min(&self) -> i64;
    fn max(&self) -> i64;

    /// Draw a single face value, one call to the source
    fn throw(&self, source: &mut dyn Source) -> i64 {
        source.integer(self.min(), self.max())
    }
}

/// Plain numbered die
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Standard {
    sides: u64,
}

impl Standard {
    pub fn new(sides: i64) -> Result<Self> {
        match u64::try_from(sides) {
            Ok(sides) if sides > 0 => Ok(Standard { sides }),
            _ => Err(Error::Range(format!(
                "sides must be a positive non-zero integer, got `{sides}`"
            ))),
        }
    }
}

impl Face for Standard {
    fn name(&self) -> &'static str {
        "standard"
    }

    fn sides(&self) -> Sides {
        Sides::Count(self.sides)
    }

    fn min(&self) -> i64 {
        1
    }

    fn max(&self) -> i64 {
        i64::try_from(self.sides).unwrap_or(i64::MAX)
    }
}

/// Fudge/Fate die, always in `-1..=1`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fudge {
    non_blanks: u8,
}

impl Fudge {
    /// `None` defaults to two non-blank faces per sign
    pub fn new(non_blanks: Option<i64>) -> Result<Self> {
        match non_blanks.unwrap_or(2) {
            1 => Ok(Fudge { non_blanks: 1 }),
            2 => Ok(Fudge { non_blanks: 2 }),
            n => Err(Error::Range(format!(
                "fudge dice non-blank faces must be 1 or 2, got `{n}`"
            ))),
        }
    }

    pub fn non_blanks(&self) -> u8 {
        self.non_blanks
    }
}

impl Face for Fudge {
    fn name(&self) -> &'static str {
        "fudge"
    }

    fn sides(&self) -> Sides {
        Sides::Fudge(self.non_blanks)
    }

    fn min(&self) -> i64 {
        -1
    }

    fn max(&self) -> i64 {
        1
    }

    fn throw(&self, source: &mut dyn Source) -> i64 {
        if self.non_blanks == 2 {
            // two faces of each sign: 1d3 - 2
            source.integer(1, 3) - 2
        } else {
            // one face of each sign on a d6
            match source.integer(1, 6) {
                1 => -1,
                6 => 1,
                _ => 0,
            }
        }
    }
}

/// d100, optionally rendering its sides as `100` instead of `%`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Percentile {
    sides_as_number: bool,
}

impl Face for Percentile {
    fn name(&self) -> &'static str {
        "percentile"
    }

    fn sides(&self) -> Sides {
        if self.sides_as_number {
            Sides::Count(100)
        } else {
            Sides::Percent
        }
    }

    fn min(&self) -> i64 {
        1
    }

    fn max(&self) -> i64 {
        100
    }
}

/// Common interface of every die variant
///
/// Besides the modifiers, every property is fixed at construction and has no
/// setter:
///
/// ```
/// use dicetray_lib::dice::Die;
/// use dicetray_lib::dice::FudgeDice;
///
/// let die = FudgeDice::new("4dF", None, 4, None).unwrap();
/// assert_eq!(4, die.qty());
/// ```
///
/// ```compile_fail
/// # use dicetray_lib::dice::FudgeDice;
/// let mut die = FudgeDice::new("4dF", None, 4, None).unwrap();
/// die.max = 2;
/// ```
///
/// ```compile_fail
/// # use dicetray_lib::dice::FudgeDice;
/// let mut die = FudgeDice::new("4dF", None, 4, None).unwrap();
/// die.min = -2;
/// ```
///
/// ```compile_fail
/// # use dicetray_lib::dice::FudgeDice;
/// let mut die = FudgeDice::new("4dF", None, 4, None).unwrap();
/// die.name = "standard";
/// ```
///
/// ```compile_fail
/// # use dicetray_lib::dice::FudgeDice;
/// let mut die = FudgeDice::new("4dF", None, 4, None).unwrap();
/// die.notation = "8dF".to_owned();
/// ```
///
/// ```compile_fail
/// # use dicetray_lib::dice::FudgeDice;
/// let mut die = FudgeDice::new("4dF", None, 4, None).unwrap();
/// die.qty = 8;
/// ```
///
/// ```compile_fail
/// # use dicetray_lib::dice::FudgeDice;
/// let mut die = FudgeDice::new("4dF", None, 4, None).unwrap();
/// die.sides = 3;
/// ```
///
/// ```compile_fail
/// # use dicetray_lib::dice::FudgeDice;
/// let mut die = FudgeDice::new("4dF", None, 4, None).unwrap();
/// die.non_blanks = 1;
/// ```
pub trait Die: std::fmt::Debug + std::fmt::Display {
    /// Notation exactly as it was supplied
    fn notation(&self) -> &str;
    fn name(&self) -> &'static str;
    fn sides(&self) -> Sides;
    fn qty(&self) -> u64;
    fn min(&self) -> i64;
    fn max(&self) -> i64;
    fn modifiers(&self) -> &Modifiers;

    /// Midpoint of the possible values of a single die
    fn average(&self) -> f64 {
        (self.min() as f64 + self.max() as f64) / 2.0
    }

    /// Roll a single die, without modifiers
    fn roll_once(&self, source: &mut dyn Source) -> RollResult;

    /// Roll `qty` dice then run the modifiers in order
    fn roll_with_source(&self, source: &mut dyn Source) -> RollResults;

    /// Roll using the thread local Rng
    fn roll(&self) -> RollResults {
        self.roll_with_source(&mut RandomSource {
            generator: &mut rand::thread_rng(),
        })
    }
}

/// Whole number averages are written as integers
struct Average(f64);

impl Serialize for Average {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        if self.0.fract() == 0.0 {
            serializer.serialize_i64(self.0 as i64)
        } else {
            serializer.serialize_f64(self.0)
        }
    }
}

impl Serialize for dyn Die + '_ {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let modifiers = self.modifiers();
        let mut state = serializer.serialize_struct("Die", 9)?;
        state.serialize_field("average", &Average(self.average()))?;
        state.serialize_field("max", &self.max())?;
        state.serialize_field("min", &self.min())?;
        state.serialize_field(
            "modifiers",
            &(!modifiers.is_empty()).then_some(modifiers),
        )?;
        state.serialize_field("name", self.name())?;
        state.serialize_field("notation", self.notation())?;
        state.serialize_field("qty", &self.qty())?;
        state.serialize_field("sides", &self.sides())?;
        state.serialize_field("type", "die")?;
        state.end()
    }
}

/// A die of variant `F` with its notation, quantity and modifiers
#[derive(Debug)]
pub struct Dice<F: Face> {
    notation: String,
    qty: u64,
    face: F,
    modifiers: Modifiers,
}

pub type StandardDice = Dice<Standard>;
pub type FudgeDice = Dice<Fudge>;
pub type PercentileDice = Dice<Percentile>;

impl<F: Face> Dice<F> {
    fn build(
        notation: &str,
        face: impl FnOnce() -> Result<F>,
        qty: i64,
        modifiers: Option<Modifiers>,
    ) -> Result<Self> {
        if notation.trim().is_empty() {
            return Err(Error::MissingArgument("notation"));
        }
        let face = face()?;
        let qty = match u64::try_from(qty) {
            Ok(qty) if qty > 0 => qty,
            _ => {
                return Err(Error::Type(format!(
                    "qty must be a positive non-zero integer, got `{qty}`"
                )))
            }
        };
        let mut dice = Dice {
            notation: notation.to_owned(),
            qty,
            face,
            modifiers: Modifiers::default(),
        };
        dice.set_modifiers(modifiers)?;
        Ok(dice)
    }

    /// Replace the modifiers, each one is checked against this die first
    pub fn set_modifiers(&mut self, modifiers: Option<Modifiers>) -> Result<()> {
        let modifiers = modifiers.unwrap_or_default();
        modifiers.check(&*self)?;
        self.modifiers = modifiers;
        Ok(())
    }

    pub fn face(&self) -> &F {
        &self.face
    }

    /// Roll using the provided Rng
    pub fn roll_with<R: Rng>(&self, generator: &mut R) -> RollResults {
        self.roll_with_source(&mut RandomSource { generator })
    }
}

impl StandardDice {
    pub fn new(
        notation: &str,
        sides: i64,
        qty: i64,
        modifiers: Option<Modifiers>,
    ) -> Result<Self> {
        Dice::build(notation, || Standard::new(sides), qty, modifiers)
    }
}

impl FudgeDice {
    pub fn new(
        notation: &str,
        non_blanks: Option<i64>,
        qty: i64,
        modifiers: Option<Modifiers>,
    ) -> Result<Self> {
        Dice::build(notation, || Fudge::new(non_blanks), qty, modifiers)
    }

    pub fn non_blanks(&self) -> u8 {
        self.face.non_blanks()
    }
}

impl PercentileDice {
    pub fn new(
        notation: &str,
        qty: i64,
        modifiers: Option<Modifiers>,
        sides_as_number: bool,
    ) -> Result<Self> {
        Dice::build(
            notation,
            || Ok(Percentile { sides_as_number }),
            qty,
            modifiers,
        )
    }
}

impl<F: Face> Die for Dice<F> {
    fn notation(&self) -> &str {
        &self.notation
    }

    fn name(&self) -> &'static str {
        self.face.name()
    }

    fn sides(&self) -> Sides {
        self.face.sides()
    }

    fn qty(&self) -> u64 {
        self.qty
    }

    fn min(&self) -> i64 {
        self.face.min()
    }

    fn max(&self) -> i64 {
        self.face.max()
    }

    fn modifiers(&self) -> &Modifiers {
        &self.modifiers
    }

    fn roll_once(&self, source: &mut dyn Source) -> RollResult {
        RollResult::new(self.face.throw(source))
    }

    fn roll_with_source(&self, source: &mut dyn Source) -> RollResults {
        debug!(notation = %self.notation, qty = self.qty, "rolling");
        let results = (0..self.qty).map(|_| self.roll_once(source)).collect();
        self.modifiers.apply(results, self, source)
    }
}

impl<F: Face> Serialize for Dice<F> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        (self as &dyn Die).serialize(serializer)
    }
}

impl<F: Face> std::fmt::Display for Dice<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.notation)
    }
}

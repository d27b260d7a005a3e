use super::Modifier;
use crate::dice::Die;
use crate::roll::Flag;
use crate::roll::RollResults;
use crate::roll::Source;
use serde_json::json;

/// Raise every value below `value` up to it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Min {
    value: i64,
    notation: String,
}

impl Min {
    pub const ORDER: i32 = 1;

    pub fn new(value: i64) -> Self {
        Min {
            value,
            notation: format!("min{value}"),
        }
    }
}

impl Modifier for Min {
    fn name(&self) -> &str {
        "min"
    }

    fn notation(&self) -> &str {
        &self.notation
    }

    fn order(&self) -> i32 {
        Self::ORDER
    }

    fn run(&self, mut results: RollResults, _: &dyn Die, _: &mut dyn Source) -> RollResults {
        for roll in results.iter_mut().filter(|r| r.value() < self.value) {
            roll.set_value(self.value);
            roll.add_flag(Flag::Min);
        }
        results
    }

    fn to_value(&self) -> serde_json::Value {
        json!({
            "min": self.value,
            "name": self.name(),
            "notation": self.notation,
            "type": "modifier",
        })
    }
}

/// Lower every value above `value` down to it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Max {
    value: i64,
    notation: String,
}

impl Max {
    pub const ORDER: i32 = 2;

    pub fn new(value: i64) -> Self {
        Max {
            value,
            notation: format!("max{value}"),
        }
    }
}

impl Modifier for Max {
    fn name(&self) -> &str {
        "max"
    }

    fn notation(&self) -> &str {
        &self.notation
    }

    fn order(&self) -> i32 {
        Self::ORDER
    }

    fn run(&self, mut results: RollResults, _: &dyn Die, _: &mut dyn Source) -> RollResults {
        for roll in results.iter_mut().filter(|r| r.value() > self.value) {
            roll.set_value(self.value);
            roll.add_flag(Flag::Max);
        }
        results
    }

    fn to_value(&self) -> serde_json::Value {
        json!({
            "max": self.value,
            "name": self.name(),
            "notation": self.notation,
            "type": "modifier",
        })
    }
}

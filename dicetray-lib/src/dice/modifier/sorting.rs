use super::Modifier;
use crate::dice::Die;
use crate::roll::RollResults;
use crate::roll::Source;
use serde::Serialize;
use serde_json::json;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Direction {
    #[serde(rename = "a")]
    Ascending,
    #[serde(rename = "d")]
    Descending,
}

/// Reorder the results by value, runs after every other built-in modifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sorting {
    direction: Direction,
    notation: String,
}

impl Sorting {
    pub const ORDER: i32 = 11;

    pub fn new(direction: Direction) -> Self {
        let notation = match direction {
            Direction::Ascending => "sa",
            Direction::Descending => "sd",
        };
        Sorting {
            direction,
            notation: notation.to_owned(),
        }
    }
}

impl Modifier for Sorting {
    fn name(&self) -> &str {
        "sorting"
    }

    fn notation(&self) -> &str {
        &self.notation
    }

    fn order(&self) -> i32 {
        Self::ORDER
    }

    fn run(&self, mut results: RollResults, _: &dyn Die, _: &mut dyn Source) -> RollResults {
        match self.direction {
            Direction::Ascending => results.sort_by(|a, b| a.value().cmp(&b.value())),
            Direction::Descending => results.sort_by(|a, b| b.value().cmp(&a.value())),
        }
        results
    }

    fn to_value(&self) -> serde_json::Value {
        json!({
            "direction": self.direction,
            "name": self.name(),
            "notation": self.notation,
            "type": "modifier",
        })
    }
}

use super::ComparePoint;
use super::Modifier;
use super::Operator;
use crate::dice::Die;
use crate::roll::Flag;
use crate::roll::RollResults;
use crate::roll::Source;
use serde_json::json;

/// Count successes and failures instead of summing values
///
/// A success counts 1, a failure -1, anything else 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    success: ComparePoint,
    failure: Option<ComparePoint>,
    notation: String,
}

impl Target {
    pub const ORDER: i32 = 8;

    pub fn new(success: ComparePoint, failure: Option<ComparePoint>) -> Self {
        let notation = match failure {
            Some(failure) => format!("{success}f{failure}"),
            None => success.to_string(),
        };
        Target {
            success,
            failure,
            notation,
        }
    }
}

impl Modifier for Target {
    fn name(&self) -> &str {
        "target"
    }

    fn notation(&self) -> &str {
        &self.notation
    }

    fn order(&self) -> i32 {
        Self::ORDER
    }

    fn run(&self, mut results: RollResults, _: &dyn Die, _: &mut dyn Source) -> RollResults {
        for roll in results.iter_mut() {
            if self.success.is_match(roll.value()) {
                roll.set_calculation_value(1);
                roll.add_flag(Flag::TargetSuccess);
            } else if self.failure.map_or(false, |f| f.is_match(roll.value())) {
                roll.set_calculation_value(-1);
                roll.add_flag(Flag::TargetFailure);
            } else {
                roll.set_calculation_value(0);
            }
        }
        results
    }

    fn to_value(&self) -> serde_json::Value {
        json!({
            "failure": self.failure,
            "name": self.name(),
            "notation": self.notation,
            "success": self.success,
            "type": "modifier",
        })
    }
}

/// Flag the dice matching the compare point, by default the die max
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CriticalSuccess {
    compare_point: Option<ComparePoint>,
    notation: String,
}

impl CriticalSuccess {
    pub const ORDER: i32 = 9;

    pub fn new(compare_point: Option<ComparePoint>) -> Self {
        CriticalSuccess {
            compare_point,
            notation: format!(
                "cs{}",
                compare_point.map(|c| c.to_string()).unwrap_or_default()
            ),
        }
    }
}

impl Modifier for CriticalSuccess {
    fn name(&self) -> &str {
        "critical-success"
    }

    fn notation(&self) -> &str {
        &self.notation
    }

    fn order(&self) -> i32 {
        Self::ORDER
    }

    fn run(&self, mut results: RollResults, die: &dyn Die, _: &mut dyn Source) -> RollResults {
        let compare_point = self
            .compare_point
            .unwrap_or_else(|| ComparePoint::new(Operator::Equal, die.max()));
        results
            .iter_mut()
            .filter(|r| compare_point.is_match(r.value()))
            .for_each(|r| r.add_flag(Flag::CriticalSuccess));
        results
    }

    fn to_value(&self) -> serde_json::Value {
        json!({
            "comparePoint": self.compare_point,
            "name": self.name(),
            "notation": self.notation,
            "type": "modifier",
        })
    }
}

/// Flag the dice matching the compare point, by default the die min
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CriticalFailure {
    compare_point: Option<ComparePoint>,
    notation: String,
}

impl CriticalFailure {
    pub const ORDER: i32 = 10;

    pub fn new(compare_point: Option<ComparePoint>) -> Self {
        CriticalFailure {
            compare_point,
            notation: format!(
                "cf{}",
                compare_point.map(|c| c.to_string()).unwrap_or_default()
            ),
        }
    }
}

impl Modifier for CriticalFailure {
    fn name(&self) -> &str {
        "critical-failure"
    }

    fn notation(&self) -> &str {
        &self.notation
    }

    fn order(&self) -> i32 {
        Self::ORDER
    }

    fn run(&self, mut results: RollResults, die: &dyn Die, _: &mut dyn Source) -> RollResults {
        let compare_point = self
            .compare_point
            .unwrap_or_else(|| ComparePoint::new(Operator::Equal, die.min()));
        results
            .iter_mut()
            .filter(|r| compare_point.is_match(r.value()))
            .for_each(|r| r.add_flag(Flag::CriticalFailure));
        results
    }

    fn to_value(&self) -> serde_json::Value {
        json!({
            "comparePoint": self.compare_point,
            "name": self.name(),
            "notation": self.notation,
            "type": "modifier",
        })
    }
}

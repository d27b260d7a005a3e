use super::ComparePoint;
use super::Modifier;
use super::Operator;
use crate::dice::Die;
use crate::error::Error;
use crate::error::Result;
use crate::limits;
use crate::roll::Flag;
use crate::roll::RollResults;
use crate::roll::Source;
use serde_json::json;
use tracing::warn;

fn notation(prefix: &str, once: bool, compare_point: Option<ComparePoint>) -> String {
    format!(
        "{prefix}{}{}",
        if once { "o" } else { "" },
        compare_point.map(|c| c.to_string()).unwrap_or_default()
    )
}

fn check_faces(die: &dyn Die, what: &str) -> Result<()> {
    if die.min() == die.max() {
        return Err(Error::Range(format!(
            "die `{}` must have more than one possible value to {what}",
            die.notation()
        )));
    }
    Ok(())
}

/// Replace the value of each die matching the compare point, by default the die min
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReRoll {
    once: bool,
    compare_point: Option<ComparePoint>,
    notation: String,
}

impl ReRoll {
    pub const ORDER: i32 = 4;

    pub fn new(once: bool, compare_point: Option<ComparePoint>) -> Self {
        ReRoll {
            once,
            compare_point,
            notation: notation("r", once, compare_point),
        }
    }
}

impl Modifier for ReRoll {
    fn name(&self) -> &str {
        "re-roll"
    }

    fn notation(&self) -> &str {
        &self.notation
    }

    fn order(&self) -> i32 {
        Self::ORDER
    }

    fn check(&self, die: &dyn Die) -> Result<()> {
        check_faces(die, "re-roll")
    }

    fn run(&self, mut results: RollResults, die: &dyn Die, source: &mut dyn Source) -> RollResults {
        let compare_point = self
            .compare_point
            .unwrap_or_else(|| ComparePoint::new(Operator::Equal, die.min()));
        let flag = if self.once {
            Flag::ReRollOnce
        } else {
            Flag::ReRoll
        };
        for roll in results.iter_mut() {
            let mut iterations = 0;
            while compare_point.is_match(roll.value()) {
                if iterations == limits::MAX_ITERATIONS {
                    warn!(notation = %self.notation, "re-roll iteration limit reached");
                    break;
                }
                iterations += 1;
                roll.set_value(die.roll_once(source).value());
                roll.add_flag(flag);
                if self.once {
                    break;
                }
            }
        }
        results
    }

    fn to_value(&self) -> serde_json::Value {
        json!({
            "comparePoint": self.compare_point,
            "name": self.name(),
            "notation": self.notation,
            "once": self.once,
            "type": "modifier",
        })
    }
}

/// Re-roll any die whose value already appeared earlier in the results
///
/// With a compare point only the duplicates matching it are re-rolled. Without
/// one the die must have at least as many distinct values as its quantity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unique {
    once: bool,
    compare_point: Option<ComparePoint>,
    notation: String,
}

impl Unique {
    pub const ORDER: i32 = 5;

    pub fn new(once: bool, compare_point: Option<ComparePoint>) -> Self {
        Unique {
            once,
            compare_point,
            notation: notation("u", once, compare_point),
        }
    }

    fn needs_reroll(&self, results: &RollResults, index: usize) -> bool {
        let value = results[index].value();
        self.compare_point.map_or(true, |c| c.is_match(value))
            && results[..index].iter().any(|r| r.value() == value)
    }
}

impl Modifier for Unique {
    fn name(&self) -> &str {
        "unique"
    }

    fn notation(&self) -> &str {
        &self.notation
    }

    fn order(&self) -> i32 {
        Self::ORDER
    }

    fn check(&self, die: &dyn Die) -> Result<()> {
        check_faces(die, "be unique")?;
        let faces = die.max().abs_diff(die.min()).saturating_add(1);
        if self.compare_point.is_none() && die.qty() > faces {
            return Err(Error::Range(format!(
                "die `{}` has only {faces} distinct values for {} unique dice",
                die.notation(),
                die.qty()
            )));
        }
        Ok(())
    }

    fn run(&self, mut results: RollResults, die: &dyn Die, source: &mut dyn Source) -> RollResults {
        let flag = if self.once {
            Flag::UniqueOnce
        } else {
            Flag::Unique
        };
        for index in 0..results.len() {
            let mut iterations = 0;
            while self.needs_reroll(&results, index) {
                if iterations == limits::MAX_ITERATIONS {
                    warn!(notation = %self.notation, "unique iteration limit reached");
                    break;
                }
                iterations += 1;
                let value = die.roll_once(source).value();
                if let Some(roll) = results.get_mut(index) {
                    roll.set_value(value);
                    roll.add_flag(flag);
                }
                if self.once {
                    break;
                }
            }
        }
        results
    }

    fn to_value(&self) -> serde_json::Value {
        json!({
            "comparePoint": self.compare_point,
            "name": self.name(),
            "notation": self.notation,
            "once": self.once,
            "type": "modifier",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::modifier::Modifiers;
    use crate::dice::FudgeDice;
    use crate::dice::StandardDice;
    use crate::roll::RollResult;
    use crate::tests::MockIter;

    fn d6(qty: i64, modifier: impl Modifier + 'static) -> StandardDice {
        let modifiers = Modifiers::from_list(vec![Box::new(modifier) as Box<dyn Modifier>]);
        StandardDice::new("d6", 6, qty, Some(modifiers)).unwrap()
    }

    fn values(results: &RollResults) -> Vec<i64> {
        results.iter().map(RollResult::value).collect()
    }

    #[test]
    fn notation() {
        assert_eq!("r", ReRoll::new(false, None).notation());
        let point = ComparePoint::new(Operator::Less, 3);
        assert_eq!("ro<3", ReRoll::new(true, Some(point)).notation());
        assert_eq!("uo<3", Unique::new(true, Some(point)).notation());
    }

    #[test]
    fn rerolls_min_until_it_changes() {
        let die = d6(3, ReRoll::new(false, None));
        let mut rolls = vec![1, 4, 1, 1, 5, 2].into_iter();
        let results = die.roll_with_source(&mut MockIter { iter: &mut rolls });
        assert_eq!(vec![5, 4, 2], values(&results));
        assert_eq!(1, results[0].initial_value());
        assert_eq!("[5r, 4, 2r]", results.to_string());
    }

    #[test]
    fn reroll_once_keeps_second_value() {
        let point = ComparePoint::new(Operator::LessOrEqual, 2);
        let die = d6(2, ReRoll::new(true, Some(point)));
        let mut rolls = vec![2, 6, 1].into_iter();
        let results = die.roll_with_source(&mut MockIter { iter: &mut rolls });
        assert_eq!(vec![1, 6], values(&results));
        assert_eq!("[1ro, 6]", results.to_string());
    }

    #[test]
    fn unique_rerolls_duplicates() {
        let die = d6(4, Unique::new(false, None));
        let mut rolls = vec![3, 3, 5, 3, 5, 2, 6].into_iter();
        let results = die.roll_with_source(&mut MockIter { iter: &mut rolls });
        assert_eq!(vec![3, 5, 2, 6], values(&results));
        assert_eq!("[3, 5u, 2u, 6u]", results.to_string());
    }

    #[test]
    fn unique_with_compare_point() {
        let point = ComparePoint::new(Operator::Greater, 4);
        let die = d6(4, Unique::new(false, Some(point)));
        let mut rolls = vec![2, 2, 5, 5, 1].into_iter();
        let results = die.roll_with_source(&mut MockIter { iter: &mut rolls });
        assert_eq!(vec![2, 2, 5, 1], values(&results));
    }

    #[test]
    fn unique_once() {
        let die = d6(2, Unique::new(true, None));
        let mut rolls = vec![4, 4, 4].into_iter();
        let results = die.roll_with_source(&mut MockIter { iter: &mut rolls });
        assert_eq!(vec![4, 4], values(&results));
        assert_eq!("[4, 4uo]", results.to_string());
    }

    #[test]
    fn single_value_die_is_rejected() {
        for modifier in [
            Box::new(ReRoll::new(false, None)) as Box<dyn Modifier>,
            Box::new(ReRoll::new(true, None)),
            Box::new(Unique::new(false, None)),
        ] {
            let modifiers = Modifiers::from_list(vec![modifier]);
            let result = StandardDice::new("1d1r", 1, 1, Some(modifiers));
            assert!(matches!(result, Err(Error::Range(_))));
        }
    }

    #[test]
    fn unique_needs_enough_faces() {
        let unique = || {
            Modifiers::from_list(vec![Box::new(Unique::new(false, None)) as Box<dyn Modifier>])
        };
        let result = StandardDice::new("3d2u", 2, 3, Some(unique()));
        assert!(matches!(result, Err(Error::Range(_))));
        assert!(StandardDice::new("2d2u", 2, 2, Some(unique())).is_ok());
        assert!(FudgeDice::new("4dFu", None, 4, Some(unique())).is_err());
        assert!(FudgeDice::new("3dFu", None, 3, Some(unique())).is_ok());

        let point = ComparePoint::new(Operator::Equal, 2);
        let modifiers = Modifiers::from_list(vec![
            Box::new(Unique::new(false, Some(point))) as Box<dyn Modifier>
        ]);
        assert!(StandardDice::new("3d2u=2", 2, 3, Some(modifiers)).is_ok());
    }
}

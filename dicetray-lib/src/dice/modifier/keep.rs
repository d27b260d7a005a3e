use super::Modifier;
use crate::dice::Die;
use crate::error::Error;
use crate::error::Result;
use crate::roll::RollResults;
use crate::roll::Source;
use serde::Serialize;
use serde_json::json;

/// Which end of the sorted results a keep or drop applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum End {
    #[serde(rename = "h")]
    Highest,
    #[serde(rename = "l")]
    Lowest,
}

impl End {
    pub fn symbol(&self) -> &'static str {
        match self {
            End::Highest => "h",
            End::Lowest => "l",
        }
    }
}

fn check_qty(qty: u64, what: &str) -> Result<()> {
    if qty == 0 {
        return Err(Error::Range(format!(
            "amount of dice to {what} must be a positive non-zero integer"
        )));
    }
    Ok(())
}

/// Indices of the entries still counted, starting from the `end` side
fn ranked(results: &RollResults, end: End) -> Vec<usize> {
    let mut indices = results
        .iter()
        .enumerate()
        .filter(|(_, r)| r.use_in_total())
        .map(|(i, _)| i)
        .collect::<Vec<_>>();
    indices.sort_by(|a, b| {
        let (a, b) = (results[*a].value(), results[*b].value());
        match end {
            End::Highest => b.cmp(&a),
            End::Lowest => a.cmp(&b),
        }
    });
    indices
}

fn discard(mut results: RollResults, indices: impl IntoIterator<Item = usize>) -> RollResults {
    for index in indices {
        if let Some(roll) = results.get_mut(index) {
            roll.discard();
        }
    }
    results
}

/// Keep the `qty` highest or lowest dice, every other die is dropped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keep {
    end: End,
    qty: u64,
    notation: String,
}

impl Keep {
    pub const ORDER: i32 = 6;

    pub fn new(end: End, qty: u64) -> Result<Self> {
        check_qty(qty, "keep")?;
        Ok(Keep {
            end,
            qty,
            notation: format!("k{}{qty}", end.symbol()),
        })
    }
}

impl Modifier for Keep {
    fn name(&self) -> &str {
        match self.end {
            End::Highest => "keep-h",
            End::Lowest => "keep-l",
        }
    }

    fn notation(&self) -> &str {
        &self.notation
    }

    fn order(&self) -> i32 {
        Self::ORDER
    }

    fn run(&self, results: RollResults, _: &dyn Die, _: &mut dyn Source) -> RollResults {
        let qty = usize::try_from(self.qty).unwrap_or(usize::MAX);
        let dropped = ranked(&results, self.end).into_iter().skip(qty);
        discard(results, dropped.collect::<Vec<_>>())
    }

    fn to_value(&self) -> serde_json::Value {
        json!({
            "end": self.end,
            "name": self.name(),
            "notation": self.notation,
            "qty": self.qty,
            "type": "modifier",
        })
    }
}

/// Drop the `qty` highest or lowest dice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Drop {
    end: End,
    qty: u64,
    notation: String,
}

impl Drop {
    pub const ORDER: i32 = 7;

    pub fn new(end: End, qty: u64) -> Result<Self> {
        check_qty(qty, "drop")?;
        Ok(Drop {
            end,
            qty,
            notation: format!("d{}{qty}", end.symbol()),
        })
    }
}

impl Modifier for Drop {
    fn name(&self) -> &str {
        match self.end {
            End::Highest => "drop-h",
            End::Lowest => "drop-l",
        }
    }

    fn notation(&self) -> &str {
        &self.notation
    }

    fn order(&self) -> i32 {
        Self::ORDER
    }

    fn run(&self, results: RollResults, _: &dyn Die, _: &mut dyn Source) -> RollResults {
        let qty = usize::try_from(self.qty).unwrap_or(usize::MAX);
        let dropped = ranked(&results, self.end).into_iter().take(qty);
        discard(results, dropped.collect::<Vec<_>>())
    }

    fn to_value(&self) -> serde_json::Value {
        json!({
            "end": self.end,
            "name": self.name(),
            "notation": self.notation,
            "qty": self.qty,
            "type": "modifier",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::modifier::Modifiers;
    use crate::dice::StandardDice;
    use crate::tests::MockIter;

    fn roll(modifiers: Vec<Box<dyn Modifier>>, rolls: Vec<i64>) -> RollResults {
        let qty = rolls.len() as i64;
        let die = StandardDice::new("d10", 10, qty, Some(Modifiers::from_list(modifiers))).unwrap();
        die.roll_with_source(&mut MockIter {
            iter: &mut rolls.into_iter(),
        })
    }

    #[test]
    fn zero_is_rejected() {
        assert!(matches!(Keep::new(End::Highest, 0), Err(Error::Range(_))));
        assert!(matches!(Drop::new(End::Lowest, 0), Err(Error::Range(_))));
    }

    #[test]
    fn keep_highest() {
        let keep = Keep::new(End::Highest, 2).unwrap();
        assert_eq!("kh2", keep.notation());
        let results = roll(vec![Box::new(keep)], vec![4, 9, 1, 7]);
        assert_eq!("[4d, 9, 1d, 7]", results.to_string());
        assert_eq!(16, results.get_total());
        assert_eq!(4, results.len());
    }

    #[test]
    fn keep_lowest() {
        let keep = Keep::new(End::Lowest, 1).unwrap();
        let results = roll(vec![Box::new(keep)], vec![4, 9, 1, 7]);
        assert_eq!("[4d, 9d, 1, 7d]", results.to_string());
        assert_eq!(1, results.get_total());
    }

    #[test]
    fn keep_more_than_rolled() {
        let keep = Keep::new(End::Highest, 10).unwrap();
        let results = roll(vec![Box::new(keep)], vec![4, 9]);
        assert_eq!(13, results.get_total());
    }

    #[test]
    fn drop_lowest() {
        let drop = Drop::new(End::Lowest, 1).unwrap();
        assert_eq!("dl1", drop.notation());
        let results = roll(vec![Box::new(drop)], vec![3, 3, 6]);
        // ties keep their position, the first one goes
        assert_eq!("[3d, 3, 6]", results.to_string());
        assert_eq!(9, results.get_total());
    }

    #[test]
    fn drop_highest_everything() {
        let drop = Drop::new(End::Highest, 5).unwrap();
        let results = roll(vec![Box::new(drop)], vec![3, 6]);
        assert_eq!(0, results.get_total());
        assert_eq!(2, results.len());
    }

    #[test]
    fn drop_ignores_already_dropped() {
        let keep = Keep::new(End::Highest, 3).unwrap();
        let drop = Drop::new(End::Lowest, 1).unwrap();
        let results = roll(vec![Box::new(drop), Box::new(keep)], vec![2, 8, 5, 1]);
        assert_eq!("[2d, 8, 5, 1d]", results.to_string());
        assert_eq!(13, results.get_total());
    }
}

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

/// Roll again each die matching the compare point, by default the die max
///
/// With `compound` the extra rolls are folded into the die that exploded,
/// with `penetrate` every extra roll counts one less.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Explode {
    compare_point: Option<ComparePoint>,
    compound: bool,
    penetrate: bool,
    notation: String,
}

impl Explode {
    pub const ORDER: i32 = 3;

    pub fn new(compare_point: Option<ComparePoint>, compound: bool, penetrate: bool) -> Self {
        let notation = format!(
            "!{}{}{}",
            if compound { "!" } else { "" },
            if penetrate { "p" } else { "" },
            compare_point.map(|c| c.to_string()).unwrap_or_default()
        );
        Explode {
            compare_point,
            compound,
            penetrate,
            notation,
        }
    }

    fn compare_point(&self, die: &dyn Die) -> ComparePoint {
        self.compare_point
            .unwrap_or_else(|| ComparePoint::new(Operator::Equal, die.max()))
    }
}

impl Modifier for Explode {
    fn name(&self) -> &str {
        "explode"
    }

    fn notation(&self) -> &str {
        &self.notation
    }

    fn order(&self) -> i32 {
        Self::ORDER
    }

    fn check(&self, die: &dyn Die) -> Result<()> {
        if die.min() == die.max() {
            return Err(Error::Range(format!(
                "die `{}` must have more than one possible value to explode",
                die.notation()
            )));
        }
        Ok(())
    }

    fn run(&self, results: RollResults, die: &dyn Die, source: &mut dyn Source) -> RollResults {
        let compare_point = self.compare_point(die);
        results.flat_map(|roll| {
            // the compare point is tested on the thrown value, before penetration
            let mut thrown = roll.value();
            let mut chain = vec![roll];
            while compare_point.is_match(thrown) {
                if chain.len() > limits::MAX_ITERATIONS {
                    warn!(notation = %self.notation, "explode iteration limit reached");
                    break;
                }
                let mut next = die.roll_once(source);
                thrown = next.value();
                if let Some(last) = chain.last_mut() {
                    last.add_flag(Flag::Explode);
                    if self.penetrate {
                        last.add_flag(Flag::Penetrate);
                    }
                }
                if self.penetrate {
                    next.set_value(thrown - 1);
                }
                chain.push(next);
            }
            if self.compound && chain.len() > 1 {
                let total = chain.iter().map(|r| r.value()).fold(0, i64::saturating_add);
                chain.truncate(1);
                chain[0].set_value(total);
                chain[0].add_flag(Flag::Compound);
            }
            chain
        })
    }

    fn to_value(&self) -> serde_json::Value {
        json!({
            "comparePoint": self.compare_point,
            "compound": self.compound,
            "name": self.name(),
            "notation": self.notation,
            "penetrate": self.penetrate,
            "type": "modifier",
        })
    }
}

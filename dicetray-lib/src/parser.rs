use crate::dice::modifier;
use crate::dice::modifier::ComparePoint;
use crate::dice::modifier::Modifiers;
use crate::dice::Die;
use crate::dice::FudgeDice;
use crate::dice::PercentileDice;
use crate::dice::StandardDice;
use crate::error::Error;
use crate::error::Result;
use crate::limits;
use pest::iterators::Pair;
use pest::iterators::Pairs;
use pest_derive::Parser;
use std::str::FromStr;

/// Pest parser
#[derive(Parser)]
#[grammar = "dice.pest"]
pub struct Parser;

impl Parser {
    /// Build the die described by a single dice notation, like `4dF.1` or `3d6!!>=5kh2`
    pub fn parse_die(input: &str) -> Result<Box<dyn Die>> {
        let mut pairs = <Self as pest::Parser<Rule>>::parse(Rule::notation, input)?;
        let mut inner = Self::next(&mut pairs, "notation")?.into_inner();
        let die = Self::next(&mut inner, "die")?;
        let modifiers = inner
            .filter(|pair| pair.as_rule() != Rule::EOI)
            .map(Self::extract_modifier)
            .collect::<Result<Vec<_>>>()?;
        let modifiers = (!modifiers.is_empty()).then(|| Modifiers::from_list(modifiers));

        let mut qty = 1;
        let mut sides = None;
        for pair in die.into_inner() {
            match pair.as_rule() {
                Rule::qty => qty = Self::extract_number(&pair)?,
                _ => sides = Some(pair),
            }
        }
        if qty > limits::MAX_DICE_AMOUNT {
            return Err(Error::Range(format!(
                "exceeded max allowed amount of dices `{}`",
                limits::MAX_DICE_AMOUNT
            )));
        }
        let qty = i64::try_from(qty).unwrap_or(i64::MAX);
        let sides = sides.ok_or(Error::MissingArgument("sides"))?;
        Ok(match sides.as_rule() {
            Rule::percent => Box::new(PercentileDice::new(input, qty, modifiers, false)?),
            Rule::fudge => {
                let non_blanks = sides
                    .into_inner()
                    .next()
                    .map(|pair| Self::extract_number(&pair))
                    .transpose()?;
                Box::new(FudgeDice::new(input, non_blanks, qty, modifiers)?)
            }
            Rule::standard => {
                let count: u64 = Self::extract_number(&sides)?;
                if count > limits::MAX_DICE_SIDES {
                    return Err(Error::Range(format!(
                        "exceeded max allowed number of dice sides `{}`",
                        limits::MAX_DICE_SIDES
                    )));
                }
                let count = i64::try_from(count).unwrap_or(i64::MAX);
                Box::new(StandardDice::new(input, count, qty, modifiers)?)
            }
            _ => unreachable!("{:?}", sides),
        })
    }

    fn next<'i>(pairs: &mut Pairs<'i, Rule>, what: &'static str) -> Result<Pair<'i, Rule>> {
        pairs.next().ok_or(Error::MissingArgument(what))
    }

    fn extract_number<T: FromStr>(pair: &Pair<Rule>) -> Result<T> {
        pair.as_str()
            .parse()
            .map_err(|_| Error::Range(format!("`{}` is out of range", pair.as_str())))
    }

    fn extract_compare_point(pair: Pair<Rule>) -> Result<ComparePoint> {
        let mut inner = pair.into_inner();
        let operator = Self::next(&mut inner, "compare operator")?.as_str().parse()?;
        let value = Self::extract_number(&Self::next(&mut inner, "compare value")?)?;
        Ok(ComparePoint::new(operator, value))
    }

    fn extract_modifier(pair: Pair<Rule>) -> Result<Box<dyn modifier::Modifier>> {
        let rule = pair.as_rule();
        let mut inner = pair.into_inner();
        let mut once = false;
        let mut compound = false;
        let mut penetrate = false;
        let mut compare_point = None;
        let mut end = None;
        let mut amount = None;
        let mut direction = None;
        let mut failure = None;
        if let Rule::min | Rule::max = rule {
            let value = Self::extract_number(&Self::next(&mut inner, "value")?)?;
            return Ok(match rule {
                Rule::min => Box::new(modifier::Min::new(value)),
                _ => Box::new(modifier::Max::new(value)),
            });
        }
        for pair in inner {
            match pair.as_rule() {
                Rule::once => once = true,
                Rule::compound => compound = true,
                Rule::penetrate => penetrate = true,
                Rule::compare_point => compare_point = Some(Self::extract_compare_point(pair)?),
                Rule::end => {
                    end = Some(match pair.as_str() {
                        "h" => modifier::End::Highest,
                        _ => modifier::End::Lowest,
                    })
                }
                Rule::amount => amount = Some(Self::extract_number::<u64>(&pair)?),
                Rule::direction => {
                    direction = Some(match pair.as_str() {
                        "d" => modifier::Direction::Descending,
                        _ => modifier::Direction::Ascending,
                    })
                }
                Rule::failure => {
                    let point = Self::next(&mut pair.into_inner(), "failure")?;
                    failure = Some(Self::extract_compare_point(point)?);
                }
                _ => unreachable!("{:?}", pair),
            }
        }
        Ok(match rule {
            Rule::explode => Box::new(modifier::Explode::new(compare_point, compound, penetrate)),
            Rule::reroll => Box::new(modifier::ReRoll::new(once, compare_point)),
            Rule::unique => Box::new(modifier::Unique::new(once, compare_point)),
            Rule::keep => Box::new(modifier::Keep::new(
                end.unwrap_or(modifier::End::Highest),
                amount.ok_or(Error::MissingArgument("keep amount"))?,
            )?),
            Rule::drop => Box::new(modifier::Drop::new(
                end.unwrap_or(modifier::End::Lowest),
                amount.ok_or(Error::MissingArgument("drop amount"))?,
            )?),
            Rule::critical_success => Box::new(modifier::CriticalSuccess::new(compare_point)),
            Rule::critical_failure => Box::new(modifier::CriticalFailure::new(compare_point)),
            Rule::sorting => Box::new(modifier::Sorting::new(
                direction.unwrap_or(modifier::Direction::Ascending),
            )),
            Rule::target => Box::new(modifier::Target::new(
                compare_point.ok_or(Error::MissingArgument("target"))?,
                failure,
            )),
            _ => unreachable!("{:?}", rule),
        })
    }
}

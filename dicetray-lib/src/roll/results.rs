use crate::roll::RollResult;
use itertools::Itertools;
use serde::Serialize;
use std::ops::Deref;

/// Ordered collection of the results of a single `roll`
///
/// Entries can be appended, annotated or reordered, never removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RollResults {
    rolls: Vec<RollResult>,
}

impl RollResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, result: RollResult) {
        self.rolls.push(result);
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, RollResult> {
        self.rolls.iter_mut()
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut RollResult> {
        self.rolls.get_mut(index)
    }

    /// Stable sort of the entries
    pub fn sort_by<F>(&mut self, compare: F)
    where
        F: FnMut(&RollResult, &RollResult) -> std::cmp::Ordering,
    {
        self.rolls.sort_by(compare);
    }

    /// Replace every entry by the results of `f`, used when one throw becomes many
    pub fn flat_map<F, I>(self, f: F) -> Self
    where
        F: FnMut(RollResult) -> I,
        I: IntoIterator<Item = RollResult>,
    {
        self.rolls.into_iter().flat_map(f).collect()
    }

    /// Sum of the calculation values of every entry still counted, saturating at the i64 bounds
    pub fn get_total(&self) -> i64 {
        self.rolls
            .iter()
            .filter(|r| r.use_in_total())
            .map(RollResult::calculation_value)
            .fold(0, i64::saturating_add)
    }
}

impl FromIterator<RollResult> for RollResults {
    fn from_iter<I: IntoIterator<Item = RollResult>>(iter: I) -> Self {
        RollResults {
            rolls: iter.into_iter().collect(),
        }
    }
}

impl Deref for RollResults {
    type Target = [RollResult];

    fn deref(&self) -> &Self::Target {
        &self.rolls
    }
}

impl<'a> IntoIterator for &'a RollResults {
    type Item = &'a RollResult;
    type IntoIter = std::slice::Iter<'a, RollResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.rolls.iter()
    }
}

impl std::fmt::Display for RollResults {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.rolls.iter().format(", "))
    }
}

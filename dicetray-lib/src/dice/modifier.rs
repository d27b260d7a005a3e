mod clamp;
mod compare;
mod explode;
mod keep;
mod reroll;
mod sorting;
mod target;

pub use clamp::Max;
pub use clamp::Min;
pub use compare::ComparePoint;
pub use compare::Operator;
pub use explode::Explode;
pub use keep::Drop;
pub use keep::End;
pub use keep::Keep;
pub use reroll::ReRoll;
pub use reroll::Unique;
pub use sorting::Direction;
pub use sorting::Sorting;
pub use target::CriticalFailure;
pub use target::CriticalSuccess;
pub use target::Target;

use crate::dice::Die;
use crate::error::Error;
use crate::error::Result;
use crate::roll::RollResults;
use crate::roll::Source;
use serde::ser::SerializeMap;
use serde::Serialize;
use serde::Serializer;
use serde_json::json;
use tracing::trace;

/// A step of the roll pipeline
///
/// A modifier takes the results of a roll by value and hands them back. It
/// can append entries, annotate or overwrite their values, but it never
/// changes the die it is given.
pub trait Modifier: std::fmt::Debug {
    fn name(&self) -> &str;
    fn notation(&self) -> &str;

    /// Lower runs first
    fn order(&self) -> i32;

    /// Reject a die this modifier cannot run on
    fn check(&self, die: &dyn Die) -> Result<()> {
        let _ = die;
        Ok(())
    }

    fn run(&self, results: RollResults, die: &dyn Die, source: &mut dyn Source) -> RollResults;

    fn to_value(&self) -> serde_json::Value {
        json!({
            "name": self.name(),
            "notation": self.notation(),
            "type": "modifier",
        })
    }
}

/// Modifier without any effect on the results
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plain {
    notation: String,
    order: i32,
}

impl Plain {
    pub const ORDER: i32 = 999;

    pub fn new(notation: &str) -> Self {
        Plain {
            notation: notation.to_owned(),
            order: Self::ORDER,
        }
    }

    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }
}

impl Modifier for Plain {
    fn name(&self) -> &str {
        "modifier"
    }

    fn notation(&self) -> &str {
        &self.notation
    }

    fn order(&self) -> i32 {
        self.order
    }

    fn run(&self, results: RollResults, _: &dyn Die, _: &mut dyn Source) -> RollResults {
        results
    }
}

/// Keyed modifiers, iterated in application order
///
/// The order is computed once, when the collection is built. Changing the
/// modifiers of a die means building a new collection and assigning it.
#[derive(Debug, Default)]
pub struct Modifiers {
    entries: Vec<(String, Box<dyn Modifier>)>,
}

impl Modifiers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from key/modifier pairs, a repeated key replaces the earlier modifier
    pub fn from_map<K, I>(entries: I) -> Result<Self>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Box<dyn Modifier>)>,
    {
        let mut modifiers = Self::default();
        for (key, modifier) in entries {
            let key = key.into();
            if key.is_empty() {
                return Err(Error::Type(format!(
                    "modifier `{}` has an empty key",
                    modifier.notation()
                )));
            }
            modifiers.insert(key, modifier);
        }
        modifiers.sort();
        Ok(modifiers)
    }

    /// Build from a list, each modifier is keyed by its name
    pub fn from_list<I>(list: I) -> Self
    where
        I: IntoIterator<Item = Box<dyn Modifier>>,
    {
        let mut modifiers = Self::default();
        for modifier in list {
            modifiers.insert(modifier.name().to_owned(), modifier);
        }
        modifiers.sort();
        modifiers
    }

    fn insert(&mut self, key: String, modifier: Box<dyn Modifier>) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = modifier,
            None => self.entries.push((key, modifier)),
        }
    }

    // stable: equal orders keep the order they were supplied in
    fn sort(&mut self) {
        self.entries.sort_by_key(|(_, modifier)| modifier.order());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&dyn Modifier> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, modifier)| modifier.as_ref())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &dyn Modifier)> {
        self.entries
            .iter()
            .map(|(key, modifier)| (key.as_str(), modifier.as_ref()))
    }

    pub(crate) fn check(&self, die: &dyn Die) -> Result<()> {
        self.entries
            .iter()
            .try_for_each(|(_, modifier)| modifier.check(die))
    }

    pub(crate) fn apply(
        &self,
        results: RollResults,
        die: &dyn Die,
        source: &mut dyn Source,
    ) -> RollResults {
        self.entries.iter().fold(results, |results, (key, modifier)| {
            trace!(modifier = %key, notation = modifier.notation(), "applying");
            modifier.run(results, die, source)
        })
    }
}

impl FromIterator<Box<dyn Modifier>> for Modifiers {
    fn from_iter<I: IntoIterator<Item = Box<dyn Modifier>>>(iter: I) -> Self {
        Self::from_list(iter)
    }
}

impl Serialize for Modifiers {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, modifier) in &self.entries {
            map.serialize_entry(key, &modifier.to_value())?;
        }
        map.end()
    }
}

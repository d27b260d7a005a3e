mod result;
mod results;

pub use result::Flag;
pub use result::RollResult;
pub use results::RollResults;

use rand::Rng;

/// Interface for rolling dices
pub trait Source {
    /// Uniform integer in `min..=max`
    fn integer(&mut self, min: i64, max: i64) -> i64;
}

/// Default random dice roller
pub struct RandomSource<'a, T: Rng> {
    pub generator: &'a mut T,
}

impl<T: Rng> Source for RandomSource<'_, T> {
    fn integer(&mut self, min: i64, max: i64) -> i64 {
        self.generator.gen_range(min..=max)
    }
}

use crate::dice::Die;
use crate::error::Result;
use crate::parser::Parser;
use crate::roll::RandomSource;
use crate::roll::RollResults;
use crate::roll::Source;
use rand::Rng;

/// Represent a solver and holds the die built from the query string
#[derive(Debug)]
pub struct Solver {
    die: Box<dyn Die>,
}

impl Solver {
    pub fn new(input: &str) -> Result<Self> {
        Ok(Solver {
            die: Parser::parse_die(input)?,
        })
    }

    /// Solve the roll expression using the default Rng source
    pub fn solve(&self) -> RollResults {
        self.die.roll()
    }

    /// Solve the roll expression using the provided Rng source
    pub fn solve_with<R: Rng>(&self, generator: &mut R) -> RollResults {
        self.solve_with_source(&mut RandomSource { generator })
    }

    /// Solve the roll expression using the provided source
    pub fn solve_with_source<S: Source>(&self, source: &mut S) -> RollResults {
        self.die.roll_with_source(source)
    }

    pub fn die(&self) -> &dyn Die {
        self.die.as_ref()
    }

    pub fn as_str(&self) -> &str {
        self.die.notation()
    }
}

impl std::fmt::Display for Solver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.die)
    }
}

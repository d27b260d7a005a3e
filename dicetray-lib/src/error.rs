use crate::parser;

/// Crate Error type
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required constructor argument was absent or empty
    #[error("missing required argument `{0}`")]
    MissingArgument(&'static str),
    /// A die parameter is outside the domain accepted by the variant
    #[error("{0}")]
    Range(String),
    /// An argument has the wrong shape, or a non positive quantity
    #[error("{0}")]
    Type(String),
    #[error("{0}")]
    Pest(Box<pest::error::Error<parser::Rule>>),
}

impl From<pest::error::Error<parser::Rule>> for Error {
    fn from(value: pest::error::Error<parser::Rule>) -> Self {
        Self::Pest(Box::new(value))
    }
}

/// Crate Result type
pub type Result<T> = std::result::Result<T, Error>;

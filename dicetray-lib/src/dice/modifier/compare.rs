use crate::error::Error;
use serde::Serialize;
use std::str::FromStr;

/// Comparison used by a compare point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Operator {
    #[serde(rename = "=")]
    Equal,
    #[serde(rename = "!=")]
    NotEqual,
    #[serde(rename = "<")]
    Less,
    #[serde(rename = ">")]
    Greater,
    #[serde(rename = "<=")]
    LessOrEqual,
    #[serde(rename = ">=")]
    GreaterOrEqual,
}

impl FromStr for Operator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "=" => Ok(Operator::Equal),
            "!=" | "<>" => Ok(Operator::NotEqual),
            "<" => Ok(Operator::Less),
            ">" => Ok(Operator::Greater),
            "<=" => Ok(Operator::LessOrEqual),
            ">=" => Ok(Operator::GreaterOrEqual),
            other => Err(Error::Type(format!("unknown compare operator `{other}`"))),
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            Operator::Equal => "=",
            Operator::NotEqual => "!=",
            Operator::Less => "<",
            Operator::Greater => ">",
            Operator::LessOrEqual => "<=",
            Operator::GreaterOrEqual => ">=",
        };
        write!(f, "{symbol}")
    }
}

/// Operator and value a result is tested against, like `>=5`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ComparePoint {
    operator: Operator,
    value: i64,
}

impl ComparePoint {
    pub fn new(operator: Operator, value: i64) -> Self {
        ComparePoint { operator, value }
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn is_match(&self, value: i64) -> bool {
        match self.operator {
            Operator::Equal => value == self.value,
            Operator::NotEqual => value != self.value,
            Operator::Less => value < self.value,
            Operator::Greater => value > self.value,
            Operator::LessOrEqual => value <= self.value,
            Operator::GreaterOrEqual => value >= self.value,
        }
    }
}

impl std::fmt::Display for ComparePoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.operator, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches() {
        let cases = [
            ("=", 3, [false, true, false]),
            ("!=", 3, [true, false, true]),
            ("<>", 3, [true, false, true]),
            ("<", 3, [true, false, false]),
            (">", 3, [false, false, true]),
            ("<=", 3, [true, true, false]),
            (">=", 3, [false, true, true]),
        ];
        for (operator, value, expected) in cases {
            let point = ComparePoint::new(operator.parse().unwrap(), value);
            assert_eq!(expected, [2, 3, 4].map(|v| point.is_match(v)), "{point}");
        }
    }

    #[test]
    fn unknown_operator() {
        assert!("=>".parse::<Operator>().is_err());
    }

    #[test]
    fn display_normalizes_not_equal() {
        let point = ComparePoint::new("<>".parse().unwrap(), -2);
        assert_eq!("!=-2", point.to_string());
    }
}

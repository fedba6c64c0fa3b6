use std::str::FromStr;

use crate::zset::ZSetError;

/// One side of a score interval.
///
/// `NegativeInfinity` and `PositiveInfinity` are the unbounded sides written
/// as `-inf` and `+inf` in commands. A `Value` border is inclusive unless it
/// was written with a leading `(`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScoreBorder {
    NegativeInfinity,
    PositiveInfinity,
    Value { value: f64, exclusive: bool },
}

impl ScoreBorder {
    pub fn inclusive(value: f64) -> Self {
        ScoreBorder::Value {
            value,
            exclusive: false,
        }
    }

    pub fn exclusive(value: f64) -> Self {
        ScoreBorder::Value {
            value,
            exclusive: true,
        }
    }

    /// Returns true when `score` lies strictly before this border.
    ///
    /// Used as the lower side of a range, a score that is `below` the border
    /// is out of range.
    pub fn below(&self, score: f64) -> bool {
        match *self {
            ScoreBorder::NegativeInfinity => false,
            ScoreBorder::PositiveInfinity => true,
            ScoreBorder::Value { value, exclusive } => {
                if exclusive {
                    score <= value
                } else {
                    score < value
                }
            }
        }
    }

    /// Returns true when `score` lies strictly after this border.
    ///
    /// Used as the upper side of a range, a score that is `above` the border
    /// is out of range.
    pub fn above(&self, score: f64) -> bool {
        match *self {
            ScoreBorder::NegativeInfinity => true,
            ScoreBorder::PositiveInfinity => false,
            ScoreBorder::Value { value, exclusive } => {
                if exclusive {
                    score >= value
                } else {
                    score > value
                }
            }
        }
    }
}

impl FromStr for ScoreBorder {
    type Err = ZSetError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.to_lowercase().as_str() {
            "-inf" => return Ok(ScoreBorder::NegativeInfinity),
            "+inf" | "inf" => return Ok(ScoreBorder::PositiveInfinity),
            _ => (),
        }

        let (number, exclusive) = match input.strip_prefix('(') {
            Some(rest) => (rest, true),
            None => (input, false),
        };

        let Ok(value) = number.parse::<f64>() else {
            return Err(ZSetError::InvalidBorder(input.to_string()));
        };

        if value.is_nan() {
            return Err(ZSetError::InvalidBorder(input.to_string()));
        }

        Ok(ScoreBorder::Value { value, exclusive })
    }
}

/// A closed, open or half-open interval of scores.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreRange {
    pub min: ScoreBorder,
    pub max: ScoreBorder,
}

impl ScoreRange {
    pub fn new(min: ScoreBorder, max: ScoreBorder) -> Self {
        Self { min, max }
    }

    /// The range covering every score.
    pub fn all() -> Self {
        Self::new(ScoreBorder::NegativeInfinity, ScoreBorder::PositiveInfinity)
    }

    /// Detects inverted and degenerate ranges, which select nothing.
    pub fn is_empty(&self) -> bool {
        match (self.min, self.max) {
            (ScoreBorder::PositiveInfinity, _) | (_, ScoreBorder::NegativeInfinity) => true,
            (ScoreBorder::NegativeInfinity, _) | (_, ScoreBorder::PositiveInfinity) => false,
            (
                ScoreBorder::Value {
                    value: min,
                    exclusive: min_exclusive,
                },
                ScoreBorder::Value {
                    value: max,
                    exclusive: max_exclusive,
                },
            ) => min > max || (min == max && (min_exclusive || max_exclusive)),
        }
    }

    pub fn contains(&self, score: f64) -> bool {
        !self.min.below(score) && !self.max.above(score)
    }
}

use crate::{
    commands::command_error::CommandError,
    resp::RespValue,
    zset::{Element, ScoreBorder, ScoreRange},
};

pub fn parse_score(input: &str) -> Result<f64, CommandError> {
    match input.parse::<f64>() {
        Ok(score) if !score.is_nan() => Ok(score),
        _ => Err(CommandError::InvalidFloat),
    }
}

pub fn parse_integer(input: &str) -> Result<i64, CommandError> {
    input
        .parse::<i64>()
        .map_err(|_| CommandError::InvalidInteger)
}

pub fn parse_score_range(min: &str, max: &str) -> Result<ScoreRange, CommandError> {
    let min = min.parse::<ScoreBorder>()?;
    let max = max.parse::<ScoreBorder>()?;

    Ok(ScoreRange::new(min, max))
}

/// Scores print in their shortest round-trip form: `1`, `2.5`, `inf`.
pub fn format_score(score: f64) -> String {
    score.to_string()
}

pub fn encode_elements(elements: Vec<Element>, with_scores: bool) -> RespValue {
    let mut encoded = Vec::with_capacity(if with_scores {
        elements.len() * 2
    } else {
        elements.len()
    });

    for element in elements {
        let score = element.score;
        encoded.push(RespValue::BulkString(element.member));
        if with_scores {
            encoded.push(RespValue::BulkString(format_score(score)));
        }
    }

    RespValue::Array(encoded)
}

/// Converts Redis' 0-based inclusive indexes, where negative values count
/// from the end, into the 1-based half-open rank range `[start, stop)`.
///
/// # Examples
///
/// ```text
/// // For a set of length 5:
/// // rank_range(5, 0, 2) -> Ok((1, 4))
/// // rank_range(5, -2, -1) -> Ok((4, 6))
/// // rank_range(5, 5, 10) -> Err("Start index is out of bounds")
/// ```
pub fn rank_range(length: usize, start_index: i64, end_index: i64) -> Result<(usize, usize), &'static str> {
    let len = length as i64;

    if len == 0 {
        return Err("Sorted set is empty");
    }

    let mut start = if start_index < 0 {
        len + start_index
    } else {
        start_index
    };
    let mut end = if end_index < 0 {
        len + end_index
    } else {
        end_index
    };

    start = start.max(0);
    end = end.min(len - 1);

    if start >= len {
        return Err("Start index is out of bounds");
    }

    if start > end {
        return Err("Start index is bigger than end index after processing");
    }

    Ok((start as usize + 1, end as usize + 2))
}

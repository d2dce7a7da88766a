use serde::{Deserialize, Serialize};

/// Parsed `earned/max` pair from a check-run summary such as `"Points 7/10"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsSummary {
    pub earned: u32,
    pub max: u32,
}

/// Failure modes of the summary field, the one genuinely fragile input in the
/// pipeline.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PointsParseError {
    #[error("summary has no points token (expected 'label N/M ...')")]
    MissingToken,
    #[error("points token '{0}' is not in N/M integer form")]
    MalformedToken(String),
}

/// Extracts the score from a free-text CI summary: the second
/// whitespace-separated token, split on `/`, both sides decimal integers.
pub fn parse_points(summary: &str) -> Result<PointsSummary, PointsParseError> {
    let token = summary
        .split_whitespace()
        .nth(1)
        .ok_or(PointsParseError::MissingToken)?;

    let (earned, max) = token
        .split_once('/')
        .ok_or_else(|| PointsParseError::MalformedToken(token.to_string()))?;

    let earned = earned
        .parse::<u32>()
        .map_err(|_| PointsParseError::MalformedToken(token.to_string()))?;
    let max = max
        .parse::<u32>()
        .map_err(|_| PointsParseError::MalformedToken(token.to_string()))?;

    Ok(PointsSummary { earned, max })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_standard_summary() {
        let points = parse_points("Points 7/10").expect("summary parses");
        assert_eq!(points, PointsSummary { earned: 7, max: 10 });
    }

    #[test]
    fn tolerates_trailing_text() {
        let points = parse_points("Points 95/100 (autograded)").expect("summary parses");
        assert_eq!(points.earned, 95);
        assert_eq!(points.max, 100);
    }

    #[test]
    fn rejects_single_token_summary() {
        assert_eq!(parse_points("Points"), Err(PointsParseError::MissingToken));
        assert_eq!(parse_points(""), Err(PointsParseError::MissingToken));
    }

    #[test]
    fn rejects_non_fraction_token() {
        assert!(matches!(
            parse_points("Points ten"),
            Err(PointsParseError::MalformedToken(token)) if token == "ten"
        ));
    }

    #[test]
    fn rejects_non_integer_sides() {
        assert!(parse_points("Points 7.5/10").is_err());
        assert!(parse_points("Points 7/").is_err());
        assert!(parse_points("Points -1/10").is_err());
    }
}

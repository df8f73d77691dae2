//! Track description parsing
//!
//! Format: an integer point count N, then N records of six whitespace
//! separated floats `x y z nx ny nz` (position, then surface normal). The
//! whole stream must parse before any point is used.

use std::io::Read;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::MIN_CONTROL_POINTS;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read track: {0}")]
    Io(#[from] std::io::Error),
    #[error("track is empty, expected a point count")]
    MissingCount,
    #[error("invalid point count {0:?}")]
    InvalidCount(String),
    #[error("track needs at least {min} points, found {found}")]
    TooFewPoints { found: usize, min: usize },
    #[error("track declares {expected} values but ends after {found}")]
    Truncated { expected: usize, found: usize },
    #[error("invalid number {token:?} in track data")]
    InvalidNumber { token: String },
    #[error("track has zero length")]
    ZeroLength,
}

/// One raw input point: position and the track's "up" at that position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlPoint {
    pub point: Vec3,
    /// Unit normal (zero if the file gave a zero normal)
    pub normal: Vec3,
}

impl ControlPoint {
    pub fn new(point: Vec3, normal: Vec3) -> Self {
        Self {
            point,
            normal: normal.normalize_or_zero(),
        }
    }
}

/// Read and parse a whole track stream
pub fn read_control_points<R: Read>(mut reader: R) -> Result<Vec<ControlPoint>, LoadError> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    parse_control_points(&text)
}

/// Parse track text into control points
pub fn parse_control_points(text: &str) -> Result<Vec<ControlPoint>, LoadError> {
    let mut tokens = text.split_whitespace();

    let count_token = tokens.next().ok_or(LoadError::MissingCount)?;
    let count: usize = count_token
        .parse()
        .map_err(|_| LoadError::InvalidCount(count_token.to_string()))?;
    if count < MIN_CONTROL_POINTS {
        return Err(LoadError::TooFewPoints {
            found: count,
            min: MIN_CONTROL_POINTS,
        });
    }

    let expected = count
        .checked_mul(6)
        .ok_or_else(|| LoadError::InvalidCount(count_token.to_string()))?;
    // The count is untrusted; never reserve more than the text could hold
    let mut values = Vec::with_capacity(expected.min(text.len() / 2));
    for token in tokens.by_ref().take(expected) {
        let value: f32 = token.parse().map_err(|_| LoadError::InvalidNumber {
            token: token.to_string(),
        })?;
        if !value.is_finite() {
            return Err(LoadError::InvalidNumber {
                token: token.to_string(),
            });
        }
        values.push(value);
    }
    if values.len() < expected {
        return Err(LoadError::Truncated {
            expected,
            found: values.len(),
        });
    }

    Ok(values
        .chunks_exact(6)
        .map(|v| ControlPoint::new(Vec3::new(v[0], v[1], v[2]), Vec3::new(v[3], v[4], v[5])))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE: &str = "3\n0 0 0 0 2 0\n10 0 0 0 1 0\n5 0 8 0 1 0\n";

    #[test]
    fn test_parse_valid() {
        let points = parse_control_points(TRIANGLE).unwrap();
        assert_eq!(points.len(), 3);
        assert_eq!(points[1].point, Vec3::new(10.0, 0.0, 0.0));
        // Normals come back unit length
        assert_eq!(points[0].normal, Vec3::Y);
    }

    #[test]
    fn test_reader_matches_str() {
        let from_reader = read_control_points(TRIANGLE.as_bytes()).unwrap();
        assert_eq!(from_reader, parse_control_points(TRIANGLE).unwrap());
    }

    #[test]
    fn test_trailing_data_ignored() {
        let text = format!("{TRIANGLE} 99 junk");
        assert_eq!(parse_control_points(&text).unwrap().len(), 3);
    }

    #[test]
    fn test_empty_stream() {
        assert!(matches!(parse_control_points("  \n"), Err(LoadError::MissingCount)));
    }

    #[test]
    fn test_bad_count() {
        assert!(matches!(parse_control_points("three"), Err(LoadError::InvalidCount(_))));
        assert!(matches!(parse_control_points("-4"), Err(LoadError::InvalidCount(_))));
    }

    #[test]
    fn test_too_few_points() {
        let err = parse_control_points("2 0 0 0 0 1 0 1 0 0 0 1 0").unwrap_err();
        assert!(matches!(err, LoadError::TooFewPoints { found: 2, min: 3 }));
    }

    #[test]
    fn test_truncated() {
        let err = parse_control_points("3\n0 0 0 0 1 0\n10 0 0 0 1 0\n5 0").unwrap_err();
        assert!(matches!(err, LoadError::Truncated { expected: 18, found: 14 }));
    }

    #[test]
    fn test_overflowing_count() {
        let err = parse_control_points("18446744073709551615 0 0 0").unwrap_err();
        assert!(matches!(err, LoadError::InvalidCount(ref token) if token == "18446744073709551615"));
    }

    #[test]
    fn test_huge_count_is_truncated_not_allocated() {
        let err = parse_control_points("4000000000000 0 0 0 0 1 0").unwrap_err();
        assert!(matches!(
            err,
            LoadError::Truncated {
                expected: 24_000_000_000_000,
                found: 6
            }
        ));
    }

    #[test]
    fn test_malformed_number() {
        let err = parse_control_points("3\n0 0 0 0 1 0\n10 x 0 0 1 0\n5 0 8 0 1 0").unwrap_err();
        assert!(matches!(err, LoadError::InvalidNumber { ref token } if token == "x"));
        assert!(parse_control_points("3\n0 0 0 0 1 0\n10 inf 0 0 1 0\n5 0 8 0 1 0").is_err());
    }
}

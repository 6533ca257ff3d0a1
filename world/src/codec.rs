//! JSON world files: an ordered array of `{x, y, width, height}` records.

use lidar_arena_core::{Rect, WallRecord};
use thiserror::Error;

use crate::{query, World};

/// Errors raised while decoding a world file.
///
/// Decoding is all-or-nothing: any malformed record rejects the whole file.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The payload is not valid JSON or a record is missing a numeric field.
    #[error("malformed world file: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Decodes the rectangles described by a world file.
pub fn decode_world(contents: &str) -> Result<Vec<Rect>, ParseError> {
    let records: Vec<WallRecord> = serde_json::from_str(contents)?;
    Ok(records.into_iter().map(Rect::from).collect())
}

/// Encodes the world's walls as a pretty-printed world file.
#[must_use]
pub fn encode_world(world: &World) -> String {
    encode_records(&query::records(world))
}

/// Encodes raw wall records as a pretty-printed world file.
#[must_use]
pub fn encode_records(records: &[WallRecord]) -> String {
    serde_json::to_string_pretty(records).expect("wall record serialization never fails")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_integer_literals() {
        let rects = decode_world(r#"[{"x": 10, "y": 20, "width": 30, "height": 40}]"#)
            .expect("world decodes");
        assert_eq!(rects, vec![Rect::new(10.0, 20.0, 30.0, 40.0)]);
    }

    #[test]
    fn empty_array_is_an_empty_world() {
        assert_eq!(decode_world("[]").expect("world decodes"), Vec::new());
    }

    #[test]
    fn missing_field_rejects_whole_file() {
        let contents = r#"[
            {"x": 1, "y": 2, "width": 3, "height": 4},
            {"x": 1, "y": 2, "width": 3}
        ]"#;
        assert!(matches!(
            decode_world(contents),
            Err(ParseError::Malformed(_))
        ));
    }

    #[test]
    fn non_numeric_field_rejects_whole_file() {
        let contents = r#"[{"x": "left", "y": 2, "width": 3, "height": 4}]"#;
        assert!(matches!(
            decode_world(contents),
            Err(ParseError::Malformed(_))
        ));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let contents = r#"[{"x": 1, "y": 2, "width": 3, "height": 4, "depth": 5}]"#;
        assert!(decode_world(contents).is_err());
    }
}

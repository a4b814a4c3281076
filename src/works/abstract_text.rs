//! Abstract reconstruction from an inverted positional index.
//!
//! OpenAlex does not serve abstracts as plain text. Instead each work carries
//! an `abstract_inverted_index`: a mapping from word to the zero-based
//! positions where that word occurs in the original abstract. This module
//! rebuilds the readable text from that index and is the only place in the
//! crate that does so.

use serde_json::Value;

/// Positions beyond this are treated as a malformed index rather than
/// allocating an absurd slot vector.
const MAX_ABSTRACT_POSITION: usize = 100_000;

/// Rebuild a plain-text abstract from an inverted index.
///
/// Returns `None` for a missing, null, empty, or malformed index. Never
/// panics and never errors; callers log the absence if they care.
///
/// Unfilled positions render as empty tokens, so a gap still produces a
/// space. When two words claim the same slot the last one wins.
pub fn reconstruct_abstract(index: Option<&Value>) -> Option<String> {
    let map = match index {
        Some(Value::Object(map)) if !map.is_empty() => map,
        _ => return None,
    };

    let mut slots: Vec<&str> = Vec::new();
    for (word, positions) in map {
        let positions = positions.as_array()?;
        for position in positions {
            let position = usize::try_from(position.as_i64()?).ok()?;
            if position > MAX_ABSTRACT_POSITION {
                return None;
            }
            if position >= slots.len() {
                slots.resize(position + 1, "");
            }
            slots[position] = word.as_str();
        }
    }

    Some(slots.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reconstruct_simple_sentence() {
        let index = json!({"the": [0], "cat": [1], "sat": [2]});
        assert_eq!(
            reconstruct_abstract(Some(&index)),
            Some("the cat sat".to_string())
        );
    }

    #[test]
    fn test_reconstruct_repeated_word() {
        let index = json!({"the": [0, 3], "cat": [1], "sat": [2], "mat": [5], "on": [4]});
        assert_eq!(
            reconstruct_abstract(Some(&index)),
            Some("the cat sat the on mat".to_string())
        );
    }

    #[test]
    fn test_reconstruct_preserves_order_regardless_of_key_order() {
        let index = json!({"world": [1], "hello": [0]});
        assert_eq!(
            reconstruct_abstract(Some(&index)),
            Some("hello world".to_string())
        );
    }

    #[test]
    fn test_gap_renders_as_empty_token() {
        let index = json!({"a": [0], "c": [2]});
        assert_eq!(reconstruct_abstract(Some(&index)), Some("a  c".to_string()));
    }

    #[test]
    fn test_empty_and_missing_index() {
        assert_eq!(reconstruct_abstract(None), None);
        assert_eq!(reconstruct_abstract(Some(&Value::Null)), None);
        assert_eq!(reconstruct_abstract(Some(&json!({}))), None);
    }

    #[test]
    fn test_malformed_index_yields_none() {
        // Positions not an array
        assert_eq!(reconstruct_abstract(Some(&json!({"word": 3}))), None);
        // Non-integer position
        assert_eq!(
            reconstruct_abstract(Some(&json!({"word": ["zero"]}))),
            None
        );
        // Negative position
        assert_eq!(reconstruct_abstract(Some(&json!({"word": [-1]}))), None);
        // Not an object at all
        assert_eq!(reconstruct_abstract(Some(&json!(["word"]))), None);
    }

    #[test]
    fn test_oversized_position_rejected() {
        let index = json!({"word": [10_000_000]});
        assert_eq!(reconstruct_abstract(Some(&index)), None);
    }

    #[test]
    fn test_roundtrip_tokens_in_original_order() {
        let sentence = "deep learning for scholarly document understanding";
        let mut index = serde_json::Map::new();
        for (position, word) in sentence.split_whitespace().enumerate() {
            index
                .entry(word.to_string())
                .or_insert_with(|| json!([]))
                .as_array_mut()
                .unwrap()
                .push(json!(position));
        }
        let rebuilt = reconstruct_abstract(Some(&Value::Object(index))).unwrap();
        assert_eq!(rebuilt, sentence);
    }
}

//! Shaping layer between raw OpenAlex records and compact tool responses.
//!
//! Records come back from the dataset client as nested JSON. This module
//! reconstructs abstracts from their inverted index, normalizes raw items
//! into field mappings, projects them down to requested fields, and derives
//! condensed summaries. Nothing here is cached or mutated after being
//! returned.

pub mod abstract_text;
pub mod normalize;
pub mod select;
pub mod summary;

pub use abstract_text::reconstruct_abstract;
pub use normalize::{attach_reconstructed_abstract, normalize};
pub use select::{requested_or_none, select_fields};
pub use summary::summarize_work;

const OPENALEX_URL_PREFIX: &str = "https://openalex.org/";

/// Strip the OpenAlex URL prefix from an identifier, leaving the bare ID.
///
/// `https://openalex.org/W123` and `W123` are interchangeable everywhere a
/// work id is accepted.
pub fn strip_id_prefix(work_id: &str) -> &str {
    if work_id.starts_with(OPENALEX_URL_PREFIX) {
        work_id.rsplit('/').next().unwrap_or(work_id)
    } else {
        work_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_id_prefix() {
        assert_eq!(strip_id_prefix("https://openalex.org/W123"), "W123");
        assert_eq!(strip_id_prefix("W123"), "W123");
        // Non-OpenAlex URLs pass through untouched
        assert_eq!(
            strip_id_prefix("https://doi.org/10.1/x"),
            "https://doi.org/10.1/x"
        );
    }
}

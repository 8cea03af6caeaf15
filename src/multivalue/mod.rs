//! Multi-value parsing and joining.
//!
//! List keys (artists, genres, composers...) are stored very differently
//! across containers. Vorbis comments repeat the field, ID3v2.4 packs
//! null-separated values into one frame, and the legacy containers hold a
//! single string that apps fill with their own separators.
//!
//! Reading follows the format's [`FormatClass`]:
//!
//! | Class  | Stored entries | Result                              |
//! |--------|----------------|-------------------------------------|
//! | Modern | several        | each entry kept verbatim            |
//! | Modern | one            | split on separators                 |
//! | Legacy | any            | every entry split on separators     |
//!
//! Blank segments are dropped everywhere, and a list with nothing left is
//! absent rather than empty.

use crate::model::FormatClass;

/// Characters treated as list separators. Runs of them collapse, so `//`
/// and `\\` need no special casing.
pub const SEPARATORS: [char; 5] = [';', ',', '/', '\\', '|'];

/// Canonical join for ID3v2.3 text frames.
pub const ID3V23_SEPARATOR: &str = " / ";
/// Canonical join for RIFF INFO chunks.
pub const RIFF_SEPARATOR: &str = "; ";

/// Split one stored string into trimmed, non-blank segments.
pub fn split(value: &str) -> Vec<String> {
    value
        .split(|c| SEPARATORS.contains(&c))
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(String::from)
        .collect()
}

/// Turn stored entries into a unified list, or `None` when nothing is left.
pub fn parse_entries(entries: &[String], class: FormatClass) -> Option<Vec<String>> {
    let stored: Vec<&String> = entries.iter().filter(|e| !e.trim().is_empty()).collect();

    let values: Vec<String> = match (class, stored.as_slice()) {
        (_, []) => Vec::new(),
        (FormatClass::Modern, [single]) => split(single),
        (FormatClass::Modern, many) => many.iter().map(|e| e.to_string()).collect(),
        (FormatClass::Legacy, all) => all.iter().flat_map(|e| split(e)).collect(),
    };

    (!values.is_empty()).then_some(values)
}

/// First non-blank entry, for single-valued keys.
pub fn first_text(entries: &[String]) -> Option<String> {
    entries
        .iter()
        .map(|e| e.trim())
        .find(|e| !e.is_empty())
        .map(String::from)
}

/// Trim values and drop blanks before they are stored.
pub fn clean(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(String::from)
        .collect()
}

/// Join values for a single-string container. `None` when all were blank.
pub fn join(values: &[String], separator: &str) -> Option<String> {
    let cleaned = clean(values);
    (!cleaned.is_empty()).then(|| cleaned.join(separator))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_split_on_every_separator() {
        assert_eq!(
            split("a;b,c/d\\e|f"),
            owned(&["a", "b", "c", "d", "e", "f"])
        );
    }

    #[test]
    fn test_split_collapses_and_trims() {
        assert_eq!(split(" Rock // Pop \\\\ Jazz ;; "), owned(&["Rock", "Pop", "Jazz"]));
        assert!(split(" ; , ").is_empty());
    }

    #[test]
    fn test_modern_multiple_entries_are_verbatim() {
        let entries = owned(&["Artist; One", "Artist, Two"]);
        assert_eq!(
            parse_entries(&entries, FormatClass::Modern),
            Some(owned(&["Artist; One", "Artist, Two"]))
        );
    }

    #[test]
    fn test_modern_single_entry_is_split() {
        let entries = owned(&["Artist One; Artist Two"]);
        assert_eq!(
            parse_entries(&entries, FormatClass::Modern),
            Some(owned(&["Artist One", "Artist Two"]))
        );
    }

    #[test]
    fn test_legacy_always_splits() {
        let entries = owned(&["A; B", "C/D"]);
        assert_eq!(
            parse_entries(&entries, FormatClass::Legacy),
            Some(owned(&["A", "B", "C", "D"]))
        );
    }

    #[test]
    fn test_blank_entries_are_absent() {
        assert_eq!(parse_entries(&owned(&["", "   "]), FormatClass::Modern), None);
        assert_eq!(parse_entries(&[], FormatClass::Legacy), None);
        // one real entry among blanks is treated as a single entry
        assert_eq!(
            parse_entries(&owned(&["", "x;y"]), FormatClass::Modern),
            Some(owned(&["x", "y"]))
        );
    }

    #[test]
    fn test_duplicates_and_order_preserved() {
        assert_eq!(
            parse_entries(&owned(&["b; a; b"]), FormatClass::Legacy),
            Some(owned(&["b", "a", "b"]))
        );
    }

    #[test]
    fn test_join_drops_blanks() {
        assert_eq!(
            join(&owned(&["A", " ", "B "]), ID3V23_SEPARATOR),
            Some("A / B".to_string())
        );
        assert_eq!(join(&owned(&["", " "]), RIFF_SEPARATOR), None);
    }

    #[test]
    fn test_first_text() {
        assert_eq!(first_text(&owned(&[" ", " x "])), Some("x".to_string()));
        assert_eq!(first_text(&owned(&[""])), None);
    }
}

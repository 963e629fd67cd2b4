//! Venue and location merging.
//!
//! Events carry a venue name and a free-text location, and users routinely
//! repeat the venue inside the location ("Main Hall" / "Main Hall, City
//! Center"). Every exporter wants a single display string, so both fields are
//! merged here.
//!
//! # Example
//!
//! ```
//! use calport_core::location::merge_location;
//!
//! assert_eq!(
//!     merge_location("Main Hall, City Center", "City Center"),
//!     "Main Hall, City Center"
//! );
//! ```

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// Separators between sub-locations: ASCII comma, full-width comma, newline.
static PART_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,，\r\n]").expect("Invalid separator regex"));

/// Splits a field into trimmed, whitespace-collapsed, non-empty parts.
fn split_parts(value: &str) -> Vec<String> {
    PART_SEPARATOR
        .split(value)
        .map(|part| part.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|part| !part.is_empty())
        .collect()
}

/// Merges a venue and a free-text location into one display string.
///
/// Venue parts come first, then the location parts that do not repeat a
/// venue part. The combined list is deduplicated case-insensitively, keeping
/// the first spelling, and joined with `", "`.
pub fn merge_location(venue: &str, location: &str) -> String {
    let venue_parts = split_parts(venue);
    let venue_keys: HashSet<String> = venue_parts.iter().map(|p| p.to_lowercase()).collect();

    let location_parts = split_parts(location)
        .into_iter()
        .filter(|p| !venue_keys.contains(&p.to_lowercase()));

    let mut seen = HashSet::new();
    venue_parts
        .into_iter()
        .chain(location_parts)
        .filter(|p| seen.insert(p.to_lowercase()))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_location_part_repeating_venue() {
        assert_eq!(
            merge_location("Main Hall, City Center", "City Center"),
            "Main Hall, City Center"
        );
    }

    #[test]
    fn venue_then_location() {
        assert_eq!(
            merge_location("Main Hall", "12 High St"),
            "Main Hall, 12 High St"
        );
    }

    #[test]
    fn case_insensitive_keeps_first_spelling() {
        assert_eq!(
            merge_location("The Barn", "the barn, FARM road, Farm Road"),
            "The Barn, FARM road"
        );
    }

    #[test]
    fn splits_on_full_width_comma_and_newlines() {
        assert_eq!(
            merge_location("会議室A，本館", "本館\n東京"),
            "会議室A, 本館, 東京"
        );
        assert_eq!(
            merge_location("", "Line one\r\nLine two"),
            "Line one, Line two"
        );
    }

    #[test]
    fn collapses_whitespace_and_drops_empty_parts() {
        assert_eq!(
            merge_location("  Main   Hall ,, ", "\n  City \t Center  ,"),
            "Main Hall, City Center"
        );
    }

    #[test]
    fn empty_inputs() {
        assert_eq!(merge_location("", ""), "");
        assert_eq!(merge_location(" , \n", ""), "");
        assert_eq!(merge_location("", "Park"), "Park");
        assert_eq!(merge_location("Park", ""), "Park");
    }

    #[test]
    fn duplicates_within_venue_are_collapsed() {
        assert_eq!(merge_location("Hall, hall, HALL", "Hall"), "Hall");
    }
}

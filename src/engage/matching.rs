//! Tag overlap matching.

use std::collections::BTreeSet;

/// First tag present in both sets, in the sets' sorted iteration order.
///
/// The choice of which shared tag gets dispatched is not contractual; sorted
/// order just makes it deterministic.
pub fn first_shared_tag<'a>(mine: &'a BTreeSet<String>, theirs: &'a BTreeSet<String>) -> Option<&'a str> {
    mine.intersection(theirs).next().map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_no_overlap() {
        let mine = tags(&["hiking", "music"]);
        let theirs = tags(&["chess"]);
        assert_eq!(first_shared_tag(&mine, &theirs), None);
    }

    #[test]
    fn test_single_overlap() {
        let mine = tags(&["hiking", "music"]);
        let theirs = tags(&["music", "chess"]);
        assert_eq!(first_shared_tag(&mine, &theirs), Some("music"));
    }

    #[test]
    fn test_multiple_overlap_takes_first_sorted() {
        let mine = tags(&["music", "hiking"]);
        let theirs = tags(&["hiking", "music"]);
        // BTreeSet iterates sorted, so "hiking" comes first
        assert_eq!(first_shared_tag(&mine, &theirs), Some("hiking"));
    }

    #[test]
    fn test_empty_sets() {
        let empty = BTreeSet::new();
        let some = tags(&["hiking"]);
        assert_eq!(first_shared_tag(&empty, &some), None);
        assert_eq!(first_shared_tag(&some, &empty), None);
        assert_eq!(first_shared_tag(&empty, &empty), None);
    }
}

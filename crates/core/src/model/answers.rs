use std::collections::BTreeMap;

/// Current answer text per question index.
///
/// Entries appear lazily on first edit; an index without an entry is unanswered
/// and reads back as an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerStore {
    entries: BTreeMap<usize, String>,
}

impl AnswerStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored value for `index`.
    pub fn set(&mut self, index: usize, value: impl Into<String>) {
        self.entries.insert(index, value.into());
    }

    #[must_use]
    pub fn get(&self, index: usize) -> &str {
        self.entries.get(&index).map_or("", String::as_str)
    }

    /// Stored value if the index was touched, else `fallback`.
    ///
    /// An answer edited down to `""` stays `""`; it does not fall back.
    #[must_use]
    pub fn get_or<'a>(&'a self, index: usize, fallback: &'a str) -> &'a str {
        self.entries.get(&index).map_or(fallback, String::as_str)
    }

    #[must_use]
    pub fn is_touched(&self, index: usize) -> bool {
        self.entries.contains_key(&index)
    }

    #[must_use]
    pub fn touched_count(&self) -> usize {
        self.entries.len()
    }

    /// Values for indices `0..len` in order, empty for untouched ones.
    #[must_use]
    pub fn collect(&self, len: usize) -> Vec<String> {
        (0..len).map(|index| self.get(index).to_owned()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untouched_index_reads_empty() {
        let store = AnswerStore::new();
        assert_eq!(store.get(0), "");
        assert!(!store.is_touched(0));
    }

    #[test]
    fn latest_value_wins() {
        let mut store = AnswerStore::new();
        let edits = [(0, "a"), (2, "x"), (0, "ab"), (2, ""), (0, "abc")];
        for (index, value) in edits {
            store.set(index, value);
        }

        assert_eq!(store.get(0), "abc");
        assert_eq!(store.get(2), "");
        assert_eq!(store.get(1), "");
        assert_eq!(store.touched_count(), 2);
    }

    #[test]
    fn fallback_only_applies_until_first_edit() {
        let mut store = AnswerStore::new();
        assert_eq!(store.get_or(1, "fn main() {}"), "fn main() {}");

        store.set(1, "");
        assert_eq!(store.get_or(1, "fn main() {}"), "");
    }

    #[test]
    fn collect_fills_gaps_in_order() {
        let mut store = AnswerStore::new();
        store.set(1, "second");
        store.set(5, "out of range");

        assert_eq!(store.collect(3), vec!["", "second", ""]);
    }
}

//! Frequency statistics for categorical columns.

use indexmap::IndexMap;
use serde::Serialize;

/// Exact value counts in first-seen order, with a deterministic mode.
///
/// The mode is the first value to reach the maximum count in row order:
/// a later value matching (but not exceeding) the current best count
/// never displaces it.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct FrequencyTable {
    counts: IndexMap<String, usize>,
    mode: Option<String>,
    mode_count: usize,
}

impl FrequencyTable {
    /// Build a table from an ordered pass over column values.
    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut table = Self::default();
        for value in values {
            table.observe(value.as_ref());
        }
        table
    }

    /// Count one occurrence of `value`, updating the running mode.
    pub fn observe(&mut self, value: &str) {
        let count = {
            let entry = self.counts.entry(value.to_string()).or_insert(0);
            *entry += 1;
            *entry
        };
        if count > self.mode_count {
            self.mode_count = count;
            self.mode = Some(value.to_string());
        }
    }

    /// Most frequent value (first to reach the maximum count).
    pub fn mode(&self) -> Option<&str> {
        self.mode.as_deref()
    }

    /// Number of distinct values.
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    /// Total observations.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Count for one value; zero when unseen.
    pub fn count_of(&self, value: &str) -> usize {
        self.counts.get(value).copied().unwrap_or(0)
    }

    /// Value counts in first-seen order.
    pub fn counts(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(value, count)| (value.as_str(), *count))
    }

    /// Value counts sorted by count descending; ties keep first-seen order.
    pub fn sorted_counts(&self) -> Vec<(String, usize)> {
        let mut entries: Vec<(String, usize)> = self
            .counts
            .iter()
            .map(|(value, count)| (value.clone(), *count))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries
    }

    /// Returns `true` when no values were observed.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_prefers_first_to_reach_maximum() {
        // B reaches 2 before A does, so B wins the tie.
        let table = FrequencyTable::from_values(["A", "B", "B", "A"]);
        assert_eq!(table.mode(), Some("B"));
        assert_eq!(table.count_of("A"), 2);
        assert_eq!(table.count_of("B"), 2);
        assert_eq!(table.distinct(), 2);
        assert_eq!(table.total(), 4);
    }

    #[test]
    fn mode_moves_when_strictly_exceeded() {
        let table = FrequencyTable::from_values(["A", "B", "B"]);
        assert_eq!(table.mode(), Some("B"));
    }

    #[test]
    fn counts_preserve_first_seen_order() {
        let table = FrequencyTable::from_values(["Z", "A", "Z", "M"]);
        let order: Vec<&str> = table.counts().map(|(value, _)| value).collect();
        assert_eq!(order, vec!["Z", "A", "M"]);
    }

    #[test]
    fn sorted_counts_break_ties_by_first_seen() {
        let table = FrequencyTable::from_values(["C", "A", "A", "B", "C"]);
        let sorted = table.sorted_counts();
        assert_eq!(sorted[0].1, 2);
        assert_eq!(sorted[1].1, 2);
        // C was seen before A, so it leads among the tied pair.
        assert_eq!(sorted[0].0, "C");
        assert_eq!(sorted[1].0, "A");
        assert_eq!(sorted[2], ("B".to_string(), 1));
    }
}

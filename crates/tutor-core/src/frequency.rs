//! Insertion-ordered frequency counting for interaction labels.
//!
//! The analysis pipeline counts how often each topic and question-type
//! label occurs in a session's history and picks the dominant one. Labels
//! are model output, so they are compared exactly as stored (after
//! trimming): "Algebra" and "algebra" are different keys on purpose, since
//! collapsing them would silently merge labels the model distinguished.

/// A frequency table over string keys that remembers insertion order.
///
/// Keys are trimmed before counting but otherwise compared exactly.
/// When several keys share the maximum count, the key recorded first wins,
/// which keeps the analysis deterministic for a given history order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrequencyTable {
    entries: Vec<(String, usize)>,
}

impl FrequencyTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one occurrence of `key`.
    ///
    /// The key is trimmed first. An empty key still counts: interactions
    /// whose classification failed carry an empty label, and those rows
    /// are part of the history like any other.
    pub fn record(&mut self, key: &str) {
        let key = key.trim();
        if let Some(entry) = self.entries.iter_mut().find(|(existing, _)| existing == key) {
            entry.1 += 1;
        } else {
            self.entries.push((key.to_string(), 1));
        }
    }

    /// Returns the key with the highest count, or `None` for an empty table.
    ///
    /// Ties resolve to the key that was recorded first; only a strictly
    /// greater count displaces the current maximum.
    pub fn most_frequent(&self) -> Option<&str> {
        let mut best: Option<(&str, usize)> = None;
        for (key, count) in &self.entries {
            match best {
                Some((_, best_count)) if *count <= best_count => {}
                _ => best = Some((key, *count)),
            }
        }
        best.map(|(key, _)| key)
    }

    /// Returns the count recorded for `key` (trimmed), or 0.
    pub fn count(&self, key: &str) -> usize {
        let key = key.trim();
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }

    /// Number of distinct keys in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

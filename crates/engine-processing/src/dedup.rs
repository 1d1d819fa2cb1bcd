use model::core::value::Value;
use std::collections::HashMap;

/// What happened to the first row carrying a natural key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanonicalOutcome {
    Accepted,
    Failed,
}

/// Natural keys seen during the current run, with the outcome of the row
/// that was actually submitted for each.
#[derive(Debug, Default)]
pub struct DedupSet {
    seen: HashMap<Value, CanonicalOutcome>,
}

impl DedupSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Outcome of the earlier row with this key, or `None` on a first
    /// sighting. A null key is never remembered.
    pub fn outcome_of(&self, key: &Value) -> Option<CanonicalOutcome> {
        if key.is_null() {
            return None;
        }
        self.seen.get(key).copied()
    }

    /// Remembers how the submission for `key` ended. Null keys are ignored.
    pub fn record(&mut self, key: &Value, outcome: CanonicalOutcome) {
        if !key.is_null() {
            self.seen.insert(key.clone(), outcome);
        }
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

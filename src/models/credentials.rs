//! Credential set model
//!
//! A credential set is one group of private keys handed to a single job.

#![allow(dead_code)]

use std::fmt;

/// One pre-provisioned group of private keys.
///
/// `slot` is the set's position in the `NESTED_ACCOUNTS` list. It is the only
/// part of a set that ever appears in logs or summaries.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialSet {
    slot: usize,
    keys: Vec<String>,
}

impl CredentialSet {
    pub fn new(slot: usize, keys: Vec<String>) -> Self {
        Self { slot, keys }
    }

    /// Build sets from the decoded nested account list, numbering them in order
    pub fn from_nested(nested: Vec<Vec<String>>) -> Vec<Self> {
        nested
            .into_iter()
            .enumerate()
            .map(|(slot, keys)| Self::new(slot, keys))
            .collect()
    }

    pub fn slot(&self) -> usize {
        self.slot
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Value passed to the runner as `PRIVATE_KEYS`
    pub fn joined(&self) -> String {
        self.keys.join(",")
    }
}

// Keys never reach the log output.
impl fmt::Debug for CredentialSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialSet")
            .field("slot", &self.slot)
            .field("keys", &format_args!("<{} redacted>", self.keys.len()))
            .finish()
    }
}

impl fmt::Display for CredentialSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "credential set #{} ({} keys)", self.slot, self.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joined_keys() {
        let set = CredentialSet::new(0, vec!["0xaa".to_string(), "0xbb".to_string()]);
        assert_eq!(set.joined(), "0xaa,0xbb");
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_from_nested_assigns_slots() {
        let sets = CredentialSet::from_nested(vec![
            vec!["a".to_string()],
            vec!["b".to_string(), "c".to_string()],
        ]);
        assert_eq!(sets.len(), 2);
        assert_eq!(sets[0].slot(), 0);
        assert_eq!(sets[1].slot(), 1);
        assert_eq!(sets[1].joined(), "b,c");
    }

    #[test]
    fn test_debug_redacts_keys() {
        let set = CredentialSet::new(3, vec!["0xdeadbeef".to_string()]);
        let debug = format!("{set:?}");
        assert!(!debug.contains("deadbeef"));
        assert!(debug.contains("slot: 3"));
        assert!(!set.to_string().contains("deadbeef"));
    }
}

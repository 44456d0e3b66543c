//! Repositories opted out of the optional remote and commit steps

use std::collections::HashSet;

/// Names excluded from remote management and commits for one run
///
/// Excluded repositories are still cloned, updated and checked out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    names: HashSet<String>,
}

impl ExclusionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Excluded names, sorted for stable output
    pub fn sorted(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.names.iter().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl<S: Into<String>> FromIterator<S> for ExclusionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership_is_exact() {
        let set: ExclusionSet = ["gcp-deployment", "terraform-gcp-security"]
            .into_iter()
            .collect();
        assert!(set.contains("gcp-deployment"));
        assert!(!set.contains("gcp"));
        assert!(!set.contains("GCP-DEPLOYMENT"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_sorted() {
        assert!(ExclusionSet::new().is_empty());

        let set: ExclusionSet = ["b", "a", "a"].into_iter().collect();
        assert_eq!(set.len(), 2);
        assert_eq!(set.sorted(), vec!["a", "b"]);
    }
}

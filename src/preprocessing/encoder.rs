//! Categorical encoding

use serde::{Deserialize, Serialize};

/// Fitted label encoder.
///
/// Codes are positions in the sorted class list, the same assignment a
/// label encoder makes at fit time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    /// Build an encoder over `classes`; input order and duplicates do not matter
    pub fn new<I, S>(classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut classes: Vec<String> = classes.into_iter().map(Into::into).collect();
        classes.sort();
        classes.dedup();
        Self { classes }
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Integer code of `label`, or `None` if it was not seen at fit time
    pub fn transform(&self, label: &str) -> Option<usize> {
        self.classes
            .binary_search_by(|class| class.as_str().cmp(label))
            .ok()
    }

    /// Restore the sorted, deduplicated invariant after deserializing
    pub(crate) fn normalize(&mut self) {
        self.classes.sort();
        self.classes.dedup();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_follow_sorted_order() {
        let encoder = LabelEncoder::new(["NAmes", "CollgCr", "Blmngtn", "CollgCr"]);
        assert_eq!(encoder.classes(), &["Blmngtn", "CollgCr", "NAmes"]);
        assert_eq!(encoder.transform("Blmngtn"), Some(0));
        assert_eq!(encoder.transform("NAmes"), Some(2));
    }

    #[test]
    fn test_unknown_label() {
        let encoder = LabelEncoder::new(["NAmes"]);
        assert_eq!(encoder.transform("Atlantis"), None);
        assert_eq!(encoder.transform("names"), None);
    }

    #[test]
    fn test_normalize_after_deserialize() {
        let mut encoder: LabelEncoder =
            serde_json::from_str(r#"{"classes":["b","a","b"]}"#).unwrap();
        encoder.normalize();
        assert_eq!(encoder.transform("a"), Some(0));
        assert_eq!(encoder.transform("b"), Some(1));
    }
}

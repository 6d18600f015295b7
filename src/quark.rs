use std::collections::HashMap;

use serde::{Serialize, Serializer};

/// Read-only id <-> string mapping.
pub trait StringTable {
    fn to_str(&self, id: usize) -> Option<&str>;
    fn to_id(&self, s: &str) -> Option<usize>;
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub trait TextVectorizer {
    fn find_or_insert(&mut self, key: &str) -> usize;
}

/// Interned strings, ids are assigned in first-seen order.
///
/// Used as the tag vocabulary: the order of the tags is the candidate order
/// the decoder walks, so lowest-id wins on ties.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Quark {
    v: Vec<String>,
    m: HashMap<String, usize>,
}

impl StringTable for Quark {
    fn to_str(&self, id: usize) -> Option<&str> {
        self.v.get(id).map(|x| x.as_str())
    }

    fn to_id(&self, s: &str) -> Option<usize> {
        self.m.get(s).copied()
    }

    fn len(&self) -> usize {
        self.v.len()
    }
}

impl TextVectorizer for Quark {
    fn find_or_insert(&mut self, key: &str) -> usize {
        if let Some(&id) = self.m.get(key) {
            return id;
        }
        let id = self.v.len();
        self.m.insert(key.to_string(), id);
        self.v.push(key.to_string());
        id
    }
}

impl Quark {
    pub fn contains(&self, s: &str) -> bool {
        self.m.contains_key(s)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.v.iter().map(String::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<S> for Quark {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut quark = Quark::default();
        for s in iter {
            quark.find_or_insert(s.as_ref());
        }
        quark
    }
}

impl Serialize for Quark {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.v.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_by_str() {
        let mut quark = Quark::default();
        for (s, id) in [("DT", 0), ("NN", 1), ("VBZ", 2), ("NN", 1), ("DT", 0), ("JJ", 3)] {
            assert_eq!(id, quark.find_or_insert(s), "{} != {}", s, id);
        }
        assert_eq!(quark.len(), 4);
        assert_eq!(quark.to_id("VBZ"), Some(2));
        assert_eq!(quark.to_id("RB"), None);
    }

    #[test]
    fn find_by_id() {
        let quark: Quark = ["DT", "NN"].into_iter().collect();
        assert_eq!(quark.to_str(0), Some("DT"));
        assert_eq!(quark.to_str(1), Some("NN"));
        assert_eq!(quark.to_str(2), None);
    }

    #[test]
    fn collect_dedups_in_order() {
        let quark: Quark = ["b", "a", "b", "c", "a"].into_iter().collect();
        assert_eq!(quark.iter().collect::<Vec<_>>(), ["b", "a", "c"]);
        assert!(quark.contains("c"));
        assert!(!Quark::default().contains("c"));
        assert!(Quark::default().is_empty());
    }

    #[test]
    fn serialize_as_list() {
        let quark: Quark = ["DT", "NN"].into_iter().collect();
        assert_eq!(serde_json::to_string(&quark).unwrap(), r#"["DT","NN"]"#);
    }
}

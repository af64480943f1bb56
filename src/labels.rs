use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::classifier::NO_CLASS;
use crate::error::{Error, Result};

/// Static class-index -> gesture-label table, loaded once at startup.
///
/// The asset format is the JSON object shipped with the mobile app:
/// string-encoded integer keys mapping to label strings, e.g.
/// `{"0": "hello", "1": "thanks"}`.
#[derive(Debug, Clone)]
pub struct LabelTable {
    entries: HashMap<i64, String>,
}

impl LabelTable {
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (i64, String)>,
    {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let raw: HashMap<String, String> = serde_json::from_str(json)?;
        let mut entries = HashMap::with_capacity(raw.len());
        for (key, label) in raw {
            let index: i64 = key
                .parse()
                .map_err(|_| Error::InvalidLabelKey { key: key.clone() })?;
            entries.insert(index, label);
        }
        Ok(Self { entries })
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Look up a class index. `None` for the no-class sentinel and for
    /// indices with no table entry; the caller renders both as "no result".
    pub fn resolve(&self, index: i64) -> Option<&str> {
        if index == NO_CLASS {
            return None;
        }
        self.entries.get(&index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use irbridge_frame::Code;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{RelayError, Result};

/// Read-only lookup from code to player command.
///
/// Loaded once from a JSON object whose keys are codes and whose values are
/// the command text to send, e.g. `{"00010203040506": "cycle pause"}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandMap {
    commands: BTreeMap<String, String>,
}

impl CommandMap {
    /// Load the map from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| RelayError::CommandMapRead {
            path: path.to_path_buf(),
            source,
        })?;
        let map = Self::from_reader(file).map_err(|source| RelayError::CommandMapParse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(?path, entries = map.len(), "loaded command map");
        Ok(map)
    }

    /// Parse the map from any JSON reader.
    pub fn from_reader<R: Read>(reader: R) -> serde_json::Result<Self> {
        serde_json::from_reader(reader)
    }

    pub fn get(&self, code: &Code) -> Option<&str> {
        self.commands.get(code.as_str()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Entries in code order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.commands.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CommandMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            commands: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

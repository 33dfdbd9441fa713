//! YAML farm inventory exposing the management and content directories.
//!
//! ```yaml
//! management:
//!   - description: "Central Administration v3"
//!     base_path: 'C:\inetpub\wwwroot\wss\VirtualDirectories\2000'
//!     aliases: ["http://srv01:2000", "http://srv01.corp.local:2000"]
//! content:
//!   - name: "Intranet Sites"
//!     base_path: 'C:\inetpub\wwwroot\wss\VirtualDirectories\80'
//!     aliases: ["http://intranet"]
//! ```
//!
//! A malformed entry does not fail the document; it surfaces as a failed candidate.

use std::path::{Path, PathBuf};

use propagator_sdk::{
    Candidate, DirectoryError, DirectoryKind, EndpointAlias, InstanceDirectory, ServiceInstance,
};
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    #[error("Failed to read inventory {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse inventory: {0}")]
    Parse(String),
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawInventory {
    management: Vec<serde_json::Value>,
    content: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct InventoryEntry {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: String,
    base_path: String,
    #[serde(default)]
    aliases: Option<Vec<String>>,
}

#[derive(Debug, Clone)]
struct InvalidEntry {
    label: String,
    message: String,
}

type Entry = Result<ServiceInstance, InvalidEntry>;

/// Parsed inventory document.
#[derive(Debug, Clone, Default)]
pub struct FarmInventory {
    management: Vec<Entry>,
    content: Vec<Entry>,
}

impl FarmInventory {
    /// # Errors
    /// Returns `InventoryError` if the file cannot be read or is not a valid inventory document.
    pub fn load(path: &Path) -> Result<Self, InventoryError> {
        let content = std::fs::read_to_string(path).map_err(|source| InventoryError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    /// # Errors
    /// Returns `InventoryError::Parse` if the document structure is invalid.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, InventoryError> {
        let raw: RawInventory = if yaml.trim().is_empty() {
            RawInventory::default()
        } else {
            serde_saphyr::from_str(yaml).map_err(|e| InventoryError::Parse(e.to_string()))?
        };

        Ok(Self {
            management: parse_entries(raw.management, DirectoryKind::Management),
            content: parse_entries(raw.content, DirectoryKind::Content),
        })
    }

    /// Candidates of one directory, in document order.
    #[must_use]
    pub fn candidates(&self, kind: DirectoryKind) -> Vec<Candidate> {
        let entries = match kind {
            DirectoryKind::Management => &self.management,
            DirectoryKind::Content => &self.content,
        };
        entries
            .iter()
            .map(|entry| {
                entry
                    .clone()
                    .map_err(|bad| DirectoryError::candidate(bad.label, bad.message))
            })
            .collect()
    }

    /// Number of aliases, across valid entries, from which no host could be read.
    #[must_use]
    pub fn hostless_aliases(&self) -> usize {
        self.management
            .iter()
            .chain(&self.content)
            .filter_map(|entry| entry.as_ref().ok())
            .flat_map(ServiceInstance::aliases)
            .filter(|alias| alias.host.is_none())
            .count()
    }

    /// Number of entries that failed validation.
    #[must_use]
    pub fn invalid_entries(&self) -> usize {
        self.management
            .iter()
            .chain(&self.content)
            .filter(|entry| entry.is_err())
            .count()
    }
}

fn parse_entries(values: Vec<serde_json::Value>, kind: DirectoryKind) -> Vec<Entry> {
    values
        .into_iter()
        .enumerate()
        .map(|(idx, value)| parse_entry(value, kind, idx))
        .collect()
}

fn parse_entry(value: serde_json::Value, kind: DirectoryKind, idx: usize) -> Entry {
    let label = format!("{kind}[{idx}]");
    let entry: InventoryEntry = serde_json::from_value(value).map_err(|e| InvalidEntry {
        label: label.clone(),
        message: e.to_string(),
    })?;

    if entry.base_path.trim().is_empty() {
        return Err(InvalidEntry {
            label,
            message: "base_path must not be empty".to_owned(),
        });
    }

    let endpoint_aliases: Option<Vec<EndpointAlias>> = entry
        .aliases
        .map(|uris| uris.into_iter().map(EndpointAlias::from_uri).collect());
    for alias in endpoint_aliases.iter().flatten().filter(|a| a.host.is_none()) {
        tracing::warn!(entry = %label, alias = %alias.uri, "Alias has no host and never matches a node");
    }

    Ok(ServiceInstance {
        name: entry.name,
        description: entry.description,
        base_path: entry.base_path,
        is_management_instance: kind == DirectoryKind::Management,
        endpoint_aliases,
    })
}

/// One logical directory backed by an inventory file.
///
/// The file is re-read on every query, so each discovery run sees current data.
#[derive(Debug, Clone)]
pub struct InventoryDirectory {
    path: PathBuf,
    kind: DirectoryKind,
}

impl InventoryDirectory {
    #[must_use]
    pub fn management(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            kind: DirectoryKind::Management,
        }
    }

    #[must_use]
    pub fn content(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            kind: DirectoryKind::Content,
        }
    }
}

impl InstanceDirectory for InventoryDirectory {
    fn candidates(&self) -> Result<Vec<Candidate>, DirectoryError> {
        let inventory = FarmInventory::load(&self.path)
            .map_err(|e| DirectoryError::unavailable(e.to_string()))?;
        Ok(inventory.candidates(self.kind))
    }
}

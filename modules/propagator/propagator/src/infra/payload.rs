//! `appSettings` configuration payload.

use std::collections::HashSet;
use std::fmt::Write as _;
use std::path::Path;

use propagator_sdk::{ApplyMode, ConfigurationPayload, PayloadError};

use crate::config::SettingEntry;

/// Writes a `<configuration><appSettings>` document.
///
/// Install writes every entry; edit leaves out entries flagged `install_only`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSettingsPayload {
    settings: Vec<SettingEntry>,
}

impl AppSettingsPayload {
    /// # Errors
    /// Returns `PayloadError::Invalid` for blank or duplicate keys.
    pub fn new(settings: Vec<SettingEntry>) -> Result<Self, PayloadError> {
        let mut keys = HashSet::with_capacity(settings.len());
        for entry in &settings {
            if entry.key.trim().is_empty() {
                return Err(PayloadError::Invalid("setting key must not be empty".to_owned()));
            }
            if !keys.insert(entry.key.as_str()) {
                return Err(PayloadError::Invalid(format!(
                    "setting '{}' is defined more than once",
                    entry.key
                )));
            }
        }
        Ok(Self { settings })
    }

    #[must_use]
    pub fn settings(&self) -> &[SettingEntry] {
        &self.settings
    }

    /// Entries written in `mode`, in declaration order.
    pub fn entries(&self, mode: ApplyMode) -> impl Iterator<Item = &SettingEntry> {
        self.settings
            .iter()
            .filter(move |entry| mode == ApplyMode::Install || !entry.install_only)
    }

    #[must_use]
    pub fn render(&self, mode: ApplyMode) -> String {
        let mut doc = String::from("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<configuration>\n");
        doc.push_str("  <appSettings>\n");
        for entry in self.entries(mode) {
            let _ = writeln!(
                doc,
                "    <add key=\"{}\" value=\"{}\" />",
                escape_xml(&entry.key),
                escape_xml(&entry.value)
            );
        }
        doc.push_str("  </appSettings>\n</configuration>\n");
        doc
    }
}

impl ConfigurationPayload for AppSettingsPayload {
    fn write_to(&self, target: &Path, overwrite: bool, mode: ApplyMode) -> Result<(), PayloadError> {
        if !overwrite && target.exists() {
            return Err(PayloadError::AlreadyExists(target.to_path_buf()));
        }
        std::fs::write(target, self.render(mode)).map_err(|e| PayloadError::io(target, e))
    }
}

fn escape_xml(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}

//! Install parameters: configured settings plus `--set` overrides, confirmed on the terminal.

use anyhow::{Context, Result, bail};
use colored::Colorize;
use dialoguer::Confirm;
use dialoguer::theme::ColorfulTheme;
use propagator::SettingEntry;
use propagator::infra::AppSettingsPayload;
use propagator_sdk::{ApplyMode, ParameterDialog};

/// Parse a `KEY=VALUE` argument.
pub fn parse_setting(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in '{raw}'"));
    }
    Ok((key.to_owned(), value.to_owned()))
}

/// Apply `overrides` to `settings`: existing keys get the new value, new keys are appended.
pub fn merge_settings(mut settings: Vec<SettingEntry>, overrides: &[(String, String)]) -> Vec<SettingEntry> {
    for (key, value) in overrides {
        match settings.iter_mut().find(|entry| entry.key == *key) {
            Some(entry) => entry.value.clone_from(value),
            None => settings.push(SettingEntry::new(key.clone(), value.clone())),
        }
    }
    settings
}

/// Build the payload an install writes.
///
/// # Errors
/// Fails when no setting is configured or a key is blank or repeated.
pub fn install_payload(settings: Vec<SettingEntry>) -> Result<AppSettingsPayload> {
    if settings.is_empty() {
        bail!("no payload settings configured; add payload.settings or pass --set KEY=VALUE");
    }
    AppSettingsPayload::new(settings).context("payload settings are invalid")
}

pub struct SettingsDialog {
    payload: AppSettingsPayload,
    assume_yes: bool,
    prompt_error: Option<dialoguer::Error>,
}

impl SettingsDialog {
    pub fn new(payload: AppSettingsPayload, assume_yes: bool) -> Self {
        Self {
            payload,
            assume_yes,
            prompt_error: None,
        }
    }

    /// Error raised by the confirmation prompt. The dialog reported it as a cancellation.
    pub fn take_prompt_error(&mut self) -> Option<dialoguer::Error> {
        self.prompt_error.take()
    }
}

impl ParameterDialog for SettingsDialog {
    type Payload = AppSettingsPayload;

    fn collect(&mut self) -> Option<AppSettingsPayload> {
        println!("{}", "Settings to write:".bold());
        for entry in self.payload.entries(ApplyMode::Install) {
            println!("  {} = {}", entry.key, entry.value);
        }

        if self.assume_yes {
            return Some(self.payload.clone());
        }

        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt("Write these settings?")
            .default(false)
            .interact_opt();

        match confirmed {
            Ok(Some(true)) => Some(self.payload.clone()),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(error = %e, "Settings confirmation prompt failed");
                self.prompt_error = Some(e);
                None
            }
        }
    }
}

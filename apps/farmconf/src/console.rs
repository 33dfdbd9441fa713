//! Terminal implementation of the selection step.

use colored::Colorize;
use dialoguer::MultiSelect;
use dialoguer::theme::ColorfulTheme;
use propagator_sdk::{OperatingMode, SelectionDecision, SelectionUi, ServiceInstance};

/// How the selection is made without a prompt.
#[derive(Debug, Clone, Default)]
pub struct Preselection {
    /// 1-based positions from `--select`.
    pub positions: Vec<usize>,
    /// Accept every listed instance when no positions were given.
    pub assume_yes: bool,
}

pub struct ConsoleUi {
    preselection: Preselection,
    labels: Vec<String>,
    proceed_enabled: bool,
    prompt_error: Option<dialoguer::Error>,
}

impl ConsoleUi {
    pub fn new(preselection: Preselection) -> Self {
        Self {
            preselection,
            labels: Vec::new(),
            proceed_enabled: false,
            prompt_error: None,
        }
    }

    /// Error raised by the interactive prompt. The decision reported for it was `Cancel`.
    pub fn take_prompt_error(&mut self) -> Option<dialoguer::Error> {
        self.prompt_error.take()
    }

    fn prompt_for_selection(&mut self) -> SelectionDecision {
        let picked = MultiSelect::with_theme(&ColorfulTheme::default())
            .with_prompt("Select instances (space toggles, enter accepts)")
            .items(&self.labels)
            .interact_opt();

        match picked {
            Ok(Some(indices)) if !indices.is_empty() => SelectionDecision::Accept(indices),
            Ok(_) => SelectionDecision::Cancel,
            Err(e) => {
                tracing::warn!(error = %e, "Instance selection prompt failed");
                self.prompt_error = Some(e);
                SelectionDecision::Cancel
            }
        }
    }
}

impl SelectionUi for ConsoleUi {
    fn present(&mut self, mode: OperatingMode, instances: &[ServiceInstance]) {
        self.labels = render_instances(instances);

        let title = match mode {
            OperatingMode::Install => "Install: local service instances",
            OperatingMode::Edit => "Edit: local service instances",
        };
        println!("{}", title.bold());
        for line in &self.labels {
            println!("{line}");
        }
    }

    fn warn_no_local_instances(&mut self, message: &str) {
        println!("{}", message.yellow());
    }

    fn set_proceed_enabled(&mut self, enabled: bool) {
        self.proceed_enabled = enabled;
    }

    fn decide(&mut self) -> SelectionDecision {
        if !self.proceed_enabled {
            return SelectionDecision::Cancel;
        }
        if !self.preselection.positions.is_empty() {
            return SelectionDecision::Accept(
                self.preselection
                    .positions
                    .iter()
                    .map(|pos| pos.saturating_sub(1))
                    .collect(),
            );
        }
        if self.preselection.assume_yes {
            return SelectionDecision::Accept((0..self.labels.len()).collect());
        }
        self.prompt_for_selection()
    }
}

/// One line per instance: 1-based position, display name, base path and a management marker.
pub fn render_instances(instances: &[ServiceInstance]) -> Vec<String> {
    instances
        .iter()
        .enumerate()
        .map(|(idx, inst)| {
            let marker = if inst.is_management_instance {
                " [management]"
            } else {
                ""
            };
            format!(
                "  {:>2}. {}{}  {}",
                idx + 1,
                inst.display_name(),
                marker,
                inst.base_path
            )
        })
        .collect()
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn instances() -> Vec<ServiceInstance> {
        ["Admin", "Portal", "Wiki"]
            .iter()
            .enumerate()
            .map(|(idx, name)| ServiceInstance {
                name: Some((*name).to_owned()),
                description: String::new(),
                base_path: format!("/srv/{}", name.to_lowercase()),
                is_management_instance: idx == 0,
                endpoint_aliases: None,
            })
            .collect()
    }

    fn decide_with(preselection: Preselection) -> SelectionDecision {
        let mut ui = ConsoleUi::new(preselection);
        ui.present(OperatingMode::Install, &instances());
        ui.set_proceed_enabled(true);
        ui.decide()
    }

    #[test]
    fn test_render_lists_positions_and_management_marker() {
        let lines = render_instances(&instances());
        assert_eq!(lines[0], "   1. Admin [management]  /srv/admin");
        assert_eq!(lines[2], "   3. Wiki  /srv/wiki");
    }

    #[test]
    fn test_select_positions_are_one_based_and_keep_order() {
        let decision = decide_with(Preselection {
            positions: vec![3, 1],
            assume_yes: false,
        });
        assert_eq!(decision, SelectionDecision::Accept(vec![2, 0]));
    }

    #[test]
    fn test_assume_yes_selects_every_listed_instance() {
        let decision = decide_with(Preselection {
            positions: Vec::new(),
            assume_yes: true,
        });
        assert_eq!(decision, SelectionDecision::Accept(vec![0, 1, 2]));
    }

    #[test]
    fn test_disabled_proceed_always_cancels() {
        let mut ui = ConsoleUi::new(Preselection {
            positions: vec![1],
            assume_yes: true,
        });
        ui.present(OperatingMode::Edit, &[]);
        ui.warn_no_local_instances("nothing here");
        ui.set_proceed_enabled(false);
        assert_eq!(ui.decide(), SelectionDecision::Cancel);
        assert!(ui.take_prompt_error().is_none());
    }
}

//! farmconf: discover the service instances hosted on this farm node and
//! propagate configuration into them.
//!
//! ```bash
//! farmconf -c farmconf.yaml list
//! farmconf install --select 1 --select 3 --set siteUrl=http://intranet --yes
//! farmconf edit
//! farmconf check
//! ```

// CLI tools are expected to print to stdout/stderr
#![allow(clippy::print_stdout, clippy::print_stderr)]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod config;
mod console;
mod logging;
mod params;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use farmconf_node_info::NodeInfoCollector;
use propagator::infra::{AppSettingsPayload, FarmInventory, InventoryDirectory, content_locality};
use propagator::{
    CloseReason, ConfigPropagator, InstanceDiscoverer, NO_LOCAL_INSTANCES_MESSAGE, Workflow,
    WorkflowError,
};
use propagator_sdk::{ApplyMode, DirectoryKind, LocalityPredicate, OperatingMode};

use crate::config::{AppConfig, CliOverrides};
use crate::console::{ConsoleUi, Preselection, render_instances};
use crate::params::{SettingsDialog, install_payload, merge_settings, parse_setting};

/// Exit status of a workflow the user cancelled.
const EXIT_CANCELLED: u8 = 2;

/// farmconf - local service-instance discovery and config propagation
#[derive(Parser)]
#[command(name = "farmconf")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Node name override (defaults to the OS hostname)
    #[arg(long, global = true)]
    node: Option<String>,

    /// Inventory file override
    #[arg(long, global = true)]
    inventory: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the service instances hosted on this node
    List,
    /// Select instances and write the configured settings into each
    Install(InstallArgs),
    /// Select instances for editing
    Edit(SelectionArgs),
    /// Validate configuration and inventory, then print the effective configuration
    Check,
}

#[derive(Args, Debug, Default)]
struct SelectionArgs {
    /// 1-based position of an instance to select (repeatable); skips the prompt
    #[arg(long = "select", value_name = "N", value_parser = parse_position)]
    select: Vec<usize>,

    /// Do not prompt: select every instance unless --select is given, and confirm writes
    #[arg(short, long)]
    yes: bool,
}

#[derive(Args, Debug, Default)]
struct InstallArgs {
    #[command(flatten)]
    selection: SelectionArgs,

    /// Setting override as KEY=VALUE (repeatable)
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_setting)]
    set: Vec<(String, String)>,
}

fn parse_position(raw: &str) -> Result<usize, String> {
    match raw.parse::<usize>() {
        Ok(pos) if pos > 0 => Ok(pos),
        _ => Err(format!("expected a position starting at 1, got '{raw}'")),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {e:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    // Layered config:
    // 1) defaults -> 2) YAML (if provided) -> 3) env (FARMCONF__*) -> 4) CLI overrides
    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_cli_overrides(&CliOverrides {
        node_name: cli.node,
        inventory: cli.inventory,
        verbose: cli.verbose,
    });

    let _log_guard = logging::init_logging(&config.logging)?;
    tracing::debug!(inventory = %config.discovery.inventory.display(), "Configuration loaded");

    match cli.command {
        Commands::List => list(&config),
        Commands::Install(args) => {
            run_workflow(OperatingMode::Install, &config, args.selection, &args.set)
        }
        Commands::Edit(args) => run_workflow(OperatingMode::Edit, &config, args, &[]),
        Commands::Check => check(&config),
    }
}

fn node_name(config: &AppConfig) -> Result<String> {
    let node = NodeInfoCollector::new()
        .with_name_override(config.node.name.clone())
        .create_current_node()
        .context("failed to determine the current node")?;
    tracing::info!(
        node = %node.short_name,
        hostname = %node.hostname,
        ip = node.ip_address.as_deref().unwrap_or("-"),
        "Resolved current node"
    );
    Ok(node.short_name)
}

/// Both inventory-backed directories and the content locality predicate for one node.
struct Sources {
    management: InventoryDirectory,
    content: InventoryDirectory,
    locality: Box<dyn LocalityPredicate>,
}

impl Sources {
    fn new(config: &AppConfig, node: &str) -> Self {
        let inventory = &config.discovery.inventory;
        Self {
            management: InventoryDirectory::management(inventory.clone()),
            content: InventoryDirectory::content(inventory.clone()),
            locality: content_locality(config.discovery.content_locality, node),
        }
    }

    fn discoverer(&self) -> InstanceDiscoverer<'_> {
        InstanceDiscoverer::new(&self.management, &self.content, &*self.locality)
    }
}

fn list(config: &AppConfig) -> Result<ExitCode> {
    let node = node_name(config)?;
    let sources = Sources::new(config, &node);
    let report = sources.discoverer().discover(&node);

    for failure in &report.failures {
        eprintln!("{} {}", "skipped:".yellow(), failure.error);
    }
    if report.is_empty() {
        eprintln!("{}", NO_LOCAL_INSTANCES_MESSAGE.yellow());
        return Ok(ExitCode::FAILURE);
    }

    println!("{}", format!("Local service instances on {node}:").bold());
    for line in render_instances(&report.instances) {
        println!("{line}");
    }
    Ok(ExitCode::SUCCESS)
}

fn run_workflow(
    mode: OperatingMode,
    config: &AppConfig,
    selection: SelectionArgs,
    overrides: &[(String, String)],
) -> Result<ExitCode> {
    let node = node_name(config)?;
    let sources = Sources::new(config, &node);
    let discoverer = sources.discoverer();

    let settings = merge_settings(config.payload.settings.clone(), overrides);
    let payload = match mode {
        OperatingMode::Install => install_payload(settings)?,
        OperatingMode::Edit => {
            AppSettingsPayload::new(settings).context("payload settings are invalid")?
        }
    };

    let mut ui = ConsoleUi::new(Preselection {
        positions: selection.select,
        assume_yes: selection.yes,
    });
    let mut dialog = SettingsDialog::new(payload, selection.yes);

    let mut workflow = Workflow::new(mode, config.propagation.clone());
    let result = workflow.run(&node, &discoverer, &mut ui, &mut dialog);

    // A failed prompt was reported to the workflow as a cancellation.
    if let Some(e) = ui.take_prompt_error().or_else(|| dialog.take_prompt_error()) {
        return Err(e).context("interactive prompt failed (use --select or --yes without a terminal)");
    }

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(WorkflowError::Propagation(e)) => {
            for path in &e.written {
                eprintln!("{} {}", "written before failure:".yellow(), path.display());
            }
            return Err(e).context("config propagation stopped");
        }
        Err(e) => return Err(e.into()),
    };

    match outcome.close_reason {
        CloseReason::Cancelled => {
            println!("{}", "Cancelled".yellow());
            Ok(ExitCode::from(EXIT_CANCELLED))
        }
        CloseReason::Accepted => {
            if let Some(report) = &outcome.propagation {
                println!(
                    "{}",
                    format!("Wrote {} config file(s)", report.written.len()).green()
                );
                for path in &report.written {
                    println!("  {}", path.display());
                }
            } else {
                let propagator = ConfigPropagator::new(config.propagation.clone());
                println!("{}", "Selected for editing:".green());
                for inst in &outcome.selected {
                    println!(
                        "  {}  {}",
                        inst.display_name(),
                        propagator.target_path(inst).display()
                    );
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        // Propagation failures are returned as errors above.
        CloseReason::Failed => Ok(ExitCode::FAILURE),
    }
}

fn check(config: &AppConfig) -> Result<ExitCode> {
    tracing::info!("Checking configuration...");

    let inventory = FarmInventory::load(&config.discovery.inventory)
        .with_context(|| format!("inventory {} is not usable", config.discovery.inventory.display()))?;
    let management = inventory.candidates(DirectoryKind::Management).len();
    let content = inventory.candidates(DirectoryKind::Content).len();

    let payload = AppSettingsPayload::new(config.payload.settings.clone())
        .context("payload settings are invalid")?;

    println!("{}", config.to_json()?);
    println!(
        "Inventory: {management} management, {content} content entries ({} invalid, {} alias(es) without host)",
        inventory.invalid_entries(),
        inventory.hostless_aliases()
    );
    println!(
        "Payload: {} install setting(s), {} edit setting(s)",
        payload.entries(ApplyMode::Install).count(),
        payload.entries(ApplyMode::Edit).count()
    );

    if inventory.hostless_aliases() > 0 {
        eprintln!("{}", "Aliases without a host never match a node".yellow());
    }
    if payload.settings().is_empty() {
        eprintln!("{}", "No payload settings configured; install will refuse to run".yellow());
    }
    if inventory.invalid_entries() > 0 {
        eprintln!("{}", "Inventory contains invalid entries".yellow());
        return Ok(ExitCode::FAILURE);
    }
    println!("{}", "Configuration is valid".green());
    Ok(ExitCode::SUCCESS)
}

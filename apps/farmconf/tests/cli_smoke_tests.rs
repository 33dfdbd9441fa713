#![allow(clippy::unwrap_used, clippy::expect_used)]

//! CLI smoke tests for the farmconf binary
//!
//! Each test builds a throwaway farm (inventory plus instance directories) in a
//! temp dir and runs the binary against it with a fixed node name.

use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

struct Farm {
    dir: TempDir,
}

impl Farm {
    /// Admin (management, on srv01), Portal (content, on srv01), Remote (content, on srv02).
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        for name in ["admin", "portal", "remote"] {
            std::fs::create_dir(dir.path().join(name)).unwrap();
        }

        let inventory = format!(
            r#"
management:
  - description: "Central Administration"
    base_path: '{admin}'
    aliases: ["http://srv01:2000", "http://srv01.corp.local:2000"]
content:
  - name: "Portal"
    base_path: '{portal}'
    aliases: ["http://SRV01.corp.local"]
  - name: "Remote"
    base_path: '{remote}'
    aliases: ["http://srv02"]
"#,
            admin = dir.path().join("admin").display(),
            portal = dir.path().join("portal").display(),
            remote = dir.path().join("remote").display(),
        );
        std::fs::write(dir.path().join("inventory.yaml"), inventory).unwrap();

        let config = format!(
            r#"
discovery:
  inventory: '{inventory}'
payload:
  settings:
    - key: "siteUrl"
      value: "http://intranet"
    - key: "installToken"
      value: "t0k3n"
      install_only: true
"#,
            inventory = dir.path().join("inventory.yaml").display(),
        );
        std::fs::write(dir.path().join("farmconf.yaml"), config).unwrap();

        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn config(&self) -> String {
        self.path("farmconf.yaml").to_string_lossy().into_owned()
    }

    fn run(&self, args: &[&str]) -> Output {
        let config = self.config();
        let mut full = vec!["--config", config.as_str(), "--node", "srv01"];
        full.extend_from_slice(args);
        run_farmconf(&full)
    }
}

/// Run the farmconf binary without a terminal: stdin is empty and output is piped.
fn run_farmconf(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_farmconf"))
        .args(args)
        .env_remove("RUST_LOG")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("Failed to execute farmconf")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap()
}

#[test]
fn test_cli_help_command() {
    let output = run_farmconf(&["--help"]);

    assert!(output.status.success(), "Help command should succeed");
    let out = stdout(&output);
    assert!(out.contains("Usage:"), "Should contain usage information");
    for subcommand in ["list", "install", "edit", "check"] {
        assert!(out.contains(subcommand), "Should mention '{subcommand}'");
    }
    assert!(out.contains("--config"), "Should mention config option");
}

#[test]
fn test_cli_version_command() {
    let output = run_farmconf(&["--version"]);

    assert!(output.status.success());
    assert!(stdout(&output).contains("farmconf"));
}

#[test]
fn test_list_shows_local_instances_in_order() {
    let farm = Farm::new();
    let output = farm.run(&["list"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    let admin = out.find("Central Administration [management]").unwrap();
    let portal = out.find("Portal").unwrap();
    assert!(admin < portal, "management instances come first");
    assert!(!out.contains("Remote"));
}

#[test]
fn test_list_without_local_instances_exits_with_failure() {
    let farm = Farm::new();
    let config = farm.config();
    let output = run_farmconf(&["--config", &config, "--node", "srv77", "list"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("No local service instances found"));
}

#[test]
fn test_missing_config_file_is_reported() {
    let output = run_farmconf(&["--config", "/nonexistent/farmconf.yaml", "list"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("config file does not exist"));
}

#[test]
fn test_install_writes_selected_instances() {
    let farm = Farm::new();
    let output = farm.run(&[
        "install",
        "--select",
        "2",
        "--select",
        "1",
        "--set",
        "siteUrl=http://portal",
        "--yes",
    ]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Wrote 2 config file(s)"));

    for name in ["admin", "portal"] {
        let written = read(&farm.path(name).join("web.config"));
        assert!(written.contains(r#"<add key="siteUrl" value="http://portal" />"#));
        assert!(written.contains(r#"key="installToken""#));
    }
    assert!(!farm.path("remote").join("web.config").exists());
}

#[test]
fn test_install_without_terminal_or_preselection_reports_prompt_failure() {
    let farm = Farm::new();
    let output = farm.run(&["install"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("interactive prompt failed"));
    assert!(!farm.path("admin").join("web.config").exists());
}

#[test]
fn test_install_without_settings_is_a_configuration_error() {
    let farm = Farm::new();
    let bare = farm.path("bare.yaml");
    std::fs::write(
        &bare,
        format!(
            "discovery:\n  inventory: '{}'\n",
            farm.path("inventory.yaml").display()
        ),
    )
    .unwrap();
    let bare = bare.to_string_lossy().into_owned();

    let output = run_farmconf(&["--config", &bare, "--node", "srv01", "install", "--yes"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("no payload settings configured"));
    assert!(!farm.path("admin").join("web.config").exists());

    let output = run_farmconf(&["--config", &bare, "--node", "srv01", "check"]);
    assert!(stderr(&output).contains("install will refuse to run"));

    let output = run_farmconf(&[
        "--config", &bare, "--node", "srv01", "install", "--yes", "--set", "siteUrl=http://portal",
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
}

#[test]
fn test_check_flags_aliases_without_host() {
    let farm = Farm::new();
    let inventory = format!(
        "content:\n  - name: \"Portal\"\n    base_path: '{}'\n    aliases: [\"srv01\", \"urn:farm:portal\"]\n",
        farm.path("portal").display()
    );
    std::fs::write(farm.path("inventory.yaml"), inventory).unwrap();

    let output = farm.run(&["check"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("(0 invalid, 1 alias(es) without host)"));
    assert!(stderr(&output).contains("Aliases without a host never match a node"));

    // A bare host name is still a usable alias.
    let output = farm.run(&["list"]);
    assert!(stdout(&output).contains("Portal"));
}

#[test]
fn test_install_rejects_out_of_range_selection() {
    let farm = Farm::new();
    let output = farm.run(&["install", "--select", "5", "--yes"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Invalid selection"));
}

#[test]
fn test_install_failure_stops_propagation() {
    let farm = Farm::new();
    std::fs::remove_dir(farm.path("portal")).unwrap();
    let output = farm.run(&["install", "--select", "1", "--select", "2", "--select", "1", "--yes"]);
    // Repeated positions are rejected before anything is written.
    assert_eq!(output.status.code(), Some(1));
    assert!(!farm.path("admin").join("web.config").exists());

    let output = farm.run(&["install", "--yes"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("config propagation stopped"));
    assert!(farm.path("admin").join("web.config").exists());
}

#[test]
fn test_edit_lists_selection_without_writing() {
    let farm = Farm::new();
    let output = farm.run(&["edit", "--yes"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("Selected for editing"));
    assert!(out.contains("web.config"));
    assert!(!farm.path("admin").join("web.config").exists());
}

#[test]
fn test_check_prints_effective_configuration() {
    let farm = Farm::new();
    let output = farm.run(&["check"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains(r#""config_file_name": "web.config""#));
    assert!(out.contains("Inventory: 1 management, 2 content entries (0 invalid, 0 alias(es) without host)"));
    assert!(out.contains("Payload: 2 install setting(s), 1 edit setting(s)"));
    assert!(out.contains("Configuration is valid"));
}

//! End-to-end tests for `keyaura config` commands.

use keyaura::config::Config;
use tempfile::TempDir;

mod fixtures;
use fixtures::*;

// ============================================================================
// Show Command Tests
// ============================================================================

#[test]
fn test_config_show_default() {
    let root = TempDir::new().unwrap();
    let output = isolated_command(root.path(), &["config", "show"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(
        output.status.code(),
        Some(0),
        "Show config should succeed. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Volume: 70%"));
    assert!(stdout.contains("Layout: 100%"));
}

#[test]
fn test_config_show_json_schema() {
    let root = TempDir::new().unwrap();
    let output = isolated_command(root.path(), &["config", "show", "--json"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(0));
    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("Should parse JSON output");
    assert!(json["paths"]["template_dir"]
        .as_str()
        .unwrap()
        .ends_with("templates"));
    assert_eq!(json["playback"]["enabled"], true);
    assert_eq!(json["keyboard"]["layout"], "100%");
    assert!((json["playback"]["volume"].as_f64().unwrap() - 0.7).abs() < 1e-6);
}

// ============================================================================
// Set Command Tests
// ============================================================================

#[test]
fn test_config_set_multiple_values() {
    let root = TempDir::new().unwrap();
    let kits = root.path().join("kits");
    let output = std::process::Command::new(keyaura_bin())
        .arg("--config")
        .arg(root.path().join("config.toml"))
        .args([
            "config",
            "set",
            "--volume",
            "0.4",
            "--layout",
            "67%",
            "--enabled",
            "false",
            "--templates",
        ])
        .arg(&kits)
        .output()
        .expect("Failed to execute command");

    assert_eq!(
        output.status.code(),
        Some(0),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(kits.is_dir());

    let config = Config::load_from(&root.path().join("config.toml")).unwrap();
    assert!((config.playback.volume - 0.4).abs() < f32::EPSILON);
    assert!(!config.playback.enabled);
    assert_eq!(config.keyboard.layout, "67%");
    assert_eq!(config.paths.template_dir, Some(kits));
}

#[test]
fn test_config_set_invalid_volume() {
    let root = TempDir::new().unwrap();
    let output = isolated_command(root.path(), &["config", "set", "--volume", "1.5"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    assert!(!root.path().join("config.toml").exists());
}

#[test]
fn test_config_set_no_values_specified() {
    let root = TempDir::new().unwrap();
    let output = isolated_command(root.path(), &["config", "set"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("At least one configuration option"));
}

#[test]
fn test_config_path_honours_override() {
    let root = TempDir::new().unwrap();
    let output = isolated_command(root.path(), &["config", "path"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(
        stdout.trim(),
        root.path().join("config.toml").display().to_string()
    );
}

#[test]
fn test_invalid_config_file_is_reported() {
    let root = TempDir::new().unwrap();
    std::fs::write(root.path().join("config.toml"), "[playback]\nvolume = 9.0\n").unwrap();

    let output = isolated_command(root.path(), &["template", "list"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to load configuration"));
}

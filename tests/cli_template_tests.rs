//! End-to-end tests for `keyaura template` and `keyaura keys` commands.

use std::fs;
use tempfile::TempDir;

mod fixtures;
use fixtures::*;

fn stdout_of(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr_of(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

// ============================================================================
// List Command Tests
// ============================================================================

#[test]
fn test_template_list_empty_directory() {
    let root = TempDir::new().unwrap();
    let output = isolated_command(root.path(), &["template", "list"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(
        output.status.code(),
        Some(0),
        "Listing empty templates should succeed. stderr: {}",
        stderr_of(&output)
    );
    assert!(stdout_of(&output).contains("No templates found."));
    assert!(root.path().join("templates").is_dir());
}

#[test]
fn test_template_list_json_empty() {
    let root = TempDir::new().unwrap();
    let output = isolated_command(root.path(), &["template", "list", "--json"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(0));
    let result: serde_json::Value =
        serde_json::from_str(&stdout_of(&output)).expect("Should parse JSON output");
    assert_eq!(result["count"], 0);
    assert!(result["templates"].as_array().unwrap().is_empty());
}

// ============================================================================
// Save Command Tests
// ============================================================================

#[test]
fn test_template_save_and_show() {
    let root = TempDir::new().unwrap();
    let click = write_sound(root.path(), "click.wav");
    let boom = write_sound(root.path(), "boom.wav");

    let output = isolated_command(
        root.path(),
        &[
            "template",
            "save",
            "--name",
            "Drums",
            "--layout",
            "75%",
            "--bind",
            &format!("A={click}"),
            "--bind",
            &format!("space={boom}"),
        ],
    )
    .output()
    .expect("Failed to execute command");
    assert_eq!(
        output.status.code(),
        Some(0),
        "Save should succeed. stderr: {}",
        stderr_of(&output)
    );
    assert!(stdout_of(&output).contains("Saved template 'Drums' (2 keys, layout 75%)"));
    assert!(root.path().join("templates").join("Drums.json").exists());

    let output = isolated_command(root.path(), &["template", "show", "Drums", "--json"])
        .output()
        .expect("Failed to execute command");
    assert_eq!(output.status.code(), Some(0));
    let detail: serde_json::Value = serde_json::from_str(&stdout_of(&output)).unwrap();
    assert_eq!(detail["name"], "Drums");
    assert_eq!(detail["layout"], "75%");
    assert_eq!(detail["bindings"]["A"], click.as_str());
    assert_eq!(detail["bindings"]["Space"], boom.as_str());
}

#[test]
fn test_template_save_all_then_override() {
    let root = TempDir::new().unwrap();
    let base = write_sound(root.path(), "base.wav");
    let special = write_sound(root.path(), "special.wav");

    let output = isolated_command(
        root.path(),
        &[
            "template",
            "save",
            "-n",
            "Full",
            "--all",
            &base,
            "--bind",
            &format!("Enter={special}"),
        ],
    )
    .output()
    .expect("Failed to execute command");
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr_of(&output));

    let output = isolated_command(root.path(), &["template", "list", "--json"])
        .output()
        .expect("Failed to execute command");
    let list: serde_json::Value = serde_json::from_str(&stdout_of(&output)).unwrap();
    assert_eq!(list["count"], 1);
    assert_eq!(list["templates"][0]["name"], "Full");
    assert_eq!(list["templates"][0]["binding_count"], 30);
    assert_eq!(list["templates"][0]["layout"], "100%");
}

#[test]
fn test_template_save_overwrite_reports_update() {
    let root = TempDir::new().unwrap();
    let click = write_sound(root.path(), "click.wav");
    let bind = format!("A={click}");

    for expected in ["Saved template 'Kit'", "Updated template 'Kit'"] {
        let output = isolated_command(
            root.path(),
            &["template", "save", "--name", "Kit", "--bind", &bind],
        )
        .output()
        .expect("Failed to execute command");
        assert_eq!(output.status.code(), Some(0));
        assert!(stdout_of(&output).contains(expected));
    }

    let files = fs::read_dir(root.path().join("templates")).unwrap().count();
    assert_eq!(files, 1);
}

#[test]
fn test_template_save_missing_sound_is_validation_error() {
    let root = TempDir::new().unwrap();
    let missing = root.path().join("missing.wav");

    let output = isolated_command(
        root.path(),
        &[
            "template",
            "save",
            "--name",
            "Broken",
            "--bind",
            &format!("A={}", missing.display()),
        ],
    )
    .output()
    .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr_of(&output).contains("Sound file not found"));
    assert!(!root.path().join("templates").join("Broken.json").exists());
}

#[test]
fn test_template_save_invalid_name() {
    let root = TempDir::new().unwrap();
    let output = isolated_command(root.path(), &["template", "save", "--name", "../escape"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr_of(&output).contains("Invalid template name"));
}

#[test]
fn test_template_save_unknown_key_rejected_by_parser() {
    let root = TempDir::new().unwrap();
    let output = isolated_command(
        root.path(),
        &["template", "save", "--name", "X", "--bind", "Tab=x.wav"],
    )
    .output()
    .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(2), "clap usage errors exit with 2");
    assert!(stderr_of(&output).contains("Unknown key 'Tab'"));
}

// ============================================================================
// Show / Delete Command Tests
// ============================================================================

#[test]
fn test_template_show_not_found() {
    let root = TempDir::new().unwrap();
    let output = isolated_command(root.path(), &["template", "show", "Nope"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr_of(&output).contains("Template 'Nope' not found"));
}

#[test]
fn test_template_delete() {
    let root = TempDir::new().unwrap();
    let output = isolated_command(root.path(), &["template", "save", "--name", "Temp"])
        .output()
        .expect("Failed to execute command");
    assert_eq!(output.status.code(), Some(0));

    let output = isolated_command(root.path(), &["template", "delete", "Temp"])
        .output()
        .expect("Failed to execute command");
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout_of(&output).contains("Deleted template 'Temp'"));
    assert!(!root.path().join("templates").join("Temp.json").exists());

    let output = isolated_command(root.path(), &["template", "delete", "Temp"])
        .output()
        .expect("Failed to execute command");
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_template_list_reports_corrupt_record() {
    let root = TempDir::new().unwrap();
    let templates = root.path().join("templates");
    fs::create_dir_all(&templates).unwrap();
    fs::write(templates.join("broken.json"), "{").unwrap();
    fs::write(
        templates.join("legacy.json"),
        r#"{"name": "Legacy", "key_sounds": {"Q": "q.mp3"}, "layout": "67%", "created": "2023-11-05 08:15:00"}"#,
    )
    .unwrap();

    let output = isolated_command(root.path(), &["template", "list", "--json"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(0));
    assert!(stderr_of(&output).contains("skipped template record"));
    let list: serde_json::Value = serde_json::from_str(&stdout_of(&output)).unwrap();
    assert_eq!(list["count"], 1);
    assert_eq!(list["templates"][0]["name"], "Legacy");
    assert_eq!(list["templates"][0]["layout"], "67%");
}

// ============================================================================
// Keys Command Tests
// ============================================================================

#[test]
fn test_keys_json() {
    let output = std::process::Command::new(keyaura_bin())
        .args(["keys", "--json"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(0));
    let keys: serde_json::Value = serde_json::from_str(&stdout_of(&output)).unwrap();
    assert_eq!(keys["count"], 30);
    assert_eq!(keys["rows"].as_array().unwrap().len(), 4);
    assert_eq!(keys["rows"][2][0], "Shift");
    assert_eq!(keys["rows"][2][8], "Shift");
    assert_eq!(keys["keys"][0]["id"], "Q");
}

// ============================================================================
// Shell Tests
// ============================================================================

#[test]
fn test_shell_reads_commands_from_stdin() {
    use std::io::Write;
    use std::process::Stdio;

    let root = TempDir::new().unwrap();
    let click = write_sound(root.path(), "click.wav");

    let mut child = isolated_command(root.path(), &["shell"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn shell");
    {
        let stdin = child.stdin.as_mut().unwrap();
        writeln!(stdin, "select a").unwrap();
        writeln!(stdin, "ctrl s").unwrap();
        writeln!(stdin, "apply {click}").unwrap();
        writeln!(stdin, "save Pair").unwrap();
        writeln!(stdin, "quit").unwrap();
    }
    let output = child.wait_with_output().unwrap();

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr_of(&output));
    let stdout = stdout_of(&output);
    assert!(stdout.contains("Selected keys: A, S"));
    assert!(stdout.contains("Applied click.wav to 2 keys"));
    assert!(stdout.contains("Template 'Pair' saved (2 keys)"));
    assert!(root.path().join("templates").join("Pair.json").exists());
}

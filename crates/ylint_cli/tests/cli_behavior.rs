//! Integration tests for CLI behavior
//!
//! These tests verify the external behavior of the CLI tool,
//! following behavior-driven testing principles.

use assert_cmd::Command;
use assert_fs::prelude::*;
use predicates::prelude::*;

/// Helper to create a command for the ylint CLI
fn ylint_cmd() -> Command {
    Command::new(env!("CARGO_BIN_EXE_ylint"))
}

mod help_command {
    use super::*;

    #[test]
    fn shows_help_with_flag() {
        ylint_cmd()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Usage:"));
    }

    #[test]
    fn shows_version_with_flag() {
        ylint_cmd()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    }
}

mod lint_command {
    use super::*;

    #[test]
    fn clean_file_succeeds() -> Result<(), Box<dyn std::error::Error>> {
        let temp = assert_fs::TempDir::new()?;
        temp.child("clean.yaml").write_str("---\nkey: value\n")?;

        ylint_cmd()
            .current_dir(temp.path())
            .args(["lint", "clean.yaml"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Checked 1 files, found 0 problems"));
        Ok(())
    }

    #[test]
    fn errors_exit_with_one() -> Result<(), Box<dyn std::error::Error>> {
        let temp = assert_fs::TempDir::new()?;
        temp.child("a.yaml").write_str("---\na: 1\nb: 2 \n")?;

        ylint_cmd()
            .current_dir(temp.path())
            .args(["lint", "a.yaml"])
            .assert()
            .code(1)
            .stdout(predicate::str::contains(
                "3:5 error [trailing-spaces]: trailing spaces",
            ));
        Ok(())
    }

    #[test]
    fn warnings_alone_succeed() -> Result<(), Box<dyn std::error::Error>> {
        let temp = assert_fs::TempDir::new()?;
        temp.child("w.yaml").write_str("key: value\n")?;

        ylint_cmd()
            .current_dir(temp.path())
            .args(["lint", "w.yaml"])
            .assert()
            .success()
            .stdout(predicate::str::contains("warning [document-start]"));
        Ok(())
    }

    #[test]
    fn json_format_lists_diagnostics() -> Result<(), Box<dyn std::error::Error>> {
        let temp = assert_fs::TempDir::new()?;
        temp.child("a.yaml").write_str("---\na: 1 \n")?;

        let output = ylint_cmd()
            .current_dir(temp.path())
            .args(["lint", "a.yaml", "--format", "json"])
            .output()?;

        assert_eq!(output.status.code(), Some(1));
        let reports: serde_json::Value = serde_json::from_slice(&output.stdout)?;
        let reports = reports.as_array().expect("array output");
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0]["path"], "a.yaml");
        let diagnostic = &reports[0]["diagnostics"][0];
        assert_eq!(diagnostic["code"], "trailing-spaces");
        assert_eq!(diagnostic["severity"], "error");
        assert_eq!(diagnostic["source"], "yamllint");
        assert_eq!(diagnostic["range"]["start"]["line"], 1);
        assert_eq!(diagnostic["range"]["start"]["character"], 4);
        Ok(())
    }

    #[test]
    fn directory_skips_node_modules() -> Result<(), Box<dyn std::error::Error>> {
        let temp = assert_fs::TempDir::new()?;
        temp.child("a.yaml").write_str("---\na: 1\n")?;
        temp.child("nested/b.yml").write_str("---\nb: 2\n")?;
        temp.child("node_modules/c.yaml").write_str("c: 3 \n")?;
        temp.child("notes.txt").write_str("not yaml \n")?;

        ylint_cmd()
            .current_dir(temp.path())
            .args(["lint", "."])
            .assert()
            .success()
            .stdout(predicate::str::contains("Checked 2 files, found 0 problems"));
        Ok(())
    }

    #[test]
    fn discovers_yamllint_file_in_directory() -> Result<(), Box<dyn std::error::Error>> {
        let temp = assert_fs::TempDir::new()?;
        temp.child(".yamllint")
            .write_str("extends: default\nrules:\n  trailing-spaces: disable\n")?;
        temp.child("a.yaml").write_str("---\na: 1 \n")?;

        ylint_cmd()
            .current_dir(temp.path())
            .args(["lint", "a.yaml"])
            .assert()
            .success()
            .stdout(predicate::str::contains("found 0 problems"));
        Ok(())
    }

    #[test]
    fn explicit_config_overrides_discovery() -> Result<(), Box<dyn std::error::Error>> {
        let temp = assert_fs::TempDir::new()?;
        temp.child(".yamllint").write_str("extends: default\n")?;
        temp.child("ci.yaml")
            .write_str("extends: default\nrules:\n  trailing-spaces: disable\n")?;
        temp.child("a.yaml").write_str("---\na: 1 \n")?;

        ylint_cmd()
            .current_dir(temp.path())
            .args(["lint", "a.yaml", "--config", "ci.yaml"])
            .assert()
            .success();
        Ok(())
    }

    #[test]
    fn broken_explicit_config_is_fatal() -> Result<(), Box<dyn std::error::Error>> {
        let temp = assert_fs::TempDir::new()?;
        temp.child("broken.yaml").write_str("rules: [unclosed")?;
        temp.child("a.yaml").write_str("---\na: 1\n")?;

        ylint_cmd()
            .current_dir(temp.path())
            .args(["lint", "a.yaml", "-c", "broken.yaml"])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("Invalid config"));
        Ok(())
    }

    #[test]
    fn missing_path_is_fatal() {
        ylint_cmd()
            .args(["lint", "nonexistent_file.yaml"])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("No such file or directory"));
    }
}

//! CLI integration tests for solrq commands.
//!
//! These tests focus on exit codes and the query text printed on stdout, not on the
//! formatting of diagnostic output which may change.

// Integration tests live outside cfg(test) by design
#![allow(clippy::tests_outside_test_module)]

use std::{fs, path::Path};

use assert_cmd::Command;
use predicates::prelude::*;

/// A tree mixing a matched rule, a negated rule and an unknown operator.
const TREE: &str = r#"{
  "condition": "AND",
  "rules": [
    { "id": "r1", "field": "type", "operation": "equals", "values": ["case"] },
    { "id": "r2", "field": "title", "operation": "does_not_end_with", "values": ["123", "abc"] },
    { "id": "r3", "field": "owner", "operation": "is_like", "values": ["x"] }
  ]
}"#;

/// Helper to create a temp directory for tests.
fn temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().unwrap()
}

/// Helper to run `solrq` with HOME isolated to the provided directory.
fn solrq_in(dir: &Path) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("solrq").unwrap();
    cmd.env("HOME", dir).env_remove("SOLRQ_LOG").current_dir(dir);
    cmd
}

/// Writes a project config that stops discovery at `dir`.
fn write_config(dir: &Path, body: &str) {
    fs::write(dir.join(".solrq.toml"), format!("root = true\n{body}")).unwrap();
}

mod compile {
    use super::*;

    #[test]
    fn compiles_tree_from_file() {
        let dir = temp_dir();
        fs::write(dir.path().join("tree.json"), TREE).unwrap();

        solrq_in(dir.path())
            .args(["compile", "tree.json"])
            .assert()
            .success()
            .stdout("type:(case) AND -(title:(*123) OR title:(*abc))\n");
    }

    #[test]
    fn compiles_tree_from_stdin() {
        let dir = temp_dir();

        solrq_in(dir.path())
            .arg("compile")
            .write_stdin(TREE)
            .assert()
            .success()
            .stdout(predicate::str::starts_with("type:(case) AND"));
    }

    #[test]
    fn error_policy_fails_on_unknown_operator() {
        let dir = temp_dir();
        fs::write(dir.path().join("tree.json"), TREE).unwrap();

        solrq_in(dir.path())
            .args(["compile", "tree.json", "--unmatched", "error"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("is_like"));
    }

    #[test]
    fn configured_alias_renders_rule() {
        let dir = temp_dir();
        fs::write(dir.path().join("tree.json"), TREE).unwrap();
        write_config(dir.path(), "[operators]\nis_like = \"contains\"\n");

        solrq_in(dir.path())
            .args(["compile", "tree.json", "--unmatched", "error"])
            .assert()
            .success()
            .stdout(predicate::str::ends_with("AND owner:(*x*)\n"));
    }

    #[test]
    fn json_output_lists_skipped_rules() {
        let dir = temp_dir();
        fs::write(dir.path().join("tree.json"), TREE).unwrap();

        let output = solrq_in(dir.path())
            .args(["compile", "tree.json", "--json"])
            .output()
            .unwrap();
        assert!(output.status.success());

        let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(
            json["query"],
            "type:(case) AND -(title:(*123) OR title:(*abc))"
        );
        assert_eq!(json["unmatched"][0], "owner is_like (rule r3)");
    }

    #[test]
    fn explain_shows_skipped_rules() {
        let dir = temp_dir();
        fs::write(dir.path().join("tree.json"), TREE).unwrap();

        solrq_in(dir.path())
            .args(["compile", "tree.json", "--explain"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Skipped rules"))
            .stdout(predicate::str::contains("owner is_like (rule r3)"));
    }

    #[test]
    fn invalid_json_fails() {
        let dir = temp_dir();

        solrq_in(dir.path())
            .arg("compile")
            .write_stdin("{ not json")
            .assert()
            .failure()
            .stderr(predicate::str::contains("invalid search tree"));
    }

    #[test]
    fn broken_config_fails() {
        let dir = temp_dir();
        fs::write(dir.path().join("tree.json"), TREE).unwrap();
        write_config(dir.path(), "[uri\n");

        solrq_in(dir.path())
            .args(["compile", "tree.json"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("failed to load configuration"));
    }
}

mod uri {
    use super::*;

    #[test]
    fn batches_ids_from_args() {
        let dir = temp_dir();

        solrq_in(dir.path())
            .args(["uri", "--field", "uri", "--batch-size", "2", "a", "b", "c"])
            .assert()
            .success()
            .stdout("{!df=uri q.op=OR}uri:((\"a\" \"b\") OR (\"c\"))\n");
    }

    #[test]
    fn reads_ids_from_stdin_with_config_field() {
        let dir = temp_dir();
        write_config(dir.path(), "[uri]\nfield = \"instanceId\"\n");

        solrq_in(dir.path())
            .arg("uri")
            .write_stdin("emf:1\nemf:2\n")
            .assert()
            .success()
            .stdout("{!df=instanceId q.op=OR}instanceId:((\"emf:1\" \"emf:2\"))\n");
    }

    #[test]
    fn zero_batch_size_fails() {
        let dir = temp_dir();

        solrq_in(dir.path())
            .args(["uri", "--batch-size", "0", "a"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("invalid argument"));
    }
}

mod range {
    use super::*;

    #[test]
    fn open_lower_bound() {
        let dir = temp_dir();

        solrq_in(dir.path())
            .args(["range", "modifiedOn", "--to", "2024-03-15T08:30:05Z"])
            .assert()
            .success()
            .stdout("modifiedOn:[* TO 2024-03-15T08:30:05.000Z]\n");
    }

    #[test]
    fn inverted_range_fails() {
        let dir = temp_dir();

        solrq_in(dir.path())
            .args(["range", "createdOn", "--from", "2024-03-02", "--to", "2024-03-01"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("invalid argument"));
    }

    #[test]
    fn bad_timestamp_is_usage_error() {
        let dir = temp_dir();

        solrq_in(dir.path())
            .args(["range", "createdOn", "--from", "soon"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("invalid timestamp"));
    }
}

mod basic {
    use super::*;

    #[test]
    fn no_arguments_match_everything() {
        let dir = temp_dir();

        solrq_in(dir.path())
            .arg("basic")
            .assert()
            .success()
            .stdout("*:*\n");
    }

    #[test]
    fn expands_configured_namespaces() {
        let dir = temp_dir();
        write_config(
            dir.path(),
            "[namespaces]\nemf = \"http://example.com/emf#\"\n",
        );

        solrq_in(dir.path())
            .args(["basic", "--location", "emf:project-1", "--mimetype", "^pdf"])
            .assert()
            .success()
            .stdout(
                "partOfRelation:( \"http://example.com/emf#project-1\" ) AND mimetype:\"*pdf*\"\n",
            );
    }

    #[test]
    fn created_days_use_configured_format() {
        let dir = temp_dir();
        write_config(dir.path(), "[basic]\ndate_format = \"%d.%m.%Y\"\n");

        solrq_in(dir.path())
            .args(["basic", "--created-from", "10.01.2024", "--created-to", "12.01.2024"])
            .assert()
            .success()
            .stdout("createdOn:[2024-01-10T00:00:00.000Z TO 2024-01-12T23:59:59.000Z]\n");
    }
}

mod parse {
    use super::*;

    #[test]
    fn prints_params_then_query() {
        let dir = temp_dir();

        solrq_in(dir.path())
            .args(["parse", r#"|{"fq":"status:APPROVED","defType":"edismax"}|title:report"#])
            .assert()
            .success()
            .stdout("defType=edismax\nfq=status:APPROVED\nq=title:report\n");
    }

    #[test]
    fn unterminated_params_fail() {
        let dir = temp_dir();

        solrq_in(dir.path())
            .args(["parse", r#"|{"rows":"5"}"#])
            .assert()
            .failure()
            .stderr(predicate::str::contains("query syntax error"));
    }
}

mod operators {
    use super::*;

    #[test]
    fn lists_builtins_and_aliases() {
        let dir = temp_dir();
        write_config(dir.path(), "[operators]\nhas = \"contains\"\n");

        solrq_in(dir.path())
            .arg("operators")
            .assert()
            .success()
            .stdout(predicate::str::contains("DoesNotEndWith"))
            .stdout(predicate::str::contains("not_exists"))
            .stdout(predicate::str::contains("Aliases"))
            .stdout(predicate::str::contains("has"));
    }

    #[test]
    fn clashing_alias_fails() {
        let dir = temp_dir();
        write_config(dir.path(), "[operators]\ncontains = \"equals\"\n");

        solrq_in(dir.path())
            .arg("operators")
            .assert()
            .failure()
            .stderr(predicate::str::contains("invalid operator configuration"));
    }
}

mod init {
    use super::*;

    #[test]
    fn creates_config_file() {
        let dir = temp_dir();
        let project = dir.path().join("project");
        fs::create_dir(&project).unwrap();

        solrq_in(dir.path())
            .current_dir(&project)
            .arg("init")
            .assert()
            .success()
            .stdout(predicate::str::contains("Created"));

        let written = fs::read_to_string(project.join(".solrq.toml")).unwrap();
        assert!(written.contains("# [compiler]"));
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let dir = temp_dir();
        let project = dir.path().join("project");
        fs::create_dir(&project).unwrap();
        fs::write(project.join(".solrq.toml"), "[uri\n").unwrap();

        solrq_in(dir.path())
            .current_dir(&project)
            .arg("init")
            .assert()
            .failure()
            .stderr(predicate::str::contains("already exists"));

        solrq_in(dir.path())
            .current_dir(&project)
            .args(["init", "--force"])
            .assert()
            .success();
    }

    #[test]
    fn global_writes_to_home() {
        let dir = temp_dir();

        solrq_in(dir.path())
            .args(["init", "--global"])
            .assert()
            .success();

        assert!(dir.path().join(".solrq.toml").is_file());
    }
}

mod config {
    use super::*;

    #[test]
    fn prints_effective_settings() {
        let dir = temp_dir();
        write_config(dir.path(), "[uri]\nbatch_size = 250\n");

        solrq_in(dir.path())
            .arg("config")
            .assert()
            .success()
            .stdout(predicate::str::contains("batch_size = 250"))
            .stdout(predicate::str::contains("unmatched = \"skip\""));
    }
}

mod check {
    use super::*;

    #[test]
    fn no_config_is_ok() {
        let dir = temp_dir();

        solrq_in(dir.path())
            .arg("check")
            .assert()
            .success()
            .stdout(predicate::str::contains("No configuration files found"));
    }

    #[test]
    fn warnings_do_not_fail() {
        let dir = temp_dir();
        write_config(dir.path(), "[namespaces]\nemf = \"http://example.com/emf\"\n");

        solrq_in(dir.path())
            .arg("check")
            .assert()
            .success()
            .stdout(predicate::str::contains("Warnings (1)"))
            .stdout(predicate::str::contains("Hints:"));
    }

    #[test]
    fn unknown_alias_target_fails() {
        let dir = temp_dir();
        write_config(dir.path(), "[operators]\nis = \"resembles\"\n");

        solrq_in(dir.path())
            .arg("check")
            .assert()
            .failure()
            .stderr(predicate::str::contains("resembles"));
    }

    #[test]
    fn invalid_value_fails() {
        let dir = temp_dir();
        write_config(dir.path(), "[compiler]\nunmatched = \"loud\"\n");

        solrq_in(dir.path())
            .arg("check")
            .assert()
            .failure()
            .stderr(predicate::str::contains("compiler.unmatched"));
    }
}

use assert_cmd::Command;
use predicates::prelude::*;

fn tavle_fetch() -> Command {
    let mut cmd = Command::cargo_bin("tavle-fetch").unwrap();
    for var in [
        "JIRA_BASE_URL",
        "JIRA_EMAIL",
        "JIRA_API_TOKEN",
        "JIRA_JQL",
        "JIRA_MAX_RESULTS",
        "OUTPUT_PATH",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn test_missing_configuration_fails_with_diagnostic() {
    tavle_fetch()
        .assert()
        .failure()
        .stderr(predicate::str::contains("base-url"));
}

#[test]
fn test_partial_configuration_names_the_missing_piece() {
    tavle_fetch()
        .args(["--base-url", "https://tracker.example.com"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("email").or(predicate::str::contains("token")));
}

#[test]
fn test_help_lists_environment_variables() {
    tavle_fetch()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("JIRA_BASE_URL"));
}

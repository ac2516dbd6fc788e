use assert_cmd::Command;

#[test]
fn help_prints_usage() {
    Command::cargo_bin("libris")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicates::str::contains("Library management service"));
}

#[test]
fn config_command_prints_resolved_settings() {
    Command::cargo_bin("libris")
        .unwrap()
        .arg("config")
        .assert()
        .success()
        .stdout(predicates::str::contains("Settings"));
}

use assert_cmd::Command;
use predicates::str::contains;

#[test]
fn tf_help_works() {
    Command::cargo_bin("tf")
        .expect("binary")
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("TaskFlow"));
}

#[test]
fn subcommand_help_works() {
    let subcommands = [
        "login", "signup", "logout", "whoami", "task", "board", "stage", "comment", "notify",
        "activity", "dashboard", "user",
    ];

    for cmd in subcommands {
        Command::cargo_bin("tf")
            .expect("binary")
            .arg(cmd)
            .arg("--help")
            .assert()
            .success();
    }
}

#[test]
fn task_subcommand_help_works() {
    for cmd in ["list", "new", "show", "edit", "move", "rm", "subtask"] {
        Command::cargo_bin("tf")
            .expect("binary")
            .args(["task", cmd, "--help"])
            .assert()
            .success();
    }
}

#[test]
fn unknown_subcommand_fails() {
    Command::cargo_bin("tf")
        .expect("binary")
        .arg("frobnicate")
        .assert()
        .failure();
}

#[test]
fn whoami_without_session_exits_with_user_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    Command::cargo_bin("tf")
        .expect("binary")
        .env("TASKFLOW_CONFIG_DIR", dir.path())
        .env_remove("TASKFLOW_TOKEN")
        .arg("whoami")
        .assert()
        .failure()
        .code(2)
        .stderr(contains("Not logged in"));
}

#[test]
fn logout_without_session_succeeds() {
    let dir = tempfile::tempdir().expect("tempdir");
    Command::cargo_bin("tf")
        .expect("binary")
        .env("TASKFLOW_CONFIG_DIR", dir.path())
        .env_remove("TASKFLOW_TOKEN")
        .arg("logout")
        .assert()
        .success();
}

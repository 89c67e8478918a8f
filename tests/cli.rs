use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

struct TestHome {
    dir: TempDir,
}

impl TestHome {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("secondmind").unwrap();
        cmd.current_dir(self.dir.path())
            .env("SECONDMIND_HOME", self.dir.path())
            .env("NO_COLOR", "1")
            .env_remove("SECONDMIND_USER")
            .env_remove("SECONDMIND_PASSWORD")
            .env_remove("SECONDMIND_TODAY")
            .env_remove("RUST_LOG");
        cmd
    }

    fn as_user(&self, user: &str, password: &str) -> Command {
        let mut cmd = self.cmd();
        cmd.env("SECONDMIND_USER", user)
            .env("SECONDMIND_PASSWORD", password);
        cmd
    }

    fn register(&self, user: &str, password: &str) {
        self.as_user(user, password)
            .arg("register")
            .assert()
            .success();
    }

    fn path(&self, name: &str) -> std::path::PathBuf {
        self.dir.path().join(name)
    }
}

#[test]
fn register_add_and_list() {
    let home = TestHome::new();
    home.as_user("alice", "secret1")
        .arg("register")
        .assert()
        .success()
        .stdout(predicate::str::contains("Registered alice."));

    home.as_user("alice", "secret1")
        .args(["add", "Buy", "milk", "-t", "errand", "--due", "2099-01-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Note 1 added."));

    home.as_user("alice", "secret1")
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Buy milk"))
        .stdout(predicate::str::contains("#errand"))
        .stdout(predicate::str::contains("2099-01-01"));
}

#[test]
fn credentials_can_be_typed_on_stdin() {
    let home = TestHome::new();
    home.cmd()
        .arg("register")
        .write_stdin("carol\nhunter2\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Registered carol."))
        .stderr(predicate::str::contains("Username: "));

    home.cmd()
        .arg("login")
        .write_stdin("carol\nhunter2\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("No due tasks today. All clear."));
}

#[test]
fn duplicate_registration_fails() {
    let home = TestHome::new();
    home.register("alice", "secret1");
    home.as_user("alice", "other")
        .arg("register")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Username already exists: alice"));
}

#[test]
fn wrong_password_is_rejected() {
    let home = TestHome::new();
    home.register("alice", "secret1");
    home.as_user("alice", "wrong")
        .arg("list")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid username or password"));
}

#[test]
fn corrupt_credential_file_exits_with_code_2() {
    let home = TestHome::new();
    std::fs::write(home.path("users.txt"), "alice:not-a-digest\n").unwrap();
    home.as_user("alice", "secret1")
        .arg("login")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("line 1"));
}

#[test]
fn login_reports_overdue_and_due_today() {
    let home = TestHome::new();
    home.register("alice", "secret1");
    home.as_user("alice", "secret1")
        .args(["add", "Pay rent", "--due", "2025-01-01"])
        .assert()
        .success();
    home.as_user("alice", "secret1")
        .args(["add", "Dentist", "--due", "2025-01-05"])
        .assert()
        .success();

    home.as_user("alice", "secret1")
        .args(["--as-of", "2025-01-05", "login"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Reminders: 1 overdue | 1 due today"));

    home.as_user("alice", "secret1")
        .args(["--as-of", "2025-01-05", "list", "--overdue"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pay rent"))
        .stdout(predicate::str::contains("Dentist").not());

    home.as_user("alice", "secret1")
        .args(["--as-of", "2025-01-05", "due", "--today"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dentist"))
        .stdout(predicate::str::contains("Pay rent").not());
}

#[test]
fn invalid_due_date_is_rejected() {
    let home = TestHome::new();
    home.register("alice", "secret1");
    home.as_user("alice", "secret1")
        .args(["add", "Party", "--due", "2025-02-30"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid date"));
}

#[test]
fn update_and_delete() {
    let home = TestHome::new();
    home.register("alice", "secret1");
    home.as_user("alice", "secret1")
        .args(["add", "Draft", "-t", "old"])
        .assert()
        .success();

    home.as_user("alice", "secret1")
        .args(["update", "1", "--body", "Final", "-t", "new"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Note 1 updated."));

    home.as_user("alice", "secret1")
        .args(["view", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Final"))
        .stdout(predicate::str::contains("#new"))
        .stdout(predicate::str::contains("#old").not());

    home.as_user("alice", "secret1")
        .args(["delete", "1"])
        .assert()
        .success();

    home.as_user("alice", "secret1")
        .args(["view", "1"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Note not found: 1"));
}

#[test]
fn notes_are_private_to_their_owner() {
    let home = TestHome::new();
    home.register("alice", "secret1");
    home.register("bob", "secret2");
    home.as_user("alice", "secret1")
        .args(["add", "Alice only"])
        .assert()
        .success();

    home.as_user("bob", "secret2")
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No notes found."));
    home.as_user("bob", "secret2")
        .args(["delete", "1"])
        .assert()
        .code(1);
}

#[test]
fn legacy_import_isolates_bad_records() {
    let home = TestHome::new();
    home.register("alice", "secret1");
    std::fs::write(
        home.path("legacy.txt"),
        "Buy milk #errand\nFix bug due 2025-13-40\n\nCall mom [due:2025-02-01]\n",
    )
    .unwrap();

    home.as_user("alice", "secret1")
        .args(["import", "legacy.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Record 2:"))
        .stdout(predicate::str::contains("Imported 2 of 3 records."));

    home.as_user("alice", "secret1")
        .args(["list", "-t", "errand"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Buy milk"))
        .stdout(predicate::str::contains("Call mom").not());
}

#[test]
fn export_json_then_import_for_another_user() {
    let home = TestHome::new();
    home.register("alice", "secret1");
    home.register("bob", "secret2");
    home.as_user("alice", "secret1")
        .args(["add", "Shared idea", "-t", "idea", "--due", "2030-06-01"])
        .assert()
        .success();

    home.as_user("alice", "secret1")
        .args(["export", "-o", "-"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"body\": \"Shared idea\""));

    home.as_user("alice", "secret1")
        .arg("export")
        .assert()
        .success();
    assert!(home.path("alice_notes_export.json").exists());

    home.as_user("bob", "secret2")
        .args(["import", "alice_notes_export.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 1 of 1 records."));

    // Same content again is skipped as a duplicate
    home.as_user("bob", "secret2")
        .args(["import", "alice_notes_export.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 0 of 1 records."));

    home.as_user("bob", "secret2")
        .args(["list", "-k", "idea"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Shared idea"))
        .stdout(predicate::str::contains("2030-06-01"));
}

#[test]
fn text_export_uses_legacy_syntax() {
    let home = TestHome::new();
    home.register("alice", "secret1");
    home.as_user("alice", "secret1")
        .args(["add", "Finish project", "-t", "urgent", "--due", "2025-09-01"])
        .assert()
        .success();

    home.as_user("alice", "secret1")
        .args(["export", "--format", "text", "-o", "-"])
        .assert()
        .success()
        .stdout("Finish project #urgent [due:2025-09-01]\n");
}

#[test]
fn shell_keeps_going_after_errors() {
    let home = TestHome::new();
    home.register("alice", "secret1");

    home.as_user("alice", "secret1")
        .arg("shell")
        .write_stdin(
            "add \"Call mom\" -t family\nview 99\nbogus\nhelp\n\nlist -t family\nexit\nadd never\n",
        )
        .assert()
        .success()
        .stdout(predicate::str::contains("Note 1 added."))
        .stdout(predicate::str::contains("Call mom"))
        .stdout(predicate::str::contains("Goodbye."))
        .stdout(predicate::str::contains("Write a note"))
        .stdout(predicate::str::contains("Note 2 added.").not())
        .stderr(predicate::str::contains("Note not found: 99"));
}

#[test]
fn shell_ends_at_end_of_input() {
    let home = TestHome::new();
    home.register("alice", "secret1");

    home.as_user("alice", "secret1")
        .arg("shell")
        .write_stdin("add First\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Note 1 added."))
        .stdout(predicate::str::contains("Goodbye."));
}

#[test]
fn config_get_and_set() {
    let home = TestHome::new();
    home.cmd()
        .args(["config", "reminder-window-days", "3"])
        .assert()
        .success();
    home.cmd()
        .args(["config", "reminder-window-days"])
        .assert()
        .success()
        .stdout("3\n");
    home.cmd()
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("salt-passwords = true"));
    home.cmd()
        .args(["config", "colour"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unknown config key"));
}

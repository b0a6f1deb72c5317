#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Stand-in for the Lagoon CLI: appends its argv to `calls.log` in the temp
/// dir and answers a handful of known invocations.
const FAKE_LAGOON: &str = r#"#!/bin/sh
echo "$@" >> "__CALLS__"
case "$*" in
  *"config list"*)
    echo '{"data":[{"name":"amazeeio(default)(current)"},{"name":"local"}]}' ;;
  *"list projects"*)
    echo '{"data":[{"projectname":"site","giturl":"git@github.com:org/site.git"}]}' ;;
  *"list environments"*)
    echo '{"data":[{"name":"main","environment":"production"},{"name":"pr-42","environment":"development"}]}' ;;
  *"--environment pr-1 "*)
    echo 'environment busy' >&2; exit 1 ;;
  *"delete environment"*)
    echo '{"result":"success"}' ;;
  *"deploy branch"*)
    echo '{"result":"success"}' ;;
  *"list all-users"*)
    printf 'EMAIL|ROLE\nalice@example.com|owner\nbob@example.com|guest\n' ;;
  *"ssh -C drush uli"*)
    echo 'https://pr-42.example.com/user/reset/1/abc/login' ;;
  *" login")
    echo 'token refreshed' ;;
  *)
    echo "unexpected: $*" >&2; exit 2 ;;
esac
"#;

struct Fixture {
    dir: TempDir,
    lagoon: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let lagoon = dir.path().join("fake-lagoon");
        let calls = dir.path().join("calls.log");
        let script = FAKE_LAGOON.replace("__CALLS__", &calls.display().to_string());
        std::fs::write(&lagoon, script).unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&lagoon, std::fs::Permissions::from_mode(0o755)).unwrap();
        }
        Self { dir, lagoon }
    }

    fn home(&self) -> &Path {
        self.dir.path()
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("lagoon-assist").unwrap();
        cmd.env("LAGOON_ASSIST_HOME", self.home())
            .env("LAGOON_ASSIST_LAGOON_BIN", &self.lagoon)
            .env_remove("LAGOON_INSTANCE")
            .env_remove("LAGOON_PROJECT")
            .env_remove("RUST_LOG");
        cmd
    }

    fn calls(&self) -> Vec<String> {
        std::fs::read_to_string(self.dir.path().join("calls.log"))
            .map(|s| s.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Pure commands
// ---------------------------------------------------------------------------

#[test]
fn pr_url_for_github_project() {
    let fx = Fixture::new();
    fx.cmd()
        .args(["pr-url", "pr-42", "git@github.com:org/repo.git"])
        .assert()
        .success()
        .stdout(predicate::str::contains("https://github.com/org/repo/pull/42"));
}

#[test]
fn pr_url_rejects_non_pr_environment() {
    let fx = Fixture::new();
    fx.cmd()
        .args(["pr-url", "develop", "git@github.com:org/repo.git"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a pull request environment"));
}

// ---------------------------------------------------------------------------
// Guards run before any process is spawned
// ---------------------------------------------------------------------------

#[cfg(unix)]
#[test]
fn protected_environment_is_never_deleted() {
    let fx = Fixture::new();
    fx.cmd()
        .args(["-p", "site", "delete", "production", "--yes"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("cannot delete protected environment"));
    assert!(fx.calls().is_empty());
}

#[cfg(unix)]
#[test]
fn invalid_branch_is_rejected_without_spawning() {
    let fx = Fixture::new();
    fx.cmd()
        .args(["-p", "site", "deploy", "main; touch /tmp/pwned"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid branch name"));
    assert!(fx.calls().is_empty());
}

#[cfg(unix)]
#[test]
fn login_link_refused_for_production() {
    let fx = Fixture::new();
    fx.cmd()
        .args(["-p", "site", "login-link", "production"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("protected environment"));
    assert!(fx.calls().is_empty());
}

// ---------------------------------------------------------------------------
// Commands against the fake CLI
// ---------------------------------------------------------------------------

#[cfg(unix)]
#[test]
fn lists_instances_without_annotations() {
    let fx = Fixture::new();
    fx.cmd()
        .args(["instances", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"amazeeio\""))
        .stdout(predicate::str::contains("(current)").not());
}

#[cfg(unix)]
#[test]
fn lists_environments_with_pr_links() {
    let fx = Fixture::new();
    fx.cmd()
        .args(["-l", "amazeeio", "-p", "site", "environments", "--links"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pr-42"))
        .stdout(predicate::str::contains("https://github.com/org/site/pull/42"));
    assert_eq!(
        fx.calls()[0],
        "-l amazeeio -p site list environments --output-json"
    );
}

#[cfg(unix)]
#[test]
fn environments_require_a_project() {
    let fx = Fixture::new();
    fx.cmd()
        .arg("environments")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no project selected"));
}

#[cfg(unix)]
#[test]
fn batch_delete_continues_after_a_failure() {
    let fx = Fixture::new();
    fx.cmd()
        .args(["-p", "site", "delete", "pr-1", "pr-2", "--yes"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("pr-2 deleted"))
        .stdout(predicate::str::contains("1 deleted, 1 failed"))
        .stderr(predicate::str::contains("1 of 2 deletions failed"));
    let calls = fx.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls[0].contains("--environment pr-1 "));
    assert!(calls[1].contains("--environment pr-2 "));
}

#[cfg(unix)]
#[test]
fn deploy_valid_branch() {
    let fx = Fixture::new();
    fx.cmd()
        .args(["-p", "site", "deploy", "feature/foo-bar.1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("queued"));
    assert_eq!(
        fx.calls()[0],
        "-p site deploy branch --branch feature/foo-bar.1 --output-json"
    );
}

#[cfg(unix)]
#[test]
fn login_link_for_pr_environment() {
    let fx = Fixture::new();
    fx.cmd()
        .args(["-p", "site", "login-link", "pr-42"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/user/reset/1/abc/login"));
}

#[cfg(unix)]
#[test]
fn users_are_listed_and_logged_to_file() {
    let fx = Fixture::new();
    fx.cmd()
        .arg("users")
        .assert()
        .success()
        .stdout(predicate::str::contains("alice@example.com"))
        .stdout(predicate::str::contains("bob@example.com"))
        .stdout(predicate::str::contains("EMAIL").not());

    let logs = fx.home().join(".lagoon-assist/logs");
    let entries: Vec<_> = std::fs::read_dir(&logs).unwrap().collect();
    assert_eq!(entries.len(), 1);
    let content = std::fs::read_to_string(entries[0].as_ref().unwrap().path()).unwrap();
    assert!(content.contains("OK List all users"));
}

#[cfg(unix)]
#[test]
fn file_logging_can_be_disabled() {
    let fx = Fixture::new();
    std::fs::create_dir_all(fx.home().join(".lagoon-assist")).unwrap();
    std::fs::write(
        fx.home().join(".lagoon-assist/config.yaml"),
        "file_logging: false\n",
    )
    .unwrap();
    fx.cmd().arg("users").assert().success();
    assert!(!fx.home().join(".lagoon-assist/logs").exists());
}

#[cfg(unix)]
#[test]
fn ssh_key_is_written_to_lagoon_config() {
    let fx = Fixture::new();
    std::fs::write(
        fx.home().join(".lagoon.yml"),
        "current: amazeeio\nlagoons:\n  amazeeio:\n    hostname: ssh.example.com\n    port: \"22\"\n",
    )
    .unwrap();
    let key = fx.home().join("id_ed25519");
    std::fs::write(&key, "PRIVATE").unwrap();

    fx.cmd()
        .args(["ssh-key", "amazeeio"])
        .arg(&key)
        .assert()
        .success();

    let content = std::fs::read_to_string(fx.home().join(".lagoon.yml")).unwrap();
    let parsed: serde_yaml::Value = serde_yaml::from_str(&content).unwrap();
    assert_eq!(
        parsed["lagoons"]["amazeeio"]["sshkey"].as_str(),
        Some(key.display().to_string().as_str())
    );
    assert_eq!(parsed["lagoons"]["amazeeio"]["hostname"].as_str(), Some("ssh.example.com"));
    assert_eq!(fx.calls(), ["-l amazeeio login"]);
}

#[cfg(unix)]
#[test]
fn ssh_key_for_unknown_instance_fails() {
    let fx = Fixture::new();
    std::fs::write(fx.home().join(".lagoon.yml"), "lagoons:\n  amazeeio: {}\n").unwrap();
    let key = fx.home().join("id_rsa");
    std::fs::write(&key, "PRIVATE").unwrap();

    fx.cmd()
        .args(["ssh-key", "nope"])
        .arg(&key)
        .assert()
        .failure()
        .stderr(predicate::str::contains("instance not found"));
    assert!(fx.calls().is_empty());
}

#[test]
fn missing_lagoon_binary_is_reported() {
    let fx = Fixture::new();
    fx.cmd()
        .env("LAGOON_ASSIST_LAGOON_BIN", "lagoon-binary-that-does-not-exist")
        .arg("instances")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found on PATH"));
}

//! Smoke tests for command wiring, plus a few runs against `indyctl serve`

use std::net::{SocketAddr, TcpListener, TcpStream};
use std::process::{Child, Command as StdCommand, Stdio};
use std::thread::sleep;
use std::time::Duration;

use assert_cmd::Command;
use predicates::prelude::*;

fn indyctl() -> Command {
    let mut cmd = Command::cargo_bin("indyctl").unwrap();
    cmd.env_remove("INDYCTL_ENDPOINT").env("INDYCTL_QUIET", "1");
    cmd
}

// === Help Tests ===

#[test]
fn test_stores_list_help() {
    indyctl()
        .args(["stores", "list", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Stop after this many pages"));
}

#[test]
fn test_group_edit_help() {
    indyctl()
        .args(["group", "edit", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("promote:maven:remote:central"));
}

#[test]
fn test_serve_help() {
    indyctl()
        .args(["serve", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Stores per listing page"));
}

#[test]
fn test_completions_bash() {
    indyctl()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("indyctl"));
}

// === Argument Validation Tests ===

#[test]
fn test_invalid_store_key_rejected() {
    indyctl()
        .args(["stores", "show", "maven:central"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("maven:central"));
}

#[test]
fn test_invalid_op_rejected() {
    indyctl()
        .args(["group", "edit", "maven", "public", "--op", "shuffle:maven:remote:a"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("shuffle"));
}

#[test]
fn test_create_validates_before_sending() {
    // Nothing listens on port 9; validation must fail first
    let key = format!("--key=maven:hosted:{}", "x".repeat(51));
    indyctl()
        .args(["--endpoint", "http://127.0.0.1:9"])
        .args(["stores", "create", key.as_str(), "--disable-timeout", "-7"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("disable_timeout is not a valid number"))
        .stderr(predicate::str::contains("name's length should be less than 50"));
}

// === Config Tests ===

#[test]
fn test_config_init_and_path() {
    let home = tempfile::tempdir().unwrap();

    indyctl()
        .env("HOME", home.path())
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created config"));

    indyctl()
        .env("HOME", home.path())
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    indyctl()
        .env("HOME", home.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(".indyctl/config.toml"));
}

#[test]
fn test_config_show_uses_endpoint_flag() {
    let home = tempfile::tempdir().unwrap();

    indyctl()
        .env("HOME", home.path())
        .args(["--endpoint", "http://indy.example.com/", "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("effective endpoint: http://indy.example.com"));
}

// === Mock Server Tests ===

struct MockServer {
    child: Child,
    addr: SocketAddr,
}

impl MockServer {
    fn start() -> Self {
        let addr = TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap();

        let child = StdCommand::new(assert_cmd::cargo::cargo_bin("indyctl"))
            .args(["serve", "--bind", &addr.to_string(), "--page-size", "2"])
            .env("INDYCTL_QUIET", "1")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .unwrap();

        for _ in 0..100 {
            if TcpStream::connect(addr).is_ok() {
                return Self { child, addr };
            }
            sleep(Duration::from_millis(50));
        }
        panic!("mock server did not start on {}", addr);
    }

    fn endpoint(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

#[test]
fn test_against_mock_server() {
    let server = MockServer::start();
    let endpoint = server.endpoint();

    indyctl()
        .args(["--endpoint", &endpoint, "stores", "list", "remote", "--output", "quiet"])
        .assert()
        .success()
        .stdout(predicate::str::contains("maven:remote:central"))
        .stdout(predicate::str::contains("generic-http:remote:httprox_upstream"));

    indyctl()
        .args(["--endpoint", &endpoint, "stores", "list", "remote", "--search", "MAVEN"])
        .args(["--sort-by", "name", "--output", "quiet"])
        .assert()
        .success()
        .stdout("maven:remote:central\nmaven:remote:gradle-plugins\nmaven:remote:jboss\n");

    indyctl()
        .args(["--endpoint", &endpoint, "stores", "show", "maven:remote:nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No such store!"));

    indyctl()
        .args(["--endpoint", &endpoint, "stores", "show", "maven:group:builds"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1h 2m 5s"))
        .stdout(predicate::str::contains("maven:hosted:builds-untested"));

    indyctl()
        .args(["--endpoint", &endpoint, "group", "edit", "maven", "public"])
        .args(["--op", "bottom:maven:remote:central", "--save"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1. maven:hosted:local-deployments"))
        .stdout(predicate::str::contains("2. maven:remote:central"))
        .stdout(predicate::str::contains("Saved maven:group:public"));

    indyctl()
        .args(["--endpoint", &endpoint, "package-types", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("generic-http"));
}

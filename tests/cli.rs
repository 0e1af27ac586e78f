use assert_cmd::Command;
use mockito::Matcher;
use predicates::prelude::*;

fn cmd() -> Command {
    let mut cmd = Command::cargo_bin("snapshot-rotate").unwrap();
    for var in [
        "ACCESS_TOKEN",
        "VOLUMES_BACKUP",
        "SNAPSHOTS_MAX",
        "SNAPSHOTS_PREFIX",
        "DIGITALOCEAN_API_URL",
        "LOG_FORMAT",
        "DRY_RUN",
        "SNAPSHOT_ROTATE_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn test_help_lists_environment() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("SNAPSHOTS_MAX"))
        .stdout(predicate::str::contains("VOLUMES_BACKUP"));
}

#[test]
fn test_missing_token_fails() {
    cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("access-token"));
}

#[test]
fn test_empty_prefix_fails() {
    cmd()
        .env("ACCESS_TOKEN", "tok")
        .arg("--prefix")
        .arg("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("prefix"));
}

#[test]
fn test_unreachable_api_aborts_run() {
    cmd()
        .env("ACCESS_TOKEN", "tok")
        .env("DIGITALOCEAN_API_URL", "http://127.0.0.1:1")
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Volumes backup aborted"));
}

#[test]
fn test_unreachable_api_json_logs() {
    cmd()
        .env("ACCESS_TOKEN", "tok")
        .env("DIGITALOCEAN_API_URL", "http://127.0.0.1:1")
        .env("LOG_FORMAT", "json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not list volumes"));
}

fn stub_volumes(server: &mut mockito::ServerGuard) -> mockito::Mock {
    server
        .mock("GET", "/v2/volumes")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"volumes": [{"id": "v1", "name": "vol-a"}], "links": {}}"#)
        .create()
}

#[test]
fn test_dry_run_env_accepts_numeric_true() {
    let mut server = mockito::Server::new();
    stub_volumes(&mut server);
    server
        .mock("GET", "/v2/volumes/v1/snapshots")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"snapshots": [], "links": {}}"#)
        .create();
    let create = server
        .mock("POST", "/v2/volumes/v1/snapshots")
        .expect(0)
        .create();

    cmd()
        .env("ACCESS_TOKEN", "tok")
        .env("DIGITALOCEAN_API_URL", server.url())
        .env("DRY_RUN", "1")
        .env("LOG_FORMAT", "json")
        .assert()
        .success()
        .stdout(predicate::str::contains("vol-a"))
        .stderr(predicate::str::contains(r#""dry_run":true"#))
        .stderr(predicate::str::contains("Dry run, not creating snapshot"));

    create.assert();
}

#[test]
fn test_dry_run_env_zero_is_false() {
    cmd()
        .env("ACCESS_TOKEN", "tok")
        .env("DIGITALOCEAN_API_URL", "http://127.0.0.1:1")
        .env("DRY_RUN", "0")
        .env("LOG_FORMAT", "json")
        .assert()
        .failure()
        .stderr(predicate::str::contains(r#""dry_run":false"#))
        .stderr(predicate::str::contains("Volumes backup aborted"));
}

#[test]
fn test_failed_volume_warns_but_succeeds() {
    let mut server = mockito::Server::new();
    stub_volumes(&mut server);
    server
        .mock("POST", "/v2/volumes/v1/snapshots")
        .with_status(500)
        .with_body(r#"{"id": "server_error", "message": "Server was unable to give you a response."}"#)
        .create();

    cmd()
        .env("ACCESS_TOKEN", "tok")
        .env("DIGITALOCEAN_API_URL", server.url())
        .env("LOG_FORMAT", "json")
        .assert()
        .success()
        .stdout(predicate::str::contains("vol-a"))
        .stderr(predicate::str::contains("Run finished with failures"));
}

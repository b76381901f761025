//! Binary tests. None of them reach AWS: every case fails or finishes
//! before the SDK configuration is loaded.

use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

fn webotron_cmd(home: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("webotron"));
    cmd.env("HOME", home)
        .env("USERPROFILE", home)
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_lists_every_command() {
    let home = TempDir::new().unwrap();
    webotron_cmd(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(
            contains("list-buckets")
                .and(contains("list-bucket-objects"))
                .and(contains("setup-bucket"))
                .and(contains("sync"))
                .and(contains("setup-domain"))
                .and(contains("find-cert"))
                .and(contains("config")),
        );
}

#[test]
fn sync_rejects_missing_directory() {
    let home = TempDir::new().unwrap();
    let missing = home.path().join("no-such-site");
    webotron_cmd(home.path())
        .arg("sync")
        .arg(&missing)
        .arg("test-site")
        .assert()
        .failure()
        .stderr(contains("cannot sync").and(contains("invalid sync root")));
}

#[test]
fn sync_rejects_file_as_root() {
    let home = TempDir::new().unwrap();
    let file = home.path().join("index.html");
    fs::write(&file, "<h1>hi</h1>").unwrap();
    webotron_cmd(home.path())
        .arg("sync")
        .arg(&file)
        .arg("test-site")
        .assert()
        .failure()
        .stderr(contains("not a directory"));
}

#[test]
fn sync_rejects_invalid_bucket_name() {
    let home = TempDir::new().unwrap();
    webotron_cmd(home.path())
        .args(["sync", ".", "Not_A_Bucket"])
        .assert()
        .failure()
        .stderr(contains("invalid bucket name"));
}

#[test]
fn setup_bucket_requires_index_page() {
    let home = TempDir::new().unwrap();
    webotron_cmd(home.path())
        .current_dir(home.path())
        .args(["setup-bucket", "test-site"])
        .assert()
        .failure()
        .stderr(contains("cannot read index page"));
}

#[test]
fn find_cert_rejects_invalid_domain() {
    let home = TempDir::new().unwrap();
    webotron_cmd(home.path())
        .args(["find-cert", "localhost"])
        .assert()
        .failure()
        .stderr(contains("invalid domain name"));
}

#[test]
fn corrupt_settings_fail_before_any_command_runs() {
    let home = TempDir::new().unwrap();
    let dir = home.path().join(".webotron");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("config.yaml"), "chunk_size: [not a number").unwrap();

    let site = TempDir::new().unwrap();
    webotron_cmd(home.path())
        .arg("sync")
        .arg(site.path())
        .arg("test-site")
        .assert()
        .failure()
        .stderr(contains("config.yaml"));
}

#[test]
fn config_show_prints_defaults_without_file() {
    let home = TempDir::new().unwrap();
    webotron_cmd(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            contains("not found, showing defaults")
                .and(contains("chunk_size: 8388608"))
                .and(contains("index_document: index.html")),
        );
}

#[test]
fn config_init_writes_file_and_refuses_to_overwrite() {
    let home = TempDir::new().unwrap();
    webotron_cmd(home.path())
        .args(["--region", "eu-west-1", "config", "init"])
        .assert()
        .success()
        .stdout(contains("config.yaml"));

    let written = fs::read_to_string(home.path().join(".webotron/config.yaml")).unwrap();
    assert!(written.contains("region: eu-west-1"), "got:\n{written}");

    webotron_cmd(home.path())
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(contains("--force"));

    webotron_cmd(home.path())
        .args(["config", "init", "--force"])
        .assert()
        .success();
    webotron_cmd(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(contains("region: eu-west-1").not());
}

#[test]
fn global_flags_reach_config_init() {
    let home = TempDir::new().unwrap();
    webotron_cmd(home.path())
        .args(["config", "init", "--profile", "site-deployer"])
        .assert()
        .success();

    webotron_cmd(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(contains("profile: site-deployer"));
}

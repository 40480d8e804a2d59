//! CLI smoke tests. Network-touching commands are exercised elsewhere with
//! scripted sources; these stick to surfaces that resolve locally.

use assert_cmd::Command;
use predicates::prelude::*;
use serial_test::serial;

fn scout_cmd() -> Command {
    let mut cmd = Command::cargo_bin("scout-cli").expect("binary built");
    cmd.env_remove("SCOUT_CONFIG")
        .env_remove("YOUTUBE_API_KEY")
        .env_remove("ADS_API_KEYS")
        .env_remove("SCOUT_DATA_DIR");
    cmd
}

#[test]
#[serial]
fn help_lists_commands() {
    scout_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Keyword opportunity analysis"))
        .stdout(predicate::str::contains("analyze"))
        .stdout(predicate::str::contains("trending"));
}

#[test]
#[serial]
fn config_validates_defaults() {
    scout_cmd()
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("configuration OK"));
}

#[test]
#[serial]
fn config_rejects_bad_file() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("scout.toml");
    std::fs::write(&file, "warmup_hour_utc = 99\n").unwrap();
    scout_cmd()
        .arg("--config")
        .arg(&file)
        .arg("config")
        .assert()
        .failure();
}

#[test]
#[serial]
fn trending_reports_cold_cache() {
    scout_cmd()
        .args(["trending", "US"])
        .assert()
        .success()
        .stdout(predicate::str::contains("no warmed trending digest"));
}

#[test]
#[serial]
fn trending_videos_flag_reads_video_cache() {
    scout_cmd()
        .args(["trending", "US", "--videos"])
        .assert()
        .success()
        .stdout(predicate::str::contains("no warmed trending videos"));
}

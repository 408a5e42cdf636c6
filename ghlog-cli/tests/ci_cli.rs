use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn ghlog(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("ghlog").expect("ghlog binary");
    cmd.env("HOME", home.path()).env("USERPROFILE", home.path());
    cmd
}

#[test]
fn init_registers_a_pipeline() {
    let home = TempDir::new().expect("home");
    ghlog(&home)
        .args([
            "ci",
            "init",
            "https://github.com/acme/api.git",
            "--remote",
            "https://mirror.acme.dev/acme/api.git",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Registered pipeline 'api'"));

    let config = home.path().join(".ghlog").join("pipelines").join("api.yaml");
    assert!(config.exists(), "init must write the pipeline config");
}

#[test]
fn init_is_idempotent() {
    let home = TempDir::new().expect("home");
    let args = [
        "ci",
        "init",
        "git@github.com:acme/api.git",
        "--remote",
        "git@mirror.acme.dev:acme/api.git",
    ];
    ghlog(&home).args(args).assert().success();

    let config = home.path().join(".ghlog").join("pipelines").join("api.yaml");
    let first = std::fs::read_to_string(&config).expect("read config");

    ghlog(&home).args(args).assert().success();
    let second = std::fs::read_to_string(&config).expect("re-read config");
    assert_eq!(second, first, "re-init must not rewrite the config");
}

#[test]
fn list_shows_registered_pipelines_sorted() {
    let home = TempDir::new().expect("home");
    for name in ["zeta", "alpha"] {
        ghlog(&home)
            .args([
                "ci",
                "init",
                &format!("https://github.com/acme/{name}.git"),
                "--remote",
                &format!("https://mirror.acme.dev/acme/{name}.git"),
            ])
            .assert()
            .success();
    }
    let output = ghlog(&home).args(["ci", "list"]).assert().success();
    let stdout = String::from_utf8(output.get_output().stdout.clone()).expect("utf8");
    assert_eq!(stdout.lines().collect::<Vec<_>>(), vec!["alpha", "zeta"]);
}

#[test]
fn list_on_fresh_home_prints_a_hint() {
    let home = TempDir::new().expect("home");
    ghlog(&home)
        .args(["ci", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No pipelines registered"));
}

#[test]
fn run_unknown_pipeline_fails_with_an_init_hint() {
    let home = TempDir::new().expect("home");
    ghlog(&home)
        .args(["ci", "run", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no pipeline 'nope'"));
}

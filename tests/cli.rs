use assert_cmd::prelude::*;
use predicates::prelude::*;

#[test]
fn test_cli_help() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = assert_cmd::cargo_bin_cmd!("capacity-planner");
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Usage"))
        .stdout(predicate::str::contains("simulate"))
        .stdout(predicate::str::contains("plot-capacity"));
    Ok(())
}

#[test]
fn unknown_subcommand_fails() {
    let mut cmd = assert_cmd::cargo_bin_cmd!("capacity-planner");
    cmd.arg("forecast");
    cmd.assert().failure();
}

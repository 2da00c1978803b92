use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

fn run_help(root: &TempDir, args: &[&str]) {
    let mut cmd = cargo_bin_cmd!("nyaya");
    cmd.env("NYAYA_ROOT", root.path())
        .args(args)
        .arg("--help")
        .assert()
        .success();
}

#[test]
fn every_cli_command_has_help_path() {
    let root = TempDir::new().expect("temp root");

    // top-level
    run_help(&root, &[]);

    // round lifecycle
    run_help(&root, &["submit"]);
    run_help(&root, &["validate"]);
    run_help(&root, &["finalize"]);

    // maintenance
    run_help(&root, &["sync"]);
    run_help(&root, &["enrich"]);
    run_help(&root, &["label"]);
    run_help(&root, &["status"]);
    run_help(&root, &["integrate"]);

    // grouped subcommands
    run_help(&root, &["convert"]);
    run_help(&root, &["convert", "to-pretty"]);
    run_help(&root, &["convert", "to-clean"]);
    run_help(&root, &["convert", "map-index"]);
}

#[test]
fn label_targets_are_mutually_exclusive() {
    let root = TempDir::new().expect("temp root");
    let mut cmd = cargo_bin_cmd!("nyaya");
    cmd.env("NYAYA_ROOT", root.path())
        .args(["label", "--staging", "--round", "r1"])
        .assert()
        .code(2);
}

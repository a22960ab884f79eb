use assert_cmd::prelude::*;
use std::fs;
use tempfile::tempdir;

fn skel() -> std::process::Command {
    std::process::Command::new(assert_cmd::cargo::cargo_bin!("skel"))
}

fn package_args<'a>(dst: &'a str, license: &'a str) -> Vec<&'a str> {
    vec![
        "package",
        dst,
        "--license",
        license,
        "--project-name",
        "Acme",
        "--package-name",
        "acme",
        "--author",
        "Ada Lovelace",
        "--author-email",
        "ada@example.org",
    ]
}

#[test]
fn package_with_bsd_license_layers_both_trees() {
    let tmp = tempdir().unwrap();
    let dst = tmp.path().join("out");
    let mut args = package_args(dst.to_str().unwrap(), "bsd");
    args.extend(["--organization", "Acme Corp"]);

    skel()
        .args(args)
        .assert()
        .success()
        .stdout(predicates::str::contains("OK   skel basic-package"));

    // Package tree.
    let setup = fs::read_to_string(dst.join("setup.py")).unwrap();
    assert!(setup.contains("name='Acme'"));
    assert!(setup.contains("packages=['acme']"));
    assert!(dst.join("acme/__init__.py").exists());
    assert_eq!(
        fs::read_to_string(dst.join("MANIFEST.in")).unwrap(),
        "include README.md\ninclude LICENSE\n"
    );

    // License tree, rendered into the same destination, with the third
    // clause expanded for the organization.
    let license = fs::read_to_string(dst.join("LICENSE")).unwrap();
    assert!(license.contains("Ada Lovelace"));
    assert!(license.contains("Neither the name of the Acme Corp"));
}

#[test]
fn package_bsd_without_organization_gets_two_clauses() {
    let tmp = tempdir().unwrap();
    let dst = tmp.path().join("out");

    // `organization` defaults to empty, so batch mode accepts its absence.
    skel().args(package_args(dst.to_str().unwrap(), "bsd")).assert().success();

    let license = fs::read_to_string(dst.join("LICENSE")).unwrap();
    assert!(!license.contains("Neither the name"));
}

#[test]
fn package_without_license_choice_has_copyright_notice() {
    let tmp = tempdir().unwrap();
    let dst = tmp.path().join("out");

    skel().args(package_args(dst.to_str().unwrap(), "none")).assert().success();

    let license = fs::read_to_string(dst.join("LICENSE")).unwrap();
    assert!(license.contains("All rights reserved."));
    assert!(license.contains("Ada Lovelace"));
}

#[test]
fn standalone_license_command() {
    let tmp = tempdir().unwrap();
    let dst = tmp.path().join("out");

    skel()
        .args([
            "license",
            dst.to_str().unwrap(),
            "--license",
            "gpl",
            "--author",
            "Ada",
            "--project-name",
            "Acme",
        ])
        .assert()
        .success();

    let license = fs::read_to_string(dst.join("LICENSE")).unwrap();
    assert!(license.contains("GNU General Public License"));
    assert!(license.starts_with("Acme\n"));
}

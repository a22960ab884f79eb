use assert_cmd::prelude::*;
use std::fs;
use tempfile::tempdir;

fn skel() -> std::process::Command {
    std::process::Command::new(assert_cmd::cargo::cargo_bin!("skel"))
}

#[test]
fn module_renders_with_flags() {
    let tmp = tempdir().unwrap();
    let dst = tmp.path().join("out");

    skel()
        .args([
            "module",
            dst.to_str().unwrap(),
            "--module-name",
            "hello",
            "--author",
            "Ada Lovelace",
            "--author-email",
            "ada@example.org",
        ])
        .assert()
        .success()
        .stdout(predicates::str::contains("OK   skel basic-module"));

    // The dynamic file name was rendered and the suffix stripped.
    let module = fs::read_to_string(dst.join("hello.py")).unwrap();
    assert!(module.contains("Ada Lovelace <ada@example.org>"));
    assert!(!dst.join("{module_name}.py").exists());
    assert!(!dst.join("hello.py_tmpl").exists());

    let readme = fs::read_to_string(dst.join("README.md")).unwrap();
    assert!(readme.contains("# hello"));
}

#[test]
fn module_renders_into_existing_directory() {
    let tmp = tempdir().unwrap();
    fs::write(tmp.path().join("keep.txt"), "untouched").unwrap();

    skel()
        .args([
            "module",
            tmp.path().to_str().unwrap(),
            "--module-name",
            "m",
            "--author",
            "A",
            "--author-email",
            "a@b.c",
        ])
        .assert()
        .success();

    assert_eq!(fs::read_to_string(tmp.path().join("keep.txt")).unwrap(), "untouched");
    assert!(tmp.path().join("m.py").exists());
}

use assert_cmd::Command;
use serde_json::Value;
use std::{fs, path::Path};
use tempfile::TempDir;

fn cmd(cwd: &Path) -> Command {
    let mut cmd = Command::cargo_bin("twig2html").expect("binary built");
    cmd.current_dir(cwd).env_remove("RUST_LOG");
    cmd
}

fn write(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

#[test]
fn convert_single_file_with_vars() {
    let tmp = TempDir::new().unwrap();
    write(&tmp.path().join("hello.twig"), "Hello {{ name }}, {{ n + 1 }}!");

    cmd(tmp.path())
        .args(["convert", "hello.twig", "out/hello.html", "--var", "name=World", "--var", "n=2"])
        .assert()
        .success();

    let out = fs::read_to_string(tmp.path().join("out/hello.html")).unwrap();
    assert_eq!(out, "Hello World, 3!");
}

#[test]
fn convert_partial_fails() {
    let tmp = TempDir::new().unwrap();
    write(&tmp.path().join("nav.part.twig"), "nav");

    cmd(tmp.path())
        .args(["convert", "nav.part.twig", "nav.html"])
        .assert()
        .failure();
    assert!(!tmp.path().join("nav.html").exists());
}

#[test]
fn dir_reports_json() {
    let tmp = TempDir::new().unwrap();
    write(&tmp.path().join("src/index.twig"), "{{ site }}");
    write(&tmp.path().join("src/head.part.twig"), "head");
    write(&tmp.path().join("vars.json"), r#"{"site": "Docs"}"#);

    let out = cmd(tmp.path())
        .args(["--json", "dir", "src", "public", "--vars", "vars.json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let report: Value = serde_json::from_slice(&out).expect("valid json output");
    assert_eq!(report["success"].as_array().unwrap().len(), 1);
    assert_eq!(report["skipped"].as_array().unwrap().len(), 1);
    assert_eq!(report["success"][0]["output"], "public/index.html");
    assert_eq!(fs::read_to_string(tmp.path().join("public/index.html")).unwrap(), "Docs");
}

#[test]
fn dir_exits_nonzero_when_a_file_fails() {
    let tmp = TempDir::new().unwrap();
    write(&tmp.path().join("src/good.twig"), "good");
    write(&tmp.path().join("src/bad.twig"), "{{ oops");

    cmd(tmp.path()).args(["dir", "src", "out"]).assert().failure();
    assert_eq!(fs::read_to_string(tmp.path().join("out/good.html")).unwrap(), "good");
}

#[test]
fn dir_uses_config_file_defaults() {
    let tmp = TempDir::new().unwrap();
    write(&tmp.path().join("templates/page.twig"), "{{ greeting }} {{ who }}");
    write(&tmp.path().join("data/page.toml"), "who = \"from data\"\n");
    write(
        &tmp.path().join("twig2html.toml"),
        "source = \"templates\"\noutput = \"site\"\ndata = \"data\"\n\n[vars]\ngreeting = \"Hi\"\nwho = \"global\"\n",
    );

    cmd(tmp.path()).arg("dir").assert().success();
    assert_eq!(
        fs::read_to_string(tmp.path().join("site/page.html")).unwrap(),
        "Hi from data"
    );
}

#[test]
fn dir_missing_source_fails() {
    let tmp = TempDir::new().unwrap();
    cmd(tmp.path()).args(["dir", "nope", "out"]).assert().failure();
    assert!(!tmp.path().join("out").exists());
}

use std::fs;
use std::process::Command;

fn fe_graph() -> Command {
    Command::new(env!("CARGO_BIN_EXE_fe-graph"))
}

#[test]
fn missing_repository_argument_is_a_usage_error() {
    let output = fe_graph().arg("graph").output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Usage"));
    assert!(output.stdout.is_empty());
}

#[test]
fn help_and_version_succeed() {
    assert_eq!(fe_graph().arg("--help").output().unwrap().status.code(), Some(0));
    assert_eq!(fe_graph().arg("--version").output().unwrap().status.code(), Some(0));
}

#[test]
fn graph_prints_json_to_stdout() {
    let project = tempfile::tempdir().unwrap();
    let src = project.path().join("src/app");
    fs::create_dir_all(&src).unwrap();
    fs::write(
        src.join("user.service.ts"),
        "export class UserService {\n  load() { return this.http.get('/api/users'); }\n}\n",
    )
    .unwrap();

    let output = fe_graph()
        .arg("graph")
        .arg(project.path())
        .env("RUST_LOG", "debug")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["nodes"][0]["id"], "UserService.load");
    assert_eq!(value["http_calls"][0]["method"], "GET");
}

#[test]
fn inventory_without_src_exits_with_one() {
    let project = tempfile::tempdir().unwrap();
    let output = fe_graph()
        .arg("inventory")
        .arg(project.path())
        .arg("--output")
        .arg(project.path().join("out.json"))
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("error:"));
}

#[test]
fn invalid_config_exits_with_one() {
    let project = tempfile::tempdir().unwrap();
    fs::create_dir_all(project.path().join("src")).unwrap();
    fs::write(
        project.path().join("fe-graph.toml"),
        "[analysis]\ninventory_extensions = []\n",
    )
    .unwrap();

    let output = fe_graph()
        .arg("graph")
        .arg(project.path())
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("inventory_extensions"));
}

use predicates::prelude::*;
use serde_json::Value;
use std::process::Command;
use tempfile::TempDir;

fn cmd() -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::from(Command::new(env!("CARGO_BIN_EXE_refdoc")));
    cmd.env_remove("REFDOC_LOG");
    cmd
}

fn fixture_path(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn config() -> String {
    fixture_path("reference.toml")
}

fn stdout_of(assert: assert_cmd::assert::Assert) -> String {
    String::from_utf8(assert.get_output().stdout.clone()).unwrap()
}

// -- index --

#[test]
fn index_lists_configured_types() {
    let output = stdout_of(cmd().args(["-c", &config(), "index"]).assert().success());

    assert!(output.contains("* [Gravatar](Gravatar.md): Displays a Gravatar image."));
    assert!(output.contains("* [RatingExtender](RatingExtender.md)"));
    assert!(output.contains("* [SliderExtender](SliderExtender.md)"));
    assert!(!output.contains("ToolkitResourceManager"));
}

// -- type --

#[test]
fn type_page_merges_client_members() {
    let output = stdout_of(
        cmd()
            .args(["-c", &config(), "type", "SliderExtender"])
            .assert()
            .success(),
    );

    assert!(output.starts_with("# SliderExtender\n"));
    // XML summary wins, client adds the default
    assert!(output.contains("### Minimum\n\n> `Number` default `0`\n\nMinimum value allowed."));
    assert!(output.contains("### Length\n\n> `String` default `150px`\n\nWidth or height of the rail, depending on Orientation."));
    // Client-only members
    assert!(output.contains("### slideEnd"));
    assert!(output.contains("`slideEnd(Object sender, EventArgs args)`"));
    assert!(output.contains("### clamp"));
    assert!(output.contains("#### Returns\n\nThe value within [Minimum, Maximum]"));
    // Orphaned and unrecognized blocks produce nothing
    assert!(!output.contains("Steps"));
    assert!(!output.contains("legacy"));
}

#[test]
fn type_page_duplicate_annotation_last_wins() {
    let output = stdout_of(
        cmd()
            .args(["-c", &config(), "type", "RatingExtender"])
            .assert()
            .success(),
    );

    assert_eq!(output.matches("### MaxRating").count(), 1);
    assert!(output.contains("Highest selectable rating."));
    assert!(!output.contains("Number of stars."));
}

#[test]
fn type_page_without_script_uses_xml_only() {
    let output = stdout_of(
        cmd()
            .args(["-c", &config(), "-f", "json", "type", "Gravatar"])
            .assert()
            .success(),
    );

    let value: Value = serde_json::from_str(&output).unwrap();
    assert_eq!(value["full_name"], "AjaxControlToolkit.Gravatar");
    let get_url = &value["members"][0];
    assert_eq!(get_url["kind"], "method");
    assert_eq!(get_url["origin"], "xml");
    assert_eq!(get_url["params"][1]["name"], "size");
    assert_eq!(get_url["params"][1]["type_name"], "System.Int32");
    assert_eq!(get_url["returns"], "Absolute URL");
}

#[test]
fn unknown_type_fails() {
    cmd()
        .args(["-c", &config(), "type", "Nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("type not found: AjaxControlToolkit.Nope"));
}

#[test]
fn type_all_writes_files() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-c", &config(), "-o", dir.path().to_str().unwrap(), "type", "--all"])
        .assert()
        .success();

    for name in ["Gravatar", "RatingExtender", "SliderExtender"] {
        assert!(dir.path().join(format!("{}.md", name)).exists(), "missing {}", name);
    }
    assert!(!dir.path().join("ToolkitResourceManager.md").exists());
}

// -- markup --

#[test]
fn markup_wiki_covers_every_type() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-c", &config(), "-f", "wiki", "-o", dir.path().to_str().unwrap(), "markup"])
        .assert()
        .success();

    let output = std::fs::read_to_string(dir.path().join("reference.wiki")).unwrap();
    assert!(output.starts_with("!! Controls\n"));
    assert!(output.contains("! SliderExtender\n"));
    assert!(output.contains("! ToolkitResourceManager\n"));
    assert!(output.contains("* *Length* {\"String\"}"));
    assert!(output.contains("_Default: 150px_"));
}

// -- parse --

#[test]
fn parse_dumps_client_members() {
    let output = stdout_of(
        cmd()
            .args(["parse", &fixture_path("bin/Scripts/Slider.SliderBehavior.js")])
            .assert()
            .success(),
    );

    let value: Value = serde_json::from_str(&output).unwrap();
    let (_, members) = value.as_object().unwrap().iter().next().unwrap();
    assert_eq!(members["class"]["name"], "Sys.Extended.UI.SliderBehavior");
    let names: Vec<&str> = members["members"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Minimum", "Length", "slideEnd", "clamp"]);
}

#[test]
fn parse_scans_directories() {
    let output = stdout_of(
        cmd()
            .args(["parse", &fixture_path("bin/Scripts")])
            .assert()
            .success(),
    );

    let value: Value = serde_json::from_str(&output).unwrap();
    assert_eq!(value.as_object().unwrap().len(), 2);
}

#[test]
fn parse_ignores_format() {
    cmd()
        .args(["-f", "xml", "parse", &fixture_path("bin/Scripts/Rating.RatingBehavior.js")])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"MaxRating\""));
}

// -- errors --

#[test]
fn missing_config_fails() {
    cmd()
        .args(["-c", "/nonexistent/reference.toml", "index"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load config"));
}

#[test]
fn invalid_format_fails() {
    cmd()
        .args(["-c", &config(), "-f", "xml", "index"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown format"));
}

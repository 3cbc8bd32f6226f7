//! File-level pipeline: discovery, file sinks, error isolation

use genext::{
    instantiate_file, specialize_file, specialize_source, FileSink, GenextConfig, MemorySink,
    StaticArgs,
};
use serde_json::json;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const SUBJECT: &str = r#"
// subject file
function add(x, y) {
    return x + y;
}

function pick(flag, a, b) {
    if (flag) { return a; } else { return b; }
}

function unsupported(x) {
    return Math.max(x, 1);
}

add.specialize = true;
add.staticVars = 'x';
pick.specialize = true;
pick.staticVars = ['flag'];
unsupported.specialize = true;
unsupported.staticVars = ['x'];
"#;

fn subject_file(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("subject.js");
    fs::write(&path, SUBJECT).unwrap();
    path
}

#[test]
fn emits_in_flag_order_and_skips_unsupported() {
    let mut sink = MemorySink::new();
    let report = specialize_source(SUBJECT, &GenextConfig::default(), &mut sink).unwrap();
    assert_eq!(report.emitted, vec!["add", "pick"]);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].name, "unsupported");

    let text = sink.text();
    let add = text.find("function add_gen (x) {").unwrap();
    let pick = text.find("function pick_gen (flag) {").unwrap();
    assert!(add < pick);
    assert!(!text.contains("unsupported_gen"));
}

#[test]
fn file_sink_appends_across_runs() {
    let dir = tempfile::tempdir().unwrap();
    let subject = subject_file(&dir);
    let out = dir.path().join("test.js");
    let config = GenextConfig::default();

    for _ in 0..2 {
        let mut sink = FileSink::open(&out, true).unwrap();
        specialize_file(&subject, &config, &mut sink).unwrap();
    }
    let text = fs::read_to_string(&out).unwrap();
    assert_eq!(text.matches("function add_gen (x) {").count(), 2);

    let mut sink = FileSink::open(&out, false).unwrap();
    specialize_file(&subject, &config, &mut sink).unwrap();
    let text = fs::read_to_string(&out).unwrap();
    assert_eq!(text.matches("function add_gen (x) {").count(), 1);
    assert!(text.ends_with("}\n"));
}

#[test]
fn no_candidates_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plain.js");
    fs::write(&path, "function f(x) { return x; }\n").unwrap();
    let mut sink = MemorySink::new();
    let err = specialize_file(&path, &GenextConfig::default(), &mut sink).unwrap_err();
    assert!(err.to_string().contains("No function"));
}

#[test]
fn parse_error_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.js");
    fs::write(&path, "function f(x { return x; }\n").unwrap();
    let mut sink = MemorySink::new();
    assert!(specialize_file(&path, &GenextConfig::default(), &mut sink).is_err());
    assert!(sink.lines().is_empty());
}

#[test]
fn missing_file_is_reported() {
    let mut sink = MemorySink::new();
    let err = specialize_file(
        std::path::Path::new("/no/such/subject.js"),
        &GenextConfig::default(),
        &mut sink,
    )
    .unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to read file"));
}

#[test]
fn sink_failure_aborts() {
    let mut sink = MemorySink::failing_after(3);
    let err = specialize_source(SUBJECT, &GenextConfig::default(), &mut sink).unwrap_err();
    assert!(format!("{:#}", err).contains("closed"));
}

#[test]
fn instantiates_every_generator() {
    let dir = tempfile::tempdir().unwrap();
    let subject = subject_file(&dir);
    let args: StaticArgs = [("x", json!(10)), ("flag", json!(false))]
        .into_iter()
        .collect();
    let out = instantiate_file(&subject, &GenextConfig::default(), &args).unwrap();
    assert_eq!(
        out,
        vec![
            (
                "add".to_string(),
                "function add_special (y) {\n    return 10 + y ;\n}\n".to_string()
            ),
            (
                "pick".to_string(),
                "function pick_special (a, b) {\n    return b ;\n}\n".to_string()
            ),
        ]
    );
}

#[test]
fn config_changes_emitted_text() {
    let config = GenextConfig::from_toml_str(
        r#"
        [emit]
        print_fn = "emit"
        indent = 2
        interpolation = "raw"

        [specialize]
        eliminate_static_branches = false
        "#,
    )
    .unwrap();
    let source = "function pick(flag, a) { if (flag) { return a; } return 0; }\npick.specialize = true;\npick.staticVars = 'flag';\n";
    let mut sink = MemorySink::new();
    specialize_source(source, &config, &mut sink).unwrap();
    assert_eq!(
        sink.lines(),
        [
            "function pick_gen (flag) {",
            "  emit(`function pick_special (a) {`);",
            "  emit(`  if (${flag}) {`);",
            "  emit(`    return a ;`);",
            "  emit(`  }`);",
            "  emit(`  return 0 ;`);",
            "  emit(`}`);",
            "}",
        ]
    );
}

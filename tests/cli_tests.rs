//! End-to-end tests running the docmagen binary

mod common;

use common::{assert_contains, assert_valid_json, TestRepo};

#[test]
fn test_stages_annotated_tree() {
    let repo = TestRepo::new();
    repo.with_standard_src_layout();
    let original = repo.read_file("src/index.ts");

    let stdout = repo.run_cli_success(&["--src", "src", "--out", "out"]);
    assert_contains(&stdout, "3 file(s), 3 changed", "summary");
    assert_contains(&stdout, "Output: out", "output directory");

    let index = repo.read_file("out/index.ts");
    assert_contains(&index, "@param {string[]} args", "index");
    assert_contains(&index, "@returns {void}", "index");
    let users = repo.read_file("out/api/users.ts");
    assert_contains(&users, "@returns {Promise<User>}", "users");
    let model = repo.read_file("out/models/user.ts");
    assert_contains(&model, "@private", "model");
    assert_contains(&model, "@default 0", "model");
    assert_contains(&model, "@static", "model");

    assert_eq!(repo.read_file("src/index.ts"), original);
}

#[test]
fn test_default_out_dir() {
    let repo = TestRepo::new();
    repo.add_ts_function("src/a.ts", "a", "n: number", "number");
    repo.run_cli_success(&["-s", "src"]);
    assert!(repo.exists("docmagen/a.ts"));
}

#[test]
fn test_check_reports_pending_changes() {
    let repo = TestRepo::new();
    repo.with_standard_src_layout();

    let (code, stdout, stderr) = repo.run_cli_failure(&["-s", "src", "-o", "out", "--check"]);
    assert_eq!(code, Some(5));
    assert_contains(&stdout, "pending", "check summary");
    assert_contains(&stderr, "would be re-annotated", "check error");
    assert!(!repo.exists("out"));
}

#[test]
fn test_check_passes_on_annotated_tree() {
    let repo = TestRepo::new();
    repo.add_ts_function("src/a.ts", "a", "n: number, label?: string", "string")
        .add_file(
            "src/b.ts",
            "export class B {\n  protected name: string;\n\n  greet(other: B): string {\n    return other.name;\n  }\n}\n",
        );

    repo.run_cli_success(&["-s", "src", "-o", "out"]);
    repo.run_cli_success(&["-s", "out", "-o", "again", "--check"]);
}

#[test]
fn test_strict_fails_on_skipped_declarations() {
    let repo = TestRepo::new();
    repo.add_file("src/c.ts", "class C {\n  ['key'](n: number) {}\n}\n");

    repo.run_cli_success(&["-s", "src", "-o", "out"]);
    let (code, stdout, _) = repo.run_cli_failure(&["-s", "src", "-o", "out", "--strict"]);
    assert_eq!(code, Some(6));
    assert_contains(&stdout, "skipped  c.ts:2", "skip line");
}

#[test]
fn test_missing_source_directory() {
    let repo = TestRepo::new();
    let (code, _, stderr) = repo.run_cli_failure(&["-s", "nope"]);
    assert_eq!(code, Some(1));
    assert_contains(&stderr, "File not found", "missing src");
}

#[test]
fn test_no_source_given() {
    let repo = TestRepo::new();
    let (code, _, stderr) = repo.run_cli_failure(&[]);
    assert_eq!(code, Some(4));
    assert_contains(&stderr, "Configuration error", "no src");
}

#[test]
fn test_missing_ignore_directory() {
    let repo = TestRepo::new();
    repo.add_ts_function("src/a.ts", "a", "n: number", "void");
    let (code, _, _) = repo.run_cli_failure(&["-s", "src", "--ignore", "src/generated"]);
    assert_eq!(code, Some(1));
}

#[test]
fn test_ignore_and_extensions() {
    let repo = TestRepo::new();
    repo.add_ts_function("src/a.ts", "a", "n: number", "void")
        .add_ts_function("src/b.tsx", "b", "n: number", "void")
        .add_ts_function("src/generated/c.ts", "c", "n: number", "void");

    repo.run_cli_success(&["-s", "src", "-o", "out", "--ext", "ts", "--ignore", "src/generated"]);
    assert!(repo.exists("out/a.ts"));
    assert!(!repo.exists("out/b.tsx"));
    assert!(!repo.exists("out/generated/c.ts"));
}

#[test]
fn test_json_summary() {
    let repo = TestRepo::new();
    repo.with_standard_src_layout();

    let stdout = repo.run_cli_success(&["-s", "src", "-o", "out", "--format", "json"]);
    let json = assert_valid_json(&stdout, "json summary");
    let files = json["files"].as_array().expect("files array");
    assert_eq!(files.len(), 3);
    assert_eq!(files[0]["path"], "api/users.ts");
    assert_eq!(files[0]["changed_blocks"], 1);
    assert!(json["out"].is_string());
}

#[test]
fn test_config_file_is_picked_up() {
    let repo = TestRepo::new();
    repo.add_ts_function("lib/a.ts", "a", "n: number", "void")
        .with_config("[annotate]\nsrc = \"lib\"\nout = \"staged\"\n\n[logging]\nlevel = \"warn\"\n");

    repo.run_cli_success(&[]);
    assert_contains(&repo.read_file("staged/a.ts"), "@param {number} n", "configured run");
}

#[test]
fn test_invalid_config_file() {
    let repo = TestRepo::new();
    repo.add_ts_function("src/a.ts", "a", "n: number", "void")
        .with_config("[annotate\nsrc = ");

    let (code, _, _) = repo.run_cli_failure(&["-s", "src"]);
    assert_eq!(code, Some(4));
}

#[test]
fn test_unreadable_file_does_not_stop_run() {
    let repo = TestRepo::new();
    repo.add_ts_function("src/good.ts", "good", "n: number", "void");
    std::fs::write(repo.path().join("src/bad.ts"), [0xffu8, 0xfe]).unwrap();

    let stdout = repo.run_cli_success(&["-s", "src", "-o", "out"]);
    assert_contains(&stdout, "failed   bad.ts", "failed file listed");
    assert!(repo.exists("out/good.ts"));
}

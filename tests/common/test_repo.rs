//! TestRepo builder for integration testing
//!
//! Creates a throwaway directory holding a TypeScript source tree and runs
//! the built `docmagen` binary against it.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Builder for creating test source trees
pub struct TestRepo {
    dir: TempDir,
}

impl TestRepo {
    /// Create a new empty test repository
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    /// Get the path to the test repository root
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Add a source file with the given content
    pub fn add_file(&self, relative_path: &str, content: &str) -> &Self {
        let full_path = self.dir.path().join(relative_path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        fs::write(&full_path, content).expect("Failed to write file");
        self
    }

    /// Add a TypeScript function with typed parameters
    pub fn add_ts_function(&self, path: &str, name: &str, params: &str, ret: &str) -> &Self {
        let content = format!(
            "export function {}({}): {} {{\n  throw new Error('todo');\n}}\n",
            name, params, ret
        );
        self.add_file(path, &content)
    }

    /// Write `docmagen.toml` at the repository root
    pub fn with_config(&self, content: &str) -> &Self {
        self.add_file("docmagen.toml", content)
    }

    /// Create a small project under src/
    pub fn with_standard_src_layout(&self) -> &Self {
        self.add_ts_function("src/index.ts", "main", "args: string[]", "void")
            .add_ts_function("src/api/users.ts", "getUser", "id: number", "Promise<User>")
            .add_file(
                "src/models/user.ts",
                "export class User {\n  private readonly id = 0;\n\n  static create(name: string): User {\n    return new User();\n  }\n}\n",
            )
    }

    /// Read a file relative to the repository root
    pub fn read_file(&self, relative_path: &str) -> String {
        fs::read_to_string(self.path().join(relative_path))
            .unwrap_or_else(|e| panic!("Failed to read {}: {}", relative_path, e))
    }

    /// Whether a file exists relative to the repository root
    pub fn exists(&self, relative_path: &str) -> bool {
        self.path().join(relative_path).exists()
    }

    /// Run the docmagen binary in this repository and return its output
    pub fn run_cli(&self, args: &[&str]) -> std::io::Result<Output> {
        let binary = PathBuf::from(env!("CARGO_BIN_EXE_docmagen"));

        Command::new(&binary)
            .current_dir(self.path())
            .env_remove("DOCMAGEN_CONFIG")
            .env_remove("RUST_LOG")
            .env("NO_COLOR", "1")
            .args(args)
            .output()
    }

    /// Run CLI and expect success, return stdout
    pub fn run_cli_success(&self, args: &[&str]) -> String {
        let output = self.run_cli(args).expect("Failed to run CLI");
        assert!(
            output.status.success(),
            "CLI command {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    /// Run CLI and expect failure, return (exit code, stdout, stderr)
    pub fn run_cli_failure(&self, args: &[&str]) -> (Option<i32>, String, String) {
        let output = self.run_cli(args).expect("Failed to run CLI");
        assert!(
            !output.status.success(),
            "CLI command {:?} should have failed",
            args
        );
        (
            output.status.code(),
            String::from_utf8_lossy(&output.stdout).to_string(),
            String::from_utf8_lossy(&output.stderr).to_string(),
        )
    }
}

impl Default for TestRepo {
    fn default() -> Self {
        Self::new()
    }
}

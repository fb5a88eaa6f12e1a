//! Multi-file annotation run
//!
//! Discovers source files under a directory, annotates each one on the rayon
//! pool and stages the result (after the transpilation hook) under the
//! output directory, keeping relative paths. A failing file is reported and
//! does not stop the others.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Serialize;

use crate::annotate::{annotate, SourceUnit};
use crate::error::{DocmagenError, Result};
use crate::schema::Skipped;

/// Directories never descended into
const SKIPPED_DIRS: &[&str] = &["node_modules", "dist", "build", "target", "coverage"];

/// Turns annotated TypeScript into the text handed to the documentation
/// renderer.
pub trait Transpiler: Sync {
    /// Text to stage for `unit`, given its annotated source
    fn transpile(&self, unit: &SourceUnit, annotated: &str) -> Result<String>;

    /// Staged path for a file at `relative` under the source directory
    fn output_path(&self, relative: &Path) -> PathBuf {
        relative.to_path_buf()
    }
}

/// Stages annotated TypeScript unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl Transpiler for Identity {
    fn transpile(&self, _unit: &SourceUnit, annotated: &str) -> Result<String> {
        Ok(annotated.to_string())
    }
}

/// Resolved options for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    pub src: PathBuf,
    pub out: PathBuf,
    pub ignore: Vec<PathBuf>,
    pub extensions: Vec<String>,
    /// Annotate in memory only; nothing is written
    pub check: bool,
}

/// Outcome for one file
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: String,
    pub declarations: usize,
    pub changed_blocks: usize,
    pub skipped: Vec<Skipped>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileReport {
    fn failed(path: String, error: &DocmagenError) -> Self {
        Self {
            path,
            declarations: 0,
            changed_blocks: 0,
            skipped: Vec::new(),
            error: Some(error.to_string()),
        }
    }
}

/// Aggregated outcome of a run
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub files: Vec<FileReport>,
    /// Output directory, absent in check mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out: Option<PathBuf>,
}

impl RunReport {
    /// Files with at least one changed block
    pub fn changed_files(&self) -> usize {
        self.files.iter().filter(|f| f.changed_blocks > 0).count()
    }

    /// Declarations skipped across all files
    pub fn skipped_declarations(&self) -> usize {
        self.files.iter().map(|f| f.skipped.len()).sum()
    }

    /// Files that could not be processed
    pub fn failed_files(&self) -> usize {
        self.files.iter().filter(|f| f.error.is_some()).count()
    }
}

/// Run annotation over every matching file under `options.src`
pub fn run(options: &RunOptions, transpiler: &dyn Transpiler) -> Result<RunReport> {
    if !options.src.is_dir() {
        return Err(DocmagenError::FileNotFound {
            path: options.src.display().to_string(),
        });
    }
    if let Some(missing) = options.ignore.iter().find(|p| !p.exists()) {
        return Err(DocmagenError::FileNotFound {
            path: missing.display().to_string(),
        });
    }

    // Staged output may live under the source tree
    let mut excluded = options.ignore.clone();
    excluded.push(options.out.clone());
    let files = collect_files(&options.src, &excluded, &options.extensions);
    tracing::info!(
        "Found {} file(s) under {}",
        files.len(),
        options.src.display()
    );

    if !options.check {
        fs::create_dir_all(&options.out).map_err(|e| DocmagenError::io_at(&options.out, e))?;
    }

    let files: Vec<FileReport> = files
        .par_iter()
        .map(|path| process_file(options, transpiler, path))
        .collect();

    Ok(RunReport {
        files,
        out: (!options.check).then(|| options.out.clone()),
    })
}

fn process_file(options: &RunOptions, transpiler: &dyn Transpiler, path: &Path) -> FileReport {
    let relative = path.strip_prefix(&options.src).unwrap_or(path);
    let display = relative.display().to_string();

    match annotate_file(options, transpiler, path, relative) {
        Ok(report) => report,
        Err(e) => {
            tracing::warn!("{}: {}", path.display(), e);
            FileReport::failed(display, &e)
        }
    }
}

fn annotate_file(
    options: &RunOptions,
    transpiler: &dyn Transpiler,
    path: &Path,
    relative: &Path,
) -> Result<FileReport> {
    let text = fs::read_to_string(path).map_err(|e| DocmagenError::io_at(path, e))?;
    let unit = SourceUnit::new(path, text);
    let annotated = annotate(&unit)?;

    if !options.check {
        let staged = transpiler.transpile(&unit, &annotated.text)?;
        let target = options.out.join(transpiler.output_path(relative));
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| DocmagenError::io_at(parent, e))?;
        }
        fs::write(&target, staged).map_err(|e| DocmagenError::io_at(&target, e))?;
    }

    Ok(FileReport {
        path: relative.display().to_string(),
        declarations: annotated.declarations,
        changed_blocks: annotated.changed_blocks,
        skipped: annotated.skipped,
        error: None,
    })
}

/// Collect source files, sorted by path
pub fn collect_files(dir: &Path, ignore: &[PathBuf], extensions: &[String]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    collect_files_recursive(dir, ignore, extensions, &mut files);
    files.sort();
    files
}

fn collect_files_recursive(
    dir: &Path,
    ignore: &[PathBuf],
    extensions: &[String],
    files: &mut Vec<PathBuf>,
) {
    let entries = match fs::read_dir(dir) {
        Ok(e) => e,
        Err(e) => {
            tracing::warn!("Cannot read {}: {}", dir.display(), e);
            return;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        if path.is_dir() {
            if name.starts_with('.') || SKIPPED_DIRS.contains(&name) || is_ignored(&path, ignore) {
                continue;
            }
            collect_files_recursive(&path, ignore, extensions, files);
        } else if path.is_file() {
            // Declaration files have no bodies or docs worth staging
            if name.ends_with(".d.ts") {
                continue;
            }
            let matches_ext = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)));
            if matches_ext {
                files.push(path);
            }
        }
    }
}

fn is_ignored(path: &Path, ignore: &[PathBuf]) -> bool {
    ignore.iter().any(|ignored| {
        path == ignored.as_path()
            || match (path.canonicalize(), ignored.canonicalize()) {
                (Ok(a), Ok(b)) => a == b,
                _ => false,
            }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn options(root: &Path) -> RunOptions {
        RunOptions {
            src: root.join("src"),
            out: root.join("out"),
            ignore: Vec::new(),
            extensions: vec!["ts".to_string(), "tsx".to_string()],
            check: false,
        }
    }

    #[test]
    fn test_collect_files_filters() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "src/a.ts", "");
        write(root, "src/b.tsx", "");
        write(root, "src/types.d.ts", "");
        write(root, "src/readme.md", "");
        write(root, "src/node_modules/dep/index.ts", "");
        write(root, "src/.hidden/x.ts", "");
        write(root, "src/gen/skip.ts", "");

        let files = collect_files(
            &root.join("src"),
            &[root.join("src/gen")],
            &["ts".to_string(), "tsx".to_string()],
        );
        let names: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(root.join("src")).unwrap().display().to_string())
            .collect();
        assert_eq!(names, vec!["a.ts", "b.tsx"]);
    }

    #[test]
    fn test_run_stages_annotated_files() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "src/lib/math.ts", "export function double(n: number): number {\n  return n * 2;\n}\n");
        write(root, "src/plain.ts", "const x = 1;\n");

        let report = run(&options(root), &Identity).unwrap();
        assert_eq!(report.files.len(), 2);
        assert_eq!(report.changed_files(), 1);
        assert_eq!(report.failed_files(), 0);

        let staged = fs::read_to_string(root.join("out/lib/math.ts")).unwrap();
        assert!(staged.contains("@param {number} n"));
        assert!(staged.contains("@returns {number}"));
        let plain = fs::read_to_string(root.join("out/plain.ts")).unwrap();
        assert_eq!(plain, "const x = 1;\n");
    }

    #[test]
    fn test_check_mode_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "src/a.ts", "function f(a: string) {}\n");

        let mut opts = options(root);
        opts.check = true;
        let report = run(&opts, &Identity).unwrap();
        assert_eq!(report.changed_files(), 1);
        assert!(report.out.is_none());
        assert!(!root.join("out").exists());
    }

    #[test]
    fn test_failing_file_does_not_stop_run() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "src/good.ts", "function f(a: string) {}\n");
        fs::write(root.join("src/bad.ts"), [0xffu8, 0xfe, 0x00]).unwrap();

        let report = run(&options(root), &Identity).unwrap();
        assert_eq!(report.files.len(), 2);
        assert_eq!(report.failed_files(), 1);
        assert!(root.join("out/good.ts").exists());
        assert!(!root.join("out/bad.ts").exists());
    }

    #[test]
    fn test_missing_source_dir() {
        let dir = TempDir::new().unwrap();
        let err = run(&options(dir.path()), &Identity).unwrap_err();
        assert!(matches!(err, DocmagenError::FileNotFound { .. }));
    }

    #[test]
    fn test_missing_ignore_dir() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "src/a.ts", "");
        let mut opts = options(root);
        opts.ignore = vec![root.join("src/missing")];
        assert!(matches!(
            run(&opts, &Identity),
            Err(DocmagenError::FileNotFound { .. })
        ));
    }

    #[test]
    fn test_output_dir_inside_source_is_not_rescanned() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "a.ts", "class C { x = 1 }\n");

        let opts = RunOptions {
            src: root.to_path_buf(),
            out: root.join("docmagen"),
            ..options(root)
        };
        run(&opts, &Identity).unwrap();
        let report = run(&opts, &Identity).unwrap();

        let paths: Vec<_> = report.files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["a.ts"]);
        assert!(!root.join("docmagen/docmagen").exists());
        let staged = fs::read_to_string(root.join("docmagen/a.ts")).unwrap();
        assert_eq!(staged.matches("@default").count(), 1);
    }

    struct Suffixed;

    impl Transpiler for Suffixed {
        fn transpile(&self, _unit: &SourceUnit, annotated: &str) -> Result<String> {
            Ok(format!("{}// staged\n", annotated))
        }

        fn output_path(&self, relative: &Path) -> PathBuf {
            relative.with_extension("js")
        }
    }

    #[test]
    fn test_custom_transpiler() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "src/a.ts", "const a = 1;\n");
        run(&options(root), &Suffixed).unwrap();
        let staged = fs::read_to_string(root.join("out/a.js")).unwrap();
        assert_eq!(staged, "const a = 1;\n// staged\n");
    }
}

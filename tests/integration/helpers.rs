//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tempfile::TempDir;

use packhook_compiler::Compiler;
use packhook_core::config::AppConfig;

/// A throwaway project directory with entry modules on disk.
pub struct TestProject {
    /// Keeps the directory alive for the duration of the test
    pub dir: TempDir,
}

impl TestProject {
    /// Create a project containing the given `(path, contents)` files.
    pub fn new(files: &[(&str, &str)]) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        for (path, contents) in files {
            let target = dir.path().join(path);
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent).expect("Failed to create source dir");
            }
            std::fs::write(&target, contents).expect("Failed to write source file");
        }
        Self { dir }
    }

    /// The project root.
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Path of the default output directory.
    pub fn dist(&self) -> PathBuf {
        self.root().join("dist")
    }

    /// Write `toml` as `packhook.toml` and return its path.
    pub fn write_config(&self, toml: &str) -> PathBuf {
        let path = self.root().join("packhook.toml");
        std::fs::write(&path, toml).expect("Failed to write config");
        path
    }

    /// A compiler for `toml` rooted at this project, with no plugins applied.
    pub fn compiler(&self, toml: &str) -> Compiler {
        let config = AppConfig::from_toml_str(toml).expect("Failed to parse test config");
        Compiler::new(config)
            .expect("Failed to create compiler")
            .with_context_dir(self.root())
    }
}

/// A shared log callbacks push into.
pub fn output_log() -> Arc<Mutex<Vec<String>>> {
    Arc::new(Mutex::new(Vec::new()))
}

/// Snapshot of a log.
pub fn lines(log: &Arc<Mutex<Vec<String>>>) -> Vec<String> {
    log.lock().expect("log poisoned").clone()
}

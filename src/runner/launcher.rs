// src/runner/launcher.rs

//! Resolves the platform launcher for a benchmark script.
//!
//! All platform branching lives behind this one seam: on Windows the scripts
//! ship as PowerShell (`run.ps1`), everywhere else as a shell script
//! (`run.sh`). The language token is the sole variable argument; it is
//! whitelist-constrained before it ever reaches this layer and is passed as a
//! plain argv element, never through shell interpolation.

use std::path::{Path, PathBuf};

use crate::language::Language;

/// A concrete command line ready to be spawned.
#[derive(Debug, Clone, PartialEq)]
pub struct Launcher {
    pub program: &'static str,
    pub args: Vec<String>,
}

/// Build the launcher invocation for `language` on the current platform.
pub fn resolve_launcher(scripts_dir: &Path, language: Language) -> Launcher {
    if cfg!(windows) {
        let script: PathBuf = scripts_dir.join("run.ps1");
        Launcher {
            program: "powershell.exe",
            args: vec![
                "-File".to_string(),
                script.to_string_lossy().into_owned(),
                language.as_str().to_string(),
            ],
        }
    } else {
        let script: PathBuf = scripts_dir.join("run.sh");
        Launcher {
            program: "bash",
            args: vec![
                script.to_string_lossy().into_owned(),
                language.as_str().to_string(),
            ],
        }
    }
}

//! Benchmark-script fixtures for tests.
//!
//! Each fixture writes a `run.sh` into its own temp directory, so a
//! `RunnerConfig` pointed at [`ScriptFixture::dir`] behaves exactly like a
//! production scripts directory. The scripts receive the language token as
//! `$1`, matching the real launcher contract.
//!
//! These only make sense on Unix; the executor invokes `bash run.sh <lang>`.

use std::path::Path;

use tempfile::TempDir;

/// A temp directory holding a fake `run.sh`.
pub struct ScriptFixture {
    dir: TempDir,
}

impl ScriptFixture {
    /// Write `body` as the run script. The shebang is added here; `body`
    /// is plain shell.
    pub fn new(body: &str) -> Self {
        let dir = TempDir::new().expect("creating script fixture dir");
        let script = format!("#!/bin/sh\n{body}\n");
        std::fs::write(dir.path().join("run.sh"), script).expect("writing run.sh");
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }
}

/// A script that prints the usual benchmark banner and timing lines and
/// exits zero.
pub fn success_script() -> ScriptFixture {
    ScriptFixture::new(
        r#"echo "Running $1 benchmark"
echo "Python 3.10.12"
echo "prime count: 42"
echo "real 0m3.500s""#,
    )
}

/// A script that writes diagnostics to stderr and exits with `code`.
pub fn failing_script(code: i32, stderr_message: &str) -> ScriptFixture {
    ScriptFixture::new(&format!(
        r#"echo "about to fail"
echo "{stderr_message}" >&2
exit {code}"#
    ))
}

/// A script that sleeps for `seconds`, prints nothing, and exits zero.
pub fn sleeping_script(seconds: f64) -> ScriptFixture {
    ScriptFixture::new(&format!("sleep {seconds}"))
}

/// A script that sleeps and then touches `marker`; used to prove a
/// timed-out process really was killed (the marker must never appear).
pub fn marker_script(seconds: f64, marker: &Path) -> ScriptFixture {
    ScriptFixture::new(&format!(
        "sleep {seconds}\ntouch \"{}\"",
        marker.display()
    ))
}

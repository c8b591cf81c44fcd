use crate::config::CheckerConfig;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::{LazyLock, Mutex, MutexGuard};

static CWD_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

pub(crate) struct DirGuard {
    original: PathBuf,
    _lock: MutexGuard<'static, ()>,
}

impl DirGuard {
    pub(crate) fn new(new_dir: &Path) -> Self {
        // Changing the process current working directory is global and not thread-safe.
        // Lock it so tests don't race even if a #[serial] annotation is missed.
        let lock = CWD_LOCK.lock().unwrap_or_else(|poison| poison.into_inner());
        let original = std::env::current_dir().unwrap();
        std::env::set_current_dir(new_dir).unwrap();
        Self {
            original,
            _lock: lock,
        }
    }
}

impl Drop for DirGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.original);
    }
}

/// A checker implemented as an `sh` script; the scratch file path is `$1`.
pub(crate) fn sh_checker(script: &str, scratch_dir: &Path) -> CheckerConfig {
    CheckerConfig {
        program: "sh".to_string(),
        args: vec![
            "-c".to_string(),
            script.to_string(),
            "fake-checker".to_string(),
        ],
        timeout_seconds: 10,
        scratch_dir: Some(scratch_dir.to_path_buf()),
        ..CheckerConfig::default()
    }
}

/// Stand-in for a Python syntax checker: flags an unclosed `def f(`.
pub(crate) const FAKE_SYNTAX_CHECKER: &str = r#"
if grep -q 'def f(:' "$1"; then
    echo "$1:1:7: SyntaxError: Expected ')', found ':'"
    echo "Found 1 error."
    exit 1
fi
exit 0
"#;

/// Names of the files left in a directory.
pub(crate) fn dir_entries(dir: &Path) -> Vec<String> {
    std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
        .collect()
}

/// Whether a real `ruff` is installed; ruff-backed tests skip otherwise.
pub(crate) fn ruff_available() -> bool {
    Command::new("ruff")
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

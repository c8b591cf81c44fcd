//! Implementation of the `pycheck init` command.

use crate::cli::InitArgs;
use crate::config::Config;
use crate::error::{PycheckError, Result};
use crate::fs::atomic_write_file;
use std::path::Path;

const CONFIG_HEADER: &str = "\
# pycheck configuration.
# The checker is run as `program args... <scratch file>`; exit code 0 means valid.
";

pub fn cmd_init(args: &InitArgs) -> Result<()> {
    let path = Config::default_path();
    write_default_config(&path, args.force)?;
    println!("Wrote {}", path.display());
    Ok(())
}

/// Write the default config to `path`, refusing to overwrite unless `force`.
pub(super) fn write_default_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(PycheckError::UserError(format!(
            "'{}' already exists.\nFix: pass --force to overwrite it.",
            path.display()
        )));
    }

    let yaml = Config::default().to_yaml()?;
    atomic_write_file(path, &format!("{}{}", CONFIG_HEADER, yaml))
}

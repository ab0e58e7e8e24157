//! Post-commit hook support: snapshot files for downstream scanners and
//! installation of the hook script itself.

use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{GitServiceError, Result};
use crate::types_diff::CommitDiff;

/// Snapshot directory, relative to the git dir, when none is configured.
pub const DEFAULT_REPORT_DIR: &str = "commit-scan";

pub const LATEST_SNAPSHOT: &str = "latest.json";

/// Marks hook scripts this tool owns and may overwrite.
const HOOK_MARKER: &str = "# installed by commit-scan";

/// Writes `<dir>/<hash>.json` and `<dir>/latest.json`; returns the latter.
pub fn write_snapshot(dir: &Path, diff: &CommitDiff) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let body = serde_json::to_vec_pretty(diff)?;

    let by_hash = dir.join(format!("{}.json", diff.commit_hash));
    write_atomic(&by_hash, &body)?;
    let latest = dir.join(LATEST_SNAPSHOT);
    write_atomic(&latest, &body)?;
    debug!("snapshot written: {}", by_hash.display());
    Ok(latest)
}

// Readers polling latest.json must never observe a partial file.
fn write_atomic(path: &Path, body: &[u8]) -> Result<()> {
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, body)?;
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }
    Ok(())
}

fn hook_script(exe: &Path) -> String {
    let exe = exe.display().to_string().replace('\'', r"'\''");
    format!("#!/bin/sh\n{HOOK_MARKER}\nexec '{exe}' --hook\n")
}

/// Installs `<hooks_dir>/post-commit`. An existing script is replaced only
/// when we wrote it or `force` is set.
pub fn install_post_commit(hooks_dir: &Path, exe: &Path, force: bool) -> Result<PathBuf> {
    fs::create_dir_all(hooks_dir)?;
    let path = hooks_dir.join("post-commit");

    if let Ok(existing) = fs::read_to_string(&path) {
        if !existing.contains(HOOK_MARKER) {
            if !force {
                return Err(GitServiceError::HookExists { path });
            }
            warn!("overwriting existing hook at {}", path.display());
        }
    }

    fs::write(&path, hook_script(exe))?;
    make_executable(&path)?;
    Ok(path)
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))?;
    Ok(())
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}

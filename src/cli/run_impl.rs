use anyhow::{Context, Result};
use log::{debug, info, warn};

use crate::vcs::{CommitService, RepoBackend};

use super::Args;

/// Resolves the repository and runs exactly one mode, in priority order:
/// hook, specific commit, latest commit.
///
/// # Errors
/// Any collaborator failure is returned with mode-specific context; nothing
/// after the failing call runs.
pub fn dispatch<B: RepoBackend>(args: &Args, backend: &B) -> Result<()> {
    let repo_path = match args.repo_path() {
        Some(p) => p.to_path_buf(),
        None => backend
            .current_repo_path()
            .context("Error finding git repository")?,
    };
    debug!("using repository {}", repo_path.display());

    let service = backend.service(repo_path);

    if args.install_hook {
        let path = service
            .install_hook(args.force)
            .context("Installing post-commit hook failed")?;
        info!("✅ Installed post-commit hook at {}", path.display());
        return Ok(());
    }

    if args.hook {
        if let Some(rev) = args.commit_rev() {
            warn!("--commit {rev} is ignored in hook mode");
        }
        info!("🎯 Running git commit analysis hook...");
        service.on_commit_hook().context("Hook execution failed")?;
    } else if let Some(rev) = args.commit_rev() {
        info!("🔍 Analyzing commit: {rev}");
        let diff = service
            .get_commit_diff(rev)
            .context("Error getting commit diff")?;
        service.print_commit_diff(&diff);
    } else {
        info!("🔍 Analyzing latest commit...");
        let diff = service
            .get_latest_commit_diff()
            .context("Error getting latest commit diff")?;
        service.print_commit_diff(&diff);
    }

    info!("✅ Analysis complete!");
    Ok(())
}

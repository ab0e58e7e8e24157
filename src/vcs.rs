use chrono::DateTime;
use git2::{Commit, Delta, Diff, DiffFindOptions, DiffOptions, ErrorCode, Patch, Repository};
use log::{debug, info, trace};
use std::path::{Path, PathBuf};

use crate::classify::{language_for_path, scan_profile_for_path};
use crate::error::{GitServiceError, Result};
use crate::formatters::{self, OutputFormat};
use crate::hook;
use crate::types_diff::{ChangeStatus, CommitDiff, CommitHeader, FileDiff};

/// Locates repositories and hands out services bound to them.
pub trait RepoBackend {
    type Service: CommitService;

    /// Discovers the repository containing the current working directory.
    fn current_repo_path(&self) -> Result<PathBuf>;

    fn service(&self, repo_path: PathBuf) -> Self::Service;
}

/// Operations on one repository.
pub trait CommitService {
    /// Analyzes the commit that was just created and records a snapshot of it.
    fn on_commit_hook(&self) -> Result<()>;

    fn get_commit_diff(&self, rev: &str) -> Result<CommitDiff>;

    fn get_latest_commit_diff(&self) -> Result<CommitDiff>;

    fn print_commit_diff(&self, diff: &CommitDiff);

    /// Installs the post-commit hook; returns the path of the hook script.
    fn install_hook(&self, force: bool) -> Result<PathBuf>;
}

/// Discovers the repository that contains the current working directory and
/// returns its working-tree root (the git dir for bare repositories).
pub fn get_current_repo_path() -> Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    let repo = discover(&cwd)?;
    let root = repo.workdir().unwrap_or_else(|| repo.path());
    Ok(root.to_path_buf())
}

fn discover(path: &Path) -> Result<Repository> {
    Repository::discover(path).map_err(|e| {
        debug!("discover {}: {e}", path.display());
        GitServiceError::RepositoryNotFound {
            path: path.to_path_buf(),
        }
    })
}

/// Print and snapshot settings shared by every `GitService`.
#[derive(Debug, Clone, Default)]
pub struct ServiceOptions {
    pub format: OutputFormat,
    pub stat_only: bool,
    pub report_dir: Option<PathBuf>,
}

/// Backend for real repositories on disk.
#[derive(Debug, Clone, Default)]
pub struct GitBackend {
    pub options: ServiceOptions,
}

impl RepoBackend for GitBackend {
    type Service = GitService;

    fn current_repo_path(&self) -> Result<PathBuf> {
        get_current_repo_path()
    }

    fn service(&self, repo_path: PathBuf) -> GitService {
        GitService::new(repo_path).with_options(self.options.clone())
    }
}

pub struct GitService {
    repo_path: PathBuf,
    options: ServiceOptions,
}

impl GitService {
    /// Binds a service to `repo_path`. The repository is opened lazily by each
    /// operation, so a bad path surfaces on first use.
    pub fn new(repo_path: impl Into<PathBuf>) -> Self {
        Self {
            repo_path: repo_path.into(),
            options: ServiceOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: ServiceOptions) -> Self {
        self.options = options;
        self
    }

    fn open(&self) -> Result<Repository> {
        debug!("opening repository at {}", self.repo_path.display());
        discover(&self.repo_path)
    }

    fn report_dir(&self, repo: &Repository) -> PathBuf {
        self.options
            .report_dir
            .clone()
            .unwrap_or_else(|| repo.path().join(hook::DEFAULT_REPORT_DIR))
    }
}

impl CommitService for GitService {
    fn on_commit_hook(&self) -> Result<()> {
        let repo = self.open()?;
        let commit = head_commit(&repo)?;
        let diff = build_commit_diff(&repo, &commit)?;
        info!(
            "📦 Commit {} touched {} file(s) (+{} -{})",
            diff.short_hash, diff.files_changed, diff.insertions, diff.deletions
        );
        self.print_commit_diff(&diff);

        let dir = self.report_dir(&repo);
        let written = hook::write_snapshot(&dir, &diff)?;
        info!("💾 Saved commit snapshot to {}", written.display());
        Ok(())
    }

    fn get_commit_diff(&self, rev: &str) -> Result<CommitDiff> {
        let repo = self.open()?;
        let commit = repo
            .revparse_single(rev)
            .and_then(|obj| obj.peel_to_commit())
            .map_err(|e| {
                debug!("resolve {rev}: {e}");
                GitServiceError::CommitNotFound {
                    rev: rev.to_string(),
                }
            })?;
        build_commit_diff(&repo, &commit)
    }

    fn get_latest_commit_diff(&self) -> Result<CommitDiff> {
        let repo = self.open()?;
        let commit = head_commit(&repo)?;
        build_commit_diff(&repo, &commit)
    }

    fn print_commit_diff(&self, diff: &CommitDiff) {
        let out = formatters::render(diff, self.options.format, self.options.stat_only);
        println!("{out}");
    }

    fn install_hook(&self, force: bool) -> Result<PathBuf> {
        let repo = self.open()?;
        let exe = std::env::current_exe()?;
        let dir = hooks_dir(&repo)?;
        debug!("installing into hooks directory {}", dir.display());
        hook::install_post_commit(&dir, &exe, force)
    }
}

/// Directory git actually runs hooks from: `core.hooksPath` when set (relative
/// values resolve against the working tree), else `hooks/` in the common git
/// dir, which linked worktrees share with the main checkout.
pub fn hooks_dir(repo: &Repository) -> Result<PathBuf> {
    let configured = match repo.config()?.get_path("core.hooksPath") {
        Ok(p) => Some(p),
        Err(e) if e.code() == ErrorCode::NotFound => None,
        Err(e) => return Err(e.into()),
    };
    Ok(match configured {
        Some(p) if p.is_absolute() => p,
        Some(p) => repo.workdir().unwrap_or_else(|| repo.path()).join(p),
        None => repo.commondir().join("hooks"),
    })
}

fn head_commit(repo: &Repository) -> Result<Commit<'_>> {
    let head = match repo.head() {
        Ok(h) => h,
        Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => {
            return Err(GitServiceError::NoCommits);
        }
        Err(e) => return Err(e.into()),
    };
    Ok(head.peel_to_commit()?)
}

/// Diffs `commit` against its first parent, or against the empty tree for a
/// root commit.
pub fn build_commit_diff(repo: &Repository, commit: &Commit<'_>) -> Result<CommitDiff> {
    let header = commit_header(commit);
    debug!(
        "diffing {} against {} parent(s)",
        header.hash,
        header.parent_hashes.len()
    );

    let new_tree = commit.tree()?;
    let old_tree = if commit.parent_count() > 0 {
        Some(commit.parent(0)?.tree()?)
    } else {
        None
    };

    let mut opts = DiffOptions::new();
    opts.ignore_submodules(true)
        .include_typechange(true)
        .show_binary(false);
    let mut diff = repo.diff_tree_to_tree(old_tree.as_ref(), Some(&new_tree), Some(&mut opts))?;

    let mut find_opts = DiffFindOptions::new();
    find_opts.renames(true).renames_from_rewrites(true);
    diff.find_similar(Some(&mut find_opts))?;

    let file_diffs = collect_file_diffs(&diff)?;
    Ok(CommitDiff::from_parts(header, file_diffs))
}

fn commit_header(commit: &Commit<'_>) -> CommitHeader {
    let author = commit.author();
    let message = String::from_utf8_lossy(commit.message_bytes())
        .trim_end()
        .to_string();
    CommitHeader {
        hash: commit.id().to_string(),
        author: author.name().unwrap_or_default().to_string(),
        email: author.email().unwrap_or_default().to_string(),
        message,
        timestamp: DateTime::from_timestamp(commit.time().seconds(), 0).unwrap_or_default(),
        parent_hashes: commit.parent_ids().map(|id| id.to_string()).collect(),
    }
}

fn collect_file_diffs(diff: &Diff<'_>) -> Result<Vec<FileDiff>> {
    let mut out = Vec::with_capacity(diff.deltas().len());
    for idx in 0..diff.deltas().len() {
        let Some(delta) = diff.get_delta(idx) else {
            continue;
        };
        let status = match delta.status() {
            Delta::Added => ChangeStatus::Added,
            Delta::Deleted => ChangeStatus::Deleted,
            Delta::Renamed => ChangeStatus::Renamed,
            Delta::Copied => ChangeStatus::Copied,
            Delta::Typechange => ChangeStatus::Typechange,
            _ => ChangeStatus::Modified,
        };
        let old_path = delta.old_file().path().map(Path::to_path_buf);
        let new_path = delta.new_file().path().map(Path::to_path_buf);
        let Some(path) = (match status {
            ChangeStatus::Deleted => old_path.clone(),
            _ => new_path.clone().or_else(|| old_path.clone()),
        }) else {
            continue;
        };

        let patch = Patch::from_diff(diff, idx)?;
        let is_binary = delta.flags().is_binary()
            || patch
                .as_ref()
                .is_some_and(|p| p.delta().flags().is_binary());

        let (additions, deletions, text) = match patch {
            Some(mut p) if !is_binary => {
                let (_context, adds, dels) = p.line_stats()?;
                let buf = p.to_buf()?;
                (adds, dels, String::from_utf8_lossy(&buf).into_owned())
            }
            _ if is_binary => (0, 0, binary_placeholder(status, &path, old_path.as_deref())),
            // mode-only changes carry no hunks
            _ => (0, 0, git_header(old_path.as_deref().unwrap_or(&path), &path)),
        };

        trace!(
            "{} {} +{additions} -{deletions}{}",
            status.letter(),
            path.display(),
            if is_binary { " (binary)" } else { "" }
        );

        out.push(FileDiff {
            file_name: path.display().to_string(),
            old_file_name: if status == ChangeStatus::Renamed {
                old_path.map(|p| p.display().to_string())
            } else {
                None
            },
            status,
            additions,
            deletions,
            is_binary,
            language: language_for_path(&path).to_string(),
            scan_profile: scan_profile_for_path(&path).to_string(),
            diff: text,
        });
    }
    Ok(out)
}

fn git_header(old: &Path, new: &Path) -> String {
    format!("diff --git a/{} b/{}\n", old.display(), new.display())
}

/// Mirrors what `git diff` prints for binary content.
fn binary_placeholder(status: ChangeStatus, path: &Path, old_path: Option<&Path>) -> String {
    let old = old_path.unwrap_or(path);
    let left = match status {
        ChangeStatus::Added => "/dev/null".to_string(),
        _ => format!("a/{}", old.display()),
    };
    let right = match status {
        ChangeStatus::Deleted => "/dev/null".to_string(),
        _ => format!("b/{}", path.display()),
    };
    format!(
        "{}Binary files {left} and {right} differ\n",
        git_header(old, path)
    )
}

//! Git repository operations

use std::path::{Path, PathBuf};

use git2::Repository;
use tracing::{info, instrument};

use chronicle_core::error::GitError;

/// Result type for git operations
pub type Result<T> = std::result::Result<T, GitError>;

/// Git repository wrapper
pub struct GitRepo {
    pub(crate) repo: Repository,
    path: PathBuf,
}

impl GitRepo {
    /// Open the repository rooted at `path`
    #[instrument(fields(path = %path.display()))]
    pub fn open(path: &Path) -> Result<Self> {
        let repo = Repository::open(path)
            .map_err(|e| open_error(e, GitError::RepositoryNotFound(path.to_path_buf())))?;
        info!("opened git repository");

        Ok(Self {
            path: path.to_path_buf(),
            repo,
        })
    }

    /// Open the repository containing `start_path`, searching upwards
    #[instrument(fields(start_path = %start_path.display()))]
    pub fn discover(start_path: &Path) -> Result<Self> {
        let repo = Repository::discover(start_path)
            .map_err(|e| open_error(e, GitError::NotARepository(start_path.to_path_buf())))?;

        let path = repo.workdir().unwrap_or_else(|| repo.path()).to_path_buf();
        info!(root = %path.display(), "discovered git repository");

        Ok(Self { repo, path })
    }

    /// Get the repository path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// HEAD commit, or `None` on an unborn branch
    pub(crate) fn head_commit(&self) -> Result<Option<git2::Commit<'_>>> {
        match self.repo.head() {
            Ok(head) => Ok(Some(head.peel_to_commit()?)),
            Err(e)
                if e.code() == git2::ErrorCode::UnbornBranch
                    || e.code() == git2::ErrorCode::NotFound =>
            {
                Ok(None)
            }
            Err(e) => Err(GitError::Git2(e)),
        }
    }
}

fn open_error(err: git2::Error, not_found: GitError) -> GitError {
    match err.code() {
        git2::ErrorCode::NotFound => not_found,
        _ => GitError::OpenFailed(err.message().to_string()),
    }
}

//! Output directory provisioning.

use std::io;
use std::path::Path;

/// Whether [`ensure_dir`] found the directory or had to create it.
///
/// Advisory only — callers report it but never fail on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirState {
    AlreadyExisted,
    Created,
}

/// Ensure a directory (and its parents) exists.
///
/// Creation runs unconditionally — `create_dir_all` treats "already exists"
/// as success, so there is no check-then-act gap under concurrent
/// provisioning; the existence pre-check only feeds the advisory state.
/// Callers scope a failure as run-level or step-level `DirectoryUnwritable`.
pub async fn ensure_dir(path: &Path) -> io::Result<DirState> {
    let existed = tokio::fs::try_exists(path).await.unwrap_or(false);
    tokio::fs::create_dir_all(path).await?;
    let state = if existed {
        DirState::AlreadyExisted
    } else {
        DirState::Created
    };
    tracing::debug!(path = %path.display(), ?state, "directory ensured");
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out");

        let state = ensure_dir(&target).await.unwrap();
        assert_eq!(state, DirState::Created);
        assert!(target.is_dir());
    }

    #[tokio::test]
    async fn test_reports_existing_directory() {
        let dir = tempfile::tempdir().unwrap();

        let state = ensure_dir(dir.path()).await.unwrap();
        assert_eq!(state, DirState::AlreadyExisted);
    }

    #[tokio::test]
    async fn test_creates_intermediate_parents() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("a/b/c");

        let state = ensure_dir(&target).await.unwrap();
        assert_eq!(state, DirState::Created);
        assert!(target.is_dir());
    }

    #[tokio::test]
    async fn test_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out");

        assert_eq!(ensure_dir(&target).await.unwrap(), DirState::Created);
        assert_eq!(
            ensure_dir(&target).await.unwrap(),
            DirState::AlreadyExisted
        );
    }
}

//! Artifact file writes.
//!
//! Every generated file goes through [`ArtifactWriter`]: paths are resolved
//! against the workspace root and may not escape it, parent directories are
//! created on demand, and content lands through a temp file in the target
//! directory followed by a rename so readers never see a half-written file.

use std::fs;
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};

use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;

use crate::error::{IoResultExt, ScaffoldError, ScaffoldResult};

/// Result of one successful write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFile {
    pub path: PathBuf,
    pub bytes: usize,
    pub content_hash: String,
    /// The file already existed and was replaced.
    pub replaced: bool,
}

#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    root: PathBuf,
}

impl ArtifactWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Joins `relative` onto the workspace root. Absolute paths and `..`
    /// components are rejected.
    pub fn resolve(&self, relative: impl AsRef<Path>) -> ScaffoldResult<PathBuf> {
        let relative = relative.as_ref();
        let escapes = relative.components().any(|component| {
            matches!(
                component,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        });
        if escapes {
            return Err(ScaffoldError::filesystem(
                relative,
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "path escapes the workspace root",
                ),
            ));
        }
        Ok(self.root.join(relative))
    }

    pub async fn exists(&self, relative: impl AsRef<Path>) -> ScaffoldResult<bool> {
        let path = self.resolve(relative)?;
        tokio::fs::try_exists(&path).await.at(&path)
    }

    pub async fn write(
        &self,
        relative: impl AsRef<Path>,
        content: String,
    ) -> ScaffoldResult<WrittenFile> {
        let path = self.resolve(relative)?;
        let target = path.clone();
        let written = tokio::task::spawn_blocking(move || -> ScaffoldResult<WrittenFile> {
            let replaced = target.exists();
            check_permissions(&target)?;
            atomic_write(&target, &content)?;
            Ok(WrittenFile {
                content_hash: content_hash(&content),
                bytes: content.len(),
                path: target,
                replaced,
            })
        })
        .await
        .map_err(|join| ScaffoldError::filesystem(&path, io::Error::other(join)))??;

        tracing::debug!(
            path = %written.path.display(),
            bytes = written.bytes,
            replaced = written.replaced,
            "wrote artifact"
        );
        Ok(written)
    }

    pub async fn create_dir_all(&self, relative: impl AsRef<Path>) -> ScaffoldResult<PathBuf> {
        let path = self.resolve(relative)?;
        tokio::fs::create_dir_all(&path).await.at(&path)?;
        Ok(path)
    }

    pub async fn read_to_string(&self, relative: impl AsRef<Path>) -> ScaffoldResult<String> {
        let path = self.resolve(relative)?;
        tokio::fs::read_to_string(&path).await.at(&path)
    }

    /// Removes a file or a whole directory tree.
    pub async fn remove(&self, relative: impl AsRef<Path>) -> ScaffoldResult<PathBuf> {
        let path = self.resolve(relative)?;
        let metadata = tokio::fs::metadata(&path).await.at(&path)?;
        if metadata.is_dir() {
            tokio::fs::remove_dir_all(&path).await.at(&path)?;
        } else {
            tokio::fs::remove_file(&path).await.at(&path)?;
        }
        tracing::debug!(path = %path.display(), "removed artifact");
        Ok(path)
    }
}

fn check_permissions(path: &Path) -> ScaffoldResult<()> {
    if path.exists() {
        let metadata = fs::metadata(path).at(path)?;
        if metadata.permissions().readonly() {
            return Err(ScaffoldError::filesystem(
                path,
                io::Error::new(io::ErrorKind::PermissionDenied, "file is read-only"),
            ));
        }
    }
    Ok(())
}

/// Writes `content` to a temp file beside `path`, then renames it over `path`.
pub(crate) fn atomic_write(path: &Path, content: &str) -> ScaffoldResult<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).at(parent)?;

    let mut temp_file = NamedTempFile::new_in(parent).at(parent)?;
    temp_file.write_all(content.as_bytes()).at(path)?;
    temp_file.flush().at(path)?;
    if let Some(permissions) = target_permissions(path)? {
        temp_file.as_file().set_permissions(permissions).at(path)?;
    }
    temp_file
        .persist(path)
        .map_err(|persist| ScaffoldError::filesystem(path, persist.error))?;
    Ok(())
}

/// Permissions the renamed file ends up with. Temp files are created `0600`,
/// so an existing target keeps its own mode and a new one gets `0644`.
fn target_permissions(path: &Path) -> ScaffoldResult<Option<fs::Permissions>> {
    match fs::metadata(path) {
        Ok(metadata) => Ok(Some(metadata.permissions())),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(new_file_permissions()),
        Err(err) => Err(ScaffoldError::filesystem(path, err)),
    }
}

#[cfg(unix)]
fn new_file_permissions() -> Option<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn new_file_permissions() -> Option<fs::Permissions> {
    None
}

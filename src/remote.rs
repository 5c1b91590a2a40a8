//! Remote tree model and traversal

use anyhow::Result;

/// One item yielded while walking a remote directory tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEntry {
    /// Path relative to the server root, e.g. `Survival/region/r.0.0.mca`.
    pub path: String,
    pub is_directory: bool,
    pub size: u64,
}

/// Listing and retrieval operations a backup source must provide.
pub trait RemoteSource {
    /// Entries directly inside the directory at `path`.
    fn list_dir(&mut self, path: &str) -> Result<Vec<RemoteEntry>>;

    /// Full content of the file at `path`, read to completion.
    fn retrieve(&mut self, path: &str) -> Result<Vec<u8>>;
}

/// Join a listed name onto its parent directory path.
pub fn join_path(parent: &str, name: &str) -> String {
    if parent.is_empty() || parent == "/" {
        name.to_string()
    } else {
        format!("{}/{}", parent.trim_end_matches('/'), name)
    }
}

/// Depth-first traversal calling `visit` for every entry beneath `root`,
/// directories before their contents. A listing failure anywhere aborts
/// the walk.
pub fn walk<R, F>(remote: &mut R, root: &str, visit: &mut F) -> Result<()>
where
    R: RemoteSource + ?Sized,
    F: FnMut(&mut R, &RemoteEntry) -> Result<()>,
{
    for entry in remote.list_dir(root)? {
        visit(remote, &entry)?;
        if entry.is_directory {
            walk(remote, &entry.path, visit)?;
        }
    }
    Ok(())
}

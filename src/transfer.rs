//! The two traversal passes: size accumulation, then download

use anyhow::{Context, Result};
use chrono::Local;
use indicatif::ProgressBar;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::logger::Logger;
use crate::remote::{walk, RemoteSource};

/// Counters from a completed mirror pass.
#[derive(Debug, Default, Clone, Copy)]
pub struct MirrorStats {
    pub files: u64,
    pub bytes: u64,
}

impl MirrorStats {
    fn add_file(&mut self, bytes: u64) {
        self.files += 1;
        self.bytes += bytes;
    }
}

/// Total size in bytes of every regular file under `root`.
///
/// Every entry's size, directories included, is fed to `bar` so the
/// indicator keeps moving while large subtrees are being listed.
pub fn measure_tree<R: RemoteSource>(remote: &mut R, root: &str, bar: &ProgressBar) -> Result<u64> {
    let mut total = 0u64;
    walk(remote, root, &mut |_, entry| {
        if !entry.is_directory {
            total += entry.size;
        }
        bar.inc(entry.size);
        Ok(())
    })?;
    Ok(total)
}

/// Download every regular file under `root` into `dest`, mirroring the
/// remote layout below the leading path component.
///
/// Parent directories are created lazily, so remote directories that
/// contain no files are not recreated locally. Any listing, retrieval
/// or local I/O failure aborts the pass; files already written stay on
/// disk.
pub fn mirror_tree<R: RemoteSource>(
    remote: &mut R,
    root: &str,
    dest: &Path,
    bar: &ProgressBar,
    logger: &dyn Logger,
) -> Result<MirrorStats> {
    let mut stats = MirrorStats::default();
    walk(remote, root, &mut |remote, entry| {
        if !entry.is_directory {
            let local = local_destination(dest, &entry.path);
            if let Some(parent) = local.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            let content = remote.retrieve(&entry.path)?;
            let mut file = File::create(&local)
                .with_context(|| format!("failed to create {}", local.display()))?;
            file.write_all(&content)
                .with_context(|| format!("failed to write {}", local.display()))?;
            stats.add_file(content.len() as u64);
            logger.file_done(&entry.path, content.len() as u64);
        }
        bar.inc(entry.size);
        Ok(())
    })?;
    Ok(stats)
}

/// Local path for a remote file: the leading component (the world-name
/// segment) is dropped and the remainder joined onto the destination root.
pub fn local_destination(dest: &Path, remote_path: &str) -> PathBuf {
    match remote_path.split_once('/') {
        Some((_, rest)) => dest.join(rest),
        None => dest.join(remote_path),
    }
}

/// Destination directory name: explicit output name or the world name,
/// with the current date appended when requested.
pub fn destination_name(output: Option<&str>, world: &str, with_timestamp: bool) -> String {
    let base = output.unwrap_or(world);
    if with_timestamp {
        format!("{base}{}", Local::now().format("%Y%m%d"))
    } else {
        base.to_string()
    }
}

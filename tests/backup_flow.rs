use anyhow::{anyhow, Result};
use indicatif::ProgressBar;
use std::collections::BTreeMap;

use worldbak::logger::NoopLogger;
use worldbak::remote::{join_path, walk, RemoteEntry, RemoteSource};
use worldbak::transfer::{local_destination, measure_tree, mirror_tree};

/// In-memory remote tree standing in for an FTP server.
#[derive(Default)]
struct FakeRemote {
    dirs: BTreeMap<String, Vec<RemoteEntry>>,
    files: BTreeMap<String, Vec<u8>>,
}

impl FakeRemote {
    fn ensure_dir(&mut self, path: &str) {
        if self.dirs.contains_key(path) {
            return;
        }
        self.dirs.insert(path.to_string(), Vec::new());
        if let Some((parent, _)) = path.rsplit_once('/') {
            self.ensure_dir(parent);
            self.dirs.get_mut(parent).unwrap().push(RemoteEntry {
                path: path.to_string(),
                is_directory: true,
                // FTP servers report a block size for directories; the
                // sizer must not count it.
                size: 4096,
            });
        }
    }

    fn add_dir(&mut self, path: &str) {
        self.ensure_dir(path);
    }

    fn add_file(&mut self, path: &str, content: &[u8]) {
        let parent = path.rsplit_once('/').map(|(p, _)| p).unwrap_or("");
        self.ensure_dir(parent);
        self.dirs.get_mut(parent).unwrap().push(RemoteEntry {
            path: path.to_string(),
            is_directory: false,
            size: content.len() as u64,
        });
        self.files.insert(path.to_string(), content.to_vec());
    }
}

impl RemoteSource for FakeRemote {
    fn list_dir(&mut self, path: &str) -> Result<Vec<RemoteEntry>> {
        self.dirs
            .get(path)
            .cloned()
            .ok_or_else(|| anyhow!("no such directory: {path}"))
    }

    fn retrieve(&mut self, path: &str) -> Result<Vec<u8>> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| anyhow!("no such file: {path}"))
    }
}

fn survival_fixture() -> FakeRemote {
    let mut remote = FakeRemote::default();
    remote.add_file("Survival/level.dat", b"0123456789");
    remote.add_file("Survival/region/r.0.0.mca", &[7u8; 20]);
    remote.add_dir("Survival/playerdata");
    remote
}

#[test]
fn sizer_counts_only_regular_files() -> Result<()> {
    let mut remote = survival_fixture();
    let total = measure_tree(&mut remote, "Survival", &ProgressBar::hidden())?;
    assert_eq!(total, 30);
    Ok(())
}

#[test]
fn sizer_total_is_traversal_order_independent() -> Result<()> {
    // Same tree, files registered in the opposite order.
    let mut remote = FakeRemote::default();
    remote.add_dir("Survival/playerdata");
    remote.add_file("Survival/region/r.0.0.mca", &[7u8; 20]);
    remote.add_file("Survival/level.dat", b"0123456789");

    let total = measure_tree(&mut remote, "Survival", &ProgressBar::hidden())?;
    assert_eq!(total, 30);
    Ok(())
}

#[test]
fn mirror_recreates_relative_tree() -> Result<()> {
    let mut remote = survival_fixture();
    let out = tempfile::tempdir()?;
    let dest = out.path().join("out");
    std::fs::create_dir_all(&dest)?;

    let stats = mirror_tree(
        &mut remote,
        "Survival",
        &dest,
        &ProgressBar::hidden(),
        &NoopLogger,
    )?;

    assert_eq!(stats.files, 2);
    assert_eq!(stats.bytes, 30);
    assert_eq!(std::fs::read(dest.join("level.dat"))?, b"0123456789");
    assert_eq!(std::fs::read(dest.join("region/r.0.0.mca"))?, vec![7u8; 20]);
    Ok(())
}

#[test]
fn mirror_omits_empty_remote_directories() -> Result<()> {
    let mut remote = survival_fixture();
    let out = tempfile::tempdir()?;
    let dest = out.path().join("out");
    std::fs::create_dir_all(&dest)?;

    mirror_tree(
        &mut remote,
        "Survival",
        &dest,
        &ProgressBar::hidden(),
        &NoopLogger,
    )?;

    assert!(!dest.join("playerdata").exists());
    Ok(())
}

#[test]
fn mirror_overwrites_existing_local_files() -> Result<()> {
    let mut remote = survival_fixture();
    let out = tempfile::tempdir()?;
    let dest = out.path().join("out");
    std::fs::create_dir_all(&dest)?;
    std::fs::write(dest.join("level.dat"), b"stale content from a previous run")?;

    mirror_tree(
        &mut remote,
        "Survival",
        &dest,
        &ProgressBar::hidden(),
        &NoopLogger,
    )?;

    assert_eq!(std::fs::read(dest.join("level.dat"))?, b"0123456789");
    Ok(())
}

#[test]
fn mirror_fails_on_missing_remote_content() {
    // A file listed but not retrievable must abort the pass.
    let mut remote = survival_fixture();
    remote.files.remove("Survival/level.dat");
    let out = tempfile::tempdir().unwrap();

    let result = mirror_tree(
        &mut remote,
        "Survival",
        out.path(),
        &ProgressBar::hidden(),
        &NoopLogger,
    );
    assert!(result.is_err());
}

#[test]
fn walk_visits_directories_before_their_contents() -> Result<()> {
    let mut remote = survival_fixture();
    let mut seen = Vec::new();
    walk(&mut remote, "Survival", &mut |_, entry| {
        seen.push(entry.path.clone());
        Ok(())
    })?;

    let dir = seen.iter().position(|p| p == "Survival/region").unwrap();
    let file = seen
        .iter()
        .position(|p| p == "Survival/region/r.0.0.mca")
        .unwrap();
    assert!(dir < file);
    assert!(seen.contains(&"Survival/playerdata".to_string()));
    Ok(())
}

#[test]
fn local_destination_strips_the_world_segment() {
    let dest = std::path::Path::new("out");
    assert_eq!(
        local_destination(dest, "Survival/level.dat"),
        dest.join("level.dat")
    );
    assert_eq!(
        local_destination(dest, "Survival/region/r.0.0.mca"),
        dest.join("region/r.0.0.mca")
    );
    assert_eq!(local_destination(dest, "Survival"), dest.join("Survival"));
}

#[test]
fn join_path_handles_root_parents() {
    assert_eq!(join_path("", "Survival"), "Survival");
    assert_eq!(join_path("/", "Survival"), "Survival");
    assert_eq!(join_path("Survival", "region"), "Survival/region");
    assert_eq!(join_path("Survival/", "region"), "Survival/region");
}

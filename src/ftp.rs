//! FTP session setup and the FTP-backed [`RemoteSource`]

use anyhow::{anyhow, Context, Result};
use std::net::ToSocketAddrs;
use std::time::Duration;
use suppaftp::FtpStream;

use crate::credentials::Credentials;
use crate::remote::{join_path, RemoteEntry, RemoteSource};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);

/// An authenticated FTP session.
pub struct FtpRemote {
    stream: FtpStream,
}

/// Dial `address:port` with a bounded timeout and authenticate.
pub fn connect(creds: &Credentials) -> Result<FtpRemote> {
    let target = format!("{}:{}", creds.address, creds.port);
    let addr = target
        .to_socket_addrs()
        .with_context(|| format!("cannot resolve {target}"))?
        .next()
        .ok_or_else(|| anyhow!("no usable address for {target}"))?;

    let mut stream = FtpStream::connect_timeout(addr, CONNECT_TIMEOUT)
        .with_context(|| format!("failed to connect to {target}"))?;
    stream
        .login(&creds.username, &creds.password)
        .context("login refused by the FTP server")?;

    Ok(FtpRemote { stream })
}

impl FtpRemote {
    /// Names present in the server's root directory.
    pub fn root_names(&mut self) -> Result<Vec<String>> {
        self.stream
            .nlst(Some("/"))
            .context("failed to list the server root")
    }
}

impl RemoteSource for FtpRemote {
    fn list_dir(&mut self, path: &str) -> Result<Vec<RemoteEntry>> {
        let lines = self
            .stream
            .list(Some(path))
            .with_context(|| format!("failed to list {path}"))?;

        let mut entries = Vec::with_capacity(lines.len());
        for line in &lines {
            let item = suppaftp::list::File::try_from(line.as_str())
                .map_err(|err| anyhow!("unparsable listing line {line:?}: {err}"))?;
            // Symlinks are neither walked nor mirrored.
            if item.name() == "." || item.name() == ".." || item.is_symlink() {
                continue;
            }
            entries.push(RemoteEntry {
                path: join_path(path, item.name()),
                is_directory: item.is_directory(),
                size: item.size() as u64,
            });
        }
        Ok(entries)
    }

    fn retrieve(&mut self, path: &str) -> Result<Vec<u8>> {
        let buffer = self
            .stream
            .retr_as_buffer(path)
            .with_context(|| format!("failed to retrieve {path}"))?;
        Ok(buffer.into_inner())
    }
}

impl Drop for FtpRemote {
    fn drop(&mut self) {
        let _ = self.stream.quit();
    }
}

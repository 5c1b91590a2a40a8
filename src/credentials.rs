//! Credential gathering from flags, a password file, or interactive prompts

use anyhow::{Context, Result};
use std::fs;
use std::io::{self, BufRead, Write};

use crate::cli::{Args, Usage, EXIT_MISSING_VALUE};

/// Connection parameters assembled once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub address: String,
    pub port: String,
    pub username: String,
    pub password: String,
}

/// Resolve credentials using stdin for any interactive prompts.
pub fn resolve(args: &Args) -> Result<Credentials> {
    let stdin = io::stdin();
    resolve_from(args, &mut stdin.lock())
}

/// Resolve credentials, reading prompted values from `input`.
///
/// Each of address, port and username comes from its flag when set,
/// otherwise from a prompt; under `--no-input` a missing value is a
/// usage error (exit code 2). The password additionally accepts
/// `--password-file`, whose content is used verbatim, trailing
/// newline included.
pub fn resolve_from(args: &Args, input: &mut dyn BufRead) -> Result<Credentials> {
    let address = required_value(
        args.addr.clone(),
        "address of the FTP server",
        "FTP server address: ",
        args.no_input,
        input,
    )?;
    let port = required_value(
        args.port.clone(),
        "port of the FTP server",
        "FTP server port: ",
        args.no_input,
        input,
    )?;
    let username = required_value(
        args.user.clone(),
        "user name for the FTP login",
        "FTP server user name: ",
        args.no_input,
        input,
    )?;
    let password = match &args.password_file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("cannot read the password file {}", path.display()))?,
        None => required_value(
            None,
            "password for the FTP login",
            "FTP server password: ",
            args.no_input,
            input,
        )?,
    };

    Ok(Credentials {
        address,
        port,
        username,
        password,
    })
}

fn required_value(
    flag: Option<String>,
    what: &str,
    prompt: &str,
    no_input: bool,
    input: &mut dyn BufRead,
) -> Result<String> {
    if let Some(value) = flag {
        return Ok(value);
    }
    if no_input {
        return Err(Usage::new(
            EXIT_MISSING_VALUE,
            format!("You must specify the {what}, or drop --no-input"),
        )
        .into());
    }

    print!("{prompt}");
    io::stdout().flush().context("failed to flush the prompt")?;
    let mut line = String::new();
    input.read_line(&mut line).context("failed to read input")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

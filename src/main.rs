//! Worldbak - back up a game world from an FTP server
//!
//! One strictly sequential pipeline: resolve credentials, connect and
//! log in, size the world with a first recursive walk, then mirror it
//! locally with a second one.

use anyhow::{bail, Context, Result};
use clap::{CommandFactory, Parser};
use std::fs;
use std::io;
use std::path::PathBuf;
use std::process;
use std::time::Instant;

use worldbak::cli::{self, Args, Usage};
use worldbak::credentials;
use worldbak::ftp;
use worldbak::logger::{JsonlLogger, Logger, NoopLogger};
use worldbak::progress;
use worldbak::transfer;

fn main() {
    ctrlc::set_handler(move || {
        eprintln!("\nInterrupted, exiting...");
        // 128 + SIGINT
        process::exit(130);
    })
    .expect("Error setting Ctrl-C handler");

    let args = Args::parse();
    let code = match run(args) {
        Ok(()) => 0,
        Err(err) => report_failure(&err),
    };
    process::exit(code);
}

/// Single exit point for failures: usage errors get the help text and
/// their own exit code, everything else is an operational error.
fn report_failure(err: &anyhow::Error) -> i32 {
    if let Some(usage) = err.downcast_ref::<Usage>() {
        eprintln!("{usage}");
        eprintln!();
        let mut cmd = Args::command();
        let _ = cmd.write_help(&mut io::stderr());
        eprintln!();
        usage.code
    } else {
        eprintln!("error: {err:#}");
        1
    }
}

fn run(args: Args) -> Result<()> {
    let world = cli::world_argument(&args.world)?.to_string();

    // Choose logger once; construction failure falls back to noop.
    let logger: Box<dyn Logger> = match args.log_file {
        Some(ref path) => match JsonlLogger::new(path) {
            Ok(l) => Box::new(l),
            Err(_) => Box::new(NoopLogger),
        },
        None => Box::new(NoopLogger),
    };

    let outcome = execute(&args, &world, logger.as_ref());
    if let Err(err) = &outcome {
        logger.error("backup", &format!("{err:#}"));
    }
    outcome
}

fn execute(args: &Args, world: &str, logger: &dyn Logger) -> Result<()> {
    let creds = credentials::resolve(args)?;
    let start = Instant::now();

    let mut remote = ftp::connect(&creds)?;
    if !args.quiet {
        println!("Connected to {}:{}", creds.address, creds.port);
        println!("Calculating the download size, this may take a while on large worlds...");
    }

    let roots = remote.root_names()?;
    let present = roots
        .iter()
        .any(|name| name.trim_end_matches('/').rsplit('/').next() == Some(world));
    if !present {
        bail!("world {world:?} was not found on the FTP server");
    }

    let bar = progress::sizing_bar(args.quiet);
    let total = transfer::measure_tree(&mut remote, world, &bar)?;
    bar.finish_and_clear();
    if !args.quiet {
        println!("Download size: {:.3} GiB", total as f64 / 1_073_741_824.0);
    }

    let dest_name = transfer::destination_name(args.output.as_deref(), world, args.with_timestamp);
    let dest = PathBuf::from(&dest_name);
    fs::create_dir_all(&dest)
        .with_context(|| format!("failed to create the backup directory {dest_name}"))?;
    logger.start(world, &dest);

    if !args.quiet {
        println!("Starting the download");
    }
    let bar = progress::download_bar(total, args.quiet);
    let stats = transfer::mirror_tree(&mut remote, world, &dest, &bar, logger)?;
    bar.finish();

    let elapsed = start.elapsed();
    logger.done(stats.files, stats.bytes, elapsed.as_secs_f64());
    if !args.quiet {
        println!();
        println!("=== Backup Complete ===");
        println!("Files: {}", stats.files);
        println!("Size: {:.3} GiB", stats.bytes as f64 / 1_073_741_824.0);
        println!("Time: {:.2}s", elapsed.as_secs_f64());
    }
    Ok(())
}

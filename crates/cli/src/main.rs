//! # CLI - settings blob inspection shell
//!
//! Decodes a binary settings blob and opens a REPL over the result. Reads
//! commands from stdin and prints results to stdout, so it works both
//! interactively and with piped input. Logs go to stderr.
//!
//! ## Commands
//!
//! ```text
//! LIST              list blocks with their filters
//! SHOW [name]       print one block (no name: the unnamed block)
//! CHECK expr        validate an event filter expression
//! STATS             block and error counts
//! RELOAD            decode the blob again
//! HELP              list commands
//! EXIT / QUIT       leave the shell
//! ```
//!
//! ## Configuration
//!
//! The blob path is the first argument, or `SETTINGS_BLOB_PATH`. See the
//! `config` crate for the other variables.
//!
//! ## Example
//!
//! ```text
//! $ cargo run -p cli -- /run/mail/config.bin
//! loaded /run/mail/config.bin (blocks=3, full_size=151)
//! > LIST
//! "" (always)
//! "imap" protocol=imap
//! "pop3" protocol=pop3
//! (3 blocks)
//! > EXIT
//! bye
//! ```
//!
//! A blob that fails to decode prints `ERR <message>` and exits with
//! status 1.

mod commands;
mod session;

use anyhow::{Context, Result};
use config::Config;
use std::io::{self, BufRead, Write};
use tracing_subscriber::EnvFilter;

use commands::{execute, Flow};
use session::Session;

fn main() -> Result<()> {
    let mut config = Config::from_env().context("failed to read configuration")?;
    if let Some(path) = std::env::args_os().nth(1) {
        config = config.with_blob_path(path);
    }

    let env_filter = EnvFilter::try_new(&config.log_filter)
        .with_context(|| format!("invalid {}: {:?}", config::ENV_LOG, config.log_filter))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();

    let path = config.blob_path.clone();
    let mut session = match Session::open(config) {
        Ok(session) => session,
        Err(e) => {
            println!("ERR {}", e);
            tracing::error!(path = %path.display(), error = %e, "failed to decode settings blob");
            std::process::exit(1);
        }
    };

    println!(
        "loaded {} (blocks={}, full_size={})",
        path.display(),
        session.document().len(),
        session.document().full_size()
    );
    print!("> ");
    io::stdout().flush().ok();

    let stdin = io::stdin();
    let stdout = io::stdout();
    for line in stdin.lock().lines() {
        let line = line?;
        let flow = execute(&mut session, &line, &mut stdout.lock())?;
        if flow == Flow::Exit {
            break;
        }
        print!("> ");
        io::stdout().flush().ok();
    }

    Ok(())
}

//! Markpen - inline formatting and editor glue from the command line.
//!
//! # Usage
//!
//! ```bash
//! echo "hello world" | markpen format bold --start 0 --end 5
//! markpen resource photo.png
//! markpen consent --cookie "lang=de"
//! ```

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use markpen::api::ResourceUpload;
use markpen::config::{
    ConfigFlags, MAX_CONSENT_DAYS, global_config_path, local_override_path, resolve_config_flags,
};
use markpen::consent::ConsentNotice;
use markpen::format::{Style, ToggleReport, toggle_wrap};
use markpen::selection::{Direction, Selection};

/// Inline formatting and editor glue for markdown drafts
#[derive(Parser, Debug)]
#[command(name = "markpen", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Log engine decisions to stderr
    #[arg(long, global = true)]
    debug: bool,

    /// Name of the consent cookie
    #[arg(long, value_name = "NAME", global = true)]
    consent_cookie: Option<String>,

    /// Lifetime of the consent cookie in days
    #[arg(
        long,
        value_name = "DAYS",
        global = true,
        value_parser = clap::value_parser!(i64).range(0..=MAX_CONSENT_DAYS)
    )]
    consent_days: Option<i64>,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Toggle a formatting style around a selection
    Format {
        #[arg(value_enum)]
        style: Style,

        /// Selection start in UTF-16 code units
        #[arg(long)]
        start: usize,

        /// Selection end in UTF-16 code units
        #[arg(long)]
        end: usize,

        /// Selection direction; `none` means nothing is selected
        #[arg(long, value_enum, default_value = "forward")]
        direction: Direction,

        /// Text file to read (stdin if omitted)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },
    /// Print the upload request body for a file
    Resource {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Print the consent notice if the cookie header lacks the consent cookie
    Consent {
        /// Value of the Cookie request header
        #[arg(long, default_value = "")]
        cookie: String,
    },
}

fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            Ok(text)
        }
    }
}

fn run_format(style: Style, selection: Selection, file: Option<&Path>) -> Result<()> {
    let text = read_input(file)?;
    let toggle = toggle_wrap(&text, selection, style.delimiters());
    let report = ToggleReport::new(&text, selection, &toggle);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn run_resource(file: &Path) -> Result<()> {
    let upload = ResourceUpload::from_path(file)?;
    tracing::debug!(mime = %upload.mime, bytes = upload.decoded_len(), "encoded resource");
    println!("{}", serde_json::to_string(&upload)?);
    Ok(())
}

fn run_consent(flags: &ConfigFlags, cookie: &str) {
    let mut consent = ConsentNotice::new();
    if let Some(name) = &flags.consent_cookie {
        consent = consent.with_cookie(name.clone());
    }
    if let Some(days) = flags.consent_days {
        consent = consent.with_days(days);
    }
    if let Some(notice) = consent.check(cookie, chrono::Utc::now()) {
        println!("{}", notice.message);
        println!("Set-Cookie: {}", notice.set_cookie);
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = ConfigFlags {
        debug: cli.debug,
        consent_cookie: cli.consent_cookie.clone(),
        consent_days: cli.consent_days,
    };

    let effective =
        resolve_config_flags(&global_path, &local_path, &cli_flags, cli.save, cli.clear)?;

    // Initialize logging
    let level = if effective.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();
    tracing::debug!(?effective, "configuration");

    match cli.command {
        Some(Command::Format {
            style,
            start,
            end,
            direction,
            file,
        }) => run_format(
            style,
            Selection::new(start, end, direction),
            file.as_deref(),
        ),
        Some(Command::Resource { file }) => run_resource(&file),
        Some(Command::Consent { cookie }) => {
            run_consent(&effective, &cookie);
            Ok(())
        }
        None if cli.save || cli.clear => Ok(()),
        None => anyhow::bail!("no command given; see --help"),
    }
}

//! solist - list the functions an ELF shared object exports
//!
//! Usage:
//!   solist <library.so>                     Exported functions from .dynsym
//!   solist <library.so> --json              Same list as JSON
//!   solist <object> --section .symtab       Read another symbol table

mod logger;
mod output;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};
use solist_core::{sort_exports, ExportedFunction};
use solist_formats::{list_exported_functions_in, DYNSYM};
use thiserror::Error;

/// Exit status when the input file does not exist.
const EXIT_NOT_FOUND: u8 = 1;
/// Exit status for every other failure.
const EXIT_FAILURE: u8 = 2;

#[derive(Parser)]
#[command(name = "solist", version)]
#[command(about = "List available native functions from a Linux .so file", long_about = None)]
struct Cli {
    /// Path to the shared object (.so) file
    file_path: PathBuf,

    /// Symbol table section to read
    #[arg(long, default_value = DYNSYM)]
    section: String,

    /// Print the functions as a JSON array
    #[arg(long)]
    json: bool,

    /// Log progress to stderr (repeat for more detail)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// The input path does not exist.
#[derive(Error, Debug)]
#[error("File '{}' not found.", .path.display())]
struct FileNotFound {
    path: PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logger::init(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Some(not_found) = err.downcast_ref::<FileNotFound>() {
                eprintln!("Error: {}", not_found);
                ExitCode::from(EXIT_NOT_FOUND)
            } else {
                eprintln!("Error: Failed to parse file. {:#}", err);
                ExitCode::from(EXIT_FAILURE)
            }
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let mut exports = read_exports(&cli.file_path, &cli.section)?;
    sort_exports(&mut exports);
    info!(
        "{} exported functions in {}",
        exports.len(),
        cli.file_path.display()
    );

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    if cli.json {
        output::write_json(&mut out, &exports).context("Failed to write JSON")?;
    } else {
        output::write_table(&mut out, &exports).context("Failed to write output")?;
    }
    out.flush().context("Failed to flush output")?;
    Ok(())
}

fn read_exports(path: &Path, section: &str) -> Result<Vec<ExportedFunction>> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(FileNotFound {
                path: path.to_path_buf(),
            }
            .into())
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to open {}", path.display()));
        }
    };
    debug!("reading {} from {}", section, path.display());

    list_exported_functions_in(file, section)
        .with_context(|| format!("Failed to read {} from {}", section, path.display()))
}

//! `jweld` — JSON:API document command-line interface.
//!
//! Provides three subcommands for working with JSON:API documents on the
//! command line:
//!
//! - **`validate`** — check a document against the structural rules.
//! - **`render`** — print a human-readable summary of a document.
//! - **`error`** — mint a JSON:API error document from flags.
//!
//! `validate` and `render` read JSON from a file path or from stdin (`-`).

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use jsonapi_weld::{error_document, render::render_document, validate_document, ApiError, Document};

/// jweld — JSON:API document CLI
///
/// Validate and inspect JSON:API documents.
#[derive(Parser)]
#[command(name = "jweld", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate a JSON:API document against the structural rules.
    ///
    /// Reads a JSON file containing a top-level document (single resource,
    /// collection, or errors). Exits 0 if the document is valid, 1 otherwise.
    ///
    /// Pass `-` as FILE to read from stdin.
    Validate {
        /// Path to a JSON file, or `-` for stdin.
        file: PathBuf,
    },

    /// Render a document as human-readable text.
    ///
    /// Prints the primary data, a summary of the included pool, or — for an
    /// error document — one line per error.
    ///
    /// Pass `-` as FILE to read from stdin.
    Render {
        /// Path to a JSON file, or `-` for stdin.
        file: PathBuf,
    },

    /// Create a JSON:API error document and print it as JSON.
    ///
    /// Fields left unset are omitted from the rendered error object. The
    /// output can be piped directly into `jweld validate` or redirected to
    /// a file.
    ///
    /// Examples:
    ///   jweld error --status 404 --title "Not Found"
    ///   jweld error --status 422 --title "Validation error" \
    ///     --detail "The email field is required." --pointer email
    Error {
        /// HTTP status code for the error (rendered as a string).
        #[arg(short = 's', long, value_name = "CODE")]
        status: Option<u16>,

        /// Short, human-readable summary.
        #[arg(short = 't', long, value_name = "TEXT")]
        title: Option<String>,

        /// Explanation specific to this occurrence.
        #[arg(short = 'd', long, value_name = "TEXT")]
        detail: Option<String>,

        /// Application-specific error code.
        #[arg(short = 'c', long, value_name = "CODE")]
        code: Option<String>,

        /// Field that caused the error, rendered as source.pointer.
        #[arg(long, value_name = "FIELD")]
        pointer: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Command::Validate { file } => {
            let json = read_input(&file);
            let doc = parse_document(&json);
            match validate_document(&doc) {
                Ok(()) => println!("valid"),
                Err(e) => {
                    eprintln!("error: {}", e);
                    process::exit(1);
                }
            }
        }

        Command::Render { file } => {
            let json = read_input(&file);
            let doc = parse_document(&json);
            print!("{}", render_document(&doc));
        }

        Command::Error {
            status,
            title,
            detail,
            code,
            pointer,
        } => {
            let mut error = ApiError::bare();
            if let Some(status) = status {
                error = error.status(status);
            }
            if let Some(title) = title {
                error = error.title(title);
            }
            if let Some(detail) = detail {
                error = error.detail(detail);
            }
            if let Some(code) = code {
                error = error.code(code);
            }
            if let Some(pointer) = pointer {
                error = error.pointer(pointer);
            }

            let doc = error_document([error]);
            // Validate before printing so the user gets a clear error rather
            // than silently producing an all-empty error object.
            if let Err(e) = validate_document(&doc) {
                fatal(&format!("document is invalid: {}", e));
            }

            println!("{}", serde_json::to_string_pretty(&doc).unwrap());
        }
    }
}

/// Read the full contents of a file, or stdin when the path is `"-"`.
fn read_input(path: &PathBuf) -> String {
    if path.to_str() == Some("-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .unwrap_or_else(|e| fatal(&format!("failed to read stdin: {}", e)));
        buf
    } else {
        fs::read_to_string(path).unwrap_or_else(|e| {
            fatal(&format!("failed to read {}: {}", path.display(), e))
        })
    }
}

/// Parse a JSON string as a top-level document. Exits with an error message
/// if the parse fails.
fn parse_document(json: &str) -> Document {
    match serde_json::from_str::<Document>(json) {
        Ok(doc) => doc,
        Err(e) => fatal(&format!("failed to parse input as a JSON:API document: {}", e)),
    }
}

/// Print an error message to stderr and exit with code 2.
fn fatal(msg: &str) -> ! {
    eprintln!("jweld: {}", msg);
    process::exit(2);
}

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use doclink::{Kind, commands, diagnostics, info};

/// Link documentation to the code elements it mentions
#[derive(Parser)]
#[command(name = "doclink")]
struct Cli {
    /// Command to run.
    #[command(subcommand)]
    command: Commands,
}

/// Subcommands of the `doclink` binary.
#[derive(Subcommand)]
enum Commands {
    /// Extract references from every document and print them as JSON lines
    Scan {
        /// Directory to scan; also where `.doclink.toml` is read from
        #[arg(long, default_value = ".")]
        root: PathBuf,
        /// Structural kind the documents describe, e.g. "class" or "method"
        #[arg(long, default_value = "unknown", value_parser = parse_kind)]
        context: Kind,
    },
    /// Print the notation of a code block, or of each paragraph of a message
    Classify {
        /// File holding the text to classify
        file: PathBuf,
        /// Classify blank-line separated paragraphs instead of the whole file
        #[arg(long)]
        paragraphs: bool,
    },
    /// Print the doclink reference document
    Info {
        /// Output as JSON instead of markdown
        #[arg(long)]
        json: bool,
    },
}

/// Parse a `--context` label with the library's error message.
fn parse_kind(label: &str) -> Result<Kind, String> {
    label.parse().map_err(|e: doclink::Error| e.to_string())
}

/// Log to stderr at `info` for this crate unless `RUST_LOG` says otherwise.
/// stdout carries the JSON lines.
#[allow(clippy::expect_used, reason = "directive is a literal")]
fn init_logging() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("doclink=info".parse().expect("valid tracing directive")),
        )
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    init_logging();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Scan { root, context } => commands::scan(&root, context),
        Commands::Classify { file, paragraphs } => commands::classify(&file, paragraphs),
        Commands::Info { json } => {
            info::run(&PathBuf::from("."), json);
            Ok(())
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            diagnostics::print_error(&e);
            ExitCode::FAILURE
        },
    }
}

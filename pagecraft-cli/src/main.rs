//! Pagecraft CLI - offline tools for the ebook platform

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "pagecraft")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a JSON book record to renderable content
    Resolve {
        /// JSON file holding the record
        input: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the book categories
    Categories {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the built-in catalog for a category
    Browse {
        /// Category name or browse title
        category: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Render a text file to PDF
    RenderPdf {
        /// Input text file
        input: String,

        /// Output file path
        #[arg(short, long)]
        output: String,

        /// Title for the first page (defaults to the file name)
        #[arg(short, long)]
        title: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "pagecraft_cli=debug,pagecraft_core=debug"
    } else {
        "pagecraft_cli=warn"
    };

    // Logs go to stderr so command output stays machine-readable
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Resolve { input, json } => commands::resolve(&input, json),

        Commands::Categories { json } => commands::categories(json),

        Commands::Browse { category, json } => commands::browse(&category, json).await,

        Commands::RenderPdf {
            input,
            output,
            title,
        } => commands::render_pdf(&input, &output, title.as_deref()),
    }
}

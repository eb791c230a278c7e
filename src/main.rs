//! paddleload CLI - Import customer billing CSVs into Paddle
//!
//! # Commands
//!
//! ```bash
//! paddleload serve                       # Start HTTP server (port 3000)
//! paddleload validate input.csv          # Preflight validation only
//! paddleload import input.csv --sandbox  # Run the full import
//! ```

use clap::{Parser, Subcommand};
use paddleload::import::{import_bytes, ImportOptions};
use paddleload::parser::parse_csv_file_auto;
use paddleload::validation::validate_rows_now;
use paddleload::ImportRow;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "paddleload")]
#[command(about = "Batch-import customer billing records from CSV into Paddle", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a CSV without calling the Paddle API
    Validate {
        /// Input CSV file
        input: PathBuf,
    },

    /// Run the full import: validate, then create customers and transactions
    Import {
        /// Input CSV file
        input: PathBuf,

        /// Paddle API key (falls back to PADDLE_API_KEY)
        #[arg(short, long)]
        api_key: Option<String>,

        /// Target the sandbox environment
        #[arg(short, long)]
        sandbox: bool,

        /// Write the JSON result to a file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Start HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Validate { input } => cmd_validate(&input),

        Commands::Import {
            input,
            api_key,
            sandbox,
            output,
        } => cmd_import(&input, api_key, sandbox, output.as_deref()).await,

        Commands::Serve { port } => cmd_serve(port).await,
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn load_rows(input: &Path) -> Result<Vec<ImportRow>, Box<dyn std::error::Error>> {
    eprintln!("📄 Parsing CSV: {}", input.display());
    let parsed = parse_csv_file_auto(input)?;
    eprintln!("   Encoding: {}", parsed.encoding);
    eprintln!("   Columns: {}", parsed.headers.join(", "));
    eprintln!("   Rows: {}", parsed.records.len());

    Ok(parsed.records.iter().map(ImportRow::from_record).collect())
}

fn cmd_validate(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let rows = load_rows(input)?;

    let errors = validate_rows_now(&rows);
    if errors.is_empty() {
        eprintln!("✅ All {} rows valid", rows.len());
        return Ok(());
    }

    eprintln!("❌ {} validation error(s):", errors.len());
    for error in &errors {
        println!("{error}");
    }
    std::process::exit(1);
}

async fn cmd_import(
    input: &Path,
    api_key: Option<String>,
    sandbox: bool,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let api_key = match api_key.or_else(|| std::env::var("PADDLE_API_KEY").ok()) {
        Some(key) => key,
        None => return Err("No API key: pass --api-key or set PADDLE_API_KEY".into()),
    };

    let bytes = std::fs::read(input)?;
    let options = ImportOptions::new(api_key, sandbox);
    let result = import_bytes(&bytes, &options).await?;

    eprintln!();
    if result.validation_errors.is_empty() {
        eprintln!("📊 Imported: {} succeeded, {} failed", result.successful, result.failed);
        eprintln!(
            "   Transactions: {} created, {} failed",
            result.successful_transactions.len(),
            result.failed_transactions.len()
        );
    } else {
        eprintln!(
            "❌ Validation failed with {} error(s); nothing was imported",
            result.validation_errors.len()
        );
    }

    let json = serde_json::to_string_pretty(&result)?;
    match output {
        Some(path) => {
            std::fs::write(path, &json)?;
            eprintln!("💾 Result written to: {}", path.display());
        }
        None => println!("{json}"),
    }

    Ok(())
}

async fn cmd_serve(port: u16) -> Result<(), Box<dyn std::error::Error>> {
    paddleload::server::start_server(port).await
}

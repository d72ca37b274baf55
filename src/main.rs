use anyhow::{Context, Result};
use clap::Parser;
use pdf_text_extractor::config::{find_config_file, load_config, Config, LogFormat};
use pdf_text_extractor::models::DEFAULT_LANGUAGE;
use pdf_text_extractor::{ExtractionRequest, Extractor, Variant};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// PDF Text Extractor - Extract text from PDF files and print the result as JSON
#[derive(Parser, Debug)]
#[command(name = "pdf-text-extractor")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Extract text from PDF files and print the result as JSON", long_about = None)]
struct Cli {
    /// Path to the PDF file
    pdf_path: Option<String>,

    /// Language code for OCR (e.g. eng, deu, chi_sim, deu+eng)
    #[arg(default_value = DEFAULT_LANGUAGE)]
    language: String,

    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress everything but errors on stderr
    #[arg(long, short)]
    quiet: bool,

    /// Configuration file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Which extraction cascade to run
    #[arg(long, value_enum, default_value_t = Variant::Standalone)]
    mode: Variant,

    /// Print compact JSON instead of pretty-printed JSON
    #[arg(long)]
    compact: bool,

    /// Show all environment variables
    #[arg(long)]
    env: bool,

    /// Write the default configuration to FILE and exit
    #[arg(long, value_name = "FILE")]
    init_config: Option<PathBuf>,
}

/// Print all available environment variables
fn print_env_vars() {
    println!("PDF Text Extractor - Environment Variables");
    println!();
    println!("Resolver:");
    println!("  PDF_TEXT_EXTRACTOR__RESOLVER__FALLBACK_DIRS       Comma-separated directories probed with the file name");
    println!("  PDF_TEXT_EXTRACTOR__RESOLVER__SEARCH_ROOTS        Comma-separated roots searched recursively");
    println!("  PDF_TEXT_EXTRACTOR__RESOLVER__MAX_SEARCH_DEPTH    Depth limit of the recursive search (default: 12)");
    println!();
    println!("Cascade:");
    println!("  PDF_TEXT_EXTRACTOR__CASCADE__OCR_MIN_CHARS            Multilingual stage runs below this (default: 100)");
    println!("  PDF_TEXT_EXTRACTOR__CASCADE__FALLBACK_MIN_CHARS       Embedded stage runs below this (default: 50)");
    println!("  PDF_TEXT_EXTRACTOR__CASCADE__BYTE_SCAN_MAX_FRAGMENTS  Fragments kept by the byte scan (default: 50)");
    println!();
    println!("OCR:");
    println!("  PDF_TEXT_EXTRACTOR__OCR__DPI             Rasterization resolution (default: 300)");
    println!("  PDF_TEXT_EXTRACTOR__OCR__PRIMARY_PSM     First-pass page segmentation mode (default: 6)");
    println!("  PDF_TEXT_EXTRACTOR__OCR__FALLBACK_PSM    Retry page segmentation mode (default: 3)");
    println!("  PDF_TEXT_EXTRACTOR__OCR__PDFTOPPM_BIN    Rasterizer executable (default: pdftoppm)");
    println!("  PDF_TEXT_EXTRACTOR__OCR__TESSERACT_BIN   Recognizer executable (default: tesseract)");
    println!();
    println!("Post-processing:");
    println!("  PDF_TEXT_EXTRACTOR__POSTPROCESS__FIX_DIGRAPHS  Rewrite standalone rn/vv tokens (default: false)");
    println!();
    println!("Logging:");
    println!("  PDF_TEXT_EXTRACTOR__LOGGING__LEVEL   Default log level (default: warn)");
    println!("  PDF_TEXT_EXTRACTOR__LOGGING__FORMAT  text or json (default: text)");
    println!("  RUST_LOG                             Overrides the log filter entirely");
    println!();
    println!("Example:");
    println!("  export PDF_TEXT_EXTRACTOR__OCR__TESSERACT_BIN=\"/opt/tesseract/bin/tesseract\"");
}

/// Print a setup failure in the result shape and exit with status 1
fn exit_with_setup_failure(message: &str) -> ! {
    println!(
        "{}",
        serde_json::json!({
            "success": false,
            "error": message,
            "text": "",
            "metadata": {},
        })
    );
    std::process::exit(1);
}

fn init_logging(cli: &Cli, config: &Config) {
    let level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => config.logging.level.as_str(),
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| format!("pdf_text_extractor={}", level)),
    );

    let (text_layer, json_layer) = match config.logging.format {
        LogFormat::Text => (Some(tracing_subscriber::fmt::layer().with_writer(std::io::stderr)), None),
        LogFormat::Json => (
            None,
            Some(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)),
        ),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(text_layer)
        .with(json_layer)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Show environment variables and exit if requested
    if cli.env {
        print_env_vars();
        return Ok(());
    }

    if let Some(path) = &cli.init_config {
        Config::default()
            .save(path)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        eprintln!("Wrote default configuration to {}", path.display());
        return Ok(());
    }

    // Load configuration from file if specified or found in default locations
    let config_path = cli.config.clone().or_else(find_config_file);
    let config = match load_config(config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            init_logging(&cli, &Config::default());
            tracing::error!("Failed to load configuration: {}", e);
            exit_with_setup_failure(&format!("Failed to load configuration: {}", e));
        }
    };

    init_logging(&cli, &config);
    if let Some(path) = &config_path {
        tracing::info!("Using config file: {}", path.display());
    }

    let Some(pdf_path) = cli.pdf_path.clone() else {
        exit_with_setup_failure("PDF file path is required as argument");
    };

    let extractor = Extractor::new(config, cli.mode);
    if let Err(e) = extractor.ensure_usable() {
        tracing::error!("{}", e);
        exit_with_setup_failure(&e.to_string());
    }

    let request = ExtractionRequest::new(pdf_path).language(cli.language.as_str());
    let result = extractor.extract(&request);

    if cli.compact {
        println!("{}", result.to_json());
    } else {
        println!("{}", result.to_json_pretty());
    }

    Ok(())
}

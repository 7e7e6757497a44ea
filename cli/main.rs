// Batch entry point: generate a populated form document from a spreadsheet
// without going through the web service.
use anyhow::{bail, Context, Result};
use arnform_server::config::load_config;
use arnform_server::populate::compose_document;
use arnform_server::records::read_records;
use chrono::Local;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "arnform-cli",
    about = "Generate ARN change request forms from an Excel extract"
)]
struct Cli {
    /// Input spreadsheet (.xlsx or .xls)
    #[arg(long, default_value = "Format for ARN change.xlsx")]
    excel: PathBuf,

    /// Template document; defaults to the configured template selection
    #[arg(long)]
    template: Option<PathBuf>,

    /// Directory the generated document is written to
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,
}

fn main() -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    let config = load_config();

    if !cli.excel.exists() {
        bail!("spreadsheet '{}' not found", cli.excel.display());
    }
    let template = cli
        .template
        .unwrap_or_else(|| PathBuf::from(config.templates.active_path()));
    if !template.exists() {
        bail!("template '{}' not found", template.display());
    }

    let records = read_records(&cli.excel, &config.defaults)
        .with_context(|| format!("reading {}", cli.excel.display()))?;
    println!("{} data row(s) found", records.len());

    let (document, pages) = compose_document(&template, &records)?;
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let filename = format!("Populated_ARN_Form_{pages}pages_{timestamp}.docx");
    let output_path = cli.output_dir.join(&filename);
    document
        .save(&output_path)
        .with_context(|| format!("writing {}", output_path.display()))?;

    println!(
        "Generated {pages} page(s) from {} record(s)",
        records.len()
    );
    println!("Output file: {}", output_path.display());
    Ok(())
}

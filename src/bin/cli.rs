use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use pubmed_affiliations::{
    ACADEMIC_KEYWORDS, AffiliationClassifier, COMPANY_KEYWORDS, ConsoleFormat, PubMed,
    SearchParam, export,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "get-papers-list",
    version,
    about = "Fetch PubMed research papers with pharmaceutical or biotech authors"
)]
struct Cli {
    /// Search query for PubMed
    query: String,
    /// Number of results to fetch
    #[arg(short = 'n', long = "num", default_value_t = 10)]
    num: u32,
    /// Filename to save results as CSV (prints to the console when omitted)
    #[arg(short = 'f', long = "file")]
    file: Option<PathBuf>,
    /// Print JSON lines instead of text when writing to the console
    #[arg(long)]
    json: bool,
    /// Stop at the first article that fails to load
    #[arg(long)]
    fail_fast: bool,
    /// Academic keyword; repeat to replace the built-in list
    #[arg(long = "academic-keyword", value_name = "KEYWORD")]
    academic_keywords: Vec<String>,
    /// Company keyword; repeat to replace the built-in list
    #[arg(long = "company-keyword", value_name = "KEYWORD")]
    company_keywords: Vec<String>,
    /// Print debug information during execution
    #[arg(short, long)]
    debug: bool,
}

impl Cli {
    fn classifier(&self) -> pubmed_affiliations::Result<AffiliationClassifier> {
        if self.academic_keywords.is_empty() && self.company_keywords.is_empty() {
            return Ok(AffiliationClassifier::default());
        }
        let academic: Vec<&str> = if self.academic_keywords.is_empty() {
            ACADEMIC_KEYWORDS.to_vec()
        } else {
            self.academic_keywords.iter().map(String::as_str).collect()
        };
        let company: Vec<&str> = if self.company_keywords.is_empty() {
            COMPANY_KEYWORDS.to_vec()
        } else {
            self.company_keywords.iter().map(String::as_str).collect()
        };
        AffiliationClassifier::new(academic, company)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let filter = if cli.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let param = SearchParam::builder()
        .term(&cli.query)
        .max_results(cli.num)
        .build()?;
    let client = PubMed::from_env()?.with_classifier(cli.classifier()?);

    tracing::info!(query = %param.term(), max_results = param.max_results(), "starting run");
    let report = client
        .pipeline()
        .fail_fast(cli.fail_fast)
        .run(&param)
        .await
        .inspect_err(|e| {
            tracing::error!("Error: {:?}", e);
        })?;

    if !report.is_complete() {
        eprintln!(
            "{} of {} articles could not be fetched:",
            report.failures.len(),
            report.ids.len()
        );
        for failure in &report.failures {
            eprintln!("  {}: {}", failure.id, failure.error);
        }
    }

    let format = if cli.json {
        ConsoleFormat::JsonLines
    } else {
        ConsoleFormat::Text
    };
    export(&report.records, cli.file.as_deref(), format)?;
    if let Some(path) = &cli.file {
        println!("Results saved to {}", path.display());
    }

    if report.is_complete() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

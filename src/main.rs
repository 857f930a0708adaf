use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use docensemble::export::{Exporter, JsonExporter, TextExporter};
use docensemble::pipeline::HealthStatus;
use docensemble::{DocumentImage, EnsembleConfig, EnsemblePipeline};

#[derive(Parser, Debug)]
#[command(name = "docensemble")]
#[command(version, about = "Document type classification from OCR text and image classifiers", long_about = None)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long, global = true, env = "DOCENSEMBLE_CONFIG")]
    config: Option<PathBuf>,

    /// Log progress at info level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Classify a single document image
    Classify {
        /// Input image path (png, jpg, jpeg, gif)
        input: PathBuf,

        /// Write <name>.json and <name>.txt reports into this directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the result as JSON instead of a text report
        #[arg(long)]
        json: bool,
    },

    /// Classify multiple document images
    Batch {
        /// Input image paths
        inputs: Vec<PathBuf>,

        /// Output directory for all reports
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Report which collaborators (OCR, models) are available
    Check,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "docensemble=info"
    } else {
        "docensemble=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match &cli.config {
        Some(path) => EnsembleConfig::from_file(path)
            .with_context(|| format!("failed to load config: {}", path.display()))?,
        None => EnsembleConfig::default(),
    };
    let pipeline = EnsemblePipeline::from_config(&config);

    match cli.command {
        Commands::Classify {
            input,
            output,
            json,
        } => classify_single(&pipeline, input, output, json),
        Commands::Batch { inputs, output } => classify_batch(&pipeline, inputs, output),
        Commands::Check => check(&pipeline),
    }
}

fn classify_single(
    pipeline: &EnsemblePipeline,
    input: PathBuf,
    output: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let image = DocumentImage::open(input.clone())?;
    let result = pipeline
        .classify(&image)
        .with_context(|| format!("failed to classify: {}", input.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", TextExporter::render(&result));
    }

    if let Some(output_dir) = output {
        let stem = image.stem();
        JsonExporter::new(output_dir.clone()).export(&stem, &result)?;
        TextExporter::new(output_dir.clone()).export(&stem, &result)?;
        eprintln!("[✓] Reports saved to: {}", output_dir.display());
    }

    Ok(())
}

fn classify_batch(
    pipeline: &EnsemblePipeline,
    inputs: Vec<PathBuf>,
    output: Option<PathBuf>,
) -> Result<()> {
    if inputs.is_empty() {
        anyhow::bail!("No input files specified");
    }

    let output_dir = output.unwrap_or_else(|| PathBuf::from("batch_output"));
    let json_exporter = JsonExporter::new(output_dir.clone());
    let text_exporter = TextExporter::new(output_dir.clone());

    println!("[*] Batch classifying {} file(s)", inputs.len());
    println!("[*] Output: {}\n", output_dir.display());

    let mut success = 0;
    let mut failed = 0;

    for (i, input) in inputs.iter().enumerate() {
        println!("[{}/{}] {}", i + 1, inputs.len(), input.display());

        let outcome = DocumentImage::open(input.clone()).and_then(|image| {
            let result = pipeline.classify(&image)?;
            let stem = image.stem();
            json_exporter.export(&stem, &result)?;
            text_exporter.export(&stem, &result)?;
            Ok(result)
        });

        match outcome {
            Ok(result) => {
                println!(
                    "  [✓] {} ({:.1}%, {})",
                    result.prediction,
                    result.confidence * 100.0,
                    result.mode.as_str()
                );
                success += 1;
            }
            Err(e) => {
                eprintln!("  [✗] Failed: {e:#}");
                failed += 1;
            }
        }
    }

    println!("\n[*] Summary: {} succeeded, {} failed", success, failed);

    if failed > 0 {
        anyhow::bail!("{} file(s) failed to classify", failed);
    }

    Ok(())
}

fn check(pipeline: &EnsemblePipeline) -> Result<()> {
    let health = pipeline.health();
    let mark = |ok: bool| if ok { "[✓]" } else { "[!]" };

    println!("{} Tesseract OCR", mark(health.ocr));
    println!("{} Text model", mark(health.text_model));
    println!("{} Image model", mark(health.image_model));
    println!(
        "Classes: {}",
        health.supported_classes.iter().collect::<Vec<_>>().join(", ")
    );

    match health.status {
        HealthStatus::Healthy => println!("Status: healthy"),
        HealthStatus::Partial => println!("Status: partial (missing collaborators are substituted)"),
        HealthStatus::Demo => println!("Status: demo (results are placeholders)"),
    }
    Ok(())
}

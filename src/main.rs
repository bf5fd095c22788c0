use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use plant_growth::{AnalyzerConfig, GrowthDataStore, GrowthRecord, PlantGrowthAnalyzer};
use tracing_subscriber::EnvFilter;

/// Measure plant growth from photographs
#[derive(Parser, Debug)]
#[command(name = "plant-growth")]
#[command(about = "Extract growth metrics from plant photographs", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze one or more images and store their records
    Analyze {
        /// Image files, in capture order
        #[arg(required = true)]
        images: Vec<PathBuf>,

        /// Capture timestamp (single image only; defaults to now)
        #[arg(short, long)]
        timestamp: Option<String>,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Analyze an image and draw the detected region
    Visualize {
        image: PathBuf,

        /// Where to save the annotated image
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Print stored records in timestamp order
    Show {
        /// Growth data document
        #[arg(short, long)]
        data: Option<PathBuf>,
    },
}

#[derive(clap::Args, Debug)]
struct CommonArgs {
    /// Growth data document
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Analyzer configuration (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl CommonArgs {
    fn load_config(&self) -> Result<AnalyzerConfig> {
        let mut config = match &self.config {
            Some(path) => AnalyzerConfig::from_json_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => AnalyzerConfig::default(),
        };
        if let Some(data) = &self.data {
            config.data_path = data.clone();
        }
        Ok(config)
    }
}

fn print_records(records: &[GrowthRecord]) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(records)?);
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match args.command {
        Command::Analyze {
            images,
            timestamp,
            common,
        } => {
            let config = common.load_config()?;
            let mut analyzer = PlantGrowthAnalyzer::new(config)?;

            let records = match (images.as_slice(), timestamp) {
                ([image], Some(timestamp)) => vec![
                    analyzer
                        .analyze(image, Some(&timestamp))
                        .with_context(|| format!("analyzing {}", image.display()))?,
                ],
                (_, Some(_)) => anyhow::bail!("--timestamp applies to a single image"),
                (images, None) => {
                    let records = analyzer.analyze_growth(images);
                    tracing::info!(
                        analyzed = records.len(),
                        failed = images.len() - records.len(),
                        "batch finished"
                    );
                    records
                }
            };
            print_records(&records)?;
        }
        Command::Visualize {
            image,
            output,
            common,
        } => {
            let config = common.load_config()?;
            let mut analyzer = PlantGrowthAnalyzer::new(config)?;
            let annotated = analyzer
                .visualize(&image, output.as_deref())
                .with_context(|| format!("visualizing {}", image.display()))?;
            if output.is_none() {
                tracing::info!(
                    width = annotated.width(),
                    height = annotated.height(),
                    "annotated image not saved, pass --output to keep it"
                );
            }
        }
        Command::Show { data } => {
            let path = data.unwrap_or_else(|| AnalyzerConfig::default().data_path);
            let store = GrowthDataStore::open(&path)?;
            let records: Vec<GrowthRecord> = store.records().cloned().collect();
            print_records(&records)?;
        }
    }

    Ok(())
}

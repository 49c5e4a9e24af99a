use anyhow::{bail, Context, Result};
use clap::{ArgGroup, Parser, ValueEnum};
use emg_symmetry::acquisition::csv;
use emg_symmetry::config::{AnalysisConfig, ConfigLoader, PolicyKind};
use emg_symmetry::insight::build_prompt;
use emg_symmetry::processing::{InclusionRule, SymmetryPipeline};
use emg_symmetry::simulation::{MuscleProfile, RecordingConfig, RecordingGenerator};
use emg_symmetry::SampleTable;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(author, version, about = "Bilateral EMG symmetry analysis")]
#[command(group(ArgGroup::new("source").required(true).args(["input", "simulate"])))]
struct Args {
    /// Extra TOML configuration, applied after the standard search path
    #[arg(long)]
    config: Option<PathBuf>,
    /// CSV recording with a Time_ms column and one column per channel
    #[arg(long)]
    input: Option<PathBuf>,
    /// Analyse a seeded simulated recording instead of a file
    #[arg(long, default_value_t = false)]
    simulate: bool,
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// Write the augmented table with envelope columns
    #[arg(long)]
    output: Option<PathBuf>,
    /// Write the feature mapping and detailed report as JSON
    #[arg(long)]
    features: Option<PathBuf>,
    #[arg(long, value_enum)]
    policy: Option<PolicyArg>,
    /// Dominance threshold in percent
    #[arg(long)]
    threshold: Option<f64>,
    /// Compare |asymmetry| with the threshold so left dominance is reported
    #[arg(long, default_value_t = false)]
    include_left: bool,
    /// Comma separated muscle names
    #[arg(long, value_delimiter = ',')]
    muscles: Option<Vec<String>>,
    #[arg(long)]
    start_ms: Option<u64>,
    #[arg(long)]
    end_ms: Option<u64>,
    /// Print the recommendation prompt built from the features
    #[arg(long, default_value_t = false)]
    prompt: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum PolicyArg {
    Magnitude,
    Dominance,
}

impl Args {
    fn apply_overrides(&self, config: &mut AnalysisConfig) {
        if let Some(policy) = self.policy {
            config.scoring.policy = match policy {
                PolicyArg::Magnitude => PolicyKind::Magnitude,
                PolicyArg::Dominance => PolicyKind::Dominance,
            };
        }
        if let Some(threshold) = self.threshold {
            config.scoring.threshold = threshold;
        }
        if self.include_left {
            config.scoring.inclusion = InclusionRule::Magnitude;
        }
        if let Some(muscles) = &self.muscles {
            config.muscles.names = muscles.iter().map(|m| m.trim().to_string()).collect();
        }
        if let Some(start_ms) = self.start_ms {
            config.movement.start_ms = start_ms;
        }
        if let Some(end_ms) = self.end_ms {
            config.movement.end_ms = end_ms;
        }
    }
}

/// Cycle through symmetric, right-dominant and left-dominant muscles
fn simulated_recording(config: &AnalysisConfig, seed: u64) -> Result<SampleTable> {
    const GAINS: [(f64, f64); 3] = [(1.0, 1.0), (1.0, 2.0), (2.0, 1.0)];

    let muscles = config
        .muscles
        .names
        .iter()
        .zip(GAINS.iter().cycle())
        .map(|(name, (left, right))| MuscleProfile::new(name, *left, *right))
        .collect();

    let mut recording = RecordingConfig::default().with_muscles(muscles).with_seed(seed).with_powerline(0.2);
    recording.sampling_hz = config.signal.sampling_hz;
    recording.burst.start_ms = config.movement.start_ms;
    recording.burst.end_ms = config.movement.end_ms;
    recording.duration_ms = config.movement.end_ms + config.movement.start_ms.max(1000);

    Ok(RecordingGenerator::new(recording)?.generate()?)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut loader = ConfigLoader::new();
    if let Some(path) = &args.config {
        if !path.exists() {
            bail!("config file not found at {}", path.display());
        }
        loader = loader.add_path(path);
    }
    let mut config = loader.load().context("loading configuration")?;
    args.apply_overrides(&mut config);
    config.validate().context("validating configuration")?;

    let table = match &args.input {
        Some(path) => csv::load_table(path).with_context(|| format!("reading {}", path.display()))?,
        None => simulated_recording(&config, args.seed)?,
    };
    info!(rows = table.len(), channels = table.columns().len(), "Recording loaded");

    let pipeline = SymmetryPipeline::new(&config)?;
    let output = pipeline.run(&table)?;

    println!("{}", output.mapping.to_json_pretty()?);

    if let Some(path) = &args.output {
        csv::save_table(path, &output.augmented)?;
        info!(path = %path.display(), "Augmented table written");
    }

    if let Some(path) = &args.features {
        let document = serde_json::json!({
            "features": &output.mapping,
            "report": &output.report,
        });
        std::fs::write(path, serde_json::to_string_pretty(&document)?)
            .with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), "Features written");
    }

    if args.prompt {
        println!();
        println!("{}", build_prompt(&output.mapping));
    }

    Ok(())
}

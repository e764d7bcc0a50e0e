use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use emota_core::{ExperienceContext, SignalInputs, UnityEngine, constants::LOG_CAPACITY};
use emota_store::{LogStore, load_braid_params};

#[derive(Parser)]
#[command(name = "emota", about = "EMOTA affective scoring pipeline CLI")]
struct Cli {
    /// Episodic log file (default: $EMOTA_MEMORY or ./emota_memory.json)
    #[arg(long, global = true)]
    memory: Option<PathBuf>,

    /// TOML config file with a [braid] parameter table
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Identity name for this session
    #[arg(long, global = true, default_value = "Prime")]
    identity: String,

    /// Enable verbose debug output
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one experience through the pipeline and print the record
    Process {
        /// Experience text
        content: String,

        #[arg(long, default_value_t = 0.0)]
        goal: f64,
        #[arg(long, default_value_t = 0.0)]
        threat: f64,
        #[arg(long, default_value_t = 0.0)]
        novelty: f64,
        #[arg(long, default_value_t = 0.0)]
        uncertainty: f64,
        #[arg(long, default_value_t = 0.0)]
        safety: f64,
        #[arg(long, default_value_t = 0.0)]
        gain: f64,

        #[arg(long)]
        temporal_flow: Option<f64>,
        #[arg(long)]
        embodied_presence: Option<f64>,
        #[arg(long)]
        volitional_agency: Option<f64>,
    },

    /// Show episodic log statistics
    Stats,

    /// Print the most recent episode records
    Recent {
        #[arg(short, default_value_t = 5)]
        n: usize,
    },
}

fn memory_path(cli: &Cli) -> PathBuf {
    cli.memory
        .clone()
        .or_else(|| std::env::var("EMOTA_MEMORY").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("emota_memory.json"))
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::Process {
            content,
            goal,
            threat,
            novelty,
            uncertainty,
            safety,
            gain,
            temporal_flow,
            embodied_presence,
            volitional_agency,
        } => cmd_process(
            &cli,
            content,
            &SignalInputs {
                goal_value: *goal,
                threat_level: *threat,
                novelty: *novelty,
                uncertainty: *uncertainty,
                safety_evidence: *safety,
                gain_evidence: *gain,
            },
            &ExperienceContext {
                temporal_flow: *temporal_flow,
                embodied_presence: *embodied_presence,
                volitional_agency: *volitional_agency,
            },
        ),
        Commands::Stats => cmd_stats(&cli),
        Commands::Recent { n } => cmd_recent(&cli, *n),
    }
}

fn cmd_process(
    cli: &Cli,
    content: &str,
    inputs: &SignalInputs,
    context: &ExperienceContext,
) -> Result<()> {
    let params = load_braid_params(cli.config.as_deref());
    let store = LogStore::new(memory_path(cli));
    let loaded = store.load(LOG_CAPACITY);

    let mut engine = UnityEngine::with_params(&cli.identity, params, loaded.capacity);
    engine.restore_episodes(loaded.episodes);

    let record = engine.process(content, inputs, context);

    // a failed write must not cost us the in-memory result
    let episodes: Vec<_> = engine.log().iter().cloned().collect();
    if let Err(e) = store.save(engine.log().capacity(), &episodes) {
        tracing::warn!("failed to persist episodic log: {e}");
    }

    let json = serde_json::to_string_pretty(&record).context("failed to serialize record")?;
    println!("{json}");
    Ok(())
}

fn cmd_stats(cli: &Cli) -> Result<()> {
    let store = LogStore::new(memory_path(cli));
    let loaded = store.load(LOG_CAPACITY);

    println!("memory:    {}", store.path().display());
    println!("capacity:  {}", loaded.capacity);
    println!("episodes:  {}", loaded.episodes.len());

    if let Some(last) = loaded.episodes.last() {
        println!("last:      {}", last.timestamp.to_rfc3339());
        let u = &last.unity_consciousness;
        println!(
            "unity:     level={:.3}, coherence={:.3}, continuity={:.3}",
            u.consciousness_level, u.integration_coherence, u.identity_continuity
        );
    }
    Ok(())
}

fn cmd_recent(cli: &Cli, n: usize) -> Result<()> {
    let store = LogStore::new(memory_path(cli));
    let loaded = store.load(LOG_CAPACITY);

    if loaded.episodes.is_empty() {
        println!("(no episodes recorded)");
        return Ok(());
    }

    let start = loaded.episodes.len().saturating_sub(n);
    for record in &loaded.episodes[start..] {
        let pattern = record
            .archetypal_resonance
            .dominant_pattern
            .map(|p| p.title())
            .unwrap_or("-");
        println!(
            "{}  {:<12} {:<24} level={:.3}  {}",
            record.timestamp.to_rfc3339(),
            record.motivational_state.policy.as_str(),
            pattern,
            record.unity_consciousness.consciousness_level,
            record.content,
        );
    }
    Ok(())
}

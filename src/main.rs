//! Keystroke Entropy CLI
//!
//! Driver glue around the accumulator core: collect typed input,
//! mix it into the pool, poll the entropy level with a prompt loop,
//! and emit hex random bytes once the threshold gate opens. The core
//! itself stays synchronous and callback-free; all orchestration
//! lives here.

use clap::Parser;
use keystroke_entropy::{
    analysis::OutputStatistics,
    config::CsprngConfig,
    csprng::{Csprng, CsprngError},
    event::{EventSource, ReaderSource, ScriptedSource, SourceError},
};
use std::path::PathBuf;
use tracing::{info, warn};

/// Accumulate entropy from typed input and emit random bytes.
#[derive(Debug, Parser)]
#[command(name = "keystroke-entropy", version)]
struct Args {
    /// Number of random bytes to emit once ready.
    #[arg(short = 'n', long, default_value_t = 32)]
    bytes: usize,

    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Replay a scripted demo instead of reading interactive input.
    /// NOT a source of entropy - only demonstrates the pipeline.
    #[arg(long)]
    demo: bool,

    /// Print output quality statistics after emission.
    #[arg(long)]
    stats: bool,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    info!("Keystroke Entropy v{}", keystroke_entropy::VERSION);

    let config = match &args.config {
        Some(path) => match CsprngConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load config: {}", e);
                std::process::exit(1);
            }
        },
        None => CsprngConfig::default(),
    };

    let mut rng = match Csprng::with_config(config) {
        Ok(rng) => rng,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let outcome = if args.demo {
        let mut source = ScriptedSource::from_text(
            "pack my box with five dozen liquor jugs 0123456789 etaoin shrdlu",
            85_000,
        );
        accumulate(&mut rng, &mut source, true)
    } else {
        println!("Type some characters and press enter to feed the entropy pool.");
        let mut source = ReaderSource::new(std::io::stdin().lock());
        accumulate(&mut rng, &mut source, false)
    };

    if let Err(e) = outcome {
        eprintln!("Event collection failed: {}", e);
        std::process::exit(1);
    }

    let output = match rng.get_random_bytes(args.bytes) {
        Ok(bytes) => bytes,
        Err(e @ CsprngError::InternalMixingFailure(_)) => {
            // Fatal by design: better no output than weak output.
            eprintln!("Internal mixing failure: {}", e);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Extraction failed: {}", e);
            std::process::exit(1);
        }
    };

    println!(
        "{}",
        output.iter().map(|b| format!("{:02x}", b)).collect::<String>()
    );

    if args.stats {
        let stats = OutputStatistics::analyze(&output);
        info!(
            bias = stats.bit_bias,
            variance = stats.variance,
            autocorrelation = stats.autocorrelation,
            "Output statistics"
        );
        if !stats.looks_reasonable() && output.len() >= 256 {
            warn!("Output statistics look degenerate");
        }
    }

    info!(entropy_bits = rng.entropy_count(), "Done");
}

/// Feeds events from `source` until the entropy gate opens.
///
/// This is the blocking-until-ready loop the core deliberately does
/// not provide: poll, prompt, retry.
fn accumulate<S: EventSource>(
    rng: &mut Csprng,
    source: &mut S,
    quiet: bool,
) -> Result<(), SourceError> {
    source.open()?;

    while !rng.is_ready() {
        if !quiet {
            println!(
                "Entropy: {}/{} bits. Type some more random chars:",
                rng.entropy_count(),
                rng.min_entropy()
            );
        }

        let event = match source.next_event() {
            Ok(event) => event,
            Err(SourceError::Exhausted) => {
                warn!(
                    entropy_bits = rng.entropy_count(),
                    "Event source exhausted before threshold"
                );
                return Err(SourceError::Exhausted);
            }
            Err(e) => return Err(e),
        };

        if let Err(e) = rng.mix_pool_bytes(&event) {
            // Oversized paste or similar; skip it and keep collecting.
            warn!(error = %e, "Event rejected");
        }
    }

    source.close();
    info!(entropy_bits = rng.entropy_count(), "Threshold reached");
    Ok(())
}

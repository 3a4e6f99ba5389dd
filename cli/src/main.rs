use anyhow::Context;
use cascade_core::{
    BoardGenerator, CascadeConfig, ChainDemoGenerator, Coord, DEFAULT_MAX_CHAINS, DEFAULT_SIZE,
    RngSource, ScoreRules, StableBoardGenerator, resolve,
};
use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use web_time::{SystemTime, UNIX_EPOCH};

/// Generate a board, resolve it and print every step.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Board edge length
    #[arg(short, long, default_value_t = DEFAULT_SIZE)]
    size: Coord,

    /// Chains to run before giving up
    #[arg(long, default_value_t = DEFAULT_MAX_CHAINS)]
    max_chains: u32,

    /// Seed for the candy source, defaults to the current time
    #[arg(long)]
    seed: Option<u64>,

    /// Start from the chain demo layout instead of a settled board
    #[arg(long)]
    demo: bool,

    /// Print the whole resolution as JSON
    #[arg(long)]
    json: bool,

    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,
}

fn clock_seed() -> anyhow::Result<u64> {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("system clock is set before the unix epoch")?;
    Ok(elapsed.as_nanos() as u64)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::new()
        .filter_level(cli.verbose.log_level_filter())
        .init();

    let seed = match cli.seed {
        Some(seed) => seed,
        None => clock_seed()?,
    };
    let config = CascadeConfig::new(cli.size, cli.max_chains);
    log::info!("seed {}, {:?}", seed, config);

    let mut source = RngSource::seeded(seed);
    let board = if cli.demo {
        ChainDemoGenerator.generate(config.size, &mut source)
    } else {
        StableBoardGenerator.generate(config.size, &mut source)
    }
    .context("could not generate the starting board")?;

    let resolution = resolve(&board, &config, &mut source);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&resolution)?);
        return Ok(());
    }

    for (index, step) in resolution.steps().iter().enumerate() {
        println!(
            "#{} [{}] chain {}: {}",
            index,
            step.phase(),
            step.chain(),
            step.description()
        );
        println!("{}\n", step.board());
    }

    println!(
        "{} chains, {} candies cleared, score {}{}",
        resolution.chains(),
        resolution.cleared_candies(),
        resolution.score(&ScoreRules::default()),
        if resolution.is_truncated() {
            " (truncated)"
        } else {
            ""
        }
    );
    Ok(())
}

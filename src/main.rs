use std::{
    fs::File,
    io::{BufWriter, Write},
    path::PathBuf,
    sync::Arc,
};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use moo2_planner::{
    data::{BuildingTable, GameData, TechTree},
    scenario::ScenarioLoader,
    search::SearchEngine,
    report::TurnSummary,
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Turn-minimising build planner for MOO2 colonies")]
struct Cli {
    /// Path to the scenario YAML file
    #[arg(long, default_value = "scenarios/three_terran.yaml")]
    scenario: PathBuf,

    /// Building table to use instead of the built-in one
    #[arg(long)]
    buildings: Option<PathBuf>,

    /// Rollouts per candidate action
    #[arg(long)]
    samples: Option<u32>,

    /// Rollout threads (0 = one per core, 1 = no thread pool)
    #[arg(long)]
    threads: Option<usize>,

    /// Override the scenario seed
    #[arg(long)]
    seed: Option<u64>,

    /// Turn bound for rollouts and the live game
    #[arg(long)]
    max_turns: Option<u32>,

    /// Write one JSON turn summary per line to this file
    #[arg(long)]
    summary_json: Option<PathBuf>,

    /// Only print the final turn summary
    #[arg(long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let scenario = ScenarioLoader::new(".").load(&cli.scenario)?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&scenario.logging.level))
        .with_context(|| format!("Invalid log level '{}'", scenario.logging.level))?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let buildings = match &cli.buildings {
        Some(path) => BuildingTable::load(path)?,
        None => BuildingTable::standard(),
    };
    let data = Arc::new(GameData::new(buildings, TechTree::standard()));
    let game = scenario.build_game(data)?;

    let mut settings = scenario.search;
    settings.samples = cli.samples.unwrap_or(settings.samples);
    settings.threads = cli.threads.unwrap_or(settings.threads);
    settings.seed = cli.seed.unwrap_or(settings.seed);
    settings.max_turns = cli.max_turns.unwrap_or(settings.max_turns);

    tracing::info!(
        scenario = %scenario.name,
        colonies = game.colonies().len(),
        samples = settings.samples,
        threads = settings.threads,
        seed = settings.seed,
        "starting planner"
    );

    let mut engine = SearchEngine::new(game, settings);
    let finished = engine.run_to_completion()?;
    let last = TurnSummary::capture(engine.game());

    if !cli.quiet {
        for summary in engine.history() {
            println!("{summary}");
        }
    }
    println!("{last}");

    if let Some(path) = &cli.summary_json {
        let file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        let mut out = BufWriter::new(file);
        for summary in engine.history().iter().chain(std::iter::once(&last)) {
            writeln!(out, "{}", summary.to_json_line()?)?;
        }
        out.flush()?;
    }

    if finished {
        println!(
            "Scenario '{}' finished in {} turns.",
            scenario.name,
            engine.game().turn_count()
        );
    } else {
        println!(
            "Scenario '{}' stopped unfinished after {} turns.",
            scenario.name,
            engine.game().turn_count()
        );
    }
    Ok(())
}

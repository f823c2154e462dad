use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use hashlife_engine::Config;
use hashlife_engine::Coord;
use hashlife_engine::NodeStore;
use hashlife_engine::RuleSet;
use hashlife_engine::Simulation;
use hashlife_engine::Viewport;
use hashlife_engine::macrocell;

#[derive(Parser)]
#[command(name = "hashlife", version, about = "Run a Golly macrocell pattern with HashLife")]
struct Args {
    /// Macrocell (.mc) pattern file
    pattern: PathBuf,

    /// Generations to advance before stepping
    #[arg(long, default_value_t = 0)]
    generations: u64,

    /// Each step advances 2^K generations
    #[arg(long, value_name = "K", default_value_t = 0)]
    base_step: u8,

    /// Number of steps to take
    #[arg(long, default_value_t = 0)]
    steps: u64,

    /// Deepest level the universe may grow to
    #[arg(long)]
    max_depth: Option<u8>,

    /// Rule overriding the file's `#R` line, e.g. B36/S23
    #[arg(long)]
    rule: Option<RuleSet>,

    /// Disable the successor cache
    #[arg(long)]
    no_memo: bool,

    /// Print the live cells in this window
    #[arg(
        long,
        num_args = 4,
        value_names = ["X", "Y", "W", "H"],
        allow_negative_numbers = true
    )]
    window: Option<Vec<Coord>>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = Config::default().with_memoize(!args.no_memo);
    if let Some(max_depth) = args.max_depth {
        config = config.with_max_depth(max_depth);
    }

    let bytes = std::fs::read(&args.pattern)
        .with_context(|| format!("Failed to read {}", args.pattern.display()))?;

    let mut store = NodeStore::with_config(config);
    let file = macrocell::read_macrocell(&bytes, &mut store)
        .with_context(|| format!("Failed to parse {}", args.pattern.display()))?;

    info!(nodes = file.nodes, rule = ?file.rule, "Loaded pattern");

    let mut sim = Simulation::from_root(store, file.root).context("Failed to load pattern")?;
    sim.set_generation(file.generation.unwrap_or(0));

    if let Some(rule) = args.rule.or(file.rule) {
        sim.set_rule(rule);
    }

    sim.advance(args.generations)
        .with_context(|| format!("Failed to advance {} generations", args.generations))?;

    for _ in 0..args.base_step {
        sim.increase_base_step();
    }

    for _ in 0..args.steps {
        sim.step().context("Failed to step")?;
    }

    println!(
        "generation {} level {} population {} nodes {}",
        sim.generation(),
        sim.level(),
        sim.population(),
        sim.store().len()
    );

    if let Some(&[x, y, width, height]) = args.window.as_deref() {
        let width = usize::try_from(width).context("Window width must not be negative")?;
        let height = usize::try_from(height).context("Window height must not be negative")?;

        let mut viewport = Viewport::new(x, y, width, height);
        sim.expand(&mut viewport);

        for (x, y) in viewport.live_cells() {
            println!("{x} {y}");
        }
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use clap::CommandFactory;
    use clap::Parser;

    use super::Args;
    use hashlife_engine::RuleSet;

    #[test]
    fn command_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn parse_flags() {
        let args = Args::try_parse_from([
            "hashlife",
            "glider.mc",
            "--generations",
            "100",
            "--rule",
            "B36/S23",
            "--no-memo",
            "--window",
            "-8",
            "-8",
            "16",
            "16",
        ])
        .unwrap();

        assert_eq!(args.pattern.to_str(), Some("glider.mc"));
        assert_eq!(args.generations, 100);
        assert_eq!(args.steps, 0);
        assert_eq!(args.rule, Some("B36/S23".parse::<RuleSet>().unwrap()));
        assert!(args.no_memo);
        assert_eq!(args.window, Some(vec![-8, -8, 16, 16]));
    }

    #[test]
    fn parse_errors() {
        assert!(Args::try_parse_from(["hashlife"]).is_err());
        assert!(Args::try_parse_from(["hashlife", "a.mc", "--window", "0", "0", "4"]).is_err());
        assert!(Args::try_parse_from(["hashlife", "a.mc", "--rule", "B0/S23"]).is_err());
        assert!(Args::try_parse_from(["hashlife", "a.mc", "--generations", "-1"]).is_err());
    }
}

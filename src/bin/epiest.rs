use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::info;

use epiest::io::age_csv::{load_age_counts_csv, AgeCount, DEFAULT_AGE_CSV};
use epiest::io::report::{
    write_age_group_table, write_age_year_csv, write_census_header, write_census_row, write_mortality_report,
};
use epiest::model::agents::{Population, SimConfig};
use epiest::model::histogram::{GROUPED_AGE_SPAN, SINGLE_YEAR_SLOTS, YEARS_PER_GROUP};
use epiest::{AgeHistogram, MortalityInputs, OutOfRange};

#[derive(Parser, Debug)]
#[command(name = "epiest")]
#[command(about = "Population age tables and back-of-envelope epidemic estimates")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Proportion of people per age group, as a C array literal
    AgeGroups {
        #[command(flatten)]
        source: AgeSource,

        /// Years per age group
        #[arg(long, default_value_t = YEARS_PER_GROUP)]
        width: u32,

        /// Ages covered, starting from 0
        #[arg(long, default_value_t = GROUPED_AGE_SPAN)]
        span: u32,
    },
    /// Raw head count per single year of age, as CSV
    AgeYears {
        #[command(flatten)]
        source: AgeSource,

        #[arg(long, default_value_t = SINGLE_YEAR_SLOTS)]
        slots: usize,
    },
    /// Deaths if everyone were infected, and crematorium backlog
    Mortality {
        /// JSON file overriding any of the default inputs
        #[arg(long)]
        params: Option<PathBuf>,
    },
    /// Agent population skeleton driven by the age-group table
    Simulate(SimulateArgs),
}

#[derive(Args, Debug)]
struct AgeSource {
    /// Population CSV with f_98_<age> / m_98_<age> columns
    #[arg(long, env = "EPIEST_AGE_CSV", default_value = DEFAULT_AGE_CSV)]
    input: PathBuf,

    /// Handling of ages past the last bucket
    #[arg(long, value_enum, default_value_t = OutOfRange::Error)]
    out_of_range: OutOfRange,
}

#[derive(Args, Debug)]
struct SimulateArgs {
    #[arg(short, long, default_value_t = 365)]
    cycles: u32,

    #[arg(short, long, default_value_t = 1024 * 1024)]
    population: u32,

    #[arg(short = 'R', long, default_value_t = 3.0)]
    reproduction: f64,

    /// Days a case stays infectious
    #[arg(short = 'I', long, default_value_t = 10)]
    infectious: u32,

    #[arg(short, long, default_value_t = 1)]
    starting_cases: u32,

    #[arg(short, long, default_value_t = 150)]
    neighbourhood: u32,

    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Derive age groups from this population CSV instead of the built-in UK table
    #[arg(long)]
    age_csv: Option<PathBuf>,

    /// Print the census after every cycle
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    epiest::logging::init_logging();

    let cli = Cli::parse();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::AgeGroups { source, width, span } => {
            let hist = build_histogram(&source, AgeHistogram::grouped(width, span)?)?;
            info!(total = hist.total(), groups = hist.counts().len(), "age groups built");
            write_age_group_table(&mut out, &hist)?;
        }
        Command::AgeYears { source, slots } => {
            let hist = build_histogram(&source, AgeHistogram::per_year(slots)?)?;
            info!(total = hist.total(), "single-year ages built");
            write_age_year_csv(&mut out, &hist)?;
        }
        Command::Mortality { params } => {
            let inputs = match params {
                Some(path) => load_mortality_inputs(&path)?,
                None => MortalityInputs::default(),
            };
            let est = inputs.estimate()?;
            info!(infection_death_rate = est.infection_death_rate, weeks = est.weeks_for_epidemic, "estimate");
            write_mortality_report(&mut out, &est)?;
        }
        Command::Simulate(args) => simulate(&mut out, args)?,
    }

    out.flush()?;
    Ok(())
}

fn build_histogram(source: &AgeSource, hist: AgeHistogram) -> anyhow::Result<AgeHistogram> {
    let counts = load_age_counts_csv(&source.input)?;
    info!(path = %source.input.display(), columns = counts.len(), "read population row");
    fill(hist.with_policy(source.out_of_range), &counts)
}

fn fill(mut hist: AgeHistogram, counts: &[AgeCount]) -> anyhow::Result<AgeHistogram> {
    hist.extend(counts.iter().map(|c| (c.code.age, c.count)))?;
    Ok(hist)
}

fn load_mortality_inputs(path: &Path) -> anyhow::Result<MortalityInputs> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read mortality params: {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Invalid mortality params: {}", path.display()))
}

fn simulate<W: Write>(out: &mut W, args: SimulateArgs) -> anyhow::Result<()> {
    let mut cfg = SimConfig {
        population_size: args.population,
        cycles: args.cycles,
        starting_cases: args.starting_cases,
        infectious_days: args.infectious,
        neighbourhood: args.neighbourhood,
        reproduction_rate: args.reproduction,
        seed: args.seed,
        ..SimConfig::default()
    };
    if let Some(path) = &args.age_csv {
        let counts = load_age_counts_csv(path)?;
        let hist = fill(AgeHistogram::grouped(YEARS_PER_GROUP, GROUPED_AGE_SPAN)?, &counts)?;
        cfg.age_group_proportions = hist.proportions()?.iter().map(|p| p.proportion).collect();
    }

    let mut pop = Population::new(&cfg)?;
    info!(
        people = pop.len(),
        daily_r = cfg.daily_reproduction_rate(),
        neighbourhood = cfg.neighbourhood,
        "simulating {} cycles",
        cfg.cycles
    );

    write_census_header(out)?;
    let last = pop.run(cfg.cycles, |remaining, census| {
        if args.verbose {
            write_census_row(out, remaining, census)?;
        }
        Ok(())
    })?;
    if !args.verbose {
        write_census_row(out, 0, &last)?;
    }
    Ok(())
}

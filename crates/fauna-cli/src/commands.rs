use std::sync::Arc;

use anyhow::{bail, Context};
use colored::Colorize;

use fauna_reports::{MatrixCell, ReportAggregator, ReportYears};
use fauna_store::{seed_demo_data, InMemoryStore, WildlifeStore};
use fauna_server::{FaunaServer, ServerConfig};

use crate::cli::{Cli, Command, GrowthArgs, OutputFormat, SeedArgs, ServeArgs, YearArgs};

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve(args) => serve(args),
        Command::Seed(args) => seed(args, &cli.format),
        Command::Matrix(args) => matrix(args, &cli.format),
        Command::Endangered(args) => endangered(args, &cli.format),
        Command::Growth(args) => growth(args, &cli.format),
    }
}

fn serve(args: ServeArgs) -> anyhow::Result<()> {
    let config = match args.config {
        Some(path) => ServerConfig::from_toml_file(&path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => ServerConfig::default(),
    };
    let server = FaunaServer::new(config)?;
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(server.serve())?;
    Ok(())
}

/// Seeded in-memory store plus an aggregator over it, for the offline
/// report commands.
fn demo_aggregator() -> anyhow::Result<(Arc<InMemoryStore>, ReportAggregator<InMemoryStore>)> {
    let years = ReportYears::default();
    let mut seed_years = years.options();
    seed_years.reverse();
    let store = Arc::new(InMemoryStore::new());
    seed_demo_data(store.as_ref(), &seed_years)?;
    let aggregator = ReportAggregator::new(Arc::clone(&store), years);
    Ok((store, aggregator))
}

fn seed(args: SeedArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let store = Arc::new(InMemoryStore::new());
    let summary = seed_demo_data(store.as_ref(), &args.years)?;
    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::json!({
                "municipalities": summary.municipalities,
                "settlements": summary.settlements,
                "species": summary.species,
                "initial_populations": summary.initial_populations,
                "changes": summary.changes,
            })
        ),
        OutputFormat::Text => {
            println!("{}", "demo dataset".bold());
            println!("  municipalities:      {}", summary.municipalities);
            println!("  settlements:         {}", summary.settlements);
            println!("  species:             {}", summary.species);
            println!("  initial populations: {}", summary.initial_populations);
            println!("  changes:             {}", summary.changes);
        }
    }
    Ok(())
}

fn matrix(args: YearArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let (_store, aggregator) = demo_aggregator()?;
    let year = args.year.unwrap_or_else(|| aggregator.years().last());
    let matrix = aggregator.settlement_matrix(year)?;

    if matches!(format, OutputFormat::Json) {
        println!("{}", serde_json::to_string_pretty(&matrix)?);
        return Ok(());
    }

    println!("{} {}", "settlement matrix for".bold(), matrix.year);
    let width = matrix
        .rows
        .iter()
        .map(|r| r.settlement_name.len())
        .max()
        .unwrap_or(0);
    print!("{:width$}", "");
    for header in &matrix.species_headers {
        print!("  {header:>15}");
    }
    println!();
    for row in &matrix.rows {
        print!("{:width$}", row.settlement_name);
        for cell in &row.cells {
            match cell {
                MatrixCell::Count(n) => print!("  {n:>15}"),
                MatrixCell::Unknown => print!("  {:>15}", "-".dimmed()),
            }
        }
        println!();
    }
    Ok(())
}

fn endangered(args: YearArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let (_store, aggregator) = demo_aggregator()?;
    let year = args.year.unwrap_or_else(|| aggregator.years().last());
    let report = aggregator.endangered_species(year)?;

    if matches!(format, OutputFormat::Json) {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{} {}", "endangered species in".bold(), report.year);
    if report.items.is_empty() {
        println!("  none");
        return Ok(());
    }
    for item in &report.items {
        println!(
            "  {}  {} -> {}",
            item.species_name.red(),
            item.initial_total,
            item.current_total
        );
    }
    Ok(())
}

fn growth(args: GrowthArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let (store, aggregator) = demo_aggregator()?;
    let year = args.year.unwrap_or_else(|| aggregator.years().last());

    let settlement = store
        .settlements()?
        .into_iter()
        .find(|s| s.name == args.settlement)
        .map(|s| s.id);
    let Some(settlement) = settlement else {
        bail!("unknown settlement: {}", args.settlement);
    };
    let species = store
        .species()?
        .into_iter()
        .find(|s| s.name == args.species)
        .map(|s| s.id);
    let Some(species) = species else {
        bail!("unknown species: {}", args.species);
    };

    let report = aggregator.growth(year, Some(settlement), Some(species))?;

    if matches!(format, OutputFormat::Json) {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "{} {} / {} in {}",
        "growth for".bold(),
        args.settlement,
        args.species,
        report.year
    );
    if let Some(figures) = report.figures {
        println!("  previous: {}", figures.previous_count);
        println!("  current:  {}", figures.current_count);
        match figures.percent_change {
            Some(percent) if percent < 0.0 => {
                println!("  change:   {}", format!("{percent:.1}%").red())
            }
            Some(percent) => println!("  change:   {}", format!("{percent:+.1}%").green()),
            None => println!("  change:   n/a (zero baseline)"),
        }
    }
    Ok(())
}

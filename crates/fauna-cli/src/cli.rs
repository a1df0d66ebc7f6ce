use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "fauna",
    about = "Municipal wildlife population tracker",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve(ServeArgs),
    /// Seed the demo dataset and show what it contains
    Seed(SeedArgs),
    /// Print the settlement×species matrix for a year
    Matrix(YearArgs),
    /// Print the endangered species list for a year
    Endangered(YearArgs),
    /// Print year-over-year growth for one settlement and species
    Growth(GrowthArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// Path to a TOML configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct SeedArgs {
    /// Years to generate demo deltas for (ascending)
    #[arg(long, num_args = 1.., default_values_t = [2023, 2024])]
    pub years: Vec<i32>,
}

#[derive(Args)]
pub struct YearArgs {
    #[arg(long)]
    pub year: Option<i32>,
}

#[derive(Args)]
pub struct GrowthArgs {
    #[arg(long)]
    pub year: Option<i32>,
    /// Settlement name from the demo dataset
    #[arg(long)]
    pub settlement: String,
    /// Species name from the demo dataset
    #[arg(long)]
    pub species: String,
}

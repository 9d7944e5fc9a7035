//! sonar-affiliations command-line tool
//!
//! Resolves free-text affiliations against the reference table and enriches
//! contribution lists from JSON.

use std::io::{self, Read};
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use sonar_affiliations::{
    enrich_contributions, partial_ratio, AffiliationResolver, Contribution, MatchStrategy,
    ResolverConfig,
};

#[derive(Parser, Debug)]
#[command(name = "sonar-affiliations")]
#[command(about = "Resolve free-text affiliations to controlled affiliation names")]
#[command(version)]
struct Cli {
    /// Configuration file (TOML, or JSON with a .json extension)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Reference table, overriding the configuration
    #[arg(long, global = true, env = "SONAR_AFFILIATIONS_TABLE")]
    table: Option<PathBuf>,

    /// Scores must be strictly above this to match
    #[arg(long, global = true)]
    threshold: Option<u8>,

    #[arg(long, global = true, value_enum)]
    strategy: Option<StrategyArg>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the controlled affiliations of a free-text affiliation
    Resolve {
        affiliation: String,
        /// Also print the member and score behind each match
        #[arg(long)]
        explain: bool,
        #[arg(long)]
        json: bool,
    },
    /// Print the number of groups in the reference table
    Table {
        /// Print every group, one per line
        #[arg(long)]
        list: bool,
    },
    /// Enrich a JSON array of contributions (file or stdin) and print it
    Enrich { file: Option<PathBuf> },
    /// Print the partial ratio of two strings
    Score { first: String, second: String },
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum StrategyArg {
    PartialRatio,
    Containment,
}

impl From<StrategyArg> for MatchStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::PartialRatio => MatchStrategy::PartialRatio,
            StrategyArg::Containment => MatchStrategy::Containment,
        }
    }
}

impl Cli {
    fn resolver_config(&self) -> Result<ResolverConfig, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => ResolverConfig::from_file(path)?,
            None => ResolverConfig::default(),
        };

        if let Some(table) = &self.table {
            config = config.with_table_path(table);
        }
        if let Some(threshold) = self.threshold {
            config = config.with_threshold(threshold);
        }
        if let Some(strategy) = self.strategy {
            config = config.with_strategy(strategy.into());
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let resolver = AffiliationResolver::new(cli.resolver_config()?);

    match cli.command {
        Command::Resolve {
            affiliation,
            explain,
            json,
        } => {
            let matches = resolver.resolve_matches(&affiliation)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&matches)?);
            } else {
                for found in matches {
                    if explain {
                        println!("{}\t{}\t{}", found.canonical, found.member, found.score);
                    } else {
                        println!("{}", found.canonical);
                    }
                }
            }
        }
        Command::Table { list } => {
            let table = resolver.load_table()?;
            if list {
                for group in table {
                    println!("{}", group.members().join("\t"));
                }
            } else {
                println!("{}", table.len());
            }
        }
        Command::Enrich { file } => {
            let input = match file {
                Some(path) => std::fs::read_to_string(path)?,
                None => {
                    let mut buffer = String::new();
                    io::stdin().read_to_string(&mut buffer)?;
                    buffer
                }
            };

            let mut contributions: Vec<Contribution> = serde_json::from_str(&input)?;
            let enriched = enrich_contributions(&resolver, &mut contributions);
            tracing::info!(enriched, total = contributions.len(), "Enriched contributions");
            println!("{}", serde_json::to_string_pretty(&contributions)?);
        }
        Command::Score { first, second } => {
            println!("{}", partial_ratio(&first, &second));
        }
    }

    Ok(())
}

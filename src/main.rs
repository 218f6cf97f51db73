mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use chainer::config::ChainerConfig;

#[derive(Parser)]
#[command(name = "chainer", version, about = "Forward-chaining rule classifier")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP API server
    Serve,
    /// Classify a `+`-joined token string, e.g. `1+9+12`
    Infer {
        tokens: String,
        /// Print working memory before and after every pass
        #[arg(long)]
        trace: bool,
        /// Override the configured pass limit
        #[arg(long)]
        max_passes: Option<usize>,
    },
    /// Manage rules
    Rule {
        #[command(subcommand)]
        action: RuleAction,
    },
    /// Manage knowledge entries
    Knowledge {
        #[command(subcommand)]
        action: KnowledgeAction,
    },
    /// Check database health
    Doctor,
}

#[derive(Subcommand)]
enum RuleAction {
    /// Add a rule, e.g. `chainer rule add mammal "hair=mammal" --position 1`
    Add {
        name: String,
        definition: String,
        #[arg(long, default_value_t = 0)]
        position: i64,
        /// Firing this rule ends inference
        #[arg(long)]
        terminal: bool,
    },
    /// List rules in evaluation order
    List {
        #[arg(long)]
        name: Option<String>,
    },
    /// Delete a rule by code
    Remove { code: i64 },
}

#[derive(Subcommand)]
enum KnowledgeAction {
    /// Add a knowledge entry
    Add {
        name: String,
        #[arg(long, default_value_t = 0)]
        classification: i64,
    },
    /// List knowledge entries
    List {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        classification: Option<i64>,
    },
    /// Delete a knowledge entry by code
    Remove { code: i64 },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = ChainerConfig::load()?;

    // Log to stderr so stdout stays clean for command output.
    let filter = EnvFilter::try_new(&config.server.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Serve => chainer::server::serve(config).await?,
        Command::Infer {
            tokens,
            trace,
            max_passes,
        } => cli::infer::infer(&config, &tokens, trace, max_passes)?,
        Command::Rule { action } => match action {
            RuleAction::Add {
                name,
                definition,
                position,
                terminal,
            } => cli::rule::add(&config, &name, &definition, position, terminal)?,
            RuleAction::List { name } => cli::rule::list(&config, name)?,
            RuleAction::Remove { code } => cli::rule::remove(&config, code)?,
        },
        Command::Knowledge { action } => match action {
            KnowledgeAction::Add {
                name,
                classification,
            } => cli::knowledge::add(&config, &name, classification)?,
            KnowledgeAction::List {
                name,
                classification,
            } => cli::knowledge::list(&config, name, classification)?,
            KnowledgeAction::Remove { code } => cli::knowledge::remove(&config, code)?,
        },
        Command::Doctor => cli::doctor::doctor(&config)?,
    }

    Ok(())
}

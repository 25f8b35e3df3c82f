use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::info;

use nomen::config::{load_graph, load_settings};
use nomen::{ResolvedName, Session};
use nomen_core::OutputGrammar;

#[derive(Parser)]
#[command(name = "nomen")]
#[command(about = "Resolve runtime and declaration type names from a type graph", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Grammar {
    Runtime,
    Declaration,
}

impl From<Grammar> for OutputGrammar {
    fn from(grammar: Grammar) -> Self {
        match grammar {
            Grammar::Runtime => OutputGrammar::Runtime,
            Grammar::Declaration => OutputGrammar::Declaration,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the names of registered types and the edges they record
    Resolve {
        /// Type graph file (JSON format)
        #[arg(short, long)]
        graph: PathBuf,

        /// Emitter settings file (TOML format)
        #[arg(short, long, env = "NOMEN_SETTINGS")]
        settings: Option<PathBuf>,

        /// Key of the type being emitted when the names are requested
        #[arg(short, long)]
        from: Option<String>,

        /// Override the grammar from the settings file
        #[arg(long, value_enum)]
        grammar: Option<Grammar>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,

        /// Keys to resolve (defaults to every registered type)
        keys: Vec<String>,
    },

    /// Print modules in the order they must be emitted
    Order {
        /// Type graph file (JSON format)
        #[arg(short, long)]
        graph: PathBuf,

        /// Emitter settings file (TOML format)
        #[arg(short, long, env = "NOMEN_SETTINGS")]
        settings: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = if cli.debug {
        tracing::Level::TRACE
    } else if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(cli.debug) // Show target module in debug mode
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Resolve {
            graph,
            settings,
            from,
            grammar,
            json,
            keys,
        } => handle_resolve(graph, settings, from, grammar, json, keys),
        Commands::Order { graph, settings } => handle_order(graph, settings),
    }
}

fn handle_resolve(
    graph: PathBuf,
    settings: Option<PathBuf>,
    from: Option<String>,
    grammar: Option<Grammar>,
    json: bool,
    keys: Vec<String>,
) -> Result<()> {
    let mut settings = load_settings(settings.as_deref())?;
    if let Some(grammar) = grammar {
        settings.grammar = grammar.into();
    }
    let mut session = Session::new(load_graph(&graph)?, settings)?;

    let keys = if keys.is_empty() { session.keys() } else { keys };
    info!("Resolving {} types", keys.len());

    let mut resolved = Vec::with_capacity(keys.len());
    for key in &keys {
        resolved.push(session.resolve(key, from.as_deref())?);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&resolved)?);
    } else {
        for name in &resolved {
            print_resolved(name);
        }
    }
    Ok(())
}

fn print_resolved(resolved: &ResolvedName) {
    println!("{} => {}", resolved.key, resolved.name);
    if !resolved.dependencies.is_empty() {
        println!("  modules: {}", resolved.dependencies.join(", "));
    }
    if !resolved.file_references.is_empty() {
        println!("  files: {}", resolved.file_references.join(", "));
    }
}

fn handle_order(graph: PathBuf, settings: Option<PathBuf>) -> Result<()> {
    let settings = load_settings(settings.as_deref())?;
    let mut session = Session::new(load_graph(&graph)?, settings)?;

    for module in session.module_order()? {
        println!("{}", module);
    }
    Ok(())
}

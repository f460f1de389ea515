use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use frkcli::ArgRegistry;
use frkcli_schema::CommandSchema;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing_subscriber::{EnvFilter, fmt};

/// Exit status for tokens that do not match the schema.
const EXIT_USAGE: i32 = 2;

#[derive(Parser)]
#[command(name = "frkcli")]
#[command(version, about = "Render, check and exercise argument schemas", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the help text a schema renders to
    Render(RenderArgs),

    /// Parse tokens against a schema and print the result as JSON
    Parse(ParseArgs),

    /// Check a schema's argument configuration
    Check(CheckArgs),
}

#[derive(Parser)]
struct RenderArgs {
    /// Path to the JSON argument schema
    #[arg(value_name = "SCHEMA")]
    schema: PathBuf,

    /// Indentation width for description and argument rows
    #[arg(short, long, default_value_t = frkcli::DEFAULT_INDENT)]
    indent: usize,
}

#[derive(Parser)]
struct ParseArgs {
    /// Path to the JSON argument schema
    #[arg(value_name = "SCHEMA")]
    schema: PathBuf,

    /// Tokens to parse, given after `--`
    #[arg(last = true, value_name = "TOKENS")]
    tokens: Vec<String>,
}

#[derive(Parser)]
struct CheckArgs {
    /// Path to the JSON argument schema
    #[arg(value_name = "SCHEMA")]
    schema: PathBuf,

    /// Print the normalized schema as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Render(args) => render(args),
        Commands::Parse(args) => parse(args),
        Commands::Check(args) => check(args),
    }
}

fn load_registry(path: &Path) -> Result<ArgRegistry> {
    let bytes =
        fs::read(path).with_context(|| format!("failed to read schema: {}", path.display()))?;
    let schema = CommandSchema::from_json_slice(&bytes)
        .with_context(|| format!("failed to load schema: {}", path.display()))?;
    schema
        .build_registry()
        .with_context(|| format!("failed to build registry from {}", path.display()))
}

fn render(args: RenderArgs) -> Result<()> {
    tracing::debug!("executing render command");
    let registry = load_registry(&args.schema)?;
    print!("{}", registry.render_help_with_indent(args.indent));
    Ok(())
}

fn parse(args: ParseArgs) -> Result<()> {
    tracing::debug!(tokens = args.tokens.len(), "executing parse command");
    let registry = load_registry(&args.schema)?;

    // A help trigger prints help and exits 0 from inside the parser.
    let matches = match registry.parse_or_exit(&args.tokens) {
        Ok(m) => m,
        Err(err) => {
            eprintln!("error: {err}");
            eprintln!();
            eprint!("{}", registry.render_help());
            std::process::exit(EXIT_USAGE);
        }
    };

    let report = serde_json::json!({
        "values": matches.values(),
        "flags": matches.flags(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn check(args: CheckArgs) -> Result<()> {
    tracing::debug!("executing check command");
    let registry = load_registry(&args.schema)?;

    if args.json {
        let schema = CommandSchema::from_registry(&registry);
        println!("{}", schema.to_json_pretty()?);
        return Ok(());
    }

    let total = registry.arguments().count();
    let positionals = registry.positionals().count();
    let flags = registry.flags().count();
    let options = registry.options().count();
    eprintln!(
        "OK: {} ({total} arguments: {positionals} positional, {flags} flags, {options} options)",
        args.schema.display()
    );
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

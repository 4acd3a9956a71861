//! sqlweave — the sqlweave CLI
//!
//! Render a SQL template for a target dialect.
//!
//! # Usage
//!
//! ```bash
//! # Render a template for postgres
//! sqlweave 'SELECT {{ column("email") }} FROM {{ relation("public", "users") }}' --dialect postgres
//!
//! # Render a template file with a JSON context
//! sqlweave --file query.sqlw --context ctx.json --dialect mysql
//!
//! # Inspect the parsed structure
//! sqlweave explain '{% set c = column("id") %}SELECT {{ c }}'
//! ```

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use colored::*;
use sqlweave::prelude::*;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sqlweave")]
#[command(version)]
#[command(about = "Dialect-aware SQL templating", long_about = None)]
#[command(after_help = "EXAMPLES:
    sqlweave 'SELECT {{ column(\"email\") }} FROM {{ relation(\"public\", \"users\") }}' --dialect postgres
    sqlweave --file query.sqlw --context ctx.json --dialect snowflake
    sqlweave explain '{{ adapter.dispatch(\"date_add\")(\"day\", -7, \"NOW()\") }}'")]
struct Cli {
    /// The template to render
    template: Option<String>,

    /// Read the template from a file instead
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Target dialect (falls back to sqlweave.toml, then postgres)
    #[arg(short, long, env = "SQLWEAVE_DIALECT")]
    dialect: Option<String>,

    /// JSON file with context bindings (resources, aliases)
    #[arg(short, long)]
    context: Option<PathBuf>,

    /// Write the rendered SQL to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a template and show its node structure
    Explain {
        /// The template to explain
        template: String,
    },
    /// Show the shipped dialect reference
    Dialects,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Some(Commands::Explain { template }) => explain_template(template),
        Some(Commands::Dialects) => show_dialects(),
        None => {
            let Some(template) = load_template(&cli)? else {
                println!("{}", "sqlweave — Dialect-aware SQL templating".cyan().bold());
                println!();
                println!("Usage: sqlweave <TEMPLATE> [OPTIONS]");
                println!();
                println!("Try: sqlweave --help");
                return Ok(());
            };
            render_template(&template, &cli)?;
        }
    }

    Ok(())
}

fn load_template(cli: &Cli) -> anyhow::Result<Option<String>> {
    if let Some(path) = &cli.file {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read template file {}", path.display()))?;
        return Ok(Some(text));
    }
    Ok(cli.template.clone())
}

fn render_template(template: &str, cli: &Cli) -> anyhow::Result<()> {
    let dialect = Dialect::new(resolve_dialect(cli));

    if cli.verbose {
        println!("{} {}", "Template:".dimmed(), template.yellow());
        println!("{} {}", "Dialect:".dimmed(), dialect.name.cyan());
    }

    let ctx = match &cli.context {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read context file {}", path.display()))?;
            Context::from_json_str(&json)?
        }
        None => Context::new(),
    };

    let weaver = Weaver::new();
    let sql = weaver.render_with_context(template, &dialect, ctx)?;

    match &cli.output {
        Some(path) => {
            std::fs::write(path, &sql)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("{} Wrote SQL to {}", "✓".green(), path.display().to_string().cyan());
        }
        None => {
            println!("{}", "Rendered SQL:".green().bold());
            println!("{}", sql.white());
        }
    }

    Ok(())
}

/// Dialect resolution: flag (or env) first, then `sqlweave.toml` in the
/// working directory, then the user config dir, then postgres.
fn resolve_dialect(cli: &Cli) -> String {
    if let Some(name) = &cli.dialect {
        return name.clone();
    }
    if let Some(name) = dialect_from_config() {
        return name;
    }
    "postgres".to_string()
}

fn dialect_from_config() -> Option<String> {
    let mut candidates = vec![PathBuf::from("sqlweave.toml")];
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join("sqlweave").join("sqlweave.toml"));
    }

    for path in candidates {
        if !path.exists() {
            continue;
        }
        let Ok(content) = std::fs::read_to_string(&path) else {
            continue;
        };
        let Ok(config) = toml::from_str::<toml::Value>(&content) else {
            continue;
        };
        if let Some(name) = config
            .get("render")
            .and_then(|r| r.get("dialect"))
            .and_then(|d| d.as_str())
        {
            return Some(name.to_string());
        }
    }
    None
}

fn explain_template(template: &str) {
    println!("{}", "sqlweave — Template Explanation".cyan().bold());
    println!();
    println!("{} {}", "Template:".dimmed(), template.yellow());
    println!();

    match parse(template) {
        Ok(nodes) => {
            println!("{}", "Parsed Nodes:".green().bold());
            for (i, node) in nodes.iter().enumerate() {
                println!("  {} {}", format!("{}.", i + 1).dimmed(), node.to_string().white());
            }
        }
        Err(e) => {
            eprintln!("{} {}", "Parse Error:".red().bold(), e);
        }
    }
}

fn show_dialects() {
    println!("{}", "sqlweave — Dialect Reference".cyan().bold());
    println!();

    let dialects = ["postgres", "mysql", "mssql", "snowflake"];

    println!(
        "{:12} {:12} {:14} {:22} {}",
        "Dialect".white().bold(),
        "Quoting".white().bold(),
        "Boolean".white().bold(),
        "Row limit".white().bold(),
        "Now".white().bold()
    );
    println!("{}", "─".repeat(76).dimmed());

    let weaver = Weaver::new();
    for name in dialects {
        let dialect = Dialect::new(name);
        let quoted = dialect.quote("x");
        let bool_lit = weaver
            .render("{{ bool_literal(true) }}", &dialect)
            .unwrap_or_default();
        let limit = weaver
            .render("{{ limit_clause(10) }}", &dialect)
            .unwrap_or_default();
        let now = weaver
            .render("{{ current_timestamp() }}", &dialect)
            .unwrap_or_default();
        println!(
            "{:12} {:12} {:14} {:22} {}",
            name.cyan().bold(),
            quoted.yellow(),
            bool_lit.white(),
            limit.white(),
            now.dimmed()
        );
    }

    println!();
    println!(
        "{}",
        "Unrecognized dialect names quote with double quotes.".dimmed()
    );
}

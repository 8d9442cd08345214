use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use relnote::convert::{self, DiagramMode};
use relnote::ddl::parse_ddl;
use relnote::describe::{self, DescribeOptions, DescriptionFormat};
use relnote::translate;
use relnote::validate::{Validation, validate_notation};

#[derive(Parser)]
#[command(name = "relnote")]
#[command(version)]
#[command(about = "Convert schema descriptions to ER notation and translate SQL / relational algebra", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a schema description into erDiagram notation
    Notation {
        /// Description file ("-" or omitted reads stdin)
        file: Option<PathBuf>,

        /// Description dialect: er or relational
        #[arg(short, long, default_value = "er")]
        mode: String,

        /// Refuse descriptions longer than this many lines
        #[arg(long)]
        max_lines: Option<usize>,
    },

    /// Describe the tables of a SQL DDL script
    Describe {
        /// DDL file ("-" or omitted reads stdin)
        file: Option<PathBuf>,

        /// Output format: mermaid, text or relational
        #[arg(short, long, default_value = "mermaid")]
        format: String,

        /// Leave out column lists
        #[arg(long)]
        no_attributes: bool,

        /// Leave out relationships
        #[arg(long)]
        no_cardinalities: bool,
    },

    /// Translate a SQL query into relational algebra
    SqlToAlgebra {
        query: String,
    },

    /// Translate a relational algebra expression into SQL
    AlgebraToSql {
        expression: String,
    },

    /// Check a notation document, printing it corrected if needed
    Validate {
        /// Notation file ("-" or omitted reads stdin)
        file: Option<PathBuf>,
    },
}

fn main() {
    env_logger::init_from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, "warn"),
    );

    if let Err(e) = run(Cli::parse()) {
        eprintln!("ERROR: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Notation {
            file,
            mode,
            max_lines,
        } => {
            let Some(mode) = DiagramMode::from_str(&mode) else {
                bail!("invalid mode: {mode} (expected er or relational)");
            };
            let options = convert::ConvertOptions {
                max_lines,
                ..convert::ConvertOptions::default()
            };
            let description = read_input(file.as_deref())?;
            let notation = convert::try_convert(&description, mode, &options)
                .context("failed to convert description")?;
            print!("{notation}");
        }
        Commands::Describe {
            file,
            format,
            no_attributes,
            no_cardinalities,
        } => {
            let Some(format) = DescriptionFormat::from_str(&format) else {
                bail!("invalid format: {format} (expected mermaid, text or relational)");
            };
            let ddl = read_input(file.as_deref())?;
            let catalog = parse_ddl(&ddl).context("failed to parse DDL")?;
            if catalog.tables.is_empty() {
                log::warn!("no CREATE TABLE statements found");
            }
            let options = DescribeOptions {
                show_attributes: !no_attributes,
                show_cardinalities: !no_cardinalities,
            };
            println!("{}", describe::describe(&catalog, format, options));
        }
        Commands::SqlToAlgebra { query } => println!("{}", translate::sql_to_algebra(&query)),
        Commands::AlgebraToSql { expression } => {
            println!("{}", translate::algebra_to_sql(&expression))
        }
        Commands::Validate { file } => {
            let code = read_input(file.as_deref())?;
            let validation = validate_notation(&code).context("failed to validate notation")?;
            if !validation.is_usable() {
                bail!("{}", validation.message());
            }
            eprintln!("{}", validation.message());
            match validation {
                Validation::Corrected(corrected) => print!("{corrected}"),
                _ => print!("{code}"),
            }
        }
    }
    Ok(())
}

fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            Ok(buf)
        }
    }
}

//! CB-008: CLI subcommands — init, validate, parse, summary, serve, schema, completions.

use crate::core::types::{CookbookFile, RecipeSummary};
use crate::core::{normalize, parser, resolver, Registry, ResolveOptions};
use crate::dispatch::Dispatcher;
use crate::logging::{LogFormat, LoggingConfig};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "cookbook",
    version,
    about = "Recipe registry and flattening resolver — cook times and base ingredients"
)]
pub struct Cli {
    /// Log level or filter directive (COOKBOOK_LOG overrides)
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn logging(&self) -> LoggingConfig {
        LoggingConfig {
            level: self.log_level.clone(),
            format: self.log_format,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a starter cookbook.yaml
    Init {
        /// Directory to initialize (default: current)
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Validate a cookbook file and register every entry
    Validate {
        /// Path to cookbook.yaml
        #[arg(short, long, default_value = "cookbook.yaml")]
        file: PathBuf,
    },

    /// Normalize a handwritten name
    Parse {
        /// Raw text
        text: String,
    },

    /// Flatten a recipe into cook time and base ingredients
    Summary {
        /// Recipe name
        name: String,

        /// Path to cookbook.yaml
        #[arg(short, long, default_value = "cookbook.yaml")]
        file: PathBuf,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Answer JSON-lines requests on stdin/stdout
    Serve {
        /// Seed the registry from this cookbook file
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Print the JSON Schema of the cookbook file
    Schema,

    /// Generate shell completions
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Dispatch a CLI command.
pub fn dispatch(cmd: Commands) -> Result<(), String> {
    match cmd {
        Commands::Init { path } => cmd_init(&path),
        Commands::Validate { file } => cmd_validate(&file),
        Commands::Parse { text } => cmd_parse(&text),
        Commands::Summary { name, file, json } => cmd_summary(&file, &name, json),
        Commands::Serve { file } => cmd_serve(file.as_deref()),
        Commands::Schema => cmd_schema(),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "cookbook", &mut std::io::stdout());
            Ok(())
        }
    }
}

const STARTER_COOKBOOK: &str = r#"version: "1.0"
name: my-kitchen
description: "Managed by cookbook"

settings:
  max_depth: 64

entries:
  - type: ingredient
    name: Egg
    cookTime: 6
  - type: ingredient
    name: Flour
    cookTime: 3
  - type: recipe
    name: Batter
    requiredItems:
      - { name: Egg, quantity: 2 }
      - { name: Flour, quantity: 1 }
  - type: recipe
    name: Pancake
    requiredItems:
      - { name: Batter, quantity: 2 }
      - { name: Egg, quantity: 1 }
"#;

fn cmd_init(path: &Path) -> Result<(), String> {
    let book_path = path.join("cookbook.yaml");
    if book_path.exists() {
        return Err(format!("{} already exists", book_path.display()));
    }
    std::fs::create_dir_all(path)
        .map_err(|e| format!("cannot create {}: {}", path.display(), e))?;
    std::fs::write(&book_path, STARTER_COOKBOOK)
        .map_err(|e| format!("cannot write {}: {}", book_path.display(), e))?;

    println!("Initialized cookbook at {}", path.display());
    println!("  Created: {}", book_path.display());
    Ok(())
}

fn cmd_validate(file: &Path) -> Result<(), String> {
    let book = parser::parse_cookbook_file(file)?;
    let (registry, _) = load(&book)?;
    println!("OK: {} ({} entries)", book.name, registry.len());
    Ok(())
}

fn cmd_parse(text: &str) -> Result<(), String> {
    let name = normalize::normalize(text).map_err(|e| e.to_string())?;
    println!("{}", name);
    Ok(())
}

fn cmd_summary(file: &Path, name: &str, json: bool) -> Result<(), String> {
    let book = parser::parse_cookbook_file(file)?;
    let (registry, options) = load(&book)?;
    let summary = resolver::resolve_with(&registry, name, &options).map_err(|e| e.to_string())?;

    if json {
        let out = serde_json::to_string_pretty(&summary)
            .map_err(|e| format!("JSON serialize error: {}", e))?;
        println!("{}", out);
    } else {
        print_summary(&summary);
    }
    Ok(())
}

fn cmd_serve(file: Option<&Path>) -> Result<(), String> {
    let (registry, options) = match file {
        Some(path) => load(&parser::parse_cookbook_file(path)?)?,
        None => (Registry::new(), ResolveOptions::default()),
    };
    let dispatcher = Dispatcher::new(registry, options);
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    dispatcher
        .serve(stdin.lock(), stdout.lock())
        .map_err(|e| format!("serve error: {}", e))?;
    Ok(())
}

fn cmd_schema() -> Result<(), String> {
    let schema = schemars::schema_for!(CookbookFile);
    let out = serde_json::to_string_pretty(&schema)
        .map_err(|e| format!("JSON serialize error: {}", e))?;
    println!("{}", out);
    Ok(())
}

/// Build a registry from a parsed cookbook, printing every error.
fn load(book: &CookbookFile) -> Result<(Registry, ResolveOptions), String> {
    parser::build_registry(book).map_err(|errors| {
        for e in &errors {
            eprintln!("  ERROR: {}", e);
        }
        format!("{} validation error(s)", errors.len())
    })
}

/// Display a summary to stdout.
fn print_summary(summary: &RecipeSummary) {
    println!("{} (cook time: {})", summary.name, summary.cook_time);
    for line in summary.lines() {
        println!("  {} x{}", line.name, line.quantity);
    }
}

//! JAL command line
//!
//! Translate JAL programs to o1js source and convert setup payloads into
//! program inputs.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use jal_compiler::codegen::pools::build_type_pool;
use jal_compiler::resolver::DEFAULT_MAX_REFERENCE_DEPTH;
use jal_compiler::{load_program, Jal, Program};
use jal_runtime::{display_path, Path};
use serde_json::Value;
use std::{fs, path::PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "jal")]
#[command(about = "Compile JAL programs to o1js", long_about = None)]
struct Cli {
    /// Log compiler diagnostics at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate o1js source for a program
    Translate {
        /// Path to the program JSON file
        #[arg(short, long)]
        program: PathBuf,

        /// Output file for the generated source (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Convert a setup payload into program inputs
    Input {
        /// Path to the program JSON file
        #[arg(short, long)]
        program: PathBuf,

        /// Path to the setup JSON file
        #[arg(short, long)]
        setup: PathBuf,

        /// Output file for the input JSON (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the variables and commands of a program
    Info {
        /// Path to the program JSON file
        #[arg(short, long)]
        program: PathBuf,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn read_program(path: &PathBuf) -> Result<Program> {
    load_program(path).context(format!("Failed to load program: {:?}", path))
}

fn read_json(path: &PathBuf) -> Result<Value> {
    let content = fs::read_to_string(path).context(format!("Failed to read file: {:?}", path))?;
    serde_json::from_str(&content).context(format!("Failed to parse JSON: {:?}", path))
}

fn emit(content: &str, output: Option<PathBuf>) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(&path, content).context(format!("Failed to write output to {:?}", path))?;
            println!("✅ Written to {:?} ({} bytes)", path, content.len());
        }
        None => print!("{}", content),
    }
    Ok(())
}

fn translate(program: PathBuf, output: Option<PathBuf>) -> Result<()> {
    let program = read_program(&program)?;
    let source = Jal::new().translate(&program).context("Translation failed")?;
    emit(&source, output)
}

fn input(program: PathBuf, setup: PathBuf, output: Option<PathBuf>) -> Result<()> {
    let program = read_program(&program)?;
    let setup = read_json(&setup)?;
    let input = Jal::new()
        .init_program(program)
        .to_input(&setup)
        .context("Input conversion failed")?;
    let mut json =
        serde_json::to_string_pretty(&input).context("Failed to serialize program input")?;
    json.push('\n');
    emit(&json, output)
}

fn show_info(program: PathBuf) -> Result<()> {
    let program = read_program(&program)?;
    let paths: Vec<Path> = program
        .input_schema
        .leaves()
        .into_iter()
        .map(|(path, _)| path)
        .collect();
    let types = build_type_pool(&program.input_schema, &paths, DEFAULT_MAX_REFERENCE_DEPTH)?;

    println!("📋 Target: {}", program.target);
    println!("   Variables: {}", paths.len());
    for (path, variable) in program.input_schema.leaves() {
        let token = types.get_leaf(&path).map(String::as_str).unwrap_or("?");
        println!("   - {} ({}): {}", display_path(&path), variable.kind(), token);
    }
    println!("   Commands: {}", program.commands.len());
    for (index, command) in program.commands.iter().enumerate() {
        match &command.out {
            Some(out) => println!("   {}. {} -> {}", index + 1, command.operation.key(), out),
            None => println!("   {}. {}", index + 1, command.operation.key()),
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Translate { program, output } => translate(program, output),
        Commands::Input {
            program,
            setup,
            output,
        } => input(program, setup, output),
        Commands::Info { program } => show_info(program),
    }
}

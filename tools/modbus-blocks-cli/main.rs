use clap::{Parser, Subcommand};
use modbus_blocks::prelude::*;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Block catalog export and Python generation for Modbus polling workspaces
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a Python script from a saved editor workspace
    Generate {
        /// Path to the workspace JSON file
        workspace_path: PathBuf,

        /// Write the script here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Indentation width of the generated code, in spaces
        #[arg(long, default_value_t = 4)]
        indent: usize,
    },
    /// Print the block definitions for the editor to load
    Catalog {
        /// Write the definitions here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    // Logs go to stderr so generated code on stdout stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Generate {
            workspace_path,
            output,
            indent,
        } => run_generate(workspace_path, output, indent),
        Command::Catalog { output } => run_catalog(output),
    }
}

fn run_generate(workspace_path: PathBuf, output: Option<PathBuf>, indent: usize) {
    let start = Instant::now();

    let json = fs::read_to_string(&workspace_path).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to read workspace file '{}': {}",
            workspace_path.display(),
            e
        ))
    });
    let workspace = HostWorkspace::from_json(&json)
        .and_then(IntoWorkspace::into_workspace)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to load workspace: {}", e)));
    info!(
        path = %workspace_path.display(),
        top_level_blocks = workspace.blocks.len(),
        "workspace loaded"
    );

    let generator = Generator::builder()
        .indent_width(indent)
        .build()
        .unwrap_or_else(|e| exit_with_error(&format!("Block catalog is invalid: {}", e)));

    let script = generator
        .generate(&workspace)
        .unwrap_or_else(|e| exit_with_error(&format!("Code generation failed: {}", e)));

    write_output(output, &script);
    info!(elapsed = ?start.elapsed(), "done");
}

fn run_catalog(output: Option<PathBuf>) {
    let generator = Generator::new()
        .unwrap_or_else(|e| exit_with_error(&format!("Block catalog is invalid: {}", e)));
    let definitions = serde_json::to_string_pretty(&generator.registry().to_host_json())
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to serialize catalog: {}", e)));
    info!(block_types = generator.registry().len(), "catalog exported");
    write_output(output, &format!("{}\n", definitions));
}

fn write_output(output: Option<PathBuf>, content: &str) {
    match output {
        Some(path) => {
            fs::write(&path, content).unwrap_or_else(|e| {
                exit_with_error(&format!("Failed to write '{}': {}", path.display(), e))
            });
            info!(path = %path.display(), bytes = content.len(), "output written");
        }
        None => print!("{}", content),
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}

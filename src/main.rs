//! Anchor Layout CLI
//!
//! Usage:
//!   anchor-layout [OPTIONS] [FILE]
//!
//! Options:
//!   -d, --descriptors      Also print every activated constraint
//!   --no-inset-region      Treat inset regions as unavailable
//!   -v, --verbose          Log resolver and solver activity
//!   -h, --help             Print help

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use anchor_layout::Scene;

#[derive(Parser)]
#[command(name = "anchor-layout")]
#[command(about = "Lay out anchored views described in a TOML scene")]
struct Cli {
    /// Scene file (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Also print every activated constraint
    #[arg(short, long)]
    descriptors: bool,

    /// Treat inset regions as unavailable, forcing fallback offsets
    #[arg(long)]
    no_inset_region: bool,

    /// Log resolver and solver activity (overridden by RUST_LOG)
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "anchor_layout=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // If no input file and stdin is a terminal (interactive), show usage
    if cli.input.is_none() && io::stdin().is_terminal() {
        print_intro();
        return;
    }

    let (source, filename) = match &cli.input {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => (content, path.display().to_string()),
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => (buffer, "<stdin>".to_string()),
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    std::process::exit(1);
                }
            }
        }
    };

    let mut scene = match Scene::from_str(&source) {
        Ok(scene) => scene,
        Err(e) => {
            eprintln!("{}", e.format(&source, &filename));
            std::process::exit(1);
        }
    };
    if cli.no_inset_region {
        scene.config.inset_region_available = false;
    }

    match scene.layout() {
        Ok(layout) => {
            print!("{}", layout.render_tree());
            if cli.descriptors {
                println!();
                print!("{}", layout.render_descriptors());
            }
        }
        Err(e) => {
            eprintln!("{}", e.format(&source, &filename));
            std::process::exit(1);
        }
    }
}

fn print_intro() {
    println!(
        r#"Anchor Layout - lay out anchored views described in a TOML scene

USAGE:
    anchor-layout [OPTIONS] [FILE]
    cat scene.toml | anchor-layout

OPTIONS:
    -d, --descriptors    Also print every activated constraint
    --no-inset-region    Treat inset regions as unavailable
    -v, --verbose        Log resolver and solver activity
    -h, --help           Print help

SCENE:
    [[view]]
    id = "root"
    frame = {{ x = 0, y = 0, width = 390, height = 844 }}
    safe_area = {{ top = 47, bottom = 34 }}

    [[view]]
    id = "header"
    parent = "root"
    to_parent = {{ inset_region = true, top = 0, leading = 0, trailing = 0, height = 56 }}

    [[view]]
    id = "body"
    parent = "root"
    to_sibling = [{{ sibling = "header", below = 8, leading = 0, trailing = 0 }}]
    size = {{ height = 200 }}
"#
    );
}

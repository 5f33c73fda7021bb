use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use walkthrough::config::{self, WalkthroughConfig};
use walkthrough::{ChecklistViews, Diagnostic, WalkthroughDocument, generate, output, package};

#[derive(Parser)]
#[command(name = "walkthrough")]
#[command(about = "Compile game walkthroughs with collectible checklists")]
#[command(long_about = "\
Compile game walkthroughs with collectible checklists

A walkthrough is plain text with a few directives. Inline [type|label]
references become checkboxes; the page keeps a checklist after every
section and rollups by section and by type at the end.

Markup:

  \\game_short_name{lighthouse}       # Key for saved progress in the browser
  \\version{2}                        # Bump to reset saved progress
  \\title{The Lighthouse Keeper}
  \\defaultspoilertitle{Show me}
  \\declare{shell}{Painted Shell}{Painted Shells}
  \\section{Chapter 1 - The Beach}{Beach}
  Find the [shell|blue shell] under the boat.
  Or [shell|striped shell|Rock pool shell] with a rollup label.
  See \\link{https://example.com/map}.
  \\begin{ul} / \\begin{ol}            # \\item lines, closed by \\end{ul} / \\end{ol}
  \\begin{spoiler}{Optional title}    # Closed by \\end{spoiler}; may hold \\img{path}
  \\checklist                         # Closes the section

Settings are read from config.toml next to the input file, or --config.
Run 'walkthrough gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Config file (default: config.toml next to the input)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log parser activity (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile a walkthrough to a single HTML page
    Compile {
        input: PathBuf,
        /// Output file (default: input with .html extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Compile and package the page with its images as a zip
    Build {
        input: PathBuf,
        /// Output file (default: input with .zip extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Parse a walkthrough and report its structure and problems
    Check { input: PathBuf },
    /// Print the parsed document and checklist rollups as JSON
    Dump {
        input: PathBuf,
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

/// Everything the parser produced, for `dump`.
#[derive(Serialize)]
struct Dump<'a> {
    document: &'a WalkthroughDocument,
    checklists: ChecklistViews,
    diagnostics: &'a [Diagnostic],
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Command::Compile { input, output: dest } => {
            require_input(input)?;
            let config = load_config(cli.config.as_deref(), input)?;
            let dest = dest.clone().unwrap_or_else(|| input.with_extension("html"));
            let parsed = generate::compile(input, &dest, &config)?;
            output::print_written_output(input, &dest, &parsed);
        }
        Command::Build { input, output: dest } => {
            require_input(input)?;
            let config = load_config(cli.config.as_deref(), input)?;
            let dest = dest.clone().unwrap_or_else(|| input.with_extension("zip"));
            let parsed = package::build(input, &dest, &config)?;
            output::print_written_output(input, &dest, &parsed);
        }
        Command::Check { input } => {
            require_input(input)?;
            let parsed = walkthrough::parse(&std::fs::read_to_string(input)?)?;
            output::print_check_output(&parsed);
            if parsed.has_errors() {
                std::process::exit(1);
            }
        }
        Command::Dump { input, output: dest } => {
            require_input(input)?;
            let parsed = walkthrough::parse(&std::fs::read_to_string(input)?)?;
            let dump = Dump {
                document: &parsed.document,
                checklists: ChecklistViews::from_document(&parsed.document),
                diagnostics: &parsed.diagnostics,
            };
            let json = serde_json::to_string_pretty(&dump)?;
            match dest {
                Some(path) => {
                    std::fs::write(path, json)?;
                    output::print_written_output(input, path, &parsed);
                }
                None => println!("{}", json),
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Diagnostics go to stderr through tracing; command output stays on stdout.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn require_input(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if input.is_file() {
        Ok(())
    } else {
        Err(format!("Cannot find file {}", input.display()).into())
    }
}

/// An explicit `--config` must exist; the implicit one next to the input may not.
fn load_config(
    explicit: Option<&Path>,
    input: &Path,
) -> Result<WalkthroughConfig, Box<dyn std::error::Error>> {
    match explicit {
        Some(path) if !path.is_file() => {
            Err(format!("Cannot find config file {}", path.display()).into())
        }
        Some(path) => Ok(config::load_config_file(path)?),
        None => Ok(config::load_config_for(input)?),
    }
}

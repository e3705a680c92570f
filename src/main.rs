use clap::{ArgAction, Parser, Subcommand};
use poem_site::{config, links, output, pipeline};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "poem-site")]
#[command(about = "Static site generator for a directory of poems")]
#[command(long_about = "\
Static site generator for a directory of poems

Every markdown poem becomes a sibling HTML page, and one index page links
all poems and slide decks.

Project structure:

  ./
  ├── poem-site.toml               # Optional config
  ├── index.html                   # Generated index
  └── resources/
      ├── poems/
      │   ├── 001 The Road.md      # → 001 The Road.html, titled \"The Road\"
      │   └── winter/
      │       └── 002-Snow.md      # Nested directories are fine
      └── slides/
          └── deckA/
              ├── index.html       # Defines #talk
              └── talk.js          # Indexed as deckA/index.html#talk

Running without a command builds the project in the current directory.
Run 'poem-site gen-config' to print a documented poem-site.toml.")]
#[command(version)]
struct Cli {
    /// Project root
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Convert all poems, then write the index
    Build,
    /// Convert poem markdown to sibling HTML pages only
    Convert,
    /// Write the index from existing pages and slide decks only
    Index,
    /// Print the links the index would contain
    Links {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a stock poem-site.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let root = cli.root;
    let load = || config::Layout::load(&root);

    match cli.command.unwrap_or(Command::Build) {
        // Same sequence as `pipeline::run`, split to print each phase as it ends
        Command::Build => {
            let (layout, site_config) = load()?;
            init_thread_pool(&site_config.processing);
            println!("==> Phase 1: Converting {}", layout.poems_root.display());
            let convert = pipeline::convert_poems(&layout)?;
            output::print_convert_output(&convert, &layout.project_root);

            println!("==> Phase 2: Indexing");
            let index = pipeline::build_index(&layout)?;
            output::print_index_output(&index, &layout.project_root);

            if !convert.failures.is_empty() {
                return Err(pipeline::PipelineError::ConvertFailures(convert.failures).into());
            }
            println!("==> Build complete: {}", layout.index_path.display());
        }
        Command::Convert => {
            let (layout, site_config) = load()?;
            init_thread_pool(&site_config.processing);
            let convert = pipeline::convert_poems(&layout)?;
            output::print_convert_output(&convert, &layout.project_root);
            if !convert.failures.is_empty() {
                return Err(pipeline::PipelineError::ConvertFailures(convert.failures).into());
            }
        }
        Command::Index => {
            let (layout, _) = load()?;
            let index = pipeline::build_index(&layout)?;
            output::print_index_output(&index, &layout.project_root);
        }
        Command::Links { json } => {
            let (layout, _) = load()?;
            let links = links::collect_links(&layout)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&links)?);
            } else {
                for line in output::format_links(&links) {
                    println!("{}", line);
                }
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Install the tracing subscriber. `RUST_LOG` directives are honored on top
/// of the level picked by `-v`.
fn setup_logging(verbosity: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbosity {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; the config can only lower it.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}

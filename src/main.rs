use bigfusion::config::{self, CollageConfig};
use bigfusion::imaging::RustBackend;
use bigfusion::{output, pipeline};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;

#[derive(Parser)]
#[command(name = "bigfusion")]
#[command(about = "Pack a folder tree of photographs into one collage")]
#[command(long_about = "\
Pack a folder tree of photographs into one collage

Every .jpg, .jpeg and .png file below the given folders is rescaled to a
common width and dealt into columns so the column heights come out close.
Taller columns are then trimmed a little from every frame so the collage
ends flush.

  bigfusion build ~/Pictures/2019 ~/Pictures/2020 --to wall.jpg --subset 400

Settings come from stock defaults, then --config <file>, then flags.
Run 'bigfusion gen-config' to print a documented config file.")]
#[command(version)]
struct Cli {
    /// Config file (TOML); overrides stock defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output file; the extension picks the format (.jpg, .jpeg, .png)
    #[arg(long, global = true)]
    to: Option<PathBuf>,

    /// Width of every frame in pixels
    #[arg(long, global = true)]
    miniature_width: Option<u32>,

    /// Number of columns (default: aim for a square canvas)
    #[arg(long, global = true)]
    columns: Option<usize>,

    /// Use a random sample of at most this many pictures
    #[arg(long, global = true)]
    subset: Option<usize>,

    /// Keep the tallest column instead of trimming to the shortest
    #[arg(long, global = true)]
    no_crop: bool,

    /// Ignore orientation metadata
    #[arg(long, global = true)]
    no_rotate: bool,

    /// Seed for a reproducible layout
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// JPEG quality (1-100)
    #[arg(long, global = true)]
    quality: Option<u32>,

    /// Maximum parallel decoders
    #[arg(long, global = true)]
    threads: Option<usize>,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the collage
    Build {
        /// Folders to collect pictures from
        #[arg(required = true)]
        folders: Vec<PathBuf>,
    },
    /// Validate settings and count pictures without decoding anything
    Check {
        /// Folders to collect pictures from
        #[arg(required = true)]
        folders: Vec<PathBuf>,
    },
    /// Print a stock config file with all options documented
    GenConfig,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output::print_error(&*err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    match &cli.command {
        Command::Build { folders } => {
            let config = resolve(cli)?;
            init_thread_pool(&config.processing);

            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_event(&event) {
                        println!("{}", line);
                    }
                }
            });
            let result = pipeline::run(&RustBackend::new(), folders, &config, Some(tx));
            printer.join().ok();

            output::print_run_summary(&result?);
        }
        Command::Check { folders } => {
            let config = resolve(cli)?;
            let report = pipeline::check(folders, &config)?;
            output::print_check_output(&report, folders);
            println!("==> Settings are valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Load the config file (if any) over stock defaults, then apply flags.
fn resolve(cli: &Cli) -> Result<CollageConfig, config::ConfigError> {
    let mut config = config::load_config(cli.config.as_deref())?;
    if let Some(to) = &cli.to {
        config.output_path = to.clone();
    }
    if let Some(width) = cli.miniature_width {
        config.target_width = width;
    }
    if cli.columns.is_some() {
        config.num_columns = cli.columns;
    }
    if cli.subset.is_some() {
        config.subset_size = cli.subset;
    }
    if cli.no_crop {
        config.crop_to_equal_height = false;
    }
    if cli.no_rotate {
        config.auto_rotate = false;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    if let Some(quality) = cli.quality {
        config.quality = quality;
    }
    if cli.threads.is_some() {
        config.processing.max_processes = cli.threads;
    }
    config.validate()?;
    Ok(config)
}

/// Log to stderr so stdout stays clean for progress and summaries.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; the user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}

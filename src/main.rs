use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ditherbooth::config::DitherConfig;
use ditherbooth::image_io;
use mono_dither::matrix::{
    CURVES, DIFFUSION_KERNELS, DOT_CLASS_MATRICES, DOT_DIFFUSION_MATRICES, LIPPENS_COEFFICIENTS,
    ORDERED_MATRICES, TILE_PATTERNS,
};
use mono_dither::Algorithm;

#[derive(Parser)]
#[command(name = "ditherbooth")]
#[command(about = "Ditherbooth - monochrome dithering for photobooth printers")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Dither a PNG to a 1-bit PNG
    Dither {
        /// Input PNG file
        #[arg(short, long)]
        input: PathBuf,

        /// Output 1-bit PNG file
        #[arg(short, long)]
        output: PathBuf,

        /// YAML configuration file (defaults to $CONFIG_FILE if set)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Algorithm name (see `ditherbooth list`)
        #[arg(short, long)]
        algorithm: Option<String>,

        /// Matrix, kernel or variable kind for the algorithm
        #[arg(short, long)]
        matrix: Option<String>,

        /// Also write packed 1-bit printer rows to this file
        #[arg(long)]
        packed: Option<PathBuf>,

        /// Treat input values as linear (skip sRGB decoding)
        #[arg(long)]
        no_gamma: bool,
    },
    /// List algorithms and built-in tables
    List,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ditherbooth=info,mono_dither=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    match cli.command {
        Some(Commands::Dither {
            input,
            output,
            config,
            algorithm,
            matrix,
            packed,
            no_gamma,
        }) => run_dither_command(
            &input,
            &output,
            config,
            algorithm,
            matrix,
            packed.as_deref(),
            no_gamma,
        ),
        Some(Commands::List) => {
            run_list_command();
            Ok(())
        }
        None => {
            run_status_command();
            Ok(())
        }
    }
}

/// Dither one file; command-line flags override config values
fn run_dither_command(
    input: &std::path::Path,
    output: &std::path::Path,
    config_path: Option<PathBuf>,
    algorithm: Option<String>,
    matrix: Option<String>,
    packed: Option<&std::path::Path>,
    no_gamma: bool,
) -> anyhow::Result<()> {
    let mut config = match config_path {
        Some(path) => DitherConfig::load(&path)?,
        None => match std::env::var("CONFIG_FILE").ok().map(PathBuf::from) {
            Some(path) => DitherConfig::load_or_default(&path),
            None => DitherConfig::default(),
        },
    };
    if let Some(algorithm) = algorithm {
        config.algorithm = algorithm;
    }
    if matrix.is_some() {
        config.matrix = matrix;
    }
    if no_gamma {
        config.correct_gamma = false;
    }

    let ditherer = config.to_ditherer()?;
    let image = image_io::load_png(input, config.correct_gamma)?;
    tracing::info!(
        input = %input.display(),
        width = image.width(),
        height = image.height(),
        algorithm = %config.algorithm,
        "Dithering"
    );

    let bitmap = ditherer.dither(&image)?;
    image_io::save_png(output, &bitmap)?;
    println!(
        "Dithered {} ({}x{}, {} black dots)",
        output.display(),
        bitmap.width(),
        bitmap.height(),
        bitmap.black_count()
    );

    if let Some(path) = packed {
        image_io::save_packed(path, &bitmap)?;
        println!(
            "Packed {} ({} bytes per row)",
            path.display(),
            bitmap.row_stride()
        );
    }

    Ok(())
}

fn run_list_command() {
    println!("Algorithms:");
    for name in Algorithm::NAMES {
        println!("  {name}");
    }

    let sections: [(&str, Vec<&str>); 7] = [
        ("Ordered matrices", ORDERED_MATRICES.names().collect()),
        ("Diffusion kernels", DIFFUSION_KERNELS.names().collect()),
        ("Dot class matrices", DOT_CLASS_MATRICES.names().collect()),
        ("Dot diffusion matrices", DOT_DIFFUSION_MATRICES.names().collect()),
        ("Curves", CURVES.names().collect()),
        ("Tile patterns", TILE_PATTERNS.names().collect()),
        ("Lippens coefficients", LIPPENS_COEFFICIENTS.names().collect()),
    ];
    for (title, names) in sections {
        println!("\n{title}:");
        for name in names {
            println!("  {name}");
        }
    }
    println!("\nVariable kinds:\n  ostromoukhov\n  zhou_fang");
}

fn run_status_command() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let config_file = std::env::var("CONFIG_FILE").ok();

    println!("Ditherbooth v{VERSION}");
    println!("Monochrome dithering for photobooth printers\n");
    println!("Environment Variables:");
    println!(
        "  CONFIG_FILE = {}",
        config_file.as_deref().unwrap_or("(not set)")
    );
    println!("\nRun `ditherbooth dither --help` or `ditherbooth list` to get started.");
}

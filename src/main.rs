//! tooling-nodes CLI - inspect the node registry and exercise the loaders.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ndarray::Axis;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tooling_nodes::codec::tensor_to_image;
use tooling_nodes::node::{self, load_image, InputKind};

/// Developer tooling for the image-processing plugin nodes.
#[derive(Parser, Debug)]
#[command(name = "tooling-nodes")]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the registered node schemas.
    List,

    /// Decode a base64 payload file and write the result as PNG.
    Decode {
        /// File containing one base64-encoded image payload.
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output image path.
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Also write the decoded mask to this path.
        #[arg(long, value_name = "PATH")]
        mask: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("tooling_nodes={log_level}").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    if let Err(err) = run(&args) {
        tracing::error!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn run(args: &Args) -> Result<()> {
    match &args.command {
        Command::List => list_nodes(),
        Command::Decode {
            input,
            output,
            mask,
        } => decode(input, output, mask.as_deref()),
    }
}

fn list_nodes() -> Result<()> {
    for spec in node::registry() {
        let returns: Vec<_> = spec.returns.iter().map(|kind| kind.name()).collect();
        println!("{} [{}] -> ({})", spec.name, spec.category, returns.join(", "));

        for input in spec.inputs {
            match input.kind {
                InputKind::Text => println!("  {}: STRING (multiline)", input.name),
                InputKind::Image => println!("  {}: IMAGE", input.name),
                InputKind::Mask => println!("  {}: MASK", input.name),
                InputKind::Int {
                    default,
                    min,
                    max,
                    step,
                } => println!(
                    "  {}: INT (default {default}, min {min}, max {max}, step {step})",
                    input.name
                ),
            }
        }
    }

    Ok(())
}

fn decode(input: &PathBuf, output: &PathBuf, mask_path: Option<&std::path::Path>) -> Result<()> {
    let payload = fs::read_to_string(input)
        .with_context(|| format!("failed to read payload from {}", input.display()))?;

    let (image, mask) = load_image(payload.trim()).context("failed to decode payload")?;

    let frame = tensor_to_image(image.index_axis(Axis(0), 0))?;
    frame
        .save(output)
        .with_context(|| format!("failed to write image to {}", output.display()))?;
    tracing::info!("wrote {}", output.display());

    if let Some(path) = mask_path {
        let plane = mask.index_axis(Axis(0), 0);
        let (height, width) = plane.dim();

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let gray = image::GrayImage::from_fn(width as u32, height as u32, |x, y| {
            image::Luma([(plane[[y as usize, x as usize]] * 255.0).clamp(0.0, 255.0) as u8])
        });

        gray.save(path)
            .with_context(|| format!("failed to write mask to {}", path.display()))?;
        tracing::info!("wrote {}", path.display());
    }

    Ok(())
}

//! Multirep: multi-representation volume containers.
//!
//! A logical volume can be materialized in several memory domains at once
//! (main memory, raw files on disk, a device texture), kept lazily in sync.
//! A [`VolumeContainer`](container::VolumeContainer) owns the set of
//! materializations, tracks which one is authoritative, and fills in
//! missing or stale ones on demand by resolving a conversion path through
//! the [`ConverterRegistry`](convert::ConverterRegistry).
//!
//! # Modules
//!
//! - [`format`]: Format ids, descriptors, and element codecs
//! - [`rep`]: Representation kinds (Ram, Disk, Texture)
//! - [`container`]: The representation cache with staleness tracking
//! - [`convert`]: Converters, chains, and the registry
//! - [`io`]: Raw volume files and YAML descriptors
//! - [`inspect`]: Descriptor inspection and reporting
//! - [`error`]: Error types for multirep operations

pub mod container;
pub mod convert;
pub mod dims;
pub mod error;
pub mod format;
pub mod inspect;
pub mod io;
pub mod rep;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use error::MultirepError;

use dims::Dims3;
use io::raw::{self, ByteOrder, VolumeDescriptor};
use rep::DiskRepresentation;

/// The multirep CLI application.
#[derive(Parser)]
#[command(name = "multirep")]
#[command(version, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// List all known element formats.
    Formats(FormatsArgs),

    /// Inspect an on-disk volume descriptor and verify its raw size.
    Inspect(InspectArgs),

    /// Rewrite a raw volume with a different byte order or geometry.
    Convert(ConvertArgs),
}

/// Arguments for the formats subcommand.
#[derive(clap::Args)]
struct FormatsArgs {
    /// Output format for the listing ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

/// Arguments for the inspect subcommand.
#[derive(clap::Args)]
struct InspectArgs {
    /// Volume descriptor file (YAML) to inspect.
    input: PathBuf,

    /// Output format for the report ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,

    /// Exit non-zero if the raw file is missing or mis-sized.
    #[arg(long)]
    strict: bool,
}

/// Arguments for the convert subcommand.
#[derive(clap::Args)]
struct ConvertArgs {
    /// Input volume descriptor file (YAML).
    input: PathBuf,

    /// Output volume descriptor file (YAML); the raw file is written
    /// next to it.
    output: PathBuf,

    /// Byte order of the output ('little' or 'big').
    #[arg(long, default_value = "little")]
    byte_order: String,

    /// Rescale to new dimensions, e.g. '128x128x64' (nearest neighbor).
    #[arg(long)]
    dims: Option<String>,
}

/// Run the multirep CLI.
pub fn run() -> Result<(), MultirepError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Formats(args)) => run_formats(&args),
        Some(Commands::Inspect(args)) => run_inspect(&args),
        Some(Commands::Convert(args)) => run_convert(&args),
        None => {
            println!("multirep: multi-representation volume containers");
            println!("Run 'multirep --help' for usage.");
            Ok(())
        }
    }
}

fn run_formats(args: &FormatsArgs) -> Result<(), MultirepError> {
    let descriptors: Vec<_> = format::FormatId::ALL
        .iter()
        .map(|id| id.descriptor())
        .collect();

    match args.output.as_str() {
        "json" => {
            let json = serde_json::to_string_pretty(&descriptors)?;
            println!("{json}");
        }
        _ => {
            println!(
                "{:<14} {:>5} {:>8} {:>10}  range",
                "name", "chans", "stored", "allocated"
            );
            for d in &descriptors {
                println!(
                    "{:<14} {:>5} {:>8} {:>10}  [{}, {}]",
                    d.name, d.components, d.bits_stored, d.bits_allocated, d.min, d.max
                );
            }
        }
    }
    Ok(())
}

fn run_inspect(args: &InspectArgs) -> Result<(), MultirepError> {
    let report = inspect::inspect_volume(&args.input)?;

    match args.output.as_str() {
        "json" => {
            let json = serde_json::to_string_pretty(&report)?;
            println!("{json}");
        }
        _ => print!("{report}"),
    }

    if args.strict && !report.size_matches() {
        return Err(MultirepError::RawSizeMismatch {
            path: report.data_path.clone(),
            expected: report.data.expected_bytes,
            actual: report.data.actual_bytes.unwrap_or(0),
        });
    }
    Ok(())
}

fn run_convert(args: &ConvertArgs) -> Result<(), MultirepError> {
    let byte_order = match args.byte_order.as_str() {
        "little" => ByteOrder::Little,
        "big" => ByteOrder::Big,
        other => {
            return Err(MultirepError::UnsupportedByteOrder(format!(
                "'{}' (expected 'little' or 'big')",
                other
            )));
        }
    };

    let disk = DiskRepresentation::open(&args.input)?;
    let (dims, bytes) = match &args.dims {
        Some(spec) => {
            let dims: Dims3 = spec.parse()?;
            (dims, disk.load_rescaled(dims)?)
        }
        None => (disk.dimensions(), disk.load()?),
    };

    let data_name = args
        .output
        .with_extension("raw")
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "volume.raw".to_string());
    let descriptor = VolumeDescriptor {
        data: data_name,
        dimensions: dims,
        format: disk.format(),
        byte_order,
    };
    raw::write_volume(&args.output, &descriptor, &bytes)?;

    println!(
        "Wrote {} ({}, {} elements, {:?} endian)",
        args.output.display(),
        disk.format(),
        dims.num_elements(),
        byte_order
    );
    Ok(())
}

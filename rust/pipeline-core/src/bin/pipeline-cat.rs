//! Input Pipeline Record Dumper
//!
//! Reads record files through a dataset pipeline and prints every element,
//! one per line.
//!
//! # Usage
//!
//! ```bash
//! # Print the lines of two text files
//! pipeline-cat a.txt b.txt
//!
//! # Gzip-compressed framed records, two epochs, batches of 8
//! pipeline-cat --format framed --compression GZIP --epochs 2 --batch-size 8 train.rec.gz
//!
//! # Fixed-length records with defaults from a configuration file
//! pipeline-cat --format fixed --record-bytes 3 --header-bytes 5 --config pipeline.toml data.bin
//! ```

use std::io::{self, BufWriter, Write};

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pipeline_core::{DatasetIterator, PipelineConfig, ReaderDataset, Value};

/// Input Pipeline Record Dumper
#[derive(Parser, Debug)]
#[command(name = "pipeline-cat")]
#[command(about = "Print the records of text, fixed-length or framed files")]
struct Args {
    /// Files to read, in order
    #[arg(required = true)]
    files: Vec<String>,

    /// Record format (text, fixed, framed)
    #[arg(short, long, default_value = "text")]
    format: String,

    /// Record size for the fixed format
    #[arg(long, required_if_eq("format", "fixed"))]
    record_bytes: Option<i64>,

    /// Bytes to skip at the start of each fixed-format file
    #[arg(long, default_value = "0")]
    header_bytes: i64,

    /// Bytes to skip at the end of each fixed-format file
    #[arg(long, default_value = "0")]
    footer_bytes: i64,

    /// Compression type ("", GZIP, ZLIB); overrides the configuration file
    #[arg(short, long)]
    compression: Option<String>,

    /// Read buffer size in bytes; overrides the configuration file
    #[arg(long)]
    buffer_size: Option<i64>,

    /// Number of passes over the files (-1 repeats forever)
    #[arg(short, long, default_value = "1", allow_negative_numbers = true)]
    epochs: i64,

    /// Group records into batches of this size
    #[arg(short, long)]
    batch_size: Option<i64>,

    /// Elements to prefetch on a background thread; overrides the configuration file
    #[arg(long)]
    prefetch: Option<i64>,

    /// Configuration file path
    #[arg(long)]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Initialize logging
    let filter = tracing_subscriber::filter::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::filter::EnvFilter::new(&args.log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = match &args.config {
        Some(path) => PipelineConfig::from_file(path)?,
        None => PipelineConfig::default(),
    }
    .with_env_overrides();
    config.validate()?;

    let files = args.files.clone();
    let mut source = match args.format.to_lowercase().as_str() {
        "text" => ReaderDataset::text_line(files),
        "fixed" => ReaderDataset::fixed_length(
            files,
            args.record_bytes.unwrap_or_default(),
            args.header_bytes,
            args.footer_bytes,
        ),
        "framed" => ReaderDataset::framed(files),
        other => return Err(format!("unknown record format '{other}'").into()),
    }
    .with_reader_config(&config.reader);

    if let Some(compression) = &args.compression {
        source = source.compression_type(compression.as_str());
    }
    if let Some(buffer_size) = args.buffer_size {
        source = source.buffer_size(buffer_size);
    }

    let mut dataset = source.repeat(args.epochs);
    if let Some(batch_size) = args.batch_size {
        dataset = dataset.batch(batch_size);
    }
    dataset = match args.prefetch {
        Some(prefetch) => dataset.prefetch(prefetch),
        None => dataset.with_dataset_config(&config.dataset),
    };

    tracing::info!("Reading {} file(s) as {}", args.files.len(), args.format);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut elements = 0u64;
    for value in DatasetIterator::one_shot(&dataset)? {
        write_value(&mut out, &value?)?;
        out.write_all(b"\n")?;
        elements += 1;
    }
    out.flush()?;

    tracing::info!("Printed {} element(s)", elements);
    Ok(())
}

fn write_value(out: &mut impl Write, value: &Value) -> io::Result<()> {
    match value {
        Value::Bytes(bytes) => out.write_all(String::from_utf8_lossy(bytes).as_bytes()),
        Value::Batch(items) => {
            out.write_all(b"[")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.write_all(b", ")?;
                }
                write_value(out, item)?;
            }
            out.write_all(b"]")
        }
    }
}

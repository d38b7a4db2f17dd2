use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use encoder::{EncodeOptions, Encoder};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "mappack",
    version,
    about = "map-catalog to binary pack converter"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert a catalog JSON document into the binary pack.
    Conv {
        /// Path to the catalog document.
        #[arg(default_value = "maps.json")]
        path: PathBuf,
        /// Directory the output files are written to.
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
        /// Transcribe shasum fields (larger output, off by default).
        #[arg(long)]
        include_shasum: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Conv {
            path,
            out_dir,
            include_shasum,
        } => conv(&path, &out_dir, include_shasum),
    }
}

fn conv(path: &Path, out_dir: &Path, include_shasum: bool) -> Result<()> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read catalog {}", path.display()))?;
    let document: Value = serde_json::from_str(&contents)
        .with_context(|| format!("parse catalog {}", path.display()))?;
    let Some(items) = document.get("data").and_then(Value::as_array) else {
        bail!(
            "catalog {} must be an object with an array-valued 'data' field",
            path.display()
        );
    };

    let primary = create_output(out_dir, "maps-data1.bin")?;
    let aux = create_output(out_dir, "maps-data2.bin")?;

    let options = if include_shasum {
        EncodeOptions::with_shasum()
    } else {
        EncodeOptions::default()
    };
    let mut enc =
        Encoder::with_options(primary, aux, options).context("initialize output streams")?;
    for item in items {
        enc.encode_item(item).context("encode catalog item")?;
    }
    let done = enc.finish().context("finalize output streams")?;

    let meta_path = out_dir.join("maps-meta.json");
    let meta = File::create(&meta_path)
        .with_context(|| format!("create sidecar {}", meta_path.display()))?;
    let mut meta = BufWriter::new(meta);
    serde_json::to_writer_pretty(&mut meta, &done.sidecar).context("serialize sidecar")?;
    writeln!(meta)?;
    meta.flush().context("flush sidecar")?;

    tracing::info!(
        amount = done.sidecar.amount,
        data1size = done.sidecar.data1size,
        data2size = done.sidecar.data2size,
        gametypes = done.sidecar.gametype.len(),
        entity_classes = done.sidecar.entity.len(),
        "catalog converted"
    );
    Ok(())
}

fn create_output(out_dir: &Path, name: &str) -> Result<BufWriter<File>> {
    let path = out_dir.join(name);
    let file =
        File::create(&path).with_context(|| format!("create output {}", path.display()))?;
    Ok(BufWriter::new(file))
}

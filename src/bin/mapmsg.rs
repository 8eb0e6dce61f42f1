//! mapmsg CLI
//!
//! Builds, inspects and queries MessagePack map documents on disk.

use std::error::Error;
use std::fs::File;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use mapmsg::{read_message, write_message, Config, Message};
use tracing_subscriber::{fmt, EnvFilter};

/// mapmsg
#[derive(Parser, Debug)]
#[command(name = "mapmsg")]
#[command(about = "Build and inspect MessagePack map documents")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build the sample control/data/memory register block
    Demo {
        /// Also write the encoded document to this file
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Parse a document and print its tree
    Inspect {
        /// Encoded document
        file: PathBuf,
    },

    /// Read one value by dotted path, e.g. `data.src_address`
    Get {
        /// Encoded document
        file: PathBuf,

        /// Keys separated by dots; all but the last must name nested maps
        path: String,

        /// Accessor used for the final key
        #[arg(long = "as", value_enum, default_value = "i64")]
        as_type: ValueType,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ValueType {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    Str,
    Bool,
}

type CliResult<T> = std::result::Result<T, Box<dyn Error>>;

fn main() {
    // Logs go to stderr so command output stays clean
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,mapmsg=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let outcome = match args.command {
        Commands::Demo { out } => demo(out.as_deref()),
        Commands::Inspect { file } => inspect(&file),
        Commands::Get {
            file,
            path,
            as_type,
        } => get(&file, &path, as_type),
    };

    if let Err(e) = outcome {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

// =============================================================================
// Commands
// =============================================================================

fn demo(out: Option<&Path>) -> CliResult<()> {
    let msg = build_register_block()?;
    let bytes = msg.serialize()?;

    println!("{} bytes: {}", bytes.len(), to_hex(bytes));
    println!("{}", msg.finalize()?);

    if let Some(path) = out {
        let written = write_message(File::create(path)?, &msg)?;
        tracing::info!("Wrote {} bytes to {}", written, path.display());
    }
    Ok(())
}

fn inspect(file: &Path) -> CliResult<()> {
    let msg = open(file)?;
    println!("{}", msg);
    Ok(())
}

fn get(file: &Path, path: &str, as_type: ValueType) -> CliResult<()> {
    let mut msg = open(file)?;

    let mut segments: Vec<&str> = path.split('.').collect();
    let last = segments.pop().unwrap_or_default();
    for segment in segments {
        msg = msg.get_nested_map_from_key(segment)?;
    }

    let rendered = match as_type {
        ValueType::I8 => msg.get_i8_from_key(last)?.to_string(),
        ValueType::I16 => msg.get_i16_from_key(last)?.to_string(),
        ValueType::I32 => msg.get_i32_from_key(last)?.to_string(),
        ValueType::I64 => msg.get_i64_from_key(last)?.to_string(),
        ValueType::U8 => msg.get_u8_from_key(last)?.to_string(),
        ValueType::U16 => msg.get_u16_from_key(last)?.to_string(),
        ValueType::U32 => msg.get_u32_from_key(last)?.to_string(),
        ValueType::U64 => msg.get_u64_from_key(last)?.to_string(),
        ValueType::Str => msg.get_str_from_key(last)?,
        ValueType::Bool => msg.get_bool_from_key(last)?.to_string(),
    };
    println!("{}", rendered);
    Ok(())
}

// =============================================================================
// Helpers
// =============================================================================

fn open(file: &Path) -> CliResult<Message> {
    let msg = read_message(File::open(file)?, &Config::default())?;
    tracing::debug!("Loaded {} ({} entries)", file.display(), msg.entry_count()?);
    Ok(msg)
}

fn build_register_block() -> mapmsg::Result<Message> {
    let mut msg = Message::new()?;
    msg.insert_map(3)?;
    msg.insert_pair_i32("control", 0)?;

    msg.insert_nested_map("data", 4)?;
    msg.insert_pair_i32("src_address", 30)?;
    msg.insert_pair_i32("dst_address", 20)?;
    msg.insert_pair_i32("threshold", 10)?;
    msg.insert_pair_i32("data_size", 0)?;

    msg.insert_nested_map("memory", 4)?;
    msg.insert_pair_i32("read_req_gnt", 0)?;
    msg.insert_pair_i32("read_req_rvalid", 5)?;
    msg.insert_pair_i32("read_req_rdata", 0)?;
    msg.insert_pair_i32("write_req_gnt", 0)?;

    Ok(msg)
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

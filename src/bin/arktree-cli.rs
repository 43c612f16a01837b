//! `arktree-cli`: a thin driver over `AtomicStore` for poking at a store
//! directory from a shell -- get/put/range/compact/stat.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use arktree::{AtomicStore, Config, WriteSet};

#[derive(Parser)]
#[command(name = "arktree-cli", about = "Inspect and drive an arktree store directory")]
struct Cli {
    /// Store directory.
    #[arg(long, default_value = "./arktree-data")]
    dir: PathBuf,

    /// Skip the fsync on writes (faster, not durable until the next synced
    /// write or a clean shutdown).
    #[arg(long)]
    no_sync: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Look up a single key.
    Get { key: String },
    /// Write a single key/value pair.
    Put { key: String, value: String },
    /// Remove a half-open key range; omit either bound for unbounded.
    Remove {
        #[arg(long)]
        min: Option<String>,
        #[arg(long)]
        max: Option<String>,
    },
    /// Apply a signed delta to a big-endian i64 counter value.
    Adjust { key: String, delta: i64 },
    /// List entries in `[min, max)`, ascending unless `--reverse`.
    Range {
        #[arg(long)]
        min: Option<String>,
        #[arg(long)]
        max: Option<String>,
        #[arg(long)]
        reverse: bool,
    },
    /// Force an immediate foreground compaction.
    Compact,
    /// Print generation, entry counts, and compaction status.
    Stat,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("arktree-cli: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> arktree::Result<()> {
    let store = AtomicStore::start(&cli.dir, Config::default())?;
    let sync = !cli.no_sync;

    match cli.command {
        Command::Get { key } => match store.get(key.as_bytes())? {
            Some(v) => println!("{}", String::from_utf8_lossy(&v)),
            None => println!("(not found)"),
        },
        Command::Put { key, value } => {
            store.mutate(WriteSet::new().put(key.into_bytes(), value.into_bytes()), sync)?;
        }
        Command::Remove { min, max } => {
            store.mutate(
                WriteSet::new().remove_range(min.map(String::into_bytes), max.map(String::into_bytes)),
                sync,
            )?;
        }
        Command::Adjust { key, delta } => {
            store.mutate(WriteSet::new().adjust(key.into_bytes(), delta), sync)?;
        }
        Command::Range { min, max, reverse } => {
            let min = min.as_deref().map(str::as_bytes);
            let max = max.as_deref().map(str::as_bytes);
            for entry in store.range(min, max, reverse) {
                let entry = entry?;
                println!("{}\t{}", String::from_utf8_lossy(&entry.key), String::from_utf8_lossy(&entry.value));
            }
        }
        Command::Compact => {
            store.compact_now();
            println!("compaction complete (generation {})", store.stats().generation);
        }
        Command::Stat => {
            let stats = store.stats();
            println!("generation:        {}", stats.generation);
            println!("base entries:      {}", stats.base_entries);
            println!("buffered puts:     {}", stats.buffered_puts);
            println!("buffered removes:  {}", stats.buffered_removes);
            println!("buffered adjusts:  {}", stats.buffered_adjusts);
            println!("compaction status: {:?}", stats.compaction_status);
        }
    }

    store.stop()?;
    Ok(())
}

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

use reading_ledger::{Error, FjallStub, Invocation, ReadingContract, transact};

#[derive(Parser)]
#[command(name = "reading-ledger")]
#[command(about = "Seed, create and query energy readings in a persistent world state")]
struct Cli {
    /// Log contract activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new world state
    Init {
        /// Also write the seed readings
        #[arg(long)]
        seed: bool,

        /// World state path
        #[arg(long, default_value = ".reading-ledger", env = "READING_LEDGER_PATH")]
        path: PathBuf,
    },

    /// Write the seed readings (reading1, reading2), overwriting them if present
    Seed {
        /// World state path
        #[arg(long, default_value = ".reading-ledger", env = "READING_LEDGER_PATH")]
        path: PathBuf,
    },

    /// Create a new reading
    Create {
        /// Reading ID
        id: String,

        /// Metering cycle
        #[arg(allow_negative_numbers = true)]
        cycle: i64,

        /// Energy consumed
        #[arg(allow_negative_numbers = true)]
        consumed: i64,

        /// Energy injected
        #[arg(allow_negative_numbers = true)]
        injected: i64,

        /// World state path
        #[arg(long, default_value = ".reading-ledger", env = "READING_LEDGER_PATH")]
        path: PathBuf,
    },

    /// Print a reading
    Read {
        /// Reading ID
        id: String,

        /// World state path
        #[arg(long, default_value = ".reading-ledger", env = "READING_LEDGER_PATH")]
        path: PathBuf,
    },

    /// Print every reading
    List {
        /// World state path
        #[arg(long, default_value = ".reading-ledger", env = "READING_LEDGER_PATH")]
        path: PathBuf,
    },

    /// Print whether a reading exists
    Exists {
        /// Reading ID
        id: String,

        /// World state path
        #[arg(long, default_value = ".reading-ledger", env = "READING_LEDGER_PATH")]
        path: PathBuf,
    },

    /// Invoke a contract function by name with string arguments
    Invoke {
        /// Function name (InitLedger, CreateReading, ReadReading, GetAllReadings, ReadingExists)
        function: String,

        /// Function arguments
        #[arg(allow_negative_numbers = true)]
        args: Vec<String>,

        /// World state path
        #[arg(long, default_value = ".reading-ledger", env = "READING_LEDGER_PATH")]
        path: PathBuf,
    },
}

fn main() -> Result<(), Error> {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("reading_ledger=debug")
            .with_writer(std::io::stderr)
            .init();
    }

    let contract = ReadingContract;

    match cli.command {
        Commands::Init { seed, path } => {
            let stub = FjallStub::init(&path)?;
            if seed {
                transact(&stub, |tx| contract.init_ledger(tx))?;
            }
            println!("Initialized world state at {}", path.display());
            Ok(())
        }
        Commands::Seed { path } => {
            let stub = FjallStub::open(&path)?;
            transact(&stub, |tx| contract.init_ledger(tx))?;
            println!("Seeded readings");
            Ok(())
        }
        Commands::Create {
            id,
            cycle,
            consumed,
            injected,
            path,
        } => {
            let stub = FjallStub::open(&path)?;
            let reading = transact(&stub, |tx| {
                contract.create_reading(tx, &id, cycle, consumed, injected)
            })?;
            print_json(&reading)
        }
        Commands::Read { id, path } => {
            let stub = FjallStub::open(&path)?;
            let reading = contract.read_reading(&stub, &id)?;
            print_json(&reading)
        }
        Commands::List { path } => {
            let stub = FjallStub::open(&path)?;
            let readings = contract.get_all_readings(&stub)?;
            print_json(&readings)
        }
        Commands::Exists { id, path } => {
            let stub = FjallStub::open(&path)?;
            let exists = contract.reading_exists(&stub, &id)?;
            print_json(&exists)
        }
        Commands::Invoke {
            function,
            args,
            path,
        } => {
            let stub = FjallStub::open(&path)?;
            let invocation = Invocation::parse(&function, args.as_slice())?;
            let payload = transact(&stub, |tx| contract.invoke(tx, invocation))?.to_payload()?;
            if !payload.is_empty() {
                println!("{}", String::from_utf8_lossy(&payload));
            }
            Ok(())
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

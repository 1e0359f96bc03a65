//! `localsync`: inspect and edit record stores in a redb file.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use localsync_core::{Attributes, Record};
use localsync_store::{
    EmptyFetchPolicy, EngineBackend, EngineConfig, LocalSync, LocalSyncConfig, Model,
    StoreFactory, SyncConfig, SyncMethod, SyncResponse, SyncStrategy,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Inspect and edit `LocalSync` record stores.
#[derive(Parser, Debug)]
#[command(name = "localsync", version, about, long_about = None)]
struct Cli {
    /// Path of the redb database file.
    #[arg(long, env = "LOCALSYNC_DB", default_value = "localsync.redb")]
    db: PathBuf,

    /// Log output format (filter with `RUST_LOG`).
    #[arg(long, env = "LOCALSYNC_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    /// How `list` reports a store with no records.
    #[arg(long, default_value_t = EmptyFetchPolicy::Success)]
    empty_fetch: EmptyFetchPolicy,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the names of all persisted stores.
    Stores,
    /// Print every record of a store.
    List { store: String },
    /// Print one record.
    Get { store: String, id: String },
    /// Insert a record from a JSON object, generating an id if it has none.
    Create { store: String, json: String },
    /// Replace the record `id` with a JSON object.
    Update { store: String, id: String, json: String },
    /// Delete one record.
    Delete { store: String, id: String },
    /// Delete a whole store.
    Drop { store: String },
}

impl Cli {
    fn config(&self) -> LocalSyncConfig {
        LocalSyncConfig {
            engine: EngineConfig {
                backend: EngineBackend::Redb {
                    path: self.db.clone(),
                },
            },
            sync: SyncConfig {
                empty_fetch: self.empty_fetch,
            },
        }
    }
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);
    match format {
        LogFormat::Pretty => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = cli.config();
    let factory = StoreFactory::from_config(&config.engine)?;
    let sync = LocalSync::new(config.sync);
    info!(db = %cli.db.display(), command = ?cli.command, "running");

    match &cli.command {
        Command::Stores => {
            for name in factory.stored_names()? {
                println!("{name}");
            }
        }
        Command::List { store } => {
            let mut model = Model::new(Record::default()).with_store(factory.create(store));
            print_response(sync.dispatch(SyncMethod::Read, &mut model)?)?;
        }
        Command::Get { store, id } => {
            let record = Record::with_id(id.as_str(), Attributes::new());
            let mut model = Model::new(record).with_store(factory.create(store));
            print_response(sync.dispatch(SyncMethod::Read, &mut model)?)?;
        }
        Command::Create { store, json } => {
            let mut model = Model::new(parse_record(json)?).with_store(factory.create(store));
            print_response(sync.dispatch(SyncMethod::Create, &mut model)?)?;
        }
        Command::Update { store, id, json } => {
            let mut record = parse_record(json)?;
            record.assign_id(id.clone());
            let mut model = Model::new(record).with_store(factory.create(store));
            print_response(sync.dispatch(SyncMethod::Update, &mut model)?)?;
        }
        Command::Delete { store, id } => {
            let handle = factory.create(store);
            anyhow::ensure!(
                handle.find_by_id(id)?.is_some(),
                "no record `{id}` in store `{store}`"
            );
            let record = Record::with_id(id.as_str(), Attributes::new());
            let mut model = Model::new(record).with_store(handle);
            sync.dispatch(SyncMethod::Delete, &mut model)?;
            println!("deleted {id}");
        }
        Command::Drop { store } => {
            if factory.drop_store(store)? {
                println!("dropped {store}");
            } else {
                println!("no store named {store}");
            }
        }
    }
    Ok(())
}

fn parse_record(json: &str) -> anyhow::Result<Record> {
    Record::from_json(json).context("record must be a JSON object")
}

fn print_response(response: SyncResponse) -> anyhow::Result<()> {
    for record in response.into_records() {
        println!("{}", serde_json::to_string(&record)?);
    }
    Ok(())
}

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use typed_props::store::ConfigError;
use typed_props::{
    FjallRowStore, PropertyCollection, RowStore, SchemaFactory, StoreConfig, StoreError, Value,
};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Props(#[from] typed_props::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No properties stored for owner '{0}'")]
    OwnerNotFound(String),
}

#[derive(Parser)]
#[command(name = "typed-props")]
#[command(about = "Inspect and edit schema-validated property rows")]
struct Cli {
    /// Log library activity to stderr (RUST_LOG overrides the filter)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct StoreArgs {
    /// Store path
    #[arg(long, default_value = ".typed-props", env = "TYPED_PROPS_PATH")]
    path: PathBuf,

    /// TOML configuration file (takes precedence over --path)
    #[arg(long)]
    config: Option<PathBuf>,
}

impl StoreArgs {
    fn load(&self) -> Result<StoreConfig, AppError> {
        match &self.config {
            Some(file) => Ok(StoreConfig::from_file(file)?),
            None => Ok(StoreConfig::at(self.path.clone())),
        }
    }

    fn open(&self) -> Result<FjallRowStore, AppError> {
        Ok(FjallRowStore::open(&self.load()?)?)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new row store
    Init {
        #[command(flatten)]
        store: StoreArgs,
    },

    /// List owners with stored properties
    Owners {
        #[command(flatten)]
        store: StoreArgs,
    },

    /// Show the restored properties of an owner
    Show {
        /// Owning entity
        owner: String,

        #[command(flatten)]
        store: StoreArgs,
    },

    /// Print the raw flattened rows of an owner as JSON
    Rows {
        /// Owning entity
        owner: String,

        #[command(flatten)]
        store: StoreArgs,
    },

    /// Set a property, binding a default schema of the given kind if it is new
    Set {
        /// Owning entity
        owner: String,

        /// Property name
        name: String,

        /// Value text, converted to the schema's kind
        value: String,

        /// Schema discriminator for a new property (e.g. int, char, datetime)
        #[arg(long, default_value = "string")]
        kind: String,

        #[command(flatten)]
        store: StoreArgs,
    },

    /// Delete all properties of an owner
    Delete {
        /// Owning entity
        owner: String,

        #[command(flatten)]
        store: StoreArgs,
    },
}

fn init_tracing(verbose: bool) {
    let filter = match std::env::var_os("RUST_LOG") {
        Some(_) => EnvFilter::from_default_env(),
        None if verbose => EnvFilter::new("typed_props=debug"),
        None => return,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn describe(value: Option<&Value>) -> String {
    match value {
        Some(value) => value.to_string(),
        None => "<unset>".to_string(),
    }
}

fn main() -> Result<(), AppError> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Init { store } => {
            let config = store.load()?;
            let created = FjallRowStore::init(&config)?;
            drop(created);
            println!("Initialized row store at {}", config.store.path.display());
            Ok(())
        }
        Commands::Owners { store } => {
            let store = store.open()?;
            for owner in store.owners()? {
                println!("{}", owner);
            }
            Ok(())
        }
        Commands::Show { owner, store } => {
            let store = store.open()?;
            let props = store
                .load_properties(&owner)?
                .ok_or_else(|| AppError::OwnerNotFound(owner.clone()))?;

            let mut names: Vec<&str> = props.schemas().names().collect();
            names.sort_unstable();
            for name in names {
                let kind = props.schema_for(name).map_or("?", |s| s.discriminator());
                match props.get(name) {
                    Some(value) => println!("{} ({}) = {}", name, kind, value),
                    None => println!(
                        "{} ({}) = {} [default]",
                        name,
                        kind,
                        describe(props.get_or_default(name))
                    ),
                }
            }
            Ok(())
        }
        Commands::Rows { owner, store } => {
            let store = store.open()?;
            let rows = store
                .load_rows(&owner)?
                .ok_or_else(|| AppError::OwnerNotFound(owner.clone()))?;
            println!("{}", serde_json::to_string_pretty(&rows)?);
            Ok(())
        }
        Commands::Set {
            owner,
            name,
            value,
            kind,
            store,
        } => {
            let mut store = store.open()?;
            let mut props = store
                .load_properties(&owner)?
                .unwrap_or_else(PropertyCollection::new);

            if !props.contains(&name) {
                let schema = SchemaFactory::builtin()
                    .create(&name, &kind)
                    .map_err(typed_props::Error::from)?;
                props.define(name.as_str(), schema)?;
            }
            props.set(&name, value)?;
            store.save_properties(&owner, &props)?;

            println!("{}.{} = {}", owner, name, describe(props.get(&name)));
            Ok(())
        }
        Commands::Delete { owner, store } => {
            let mut store = store.open()?;
            if !store.delete_owner(&owner)? {
                return Err(AppError::OwnerNotFound(owner));
            }
            println!("Deleted properties of '{}'", owner);
            Ok(())
        }
    }
}

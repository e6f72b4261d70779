use anyhow::Context;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use gisload_core::Always;
use gisload_core::Decide;
use gisload_core::Policy;
use gisload_core::Prompt;
use gisload_pg::Credentials;
use gisload_pg::PgConnector;
use gisload_schema::ColumnSpec;
use gisload_schema::prepare;
use gisload_tables::Loader;
use gisload_tables::Origin;
use gisload_tables::Provisioner;
use std::path::Path;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "gisload", version, about = "Prepare, provision, and load PostGIS tables")]
pub struct Cli {
    #[command(flatten)]
    login: Login,
    /// Return database failures as errors instead of logging them
    #[arg(long, global = true)]
    strict: bool,
    /// Answer yes to every confirmation
    #[arg(long, global = true, conflicts_with = "no")]
    yes: bool,
    /// Answer no to every confirmation
    #[arg(long, global = true)]
    no: bool,
    /// Show debug records on the terminal
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct Login {
    #[arg(long, env = "PGUSER", default_value = "postgres")]
    user: String,
    #[arg(long, env = "PGPASSWORD", default_value = "", hide_env_values = true)]
    password: String,
    #[arg(long, env = "PGHOST", default_value = "localhost")]
    host: String,
    #[arg(long, env = "PGPORT", default_value_t = 5432)]
    port: u16,
    #[arg(long, env = "PGDATABASE", default_value = "postgres")]
    database: String,
}

impl From<Login> for Credentials {
    fn from(login: Login) -> Self {
        Self {
            user: login.user,
            password: login.password,
            host: login.host,
            port: login.port,
            database: login.database,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the connection string
    Url,
    /// Build the CREATE and INSERT clauses from a JSON column spec
    Prepare { spec: PathBuf },
    /// Create the table, or offer to truncate it if it holds rows
    Ensure { table: String, spec: PathBuf },
    /// Whether the table exists in the public schema
    Exists { table: String },
    /// Number of rows in the table
    Count { table: String },
    /// Load a headered CSV file
    Copy {
        table: String,
        csv: String,
        /// Stream the file from this machine instead of letting the server read it
        #[arg(long)]
        local: bool,
    },
    /// Print the table, labelled with the spec's columns
    Read { table: String, spec: PathBuf },
    /// Install column_exists, rename_column_if_exists and rowjsonb_to_geojson
    Routines,
}

/// Confirmation source chosen on the command line.
enum Answer {
    Scripted(Always),
    Interactive(Prompt),
}

impl Decide for Answer {
    fn decide(&mut self) -> bool {
        match self {
            Self::Scripted(always) => always.decide(),
            Self::Interactive(prompt) => prompt.decide(),
        }
    }
}

impl Cli {
    /// Terminal log level.
    pub fn level(&self) -> log::LevelFilter {
        if self.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let scripted = match (self.yes, self.no) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };
        let answer = |prompt: Prompt| match scripted {
            Some(yes) => Answer::Scripted(Always(yes)),
            None => Answer::Interactive(prompt),
        };
        let policy = Policy::from(self.strict);
        let connector = PgConnector::new(Credentials::from(self.login));
        let provisioner = Provisioner::new(&connector).with_policy(policy);
        let loader = Loader::new(&connector).with_policy(policy);
        match self.command {
            Command::Url => println!("{}", connector.credentials().url()),
            Command::Prepare { spec } => {
                let prepared = prepare(&load(&spec)?, &mut answer(Prompt::primary_key()))?;
                println!("{}", prepared.definition());
                println!("{}", prepared.names());
            }
            Command::Ensure { table, spec } => {
                let prepared = prepare(&load(&spec)?, &mut answer(Prompt::primary_key()))?;
                if prepared.is_declined() {
                    log::warn!("{} left untouched", table);
                    return Ok(());
                }
                let outcome = provisioner
                    .ensure(&table, prepared.definition(), &mut answer(Prompt::truncate()))
                    .await?;
                log::info!("{}: {:?}", table, outcome);
            }
            Command::Exists { table } => println!("{}", provisioner.exists(&table).await?),
            Command::Count { table } => match provisioner.count(&table).await? {
                Some(n) => println!("{}", n),
                None => println!("unknown"),
            },
            Command::Copy { table, csv, local } => {
                let origin = if local { Origin::Client } else { Origin::Server };
                if loader.copy(&table, &csv, origin).await? {
                    log::info!("loaded {} into {}", csv, table);
                }
            }
            Command::Read { table, spec } => {
                let columns = load(&spec)?.names().map(String::from).collect::<Vec<_>>();
                println!("{}", loader.read(&table, &columns).await?);
            }
            Command::Routines => {
                loader.install_routines().await?;
            }
        }
        Ok(())
    }
}

/// Reads a column spec from a JSON object file, keeping key order.
fn load(path: &Path) -> anyhow::Result<ColumnSpec> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading column spec {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing column spec {}", path.display()))
}

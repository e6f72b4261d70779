use super::*;
use gisload_core::Decide;
use gisload_core::Policy;
use gisload_pg::Connector;
use gisload_pg::DbError;
use gisload_pg::Lease;

/// What a table looks like right now. Observed on demand, never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableState {
    Absent,
    Empty,
    Populated(i64),
}

/// How [`Provisioner::ensure`] left the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The table did not exist and was created.
    Created,
    /// The table exists with no rows; nothing was done.
    Empty,
    /// Existing rows were removed; the recount, if it succeeded.
    Truncated(Option<i64>),
    /// The operator kept the existing rows.
    Kept(i64),
    /// A lenient failure was swallowed along the way; see the logs.
    Failed,
}

/// Create-or-confirm-truncate workflow for a target table.
///
/// Every step opens its own session and closes it before the next one.
pub struct Provisioner<'a> {
    connector: &'a dyn Connector,
    policy: Policy,
}

impl<'a> Provisioner<'a> {
    pub fn new(connector: &'a dyn Connector) -> Self {
        Self {
            connector,
            policy: Policy::default(),
        }
    }
    pub fn with_policy(self, policy: Policy) -> Self {
        Self { policy, ..self }
    }

    /// Whether `table` is in the default schema. Lenient failure: `false`.
    pub async fn exists(&self, table: &str) -> Result<bool, DbError> {
        let result: Result<bool, DbError> = async {
            let mut session = Lease::open(self.connector).await?;
            let rows = session.query(sql::EXISTS, &[table]).await?;
            Ok(rows
                .first()
                .and_then(|row| row.first())
                .and_then(|cell| cell.as_bool())
                .unwrap_or(false))
        }
        .await;
        self.policy.settle(result, false)
    }

    /// `COUNT(*)` over the whole table. Lenient failure: `None`.
    pub async fn count(&self, table: &str) -> Result<Option<i64>, DbError> {
        let result: Result<Option<i64>, DbError> = async {
            let mut session = Lease::open(self.connector).await?;
            let rows = session.query(&sql::count(table), &[]).await?;
            Ok(rows.first().and_then(|row| row.first()).and_then(|cell| cell.as_i64()))
        }
        .await;
        self.policy.settle(result, None)
    }

    pub async fn state(&self, table: &str) -> Result<Option<TableState>, DbError> {
        if !self.exists(table).await? {
            return Ok(Some(TableState::Absent));
        }
        Ok(self.count(table).await?.map(|n| match n {
            0 => TableState::Empty,
            n => TableState::Populated(n),
        }))
    }

    /// `CREATE TABLE <table> <definition>`. Lenient failure: `false`.
    pub async fn create(&self, table: &str, definition: &str) -> Result<bool, DbError> {
        let result: Result<bool, DbError> = async {
            let mut session = Lease::open(self.connector).await?;
            session.execute(&sql::create(table, definition)).await?;
            session.commit().await?;
            Ok(true)
        }
        .await;
        if let Ok(true) = result {
            log::info!("Created table: {} in {}", table, self.connector.database());
        }
        self.policy.settle(result, false)
    }

    /// Empties `table` with `TRUNCATE` and then `DELETE FROM`, committing
    /// each. Either may fail without stopping the other. Returns the
    /// recount. Under [`Policy::Strict`] the first failed statement is
    /// the error, even when the recount fails too.
    pub async fn truncate(&self, table: &str) -> Result<Option<i64>, DbError> {
        let mut first = None;
        match Lease::open(self.connector).await {
            Err(e) => first = Some(e),
            Ok(mut session) => {
                for statement in [sql::truncate(table), sql::delete(table)] {
                    let step: Result<(), DbError> = async {
                        session.execute(&statement).await?;
                        session.commit().await
                    }
                    .await;
                    match step {
                        Ok(()) => log::info!("Executed: {}", statement),
                        Err(e) => {
                            log::error!("{}: {}", statement, e);
                            if let Err(e) = session.rollback().await {
                                log::error!("rollback: {}", e);
                            }
                            first.get_or_insert(e);
                        }
                    }
                }
            }
        }
        let remaining = match self.count(table).await {
            Ok(n) => n,
            Err(_) if first.is_some() => None,
            Err(e) => return Err(e),
        };
        match remaining {
            Some(n) => log::info!("New record count: {}", n),
            None => log::warn!("New record count unknown"),
        }
        match first {
            Some(e) => self.policy.settle(Err(e), remaining),
            None => Ok(remaining),
        }
    }

    /// Makes `table` ready for a fresh load.
    ///
    /// - absent: created from `definition`, `truncate` is never asked
    /// - present and empty: nothing to do
    /// - present with rows: `truncate` decides whether the rows go
    pub async fn ensure(
        &self,
        table: &str,
        definition: &str,
        truncate: &mut impl Decide,
    ) -> Result<Outcome, DbError> {
        if !self.exists(table).await? {
            return match self.create(table, definition).await? {
                true => Ok(Outcome::Created),
                false => Ok(Outcome::Failed),
            };
        }
        log::info!("Table already exists");
        match self.count(table).await? {
            None => Ok(Outcome::Failed),
            Some(0) => {
                log::info!("Table has no records (is empty)");
                Ok(Outcome::Empty)
            }
            Some(n) => {
                log::info!(
                    "There are already {} records in the table. You will need to truncate \
                     the table's records if you set the OID to the primary key.",
                    n
                );
                if truncate.decide() {
                    Ok(Outcome::Truncated(self.truncate(table).await?))
                } else {
                    log::info!("Okay, no records were deleted");
                    Ok(Outcome::Kept(n))
                }
            }
        }
    }
}

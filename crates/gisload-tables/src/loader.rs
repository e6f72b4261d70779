use super::*;
use gisload_core::Policy;
use gisload_pg::Cell;
use gisload_pg::Connector;
use gisload_pg::DbError;
use gisload_pg::Lease;

/// Where the CSV file for [`Loader::copy`] lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// On the database host; the server opens the path itself.
    Server,
    /// On this machine; streamed over the connection.
    Client,
}

/// Moves rows between PostgreSQL tables and the caller.
///
/// Each call opens one session, runs its statements, commits, and
/// closes. Failures go through the [`Policy`].
pub struct Loader<'a> {
    connector: &'a dyn Connector,
    policy: Policy,
}

impl<'a> Loader<'a> {
    pub fn new(connector: &'a dyn Connector) -> Self {
        Self {
            connector,
            policy: Policy::default(),
        }
    }
    pub fn with_policy(self, policy: Policy) -> Self {
        Self { policy, ..self }
    }

    /// Inserts `rows` into the columns of `names` (a prepared name
    /// clause such as `(id, name)`) in one statement.
    ///
    /// With `echo`, the table's contents and row count are logged after
    /// the insert. Returns how many rows were sent; lenient failure: `0`.
    pub async fn insert(
        &self,
        table: &str,
        names: &str,
        rows: &[Vec<Cell>],
        echo: bool,
    ) -> Result<usize, DbError> {
        let Some(statement) = sql::insert(table, names, rows) else {
            log::info!("no records to add to {}", table);
            return Ok(0);
        };
        let result: Result<usize, DbError> = async {
            let mut session = Lease::open(self.connector).await?;
            session.execute(&statement).await?;
            if echo {
                for row in session.query(&sql::select(table), &[]).await? {
                    log::info!("{}", render(&row));
                }
            }
            session.commit().await?;
            Ok(rows.len())
        }
        .await;
        let inserted = self.policy.settle(result, 0)?;
        if echo && inserted > 0 {
            let total = Provisioner::new(self.connector).count(table).await?;
            log::info!("Added {} rows to {}", total.unwrap_or(0), table);
        }
        Ok(inserted)
    }

    /// Bulk-loads a headered, comma-delimited CSV file.
    ///
    /// Returns whether the load committed; lenient failure: `false`.
    pub async fn copy(&self, table: &str, path: &str, origin: Origin) -> Result<bool, DbError> {
        let result: Result<bool, DbError> = async {
            let mut session = match origin {
                Origin::Server => {
                    let mut session = Lease::open(self.connector).await?;
                    session.execute(&sql::copy_server(table, path)).await?;
                    session
                }
                Origin::Client => {
                    let data = tokio::fs::read(path).await.map_err(|source| DbError::Io {
                        path: path.to_string(),
                        source,
                    })?;
                    let mut session = Lease::open(self.connector).await?;
                    let n = session.copy_in(&sql::copy_client(table), data).await?;
                    log::info!("copied {} rows from {} into {}", n, path, table);
                    session
                }
            };
            session.commit().await?;
            Ok(true)
        }
        .await;
        self.policy.settle(result, false)
    }

    /// Reads the whole table, labelling its columns with `columns` by
    /// position. Lenient failure: an empty frame with those columns.
    pub async fn read(&self, table: &str, columns: &[String]) -> Result<Frame, DbError> {
        let result: Result<Frame, DbError> = async {
            let mut session = Lease::open(self.connector).await?;
            let rows = session.query(&sql::select(table), &[]).await?;
            Frame::new(columns.to_vec(), rows)
        }
        .await;
        self.policy.settle(result, Frame::empty(columns.to_vec()))
    }

    /// Inserts every row of `frame` into `names` of `table`.
    ///
    /// All rows go in one transaction; on failure it is rolled back and
    /// nothing is kept. Lenient failure: `false`.
    pub async fn write(&self, frame: &Frame, table: &str, names: &str) -> Result<bool, DbError> {
        let Some(statement) = sql::insert(table, names, frame.rows()) else {
            log::info!("frame is empty, nothing written to {}", table);
            return Ok(true);
        };
        let result: Result<bool, DbError> = async {
            let mut session = Lease::open(self.connector).await?;
            if let Err(e) = session.execute(&statement).await {
                if let Err(e) = session.rollback().await {
                    log::error!("rollback: {}", e);
                }
                return Err(e);
            }
            session.commit().await?;
            log::info!("the frame is inserted into {}", table);
            Ok(true)
        }
        .await;
        self.policy.settle(result, false)
    }

    /// Installs the helper routines `column_exists`,
    /// `rename_column_if_exists` and `rowjsonb_to_geojson`.
    pub async fn install_routines(&self) -> Result<bool, DbError> {
        let result: Result<bool, DbError> = async {
            let mut session = Lease::open(self.connector).await?;
            session.execute(sql::ROUTINES).await?;
            session.commit().await?;
            Ok(true)
        }
        .await;
        if let Ok(true) = result {
            log::info!("Additional functions added to {}", self.connector.database());
        }
        self.policy.settle(result, false)
    }

    /// Calls the installed `column_exists`. Lenient failure: `false`.
    pub async fn column_exists(&self, table: &str, column: &str) -> Result<bool, DbError> {
        let result: Result<bool, DbError> = async {
            let mut session = Lease::open(self.connector).await?;
            let rows = session.query(sql::COLUMN_EXISTS, &[table, column]).await?;
            Ok(rows
                .first()
                .and_then(|row| row.first())
                .and_then(|cell| cell.as_bool())
                .unwrap_or(false))
        }
        .await;
        self.policy.settle(result, false)
    }

    /// Calls the installed `rename_column_if_exists`; renaming a column
    /// that is not there is not an error. Lenient failure: `false`.
    pub async fn rename_column(&self, table: &str, from: &str, to: &str) -> Result<bool, DbError> {
        let result: Result<bool, DbError> = async {
            let mut session = Lease::open(self.connector).await?;
            session.query(sql::RENAME_COLUMN, &[table, from, to]).await?;
            session.commit().await?;
            Ok(true)
        }
        .await;
        self.policy.settle(result, false)
    }
}

fn render(row: &[Cell]) -> String {
    format!(
        "({})",
        row.iter().map(Cell::to_string).collect::<Vec<_>>().join(", ")
    )
}

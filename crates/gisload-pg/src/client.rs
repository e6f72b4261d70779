use super::*;
use bytes::Bytes;
use futures::SinkExt;
use tokio::task::JoinHandle;
use tokio_postgres::Client;
use tokio_postgres::NoTls;
use tokio_postgres::types::ToSql;

/// Opens one fresh server connection per session.
#[derive(Debug, Clone)]
pub struct PgConnector {
    credentials: Credentials,
}

impl PgConnector {
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }
}

#[async_trait::async_trait]
impl Connector for PgConnector {
    async fn open(&self) -> Result<Box<dyn Session>> {
        log::debug!("connecting to {}", self.credentials.database);
        let (client, connection) = self
            .credentials
            .config()
            .connect(NoTls)
            .await
            .map_err(DbError::connection)?;
        let driver = tokio::spawn(async move {
            if let Err(e) = connection.await {
                log::error!("connection error: {}", e);
            }
        });
        let session = PgSession {
            client: Some(client),
            driver: Some(driver),
            open: false,
        };
        session.client()?.batch_execute("SET client_min_messages TO WARNING").await?;
        Ok(Box::new(session))
    }
    fn database(&self) -> &str {
        &self.credentials.database
    }
}

/// A [`Session`] over a tokio-postgres client and its driver task.
pub struct PgSession {
    client: Option<Client>,
    driver: Option<JoinHandle<()>>,
    open: bool,
}

impl PgSession {
    fn client(&self) -> Result<&Client> {
        self.client.as_ref().ok_or(DbError::Closed)
    }
    async fn begin(&mut self) -> Result<()> {
        if !self.open {
            self.client()?.batch_execute("BEGIN").await?;
            self.open = true;
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl Session for PgSession {
    async fn execute(&mut self, sql: &str) -> Result<()> {
        self.begin().await?;
        log::debug!("executing: {}", sql);
        Ok(self.client()?.batch_execute(sql).await?)
    }
    async fn query(&mut self, sql: &str, params: &[&str]) -> Result<Vec<Vec<Cell>>> {
        self.begin().await?;
        log::debug!("querying: {}", sql);
        let params = params
            .iter()
            .map(|p| p as &(dyn ToSql + Sync))
            .collect::<Vec<_>>();
        self.client()?
            .query(sql, &params)
            .await?
            .iter()
            .map(|row| {
                (0..row.len())
                    .map(|i| Cell::decode(row, i))
                    .collect::<std::result::Result<Vec<_>, _>>()
            })
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(DbError::from)
    }
    async fn copy_in(&mut self, sql: &str, data: Vec<u8>) -> Result<u64> {
        self.begin().await?;
        log::debug!("copying {} bytes: {}", data.len(), sql);
        let sink = self.client()?.copy_in::<_, Bytes>(sql).await?;
        futures::pin_mut!(sink);
        sink.send(Bytes::from(data)).await?;
        Ok(sink.as_mut().finish().await?)
    }
    async fn commit(&mut self) -> Result<()> {
        if self.open {
            self.client()?.batch_execute("COMMIT").await?;
            self.open = false;
        }
        Ok(())
    }
    async fn rollback(&mut self) -> Result<()> {
        if self.open {
            self.open = false;
            self.client()?.batch_execute("ROLLBACK").await?;
        }
        Ok(())
    }
    fn close(&mut self) {
        if self.client.take().is_some() {
            log::debug!("session closed");
        }
        if let Some(driver) = self.driver.take() {
            driver.abort();
        }
        self.open = false;
    }
}

impl Drop for PgSession {
    fn drop(&mut self) {
        self.close();
    }
}

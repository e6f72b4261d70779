use super::*;

/// One live database session: a connection plus its open transaction.
///
/// Statements run inside a transaction that begins with the first
/// statement; [`Session::commit`] ends it and the next statement starts
/// another. Closing without committing discards uncommitted work.
#[async_trait::async_trait]
pub trait Session: Send {
    /// Runs one or more statements that return no rows.
    async fn execute(&mut self, sql: &str) -> Result<()>;
    /// Runs a single statement with text parameters bound to `$1..$n`.
    async fn query(&mut self, sql: &str, params: &[&str]) -> Result<Vec<Vec<Cell>>>;
    /// Streams `data` into a `COPY ... FROM STDIN` statement.
    async fn copy_in(&mut self, sql: &str, data: Vec<u8>) -> Result<u64>;
    async fn commit(&mut self) -> Result<()>;
    async fn rollback(&mut self) -> Result<()>;
    /// Releases the connection. Calling it again is a no-op.
    fn close(&mut self);
}

/// Session provider.
#[async_trait::async_trait]
pub trait Connector: Send + Sync {
    async fn open(&self) -> Result<Box<dyn Session>>;
    /// Name of the database sessions land in, for reporting.
    fn database(&self) -> &str;
}

/// A session scoped to one operation.
///
/// Dropping the lease closes the session, so early returns and `?`
/// propagation release the connection just like the normal path does.
pub struct Lease(Box<dyn Session>);

impl Lease {
    pub async fn open(connector: &dyn Connector) -> Result<Self> {
        connector.open().await.map(Self)
    }
}

impl std::ops::Deref for Lease {
    type Target = dyn Session;
    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl std::ops::DerefMut for Lease {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.0.as_mut()
    }
}

impl Drop for Lease {
    fn drop(&mut self) {
        self.0.close();
    }
}

//! In-memory stand-in for a PostgreSQL server.
//!
//! Understands just the statements this crate emits, applies them
//! immediately, and keeps a log of every statement and session.
use gisload_pg::*;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;

#[derive(Default)]
pub struct Server {
    pub tables: BTreeMap<String, Vec<Vec<Cell>>>,
    pub statements: Vec<String>,
    pub opened: usize,
    pub closed: usize,
    pub commits: usize,
    pub rollbacks: usize,
    /// Statements containing any of these fragments fail.
    pub failing: Vec<String>,
    pub unreachable: bool,
}

#[derive(Clone, Default)]
pub struct Mock(pub Arc<Mutex<Server>>);

impl Mock {
    pub fn with_table(self, name: &str, rows: usize) -> Self {
        let rows = (0..rows as i64).map(|i| vec![Cell::Int(i)]).collect();
        self.server().tables.insert(name.into(), rows);
        self
    }
    pub fn failing(self, fragment: &str) -> Self {
        self.server().failing.push(fragment.into());
        self
    }
    pub fn unreachable(self) -> Self {
        self.server().unreachable = true;
        self
    }
    pub fn server(&self) -> std::sync::MutexGuard<'_, Server> {
        self.0.lock().unwrap()
    }
    pub fn rows(&self, table: &str) -> Option<usize> {
        self.server().tables.get(table).map(Vec::len)
    }
    /// Statements that change data or schema.
    pub fn mutations(&self) -> Vec<String> {
        self.server()
            .statements
            .iter()
            .filter(|s| !s.starts_with("SELECT"))
            .cloned()
            .collect()
    }
}

#[async_trait::async_trait]
impl Connector for Mock {
    async fn open(&self) -> Result<Box<dyn Session>> {
        let mut server = self.server();
        if server.unreachable {
            return Err(DbError::Connection("could not connect to server".into()));
        }
        server.opened += 1;
        Ok(Box::new(MockSession {
            server: self.0.clone(),
            open: true,
        }))
    }
    fn database(&self) -> &str {
        "gis"
    }
}

struct MockSession {
    server: Arc<Mutex<Server>>,
    open: bool,
}

fn table_after<'a>(sql: &'a str, prefix: &str) -> &'a str {
    sql[prefix.len()..]
        .split_whitespace()
        .next()
        .unwrap_or_default()
}

impl MockSession {
    fn run(&mut self, sql: &str, params: &[&str]) -> Result<Vec<Vec<Cell>>> {
        if !self.open {
            return Err(DbError::Closed);
        }
        let mut server = self.server.lock().unwrap();
        server.statements.push(sql.to_string());
        if server.failing.iter().any(|f| sql.contains(f.as_str())) {
            return Err(DbError::Operational(format!("ERROR: cannot run {}", sql)));
        }
        let missing = |t: &str| DbError::Operational(format!("ERROR: relation \"{}\" does not exist", t));
        if sql.contains("pg_tables") {
            let exists = server.tables.contains_key(params[0]);
            Ok(vec![vec![Cell::Bool(exists)]])
        } else if sql.starts_with("SELECT COUNT(*) FROM ") {
            let t = table_after(sql, "SELECT COUNT(*) FROM ");
            let n = server.tables.get(t).ok_or_else(|| missing(t))?.len();
            Ok(vec![vec![Cell::Int(n as i64)]])
        } else if sql.starts_with("SELECT * FROM ") {
            let t = table_after(sql, "SELECT * FROM ");
            server.tables.get(t).cloned().ok_or_else(|| missing(t))
        } else if sql.starts_with("SELECT column_exists") {
            Ok(vec![vec![Cell::Bool(params[1] == "geom")]])
        } else if sql.starts_with("SELECT rename_column_if_exists") {
            Ok(vec![vec![Cell::Raw(String::new())]])
        } else if sql.starts_with("CREATE TABLE ") {
            let t = table_after(sql, "CREATE TABLE ").to_string();
            if server.tables.contains_key(&t) {
                return Err(DbError::Operational(format!("ERROR: relation \"{}\" already exists", t)));
            }
            server.tables.insert(t, Vec::new());
            Ok(vec![])
        } else if sql.starts_with("TRUNCATE ") || sql.starts_with("DELETE FROM ") {
            let prefix = if sql.starts_with("TRUNCATE ") { "TRUNCATE " } else { "DELETE FROM " };
            let t = table_after(sql, prefix);
            server.tables.get_mut(t).ok_or_else(|| missing(t))?.clear();
            Ok(vec![])
        } else if sql.starts_with("INSERT INTO ") {
            let t = table_after(sql, "INSERT INTO ");
            let n = sql.matches("), (").count() + 1;
            let rows = server.tables.get_mut(t).ok_or_else(|| missing(t))?;
            rows.extend((0..n as i64).map(|i| vec![Cell::Int(i)]));
            Ok(vec![])
        } else if sql.starts_with("COPY ") {
            let t = table_after(sql, "COPY ");
            server.tables.get_mut(t).ok_or_else(|| missing(t))?;
            Ok(vec![])
        } else {
            Ok(vec![])
        }
    }
}

#[async_trait::async_trait]
impl Session for MockSession {
    async fn execute(&mut self, sql: &str) -> Result<()> {
        self.run(sql, &[]).map(|_| ())
    }
    async fn query(&mut self, sql: &str, params: &[&str]) -> Result<Vec<Vec<Cell>>> {
        self.run(sql, params)
    }
    async fn copy_in(&mut self, sql: &str, data: Vec<u8>) -> Result<u64> {
        self.run(sql, &[])?;
        let lines = String::from_utf8_lossy(&data).lines().count();
        let copied = lines.saturating_sub(1);
        let t = table_after(sql, "COPY ").to_string();
        let mut server = self.server.lock().unwrap();
        if let Some(rows) = server.tables.get_mut(&t) {
            rows.extend((0..copied as i64).map(|i| vec![Cell::Int(i)]));
        }
        Ok(copied as u64)
    }
    async fn commit(&mut self) -> Result<()> {
        self.server.lock().unwrap().commits += 1;
        Ok(())
    }
    async fn rollback(&mut self) -> Result<()> {
        self.server.lock().unwrap().rollbacks += 1;
        Ok(())
    }
    fn close(&mut self) {
        if std::mem::replace(&mut self.open, false) {
            self.server.lock().unwrap().closed += 1;
        }
    }
}

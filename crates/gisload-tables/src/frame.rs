use gisload_pg::Cell;
use gisload_pg::DbError;

/// In-memory table: named columns over rows of [`Cell`]s.
///
/// Every row is exactly as wide as the column list; cells line up with
/// columns by position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Frame {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Result<Self, DbError> {
        let expected = columns.len();
        if let Some(row) = rows.iter().find(|row| row.len() != expected) {
            return Err(DbError::Shape {
                expected,
                found: row.len(),
            });
        }
        Ok(Self { columns, rows })
    }
    pub fn empty(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }
    pub fn columns(&self) -> &[String] {
        &self.columns
    }
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }
    pub fn len(&self) -> usize {
        self.rows.len()
    }
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
    pub fn column(&self, name: &str) -> Option<Vec<&Cell>> {
        let i = self.columns.iter().position(|c| c == name)?;
        Some(self.rows.iter().map(|row| &row[i]).collect())
    }
    pub fn push(&mut self, row: Vec<Cell>) -> Result<(), DbError> {
        if row.len() != self.columns.len() {
            return Err(DbError::Shape {
                expected: self.columns.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }
}

impl std::fmt::Display for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rendered = self
            .rows
            .iter()
            .map(|row| row.iter().map(Cell::to_string).collect::<Vec<_>>())
            .collect::<Vec<_>>();
        let widths = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, c)| {
                rendered
                    .iter()
                    .map(|row| row[i].chars().count())
                    .chain(std::iter::once(c.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect::<Vec<_>>();
        let line = |cells: Vec<&str>| {
            cells
                .iter()
                .zip(&widths)
                .map(|(cell, w)| format!("{:<w$}", cell, w = *w))
                .collect::<Vec<_>>()
                .join(" | ")
        };
        writeln!(f, "{}", line(self.columns.iter().map(String::as_str).collect()))?;
        writeln!(
            f,
            "{}",
            widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("-+-")
        )?;
        for row in &rendered {
            writeln!(f, "{}", line(row.iter().map(String::as_str).collect()))?;
        }
        write!(f, "({} rows)", self.rows.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    fn roads() -> Frame {
        Frame::new(
            vec!["id".into(), "name".into()],
            vec![
                vec![Cell::Int(1), Cell::from("Main St")],
                vec![Cell::Int(22), Cell::Null],
            ],
        )
        .unwrap()
    }
    #[test]
    fn ragged_rows_are_rejected() {
        let frame = Frame::new(vec!["id".into()], vec![vec![Cell::Int(1), Cell::Int(2)]]);
        assert!(matches!(frame, Err(DbError::Shape { expected: 1, found: 2 })));
        assert!(roads().push(vec![]).is_err());
    }
    #[test]
    fn columns_by_name() {
        let frame = roads();
        assert_eq!(frame.column("id"), Some(vec![&Cell::Int(1), &Cell::Int(22)]));
        assert_eq!(frame.column("geom"), None);
        assert_eq!(frame.len(), 2);
    }
    #[test]
    fn renders_aligned() {
        let text = roads().to_string();
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], "id | name   ");
        assert_eq!(lines[1], "---+--------");
        assert_eq!(lines[2], "1  | Main St");
        assert_eq!(lines[3], "22 | NULL   ");
        assert_eq!(lines[4], "(2 rows)");
    }
}

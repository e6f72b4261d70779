use super::*;
use gisload_core::Decide;
use gisload_pg::quote_ident;

/// Placeholder left in every clause when preparation is declined.
pub const NOT_PREPARED: &str = "Not prepared";
/// Suffix of a type string that declares the primary key.
pub const PRIMARY_KEY: &str = "primary key";

/// Clauses derived from a [`ColumnSpec`].
///
/// - `definition`: `(id serial primary key, name text)` for `CREATE TABLE`
/// - `names`: `(id, name)` for `INSERT`
/// - `list`: `["id", "name"]`
///
/// A declined preparation carries [`NOT_PREPARED`] in all three; the
/// caller is expected to edit the spec and prepare again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prepared {
    definition: String,
    names: String,
    list: Vec<String>,
    declined: bool,
}

impl Prepared {
    fn declined() -> Self {
        Self {
            definition: NOT_PREPARED.into(),
            names: NOT_PREPARED.into(),
            list: vec![NOT_PREPARED.into()],
            declined: true,
        }
    }
    pub fn definition(&self) -> &str {
        &self.definition
    }
    pub fn names(&self) -> &str {
        &self.names
    }
    pub fn list(&self) -> &[String] {
        &self.list
    }
    pub fn is_declined(&self) -> bool {
        self.declined
    }
}

/// Whether the operator has ruled on the primary key during one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Choice {
    Unset,
    Confirmed,
}

/// Builds the `CREATE TABLE` and `INSERT` clauses for `spec`.
///
/// The first column whose type ends in `primary key` triggers exactly one
/// call to `confirm`. Declining abandons the clauses and returns the
/// [`NOT_PREPARED`] placeholders; confirming keeps every column.
///
/// A spec declaring several primary keys, or carrying type text with `;`
/// or `--`, is rejected before anyone is asked.
pub fn prepare(spec: &ColumnSpec, confirm: &mut impl Decide) -> Result<Prepared, SpecError> {
    validate(spec)?;
    let mut choice = Choice::Unset;
    let mut definitions = Vec::with_capacity(spec.len());
    let mut names = Vec::with_capacity(spec.len());
    for (name, ty) in spec.iter() {
        if ty.ends_with(PRIMARY_KEY) && choice == Choice::Unset {
            log::warn!(
                "You have elected to use a primary key. This means you will not be able to \
                 append a list without first setting the primary key value to start with the \
                 next available integer."
            );
            if !confirm.decide() {
                log::warn!(
                    "Remove the words '{}' from column '{}' and prepare again.",
                    PRIMARY_KEY,
                    name
                );
                log::warn!("No table columns have been prepared. They must be prepared before continuing.");
                return Ok(Prepared::declined());
            }
            choice = Choice::Confirmed;
        }
        let name = quote_ident(name);
        definitions.push(format!("{} {}", name, ty));
        names.push(name);
    }
    let prepared = Prepared {
        definition: format!("({})", definitions.join(", ")),
        names: format!("({})", names.join(", ")),
        list: spec.names().map(String::from).collect(),
        declined: false,
    };
    log::info!("Table Names List Formatted String: {}", prepared.names);
    log::info!("Table Columns Formatted String: {}", prepared.definition);
    log::info!("Table Columns as Formatted List: {:?}", prepared.list);
    Ok(prepared)
}

fn validate(spec: &ColumnSpec) -> Result<(), SpecError> {
    if let Some((column, ty)) = spec.iter().find(|(_, ty)| ty.contains(';') || ty.contains("--")) {
        return Err(SpecError::UnsafeType {
            column: column.into(),
            ty: ty.into(),
        });
    }
    let keys = spec
        .iter()
        .filter(|(_, ty)| ty.ends_with(PRIMARY_KEY))
        .map(|(name, _)| name.to_string())
        .collect::<Vec<_>>();
    match keys.len() {
        0 | 1 => Ok(()),
        _ => Err(SpecError::PrimaryKeys(keys)),
    }
}

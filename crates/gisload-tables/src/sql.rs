//! Statement text for every round trip the crate makes.
//!
//! Table and column names pass through [`quote_ident`]; literal text
//! through [`quote_literal`]. Type text and prepared clauses are used as
//! given.
use gisload_pg::Cell;
use gisload_pg::quote_ident;
use gisload_pg::quote_literal;

/// Options shared by both COPY forms.
pub const CSV: &str = "DELIMITER ',' CSV HEADER";

#[rustfmt::skip]
pub const EXISTS: &str = const_format::concatcp!(
    "SELECT EXISTS (SELECT FROM pg_tables ",
    "WHERE schemaname = '", gisload_pg::DEFAULT_SCHEMA, "' ",
    "AND tablename = $1)"
);

pub fn create(table: &str, definition: &str) -> String {
    format!("CREATE TABLE {} {}", quote_ident(table), definition)
}

pub fn truncate(table: &str) -> String {
    format!("TRUNCATE {}", quote_ident(table))
}

pub fn delete(table: &str) -> String {
    format!("DELETE FROM {}", quote_ident(table))
}

pub fn count(table: &str) -> String {
    format!("SELECT COUNT(*) FROM {}", quote_ident(table))
}

pub fn select(table: &str) -> String {
    format!("SELECT * FROM {}", quote_ident(table))
}

/// Multi-row `INSERT`, or `None` when there is nothing to insert.
pub fn insert(table: &str, names: &str, rows: &[Vec<Cell>]) -> Option<String> {
    if rows.is_empty() {
        return None;
    }
    let values = rows
        .iter()
        .map(|row| row.iter().map(Cell::literal).collect::<Vec<_>>().join(", "))
        .map(|row| format!("({})", row))
        .collect::<Vec<_>>()
        .join(", ");
    Some(format!("INSERT INTO {} {} VALUES {}", quote_ident(table), names, values))
}

/// `COPY` from a file the server itself can read.
pub fn copy_server(table: &str, path: &str) -> String {
    format!("COPY {} FROM {} {}", quote_ident(table), quote_literal(path), CSV)
}

/// `COPY` fed by the client over the connection.
pub fn copy_client(table: &str) -> String {
    format!("COPY {} FROM STDIN {}", quote_ident(table), CSV)
}

pub const COLUMN_EXISTS: &str = "SELECT column_exists($1, $2)";
pub const RENAME_COLUMN: &str = "SELECT rename_column_if_exists($1, $2, $3)";

const COLUMN_EXISTS_FN: &str = "
CREATE OR REPLACE FUNCTION column_exists(ptable text, pcolumn text, pschema text default 'public')
    RETURNS boolean
    LANGUAGE sql STABLE STRICT
AS $body$
    SELECT EXISTS (
        SELECT NULL
          FROM information_schema.columns
         WHERE table_name = ptable
           AND column_name = pcolumn
           AND table_schema = pschema
    );
$body$;";

const RENAME_COLUMN_FN: &str = "
CREATE OR REPLACE FUNCTION rename_column_if_exists(ptable text, pcolumn text, new_name text)
    RETURNS void AS $body$
BEGIN
    IF column_exists(ptable, pcolumn) THEN
        EXECUTE format('ALTER TABLE %I RENAME COLUMN %I TO %I;', ptable, pcolumn, new_name);
    END IF;
END$body$
LANGUAGE plpgsql VOLATILE;";

const GEOJSON_FN: &str = "
CREATE OR REPLACE FUNCTION rowjsonb_to_geojson(rowjsonb jsonb, geometry text DEFAULT 'geom')
    RETURNS text AS $body$
DECLARE
    json_props jsonb;
    json_geom  jsonb;
    json_type  jsonb;
BEGIN
    IF NOT rowjsonb ? geometry THEN
        RAISE EXCEPTION 'geometry column ''%'' is missing', geometry;
    END IF;
    json_geom  := ST_AsGeoJSON((rowjsonb ->> geometry)::geometry)::jsonb;
    json_geom  := jsonb_build_object('geom', json_geom);
    json_props := jsonb_build_object('properties', rowjsonb - geometry);
    json_type  := jsonb_build_object('type', 'Feature');
    RETURN (json_type || json_geom || json_props)::text;
END;
$body$
LANGUAGE plpgsql IMMUTABLE STRICT;";

/// Installs `column_exists`, `rename_column_if_exists` and
/// `rowjsonb_to_geojson`.
pub const ROUTINES: &str = const_format::concatcp!(COLUMN_EXISTS_FN, RENAME_COLUMN_FN, GEOJSON_FN);

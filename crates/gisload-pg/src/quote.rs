/// Fully reserved keywords.
#[rustfmt::skip]
const RESERVED: &[&str] = &[
    "all", "analyse", "analyze", "and", "any", "array", "as", "asc",
    "asymmetric", "both", "case", "cast", "check", "collate", "column",
    "constraint", "create", "current_catalog", "current_date",
    "current_role", "current_time", "current_timestamp", "current_user",
    "default", "deferrable", "desc", "distinct", "do", "else", "end",
    "except", "false", "fetch", "for", "foreign", "from", "grant", "group",
    "having", "in", "initially", "intersect", "into", "lateral", "leading",
    "limit", "localtime", "localtimestamp", "not", "null", "offset", "on",
    "only", "or", "order", "placing", "primary", "references", "returning",
    "select", "session_user", "some", "symmetric", "system_user", "table",
    "then", "to", "trailing", "true", "union", "unique", "user", "using",
    "variadic", "when", "where", "window", "with",
];

/// Keywords allowed as function or type names but not as column names.
#[rustfmt::skip]
const TYPE_FUNC_NAME: &[&str] = &[
    "authorization", "binary", "collation", "concurrently", "cross",
    "current_schema", "freeze", "full", "ilike", "inner", "is", "isnull",
    "join", "left", "like", "natural", "notnull", "outer", "overlaps",
    "right", "similar", "tablesample", "verbose",
];

/// Keywords allowed as column names but not as function or type names.
/// `quote_ident` still quotes them.
#[rustfmt::skip]
const COL_NAME: &[&str] = &[
    "between", "bigint", "bit", "boolean", "char", "character", "coalesce",
    "dec", "decimal", "exists", "extract", "float", "greatest", "grouping",
    "inout", "int", "integer", "interval", "json", "json_array",
    "json_arrayagg", "json_object", "json_objectagg", "json_scalar",
    "json_serialize", "least", "national", "nchar", "none", "normalize",
    "nullif", "numeric", "out", "overlay", "position", "precision", "real",
    "row", "setof", "smallint", "substring", "time", "timestamp", "treat",
    "trim", "values", "varchar", "xmlattributes", "xmlconcat", "xmlelement",
    "xmlexists", "xmlforest", "xmlnamespaces", "xmlparse", "xmlpi",
    "xmlroot", "xmlserialize", "xmltable",
];

fn keyword(name: &str) -> bool {
    [RESERVED, TYPE_FUNC_NAME, COL_NAME]
        .iter()
        .any(|words| words.contains(&name))
}

/// Quotes an identifier the way PostgreSQL's `quote_ident` does.
///
/// Lower-case names made of letters, digits, `_` and `$` that are not
/// keywords stay bare; anything else is wrapped in double quotes
/// with embedded quotes doubled.
pub fn quote_ident(name: &str) -> String {
    let bare = name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_lowercase() || c == '_')
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '$')
        && !keyword(name);
    if bare {
        name.to_string()
    } else {
        format!("\"{}\"", name.replace('"', "\"\""))
    }
}

/// Wraps text in single quotes with embedded quotes doubled.
///
/// Backslashes need no escaping under `standard_conforming_strings`,
/// the server default since 9.1.
pub fn quote_literal(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn plain_names_stay_bare() {
        assert_eq!(quote_ident("parcels"), "parcels");
        assert_eq!(quote_ident("_geom2"), "_geom2");
    }
    #[test]
    fn mixed_case_and_spaces_are_quoted() {
        assert_eq!(quote_ident("Parcels"), "\"Parcels\"");
        assert_eq!(quote_ident("land use"), "\"land use\"");
        assert_eq!(quote_ident("2024"), "\"2024\"");
        assert_eq!(quote_ident(""), "\"\"");
    }
    #[test]
    fn reserved_words_are_quoted() {
        assert_eq!(quote_ident("user"), "\"user\"");
        assert_eq!(quote_ident("order"), "\"order\"");
    }
    #[test]
    fn type_and_function_name_keywords_are_quoted() {
        for word in ["left", "right", "join", "full", "is", "like", "natural", "verbose"] {
            assert_eq!(quote_ident(word), format!("\"{}\"", word));
        }
        assert_eq!(quote_ident("system_user"), "\"system_user\"");
    }
    #[test]
    fn column_name_keywords_are_quoted() {
        assert_eq!(quote_ident("time"), "\"time\"");
        assert_eq!(quote_ident("position"), "\"position\"");
    }
    #[test]
    fn unreserved_keywords_stay_bare() {
        assert_eq!(quote_ident("name"), "name");
        assert_eq!(quote_ident("zone"), "zone");
    }
    #[test]
    fn injection_is_contained() {
        assert_eq!(
            quote_ident("x\"; DROP TABLE y; --"),
            "\"x\"\"; DROP TABLE y; --\""
        );
        assert_eq!(quote_literal("a'; DROP TABLE y; --"), "'a''; DROP TABLE y; --'");
    }
}

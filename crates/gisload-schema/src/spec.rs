use super::*;
use serde::Deserialize;
use serde::Deserializer;
use serde::de::MapAccess;
use serde::de::Visitor;

/// Ordered mapping of column name to type-and-constraint text,
/// e.g. `id → "serial primary key"`.
///
/// Order is declaration order and is preserved through preparation.
/// Deserializes from a JSON object, keeping the object's key order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnSpec {
    columns: Vec<(String, String)>,
}

impl ColumnSpec {
    pub fn new() -> Self {
        Self::default()
    }
    /// Appends a column, failing if the name is already taken.
    pub fn push(&mut self, name: impl Into<String>, ty: impl Into<String>) -> Result<(), SpecError> {
        let name = name.into();
        if self.contains(&name) {
            return Err(SpecError::Duplicate(name));
        }
        self.columns.push((name, ty.into()));
        Ok(())
    }
    /// Builder form of [`ColumnSpec::push`].
    pub fn with(mut self, name: impl Into<String>, ty: impl Into<String>) -> Result<Self, SpecError> {
        self.push(name, ty)?;
        Ok(self)
    }
    pub fn contains(&self, name: &str) -> bool {
        self.columns.iter().any(|(n, _)| n == name)
    }
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.columns.iter().map(|(n, t)| (n.as_str(), t.as_str()))
    }
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(n, _)| n.as_str())
    }
    pub fn len(&self) -> usize {
        self.columns.len()
    }
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl<'de> Deserialize<'de> for ColumnSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct Ordered;
        impl<'de> Visitor<'de> for Ordered {
            type Value = ColumnSpec;
            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("an object of column name to SQL type")
            }
            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<ColumnSpec, A::Error> {
                let mut spec = ColumnSpec::new();
                while let Some((name, ty)) = map.next_entry::<String, String>()? {
                    spec.push(name, ty).map_err(serde::de::Error::custom)?;
                }
                Ok(spec)
            }
        }
        deserializer.deserialize_map(Ordered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn json_keeps_declaration_order() {
        let spec: ColumnSpec =
            serde_json::from_str(r#"{"zoning": "text", "area": "real", "id": "serial primary key"}"#)
                .unwrap();
        assert_eq!(spec.names().collect::<Vec<_>>(), vec!["zoning", "area", "id"]);
    }
    #[test]
    fn json_rejects_duplicates() {
        let spec = serde_json::from_str::<ColumnSpec>(r#"{"id": "int", "id": "text"}"#);
        assert!(spec.is_err());
    }
    #[test]
    fn push_rejects_duplicates() {
        let spec = ColumnSpec::new().with("id", "int").unwrap();
        assert_eq!(
            spec.with("id", "text"),
            Err(SpecError::Duplicate("id".into()))
        );
    }
}

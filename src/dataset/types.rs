use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

/// One evaluated centre: an ordered set of named cells.
///
/// Column order is preserved from the source file so rendered output
/// lines up with the input. Scoring reads the six criterion fields and
/// passes everything else through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Entity {
    fields: IndexMap<String, Value>,
}

impl Entity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Set a field. An existing key keeps its position and takes the new value.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.fields.insert(key.into(), value);
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// String form of a field for display; `None` for missing or null cells.
    pub fn text(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Entity {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_insert_preserves_order() {
        let mut entity = Entity::new();
        entity.insert("Centre", json!("Sunrise"));
        entity.insert("Cost", json!(7));
        entity.insert("Address", json!("1 Main St"));

        let keys: Vec<&str> = entity.fields().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["Centre", "Cost", "Address"]);
    }

    #[test]
    fn test_insert_existing_key_replaces_in_place() {
        let mut entity = Entity::new();
        entity.insert("name", json!("first"));
        entity.insert("cost", json!(1));
        entity.insert("name", json!("second"));

        assert_eq!(entity.len(), 2);
        let keys: Vec<&str> = entity.fields().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["name", "cost"]);
        assert_eq!(entity.get("name"), Some(&json!("second")));
    }

    #[test]
    fn test_text_of_null_is_none() {
        let entity: Entity = vec![("a", Value::Null), ("b", json!(2.5))]
            .into_iter()
            .collect();
        assert_eq!(entity.text("a"), None);
        assert_eq!(entity.text("b"), Some("2.5".to_string()));
        assert_eq!(entity.text("missing"), None);
    }

    #[test]
    fn test_collect_keeps_first_position_of_repeated_key() {
        let entity: Entity = vec![("b", json!(1)), ("a", json!(2)), ("b", json!(3))]
            .into_iter()
            .collect();
        assert_eq!(entity.len(), 2);
        assert_eq!(serde_json::to_string(&entity).unwrap(), r#"{"b":3,"a":2}"#);
    }

    #[test]
    fn test_serializes_as_ordered_object() {
        let entity: Entity = vec![("z", json!(1)), ("a", json!("x"))]
            .into_iter()
            .collect();
        let rendered = serde_json::to_string(&entity).unwrap();
        assert_eq!(rendered, r#"{"z":1,"a":"x"}"#);
    }
}

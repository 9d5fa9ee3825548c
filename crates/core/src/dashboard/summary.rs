use crate::dashboard::format::display_value;
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KvRow {
    pub key: String,
    pub value: String,
}

/// Two-column label/value panel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KvPanel {
    pub rows: Vec<KvRow>,
}

impl KvPanel {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|r| r.key == key)
            .map(|r| r.value.as_str())
    }
}

/// Render `obj` in `keys` order, or in the object's own key order when `keys` is `None`.
/// Missing and null values render as empty strings.
pub fn render_kv(obj: &Map<String, Value>, keys: Option<&[&str]>) -> KvPanel {
    let rows = match keys {
        Some(keys) => keys
            .iter()
            .map(|k| KvRow {
                key: k.to_string(),
                value: obj.get(*k).map(display_value).unwrap_or_default(),
            })
            .collect(),
        None => obj
            .iter()
            .map(|(k, v)| KvRow {
                key: k.clone(),
                value: display_value(v),
            })
            .collect(),
    };
    KvPanel { rows }
}

use common::{DeskError, DeskResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The pension information sheet: free text typed by staff plus the
/// structured analysis the backend AI extracted from it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PensionInfo {
    #[serde(default)]
    pub raw_text: String,
    #[serde(default)]
    pub analyzed_info: Option<Value>,
}

impl PensionInfo {
    pub fn new(raw_text: impl Into<String>) -> Self {
        Self {
            raw_text: raw_text.into(),
            analyzed_info: None,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.raw_text.trim().is_empty()
    }

    /// Set one field of the analysis, e.g. `basic_info.name`.
    pub fn set_analyzed_field(&mut self, path: &str, value: Value) -> DeskResult<()> {
        let root = self
            .analyzed_info
            .get_or_insert_with(|| Value::Object(Map::new()));
        set_path(root, path, value)
    }

    pub fn analyzed_field(&self, path: &str) -> Option<&Value> {
        let mut current = self.analyzed_info.as_ref()?;
        for key in path.split('.') {
            current = current.get(key)?;
        }
        Some(current)
    }
}

/// Write `value` at a dotted `path`, creating intermediate objects.
///
/// Null intermediates are replaced by objects; any other non-object
/// intermediate is rejected rather than overwritten.
pub fn set_path(root: &mut Value, path: &str, value: Value) -> DeskResult<()> {
    let keys: Vec<&str> = path.split('.').collect();
    if keys.iter().any(|key| key.is_empty()) {
        return Err(DeskError::validation(format!("invalid field path: '{path}'")));
    }

    let (last, parents) = keys
        .split_last()
        .ok_or_else(|| DeskError::validation("empty field path"))?;

    let mut current = root;
    for key in parents {
        if current.is_null() {
            *current = Value::Object(Map::new());
        }
        let object = current.as_object_mut().ok_or_else(|| {
            DeskError::validation(format!("'{key}' in '{path}' is not an object"))
        })?;
        current = object
            .entry(key.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
    }

    if current.is_null() {
        *current = Value::Object(Map::new());
    }
    let object = current
        .as_object_mut()
        .ok_or_else(|| DeskError::validation(format!("parent of '{path}' is not an object")))?;
    object.insert(last.to_string(), value);
    Ok(())
}

use serde_json::{Map, Value};

use crate::components::ids;

/// Host-supplied application settings.
///
/// Parsed leniently: unknown keys are ignored, missing or malformed values
/// fall back to the defaults, and numbers/booleans may arrive as strings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppSettings {
    pub mount_id: String,
    pub title: String,
    pub shortcuts: bool,
    pub log_level: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            mount_id: ids::ROOT.to_string(),
            title: "Counter".to_string(),
            shortcuts: true,
            log_level: "info".to_string(),
        }
    }
}

impl AppSettings {
    pub fn from_map(v: &Map<String, Value>) -> Self {
        let mut s = Self::default();
        if let Some(id) = get_str(v, "mountId").map(str::trim).filter(|id| !id.is_empty()) {
            s.mount_id = id.to_string();
        }
        if let Some(title) = get_str(v, "title") {
            s.title = title.to_string();
        }
        if let Some(on) = get_bool(v, "shortcuts") {
            s.shortcuts = on;
        }
        if let Some(level) = get_str(v, "logLevel") {
            s.log_level = level.trim().to_lowercase();
        }
        s
    }

    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        let value: Value = serde_json::from_str(raw)?;
        match value {
            Value::Object(map) => Ok(Self::from_map(&map)),
            other => anyhow::bail!("settings must be a JSON object, got `{other}`"),
        }
    }
}

fn get_str<'a>(v: &'a Map<String, Value>, k: &str) -> Option<&'a str> {
    v.get(k)?.as_str()
}

fn get_bool(v: &Map<String, Value>, k: &str) -> Option<bool> {
    match v.get(k) {
        Some(Value::Bool(b)) => Some(*b),
        Some(Value::Number(n)) => n.as_i64().map(|n| n != 0),
        Some(Value::String(s)) => match s.trim() {
            "true" | "1" | "on" => Some(true),
            "false" | "0" | "off" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

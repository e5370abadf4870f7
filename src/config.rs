//! Configuration file support for ultrapad.
//!
//! Settings live in ~/.config/ultrapad/config.toml as a layered tree:
//! a global `managed` switch, a window blacklist, per-display padding
//! rules keyed by display UUID, and per-space overrides.
//!
//! The tree is accessed two ways: path-based get/set/toggle for the
//! settings the toggle commands mutate, and typed views (`DisplayRule`,
//! blacklist, space flags) for the decision engine. Every mutation is
//! flushed to disk immediately.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use toml::map::Map;
use toml::Value;

use crate::error::ConfigError;

/// Sentinel padding value meaning "use the display's default_padding".
const DEFAULT_PADDING_SENTINEL: &str = "default_padding";

// =============================================================================
// Typed views
// =============================================================================

/// A padding value as it appears in the config: a number, or a string
/// (yabai accepts both; the string form also carries the sentinel).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Padding {
    Number(i64),
    Text(String),
}

impl Padding {
    /// True when this value is the "use default_padding" sentinel.
    pub fn is_default_sentinel(&self) -> bool {
        matches!(self, Padding::Text(s) if s == DEFAULT_PADDING_SENTINEL)
    }
}

impl fmt::Display for Padding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Padding::Number(n) => write!(f, "{}", n),
            Padding::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Rule for one specific window count on a display.
#[derive(Debug, Clone, Deserialize)]
pub struct CountRule {
    /// Padding for the right edge at this count, or the default sentinel.
    pub padding: Padding,
    /// Whether a split-orientation check runs at this count.
    #[serde(default)]
    pub flip: bool,
}

/// Per-display rule set, keyed in the config by a user-chosen name.
#[derive(Debug, Clone, Deserialize)]
pub struct DisplayRule {
    /// Stable display identity as reported by yabai. Resolution matches
    /// on this and nothing else; display indices are session-volatile.
    pub uuid: String,
    /// Left-edge padding, and the fallback for unmanaged spaces.
    pub default_padding: Padding,
    /// At this many windows (or more) the display is left alone.
    pub stop_manage_at: u32,
    /// `window_count_<N>` tables, captured by key.
    #[serde(flatten)]
    counts: BTreeMap<String, CountRule>,
}

impl DisplayRule {
    /// Look up the rule for a specific window count, if configured.
    pub fn count_rule(&self, count: usize) -> Option<&CountRule> {
        self.counts.get(&format!("window_count_{}", count))
    }
}

// =============================================================================
// ConfigStore
// =============================================================================

/// The loaded configuration tree plus the path it persists to.
pub struct ConfigStore {
    path: PathBuf,
    root: Value,
}

impl ConfigStore {
    /// Default config file path (~/.config/ultrapad/config.toml)
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("ultrapad")
            .join("config.toml")
    }

    /// Load config from the default path.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_path(Self::default_path())
    }

    /// Load config from a specific path. A missing or unparsable file is
    /// fatal: display UUIDs and padding rules cannot be guessed.
    pub fn load_from_path(path: PathBuf) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let root: Value = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;
        log::info!("Loaded config from {:?}", path);
        Ok(Self { path, root })
    }

    /// The directory the config file lives in; the trace log is resolved
    /// relative to it.
    fn dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }

    // -------------------------------------------------------------------------
    // Path-based access
    // -------------------------------------------------------------------------

    /// Traverse the tree along `path`. Missing intermediates read as empty;
    /// this never fails, it just returns None.
    pub fn lookup(&self, path: &[&str]) -> Option<&Value> {
        let mut node = &self.root;
        for segment in path {
            node = node.as_table()?.get(*segment)?;
        }
        Some(node)
    }

    /// Like `lookup`, but an absent leaf is a hard configuration error.
    pub fn require(&self, path: &[&str]) -> Result<&Value, ConfigError> {
        self.lookup(path)
            .ok_or_else(|| ConfigError::Missing(path.join(".")))
    }

    /// Set the leaf at `path`, creating intermediate tables as needed, and
    /// persist the whole tree synchronously.
    pub fn set(&mut self, path: &[&str], value: Value) -> Result<(), ConfigError> {
        let Some((leaf, parents)) = path.split_last() else {
            return Err(ConfigError::Missing(String::new()));
        };

        let mut node = &mut self.root;
        let mut walked = Vec::new();
        for segment in parents {
            walked.push(*segment);
            let table = node.as_table_mut().ok_or_else(|| ConfigError::Type {
                path: walked.join("."),
                expected: "table",
            })?;
            node = table
                .entry(segment.to_string())
                .or_insert_with(|| Value::Table(Map::new()));
        }

        let table = node.as_table_mut().ok_or_else(|| ConfigError::Type {
            path: parents.join("."),
            expected: "table",
        })?;
        table.insert(leaf.to_string(), value);

        self.save()
    }

    /// Flip the boolean at `path` and persist. An absent setting is a
    /// warning, not an error: nothing is mutated and None is returned.
    pub fn toggle_bool(&mut self, path: &[&str]) -> Result<Option<bool>, ConfigError> {
        let current = match self.lookup(path) {
            None => {
                log::warn!(
                    "Setting `{}` not found in the config, nothing to toggle",
                    path.join(".")
                );
                return Ok(None);
            }
            Some(value) => value.as_bool().ok_or_else(|| ConfigError::Type {
                path: path.join("."),
                expected: "boolean",
            })?,
        };

        let new = !current;
        self.set(path, Value::Boolean(new))?;
        Ok(Some(new))
    }

    /// Rewrite the config file in place. The full tree is flushed on every
    /// mutation; a crash mid-write can leave a truncated file.
    fn save(&self) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(&self.root)?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: self.path.clone(),
                source,
            })?;
        }
        std::fs::write(&self.path, contents).map_err(|source| ConfigError::Write {
            path: self.path.clone(),
            source,
        })
    }

    // -------------------------------------------------------------------------
    // Typed views
    // -------------------------------------------------------------------------

    /// Global management switch. Absent reads as off.
    pub fn managed(&self) -> bool {
        self.lookup(&["managed"]).and_then(Value::as_bool).unwrap_or(false)
    }

    /// Debug flag (required).
    pub fn debug(&self) -> Result<bool, ConfigError> {
        self.require(&["debug"])?
            .as_bool()
            .ok_or(ConfigError::Type {
                path: "debug".to_string(),
                expected: "boolean",
            })
    }

    /// Trace log path (required), resolved relative to the config directory.
    pub fn log_path(&self) -> Result<PathBuf, ConfigError> {
        let name = self
            .require(&["log_file"])?
            .as_str()
            .ok_or(ConfigError::Type {
                path: "log_file".to_string(),
                expected: "string",
            })?;
        Ok(self.dir().join(name))
    }

    /// Window blacklist: attribute name -> excluded values. Absent is empty.
    pub fn blacklist(&self) -> Result<BTreeMap<String, Vec<String>>, ConfigError> {
        let Some(value) = self.lookup(&["windows_blacklist"]) else {
            return Ok(BTreeMap::new());
        };
        value
            .clone()
            .try_into()
            .map_err(|source| ConfigError::Parse {
                path: self.path.clone(),
                source,
            })
    }

    /// Per-display rules, keyed by the user's display name. Absent is empty.
    pub fn display_rules(&self) -> Result<BTreeMap<String, DisplayRule>, ConfigError> {
        let Some(value) = self.lookup(&["displays"]) else {
            return Ok(BTreeMap::new());
        };
        value
            .clone()
            .try_into()
            .map_err(|source| ConfigError::Parse {
                path: self.path.clone(),
                source,
            })
    }

    /// Per-space management flag: Some(flag) when the space has an entry,
    /// None when it was never configured (treated as unmanaged).
    pub fn space_managed(&self, space: u32) -> Option<bool> {
        let key = format!("s_{}", space);
        self.lookup(&["space", &key, "managed"])
            .and_then(Value::as_bool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn store_from(toml_text: &str) -> (tempfile::TempDir, ConfigStore) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(toml_text.as_bytes()).unwrap();
        let store = ConfigStore::load_from_path(path).unwrap();
        (dir, store)
    }

    const BASIC: &str = r#"
managed = true
debug = false
log_file = "trace.log"

[windows_blacklist]
app = ["Finder", "Alfred"]

[displays.main]
uuid = "AAAA-BBBB"
default_padding = 50
stop_manage_at = 4

[displays.main.window_count_2]
padding = 100

[displays.main.window_count_3]
padding = "default_padding"
flip = true

[space.s_2]
managed = true
"#;

    #[test]
    fn test_set_then_lookup_round_trip() {
        let (_dir, mut store) = store_from(BASIC);

        store.set(&["space", "s_7", "managed"], Value::Boolean(true)).unwrap();
        assert_eq!(
            store.lookup(&["space", "s_7", "managed"]).and_then(Value::as_bool),
            Some(true)
        );

        store.set(&["displays", "main", "stop_manage_at"], Value::Integer(6)).unwrap();
        assert_eq!(
            store.lookup(&["displays", "main", "stop_manage_at"]).and_then(Value::as_integer),
            Some(6)
        );
    }

    #[test]
    fn test_set_persists_to_disk() {
        let (_dir, mut store) = store_from(BASIC);
        store.set(&["managed"], Value::Boolean(false)).unwrap();

        let reloaded = ConfigStore::load_from_path(store.path.clone()).unwrap();
        assert!(!reloaded.managed());
    }

    #[test]
    fn test_lookup_missing_intermediate_is_none() {
        let (_dir, store) = store_from(BASIC);
        assert!(store.lookup(&["space", "s_99", "managed"]).is_none());
        assert!(store.lookup(&["no", "such", "path"]).is_none());
    }

    #[test]
    fn test_require_missing_leaf_errors() {
        let (_dir, store) = store_from(BASIC);
        let err = store.require(&["displays", "main", "nope"]).unwrap_err();
        assert!(err.to_string().contains("displays.main.nope"));
    }

    #[test]
    fn test_toggle_existing_bool() {
        let (_dir, mut store) = store_from(BASIC);
        assert_eq!(store.toggle_bool(&["managed"]).unwrap(), Some(false));
        assert!(!store.managed());
        assert_eq!(store.toggle_bool(&["managed"]).unwrap(), Some(true));
        assert!(store.managed());
    }

    #[test]
    fn test_toggle_absent_setting_is_a_noop() {
        let (_dir, mut store) = store_from(BASIC);
        let before = toml::to_string(&store.root).unwrap();

        assert_eq!(store.toggle_bool(&["space", "s_9", "managed"]).unwrap(), None);

        let after = toml::to_string(&store.root).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_display_rules_typed_view() {
        let (_dir, store) = store_from(BASIC);
        let rules = store.display_rules().unwrap();
        let main = &rules["main"];

        assert_eq!(main.uuid, "AAAA-BBBB");
        assert_eq!(main.stop_manage_at, 4);
        assert_eq!(main.default_padding, Padding::Number(50));

        let two = main.count_rule(2).unwrap();
        assert_eq!(two.padding, Padding::Number(100));
        assert!(!two.flip);

        let three = main.count_rule(3).unwrap();
        assert!(three.padding.is_default_sentinel());
        assert!(three.flip);

        assert!(main.count_rule(5).is_none());
    }

    #[test]
    fn test_padding_display_forms() {
        assert_eq!(Padding::Number(50).to_string(), "50");
        assert_eq!(Padding::Text("abc".into()).to_string(), "abc");
        assert!(!Padding::Number(50).is_default_sentinel());
    }

    #[test]
    fn test_space_managed_three_states() {
        let (_dir, mut store) = store_from(BASIC);

        assert_eq!(store.space_managed(2), Some(true));
        assert_eq!(store.space_managed(5), None);

        store.set(&["space", "s_5", "managed"], Value::Boolean(false)).unwrap();
        assert_eq!(store.space_managed(5), Some(false));
    }

    #[test]
    fn test_blacklist_view() {
        let (_dir, store) = store_from(BASIC);
        let blacklist = store.blacklist().unwrap();
        assert_eq!(blacklist["app"], vec!["Finder", "Alfred"]);
    }

    #[test]
    fn test_missing_required_keys() {
        let (_dir, store) = store_from("managed = true\n");
        assert!(store.debug().is_err());
        assert!(store.log_path().is_err());
        assert!(store.blacklist().unwrap().is_empty());
        assert!(store.display_rules().unwrap().is_empty());
    }
}

//! Window blacklist filtering.
//!
//! Excludes utility and background windows from the effective count the
//! padding rules are keyed on. Pure set filter: a window matching any
//! blacklist rule is excluded exactly once, and rule order never changes
//! the result.

use std::collections::BTreeMap;

use crate::yabai::Window;

/// Record of one excluded window, for the pass trace.
#[derive(Debug, Clone, PartialEq)]
pub struct Exclusion {
    pub app: String,
    pub attribute: String,
    pub value: String,
}

/// Split `windows` into survivors and exclusions. A window is excluded
/// when any blacklist attribute it carries matches any excluded value,
/// case-insensitively.
pub fn effective_windows<'a>(
    windows: &'a [Window],
    blacklist: &BTreeMap<String, Vec<String>>,
) -> (Vec<&'a Window>, Vec<Exclusion>) {
    let mut kept = Vec::new();
    let mut excluded = Vec::new();

    for window in windows {
        match first_match(window, blacklist) {
            Some((attribute, value)) => excluded.push(Exclusion {
                app: window.app.clone(),
                attribute,
                value,
            }),
            None => kept.push(window),
        }
    }

    (kept, excluded)
}

fn first_match(
    window: &Window,
    blacklist: &BTreeMap<String, Vec<String>>,
) -> Option<(String, String)> {
    for (attribute, values) in blacklist {
        let Some(actual) = window.attr(attribute) else {
            continue;
        };
        let actual_lower = actual.to_lowercase();
        if values.iter().any(|v| v.to_lowercase() == actual_lower) {
            return Some((attribute.clone(), actual.to_string()));
        }
    }
    None
}

//! Managed display resolution.
//!
//! Maps a yabai-reported display to a configured rule set by UUID and
//! nothing else. yabai's display indices are reassigned across sessions,
//! so ordinal position never participates in the match.

use std::collections::BTreeMap;

use crate::config::DisplayRule;
use crate::yabai::Display;

/// Find the first reported display that a configured rule claims.
/// None is the ordinary "this machine isn't under our management" state.
pub fn resolve<'a>(
    displays: &'a [Display],
    rules: &'a BTreeMap<String, DisplayRule>,
) -> Option<(&'a str, &'a Display, &'a DisplayRule)> {
    for display in displays {
        for (name, rule) in rules {
            if rule.uuid == display.uuid {
                return Some((name.as_str(), display, rule));
            }
        }
    }
    None
}

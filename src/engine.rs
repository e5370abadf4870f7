//! The padding decision engine.
//!
//! One resize pass walks a fixed gate sequence over fresh window-manager
//! state: global switch, display resolution, capacity ceiling, per-count
//! padding lookup, per-space override, then an optional split-orientation
//! check. Each gate either short-circuits into a terminal outcome or
//! hands the pass to the next one. Nothing persists between passes except
//! the configuration itself.

use crate::config::ConfigStore;
use crate::displays;
use crate::error::{ConfigError, Error};
use crate::filter;
use crate::trace::PassLog;
use crate::yabai::{Display, QueryScope, Window, WindowManager};

/// Terminal state of one resize pass.
///
/// `Disabled`, `NoManagedDisplay` and `OverCapacity` issue no commands;
/// they are ordinary outcomes, not failures.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Global management is off; the pass ends before any query.
    Disabled,
    /// No configured display UUID matched a reported display.
    NoManagedDisplay,
    /// Window count reached the display's stop_manage_at ceiling.
    OverCapacity { count: usize, limit: u32 },
    /// Space opted out: symmetric default padding applied.
    DefaultPadding { space: u32, padding: String },
    /// Managed space: asymmetric padding applied, split possibly toggled.
    Managed {
        space: u32,
        left: String,
        right: String,
        split_toggled: bool,
    },
}

/// Runs resize passes against a window manager and a loaded config.
pub struct Engine<'a, W: WindowManager> {
    config: &'a ConfigStore,
    wm: &'a W,
    trace: &'a PassLog,
}

impl<'a, W: WindowManager> Engine<'a, W> {
    pub fn new(config: &'a ConfigStore, wm: &'a W, trace: &'a PassLog) -> Self {
        Self { config, wm, trace }
    }

    /// Run one full pass: header, gate sequence, optional debug dump.
    pub fn run(&self) -> Result<Outcome, Error> {
        let debug = self.config.debug()?;

        self.trace.begin_pass();
        self.trace
            .append(&format!("Current global management: {}", self.config.managed()));

        let outcome = self.resize_pass()?;

        if debug {
            self.dump_newest_window();
        }
        Ok(outcome)
    }

    fn resize_pass(&self) -> Result<Outcome, Error> {
        if !self.config.managed() {
            self.trace
                .append("Global management is turned off, not modifying padding.");
            return Ok(Outcome::Disabled);
        }

        let space = self.wm.current_space()?;
        let windows = self.wm.list_windows(QueryScope::CurrentSpace)?;

        let blacklist = self.config.blacklist()?;
        let (kept, excluded) = filter::effective_windows(&windows, &blacklist);
        for exclusion in &excluded {
            self.trace.append(&format!(
                "Excluded {} window ({} = {}).",
                exclusion.app, exclusion.attribute, exclusion.value
            ));
        }
        let count = kept.len();

        let rules = self.config.display_rules()?;
        let reported = self.wm.displays()?;
        let Some((name, display, rule)) = displays::resolve(&reported, &rules) else {
            self.trace.append("No managed display found.");
            return Ok(Outcome::NoManagedDisplay);
        };

        if count as u32 >= rule.stop_manage_at {
            self.trace.append(&format!(
                "{} windows exceeds what is managed for {}, leaving yabai settings.",
                count, name
            ));
            return Ok(Outcome::OverCapacity {
                count,
                limit: rule.stop_manage_at,
            });
        }

        // The count rule is required even when the space turns out to be
        // unmanaged below: a hole in the padding table is a misconfiguration
        // the user has to see, not something to silently skip.
        let count_rule = rule.count_rule(count).ok_or_else(|| {
            ConfigError::Missing(format!("displays.{}.window_count_{}", name, count))
        })?;

        let default_padding = rule.default_padding.to_string();
        let padding = if count_rule.padding.is_default_sentinel() {
            default_padding.clone()
        } else {
            count_rule.padding.to_string()
        };

        let space_flag = self.config.space_managed(space);
        if space_flag.is_none() {
            self.trace
                .append(&format!("Space s_{} has no manage flag in the config.", space));
        }
        if !space_flag.unwrap_or(false) {
            self.trace.append(&format!(
                "Applying default padding {} due to unmanage flag on space {}.",
                default_padding, space
            ));
            self.wm.set_padding(space, &default_padding, &default_padding)?;
            return Ok(Outcome::DefaultPadding {
                space,
                padding: default_padding,
            });
        }

        self.trace.append(&format!(
            "Applying {} padding due to {} windows.",
            padding, count
        ));
        self.wm.set_padding(space, &default_padding, &padding)?;

        let mut split_toggled = false;
        if count_rule.flip {
            split_toggled = self.check_split(&windows, display)?;
        }

        Ok(Outcome::Managed {
            space,
            left: default_padding,
            right: padding,
            split_toggled,
        })
    }

    /// Split-orientation check for the newest window on the space.
    ///
    /// The newest window is taken from the unfiltered list (blacklisted
    /// windows can still be the most recent), and its geometry is
    /// re-queried because the padding just applied may have resized it.
    /// The toggle fires when the window is NOT within 10% of full display
    /// height; the inversion is intentional and pinned by tests.
    fn check_split(&self, windows: &[Window], display: &Display) -> Result<bool, Error> {
        let Some(newest) = windows.iter().max_by_key(|w| w.id) else {
            self.trace.append("No windows found, skipping split check.");
            return Ok(false);
        };

        let fresh = self.wm.window(newest.id)?;
        let vertical = fresh.frame.h > display.frame.h * 0.9;
        if vertical {
            self.trace.append("Newest window is vertical, not toggling split.");
            return Ok(false);
        }

        self.trace.append("Newest window is not vertical, toggling split.");
        self.wm.toggle_split()?;
        Ok(true)
    }

    /// Debug-mode dump of the newest window. Best-effort: query failures
    /// land in the trace instead of aborting anything.
    fn dump_newest_window(&self) {
        let windows = match self.wm.list_windows(QueryScope::CurrentSpace) {
            Ok(windows) => windows,
            Err(e) => {
                self.trace.append(&format!("Debug window query failed: {}", e));
                return;
            }
        };

        match windows.iter().max_by_key(|w| w.id) {
            Some(newest) => {
                self.trace.append("---Newest window---");
                self.trace.append(&format!("Newest window ID: {}", newest.id));
                self.trace.append(&format!("Newest app: {}", newest.app));
                self.trace.append(&format!("Newest title: {}", newest.title));
                self.trace.append(&format!("Newest role: {}", newest.role));
                self.trace.append(&format!("Newest subrole: {}", newest.subrole));
                self.trace.append("---End of newest window---");
            }
            None => self.trace.append("No windows found."),
        }
    }
}

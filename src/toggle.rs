//! Management toggles.
//!
//! Flips the global and per-space `managed` switches, persists the new
//! state, and tells the user what changed. Toggling a setting that has
//! no entry in the config is a warning and a no-op; no notification
//! fires for it.

use crate::config::ConfigStore;
use crate::error::Error;
use crate::notify;
use crate::yabai::WindowManager;

/// Notification title shared by both toggles.
const NOTIFY_TITLE: &str = "Ultrapad Management";

pub struct ToggleController<'a, W: WindowManager> {
    config: &'a mut ConfigStore,
    wm: &'a W,
}

impl<'a, W: WindowManager> ToggleController<'a, W> {
    pub fn new(config: &'a mut ConfigStore, wm: &'a W) -> Self {
        Self { config, wm }
    }

    /// Flip the global `managed` switch. Returns the new value, or None
    /// when the setting was absent and nothing changed.
    pub fn toggle_global(&mut self) -> Result<Option<bool>, Error> {
        let Some(new) = self.config.toggle_bool(&["managed"])? else {
            return Ok(None);
        };
        notify::notify(NOTIFY_TITLE, &format!("Global Management {}.", on_off(new)));
        Ok(Some(new))
    }

    /// Flip the current space's `managed` flag. The space index comes from
    /// the window manager at toggle time.
    pub fn toggle_space(&mut self) -> Result<Option<(u32, bool)>, Error> {
        let space = self.wm.current_space()?;
        let key = format!("s_{}", space);
        let Some(new) = self.config.toggle_bool(&["space", &key, "managed"])? else {
            return Ok(None);
        };
        notify::notify(NOTIFY_TITLE, &format!("Space {} {}.", space, on_off(new)));
        Ok(Some((space, new)))
    }
}

fn on_off(value: bool) -> &'static str {
    if value {
        "On"
    } else {
        "Off"
    }
}

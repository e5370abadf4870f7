//! Gateway to the yabai window manager.
//!
//! Every query shells out to `yabai -m query ...` and parses its JSON
//! output; every command shells out to `yabai -m config/window ...`.
//! The `WindowManager` trait is the seam the decision engine is written
//! against, so tests can substitute a scripted implementation instead
//! of a live yabai.

use std::process::Command;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::GatewayError;

/// Geometry as reported by yabai. Height is the only dimension the
/// decision logic reasons about; the rest of the frame is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Frame {
    pub h: f64,
}

/// A window as reported by `yabai -m query --windows`.
///
/// Ids are monotonically increasing: the highest id on a space is the
/// most recently created window.
#[derive(Debug, Clone, Deserialize)]
pub struct Window {
    pub id: u64,
    #[serde(default)]
    pub app: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub subrole: String,
    pub frame: Frame,
}

impl Window {
    /// Access a blacklistable attribute by its config name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        match name {
            "app" => Some(&self.app),
            "title" => Some(&self.title),
            "role" => Some(&self.role),
            "subrole" => Some(&self.subrole),
            _ => None,
        }
    }
}

/// A display as reported by `yabai -m query --displays`. Only the UUID
/// (stable identity) and geometry matter; the session-volatile index is
/// deliberately not modeled.
#[derive(Debug, Clone, Deserialize)]
pub struct Display {
    pub uuid: String,
    pub frame: Frame,
}

#[derive(Debug, Deserialize)]
struct SpaceInfo {
    index: u32,
}

/// Which windows a `list_windows` query covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryScope {
    CurrentSpace,
    /// Whole-machine scope; no decision path queries it today.
    #[allow(dead_code)]
    AllSpaces,
}

/// Operations the decision engine needs from the window manager.
pub trait WindowManager {
    /// Index of the currently focused space.
    fn current_space(&self) -> Result<u32, GatewayError>;

    /// Windows in the given scope.
    fn list_windows(&self, scope: QueryScope) -> Result<Vec<Window>, GatewayError>;

    /// One window by id, with fresh geometry.
    fn window(&self, id: u64) -> Result<Window, GatewayError>;

    /// All connected displays.
    fn displays(&self) -> Result<Vec<Display>, GatewayError>;

    /// Set left/right padding for a space.
    fn set_padding(&self, space: u32, left: &str, right: &str) -> Result<(), GatewayError>;

    /// Toggle the focused window's split orientation.
    fn toggle_split(&self) -> Result<(), GatewayError>;
}

/// The real gateway: blocking subprocess calls against the `yabai` binary.
pub struct Yabai {
    program: String,
}

impl Yabai {
    pub fn new() -> Self {
        Self {
            program: "yabai".to_string(),
        }
    }

    fn command_line(&self, args: &[&str]) -> String {
        format!("{} {}", self.program, args.join(" "))
    }

    /// Run a query and parse its JSON output.
    fn query<T: DeserializeOwned>(&self, args: &[&str]) -> Result<T, GatewayError> {
        let output = Command::new(&self.program)
            .args(args)
            .output()
            .map_err(|source| GatewayError::Spawn {
                command: self.command_line(args),
                source,
            })?;

        if !output.status.success() {
            return Err(GatewayError::Failed {
                command: self.command_line(args),
                status: output.status,
            });
        }

        serde_json::from_slice(&output.stdout).map_err(|source| GatewayError::Parse {
            command: self.command_line(args),
            source,
        })
    }

    /// Run a command where only the exit status matters.
    fn run(&self, args: &[&str]) -> Result<(), GatewayError> {
        let status = Command::new(&self.program)
            .args(args)
            .status()
            .map_err(|source| GatewayError::Spawn {
                command: self.command_line(args),
                source,
            })?;

        if !status.success() {
            return Err(GatewayError::Failed {
                command: self.command_line(args),
                status,
            });
        }
        Ok(())
    }
}

impl Default for Yabai {
    fn default() -> Self {
        Self::new()
    }
}

impl WindowManager for Yabai {
    fn current_space(&self) -> Result<u32, GatewayError> {
        let space: SpaceInfo = self.query(&["-m", "query", "--spaces", "--space"])?;
        Ok(space.index)
    }

    fn list_windows(&self, scope: QueryScope) -> Result<Vec<Window>, GatewayError> {
        match scope {
            QueryScope::CurrentSpace => self.query(&["-m", "query", "--windows", "--space"]),
            QueryScope::AllSpaces => self.query(&["-m", "query", "--windows"]),
        }
    }

    fn window(&self, id: u64) -> Result<Window, GatewayError> {
        let id = id.to_string();
        self.query(&["-m", "query", "--windows", "--window", &id])
    }

    fn displays(&self) -> Result<Vec<Display>, GatewayError> {
        self.query(&["-m", "query", "--displays"])
    }

    fn set_padding(&self, space: u32, left: &str, right: &str) -> Result<(), GatewayError> {
        let space = space.to_string();
        self.run(&["-m", "config", "--space", &space, "left_padding", left])?;
        self.run(&["-m", "config", "--space", &space, "right_padding", right])
    }

    fn toggle_split(&self) -> Result<(), GatewayError> {
        self.run(&["-m", "window", "--toggle", "split"])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_deserialization() {
        let json = r#"{
            "id": 118,
            "pid": 3121,
            "app": "Safari",
            "title": "Start Page",
            "frame": {"x": 50.0, "y": 0.0, "w": 1180.0, "h": 1415.0},
            "role": "AXWindow",
            "subrole": "AXStandardWindow",
            "display": 1,
            "space": 2
        }"#;
        let window: Window = serde_json::from_str(json).unwrap();
        assert_eq!(window.id, 118);
        assert_eq!(window.app, "Safari");
        assert_eq!(window.frame.h, 1415.0);
    }

    #[test]
    fn test_window_attr_names() {
        let window = Window {
            id: 1,
            app: "Finder".to_string(),
            title: "Desktop".to_string(),
            role: "AXWindow".to_string(),
            subrole: "AXStandardWindow".to_string(),
            frame: Frame { h: 1.0 },
        };
        assert_eq!(window.attr("app"), Some("Finder"));
        assert_eq!(window.attr("subrole"), Some("AXStandardWindow"));
        assert_eq!(window.attr("pid"), None);
    }

    #[test]
    fn test_display_deserialization_ignores_index() {
        let json = r#"[{
            "id": 1,
            "uuid": "37D8832A-2D66-02CA-B9F7-8F30A301B230",
            "index": 1,
            "frame": {"x": 0.0, "y": 0.0, "w": 3440.0, "h": 1440.0}
        }]"#;
        let displays: Vec<Display> = serde_json::from_str(json).unwrap();
        assert_eq!(displays[0].uuid, "37D8832A-2D66-02CA-B9F7-8F30A301B230");
        assert_eq!(displays[0].frame.h, 1440.0);
    }

    #[test]
    fn test_space_index_field() {
        let json = r#"{"id": 3, "index": 4, "label": "", "windows": [118]}"#;
        let space: SpaceInfo = serde_json::from_str(json).unwrap();
        assert_eq!(space.index, 4);
    }
}

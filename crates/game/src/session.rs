//! Session state persistence: a flat list of scalars, one value per line,
//! in fixed order. No schema or versioning; a malformed or truncated file
//! silently leaves the remaining fields at their defaults.

use glam::Vec3;
use std::path::Path;

/// Field order on disk: clear color R, G, B; overlay flag (0/1); then
/// optionally free-camera position XYZ and front XYZ.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub clear_color: [f32; 3],
    pub overlay_enabled: bool,
    pub camera_position: Option<Vec3>,
    pub camera_front: Option<Vec3>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            clear_color: [0.05, 0.05, 0.1],
            overlay_enabled: false,
            camera_position: None,
            camera_front: None,
        }
    }
}

impl SessionState {
    /// Load from `path`. Any read or parse failure falls back to defaults
    /// for everything not yet consumed.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_lines(&text),
            Err(_) => Self::default(),
        }
    }

    /// Save to `path`. Failure is logged and otherwise ignored; session
    /// state is a convenience, not data the user can lose.
    pub fn save(&self, path: &Path) {
        if let Err(e) = std::fs::write(path, self.to_lines()) {
            log::warn!("Could not write session state to {:?}: {}", path, e);
        }
    }

    /// Parse the fixed field order, stopping at the first missing or
    /// malformed value and keeping defaults from there on.
    pub fn from_lines(text: &str) -> Self {
        let mut state = Self::default();
        let mut values = text.lines().map(str::trim).filter(|l| !l.is_empty());

        let mut next = || values.next().and_then(|l| l.parse::<f32>().ok());

        let Some(r) = next() else { return state };
        state.clear_color[0] = r;
        let Some(g) = next() else { return state };
        state.clear_color[1] = g;
        let Some(b) = next() else { return state };
        state.clear_color[2] = b;

        let Some(overlay) = next() else { return state };
        state.overlay_enabled = overlay != 0.0;

        let position = (|| Some(Vec3::new(next()?, next()?, next()?)))();
        let Some(position) = position else {
            return state;
        };
        state.camera_position = Some(position);

        state.camera_front = (|| Some(Vec3::new(next()?, next()?, next()?)))();
        state
    }

    fn to_lines(&self) -> String {
        let mut out = String::new();
        for c in self.clear_color {
            out.push_str(&format!("{}\n", c));
        }
        out.push_str(if self.overlay_enabled { "1\n" } else { "0\n" });
        if let (Some(position), Some(front)) = (self.camera_position, self.camera_front) {
            for v in [position, front] {
                out.push_str(&format!("{}\n{}\n{}\n", v.x, v.y, v.z));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_full_state() {
        let state = SessionState {
            clear_color: [0.2, 0.3, 0.4],
            overlay_enabled: true,
            camera_position: Some(Vec3::new(1.0, 2.0, 3.0)),
            camera_front: Some(Vec3::new(0.0, 0.0, -1.0)),
        };
        let parsed = SessionState::from_lines(&state.to_lines());
        assert_eq!(parsed, state);
    }

    #[test]
    fn truncated_file_keeps_defaults_for_missing_fields() {
        let parsed = SessionState::from_lines("0.9\n0.8\n");
        assert_eq!(parsed.clear_color[0], 0.9);
        assert_eq!(parsed.clear_color[1], 0.8);
        // Blue, overlay and camera never arrived.
        assert_eq!(parsed.clear_color[2], SessionState::default().clear_color[2]);
        assert!(!parsed.overlay_enabled);
        assert_eq!(parsed.camera_position, None);
    }

    #[test]
    fn malformed_value_stops_parsing_silently() {
        let parsed = SessionState::from_lines("0.1\nnot-a-number\n0.3\n1\n");
        assert_eq!(parsed.clear_color[0], 0.1);
        assert_eq!(parsed.clear_color[1], SessionState::default().clear_color[1]);
        assert!(!parsed.overlay_enabled);
    }

    #[test]
    fn partial_camera_block_is_dropped() {
        // Position present but front truncated mid-vector.
        let parsed = SessionState::from_lines("0\n0\n0\n1\n1\n2\n3\n4\n5\n");
        assert!(parsed.overlay_enabled);
        assert_eq!(parsed.camera_position, Some(Vec3::new(1.0, 2.0, 3.0)));
        assert_eq!(parsed.camera_front, None);
    }

    #[test]
    fn empty_input_is_all_defaults() {
        assert_eq!(SessionState::from_lines(""), SessionState::default());
    }
}

//! Game settings and preferences
//!
//! Parsed once from the page URL query string; nothing is ever written back
//! anywhere. Example: `?particles=0&trails=0&reduced_motion=1&fps=0`

use serde::{Deserialize, Serialize};

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    // === Visual Effects ===
    /// Ball trails
    pub trails: bool,
    /// Particle effects (brick bursts, paddle sparks)
    pub particles: bool,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,

    // === Accessibility ===
    /// Reduced motion (disables trails and particles)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            trails: true,
            particles: true,
            show_fps: true,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Parse settings from a URL query string (`?key=value&...`)
    ///
    /// Unknown keys and malformed pairs are ignored; anything but `0`,
    /// `false` or `no` counts as enabled.
    pub fn from_query(query: &str) -> Self {
        let mut settings = Self::default();

        for pair in query.trim_start_matches('?').split('&') {
            let Some((key, value)) = pair.split_once('=') else {
                continue;
            };
            let enabled = !matches!(value, "0" | "false" | "no");
            match key {
                "trails" => settings.trails = enabled,
                "particles" => settings.particles = enabled,
                "fps" => settings.show_fps = enabled,
                "reduced_motion" => settings.reduced_motion = enabled,
                _ => {}
            }
        }

        settings
    }

    /// Read settings from the browser location (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let query = web_sys::window()
            .and_then(|w| w.location().search().ok())
            .unwrap_or_default();

        if query.is_empty() {
            log::info!("Using default settings");
            Self::default()
        } else {
            let settings = Self::from_query(&query);
            log::info!("Settings from query: {:?}", settings);
            settings
        }
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    /// Effective trails (respects reduced_motion)
    pub fn effective_trails(&self) -> bool {
        self.trails && !self.reduced_motion
    }

    /// Effective particles (respects reduced_motion)
    pub fn effective_particles(&self) -> bool {
        self.particles && !self.reduced_motion
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_query_defaults() {
        let s = Settings::from_query("");
        assert!(s.trails);
        assert!(s.particles);
        assert!(s.show_fps);
        assert!(!s.reduced_motion);
    }

    #[test]
    fn test_from_query_disables() {
        let s = Settings::from_query("?particles=0&fps=false&trails=no");
        assert!(!s.particles);
        assert!(!s.show_fps);
        assert!(!s.trails);
    }

    #[test]
    fn test_from_query_ignores_junk() {
        let s = Settings::from_query("?wat&quality=&particles=1&unknown=0");
        assert!(s.particles);
    }

    #[test]
    fn test_reduced_motion_wins() {
        let s = Settings::from_query("?reduced_motion=1");
        assert!(s.trails);
        assert!(!s.effective_trails());
        assert!(!s.effective_particles());
    }
}

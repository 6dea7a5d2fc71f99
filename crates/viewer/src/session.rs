//! View session: the flags and camera pose of one open viewer.

use std::fmt;
use std::str::FromStr;

use corelib::{AssetDescriptor, CameraPose};

/// Zoom factors bound to the zoom-in/zoom-out controls.
pub const ZOOM_IN_FACTOR: f32 = 0.6;
pub const ZOOM_OUT_FACTOR: f32 = 1.5;

/// Image-based lighting preset. Affects background and ambient light only.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EnvironmentPreset {
    #[default]
    Studio,
    City,
    Sunset,
    Dawn,
}

/// Lighting parameters of a preset, in linear RGB.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lighting {
    pub background: [f32; 3],
    pub ambient: [f32; 3],
    pub ambient_intensity: f32,
    pub key_color: [f32; 3],
    pub key_intensity: f32,
}

impl EnvironmentPreset {
    pub const ALL: [Self; 4] = [Self::Studio, Self::City, Self::Sunset, Self::Dawn];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Studio => "studio",
            Self::City => "city",
            Self::Sunset => "sunset",
            Self::Dawn => "dawn",
        }
    }

    /// The preset after this one in [`EnvironmentPreset::ALL`], wrapping around.
    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|p| *p == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    pub fn lighting(self) -> Lighting {
        match self {
            Self::Studio => Lighting {
                background: [0.035, 0.035, 0.04],
                ambient: [1.0, 1.0, 1.0],
                ambient_intensity: 0.35,
                key_color: [1.0, 1.0, 1.0],
                key_intensity: 1.0,
            },
            Self::City => Lighting {
                background: [0.12, 0.14, 0.18],
                ambient: [0.75, 0.82, 1.0],
                ambient_intensity: 0.45,
                key_color: [0.95, 0.97, 1.0],
                key_intensity: 0.9,
            },
            Self::Sunset => Lighting {
                background: [0.30, 0.12, 0.06],
                ambient: [1.0, 0.7, 0.5],
                ambient_intensity: 0.3,
                key_color: [1.0, 0.6, 0.35],
                key_intensity: 1.1,
            },
            Self::Dawn => Lighting {
                background: [0.16, 0.14, 0.22],
                ambient: [0.8, 0.75, 1.0],
                ambient_intensity: 0.3,
                key_color: [1.0, 0.85, 0.8],
                key_intensity: 0.8,
            },
        }
    }
}

impl fmt::Display for EnvironmentPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown environment preset '{0}' (expected studio, city, sunset or dawn)")]
pub struct UnknownPreset(pub String);

impl FromStr for EnvironmentPreset {
    type Err = UnknownPreset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownPreset(s.to_string()))
    }
}

/// Commands the user can issue against an open viewer.
#[derive(Clone, Debug, PartialEq)]
pub enum ViewCommand {
    SelectAsset(AssetDescriptor),
    ToggleWireframe,
    ToggleGrid,
    SetEnvironment(EnvironmentPreset),
    Zoom(f32),
    Orbit { yaw: f32, pitch: f32 },
    ResetView,
}

/// What the caller has to do with the scene after a command.
#[derive(Clone, Debug, PartialEq)]
pub enum ViewEffect {
    None,
    /// Fetch/parse (or take from cache) this asset, then normalize it.
    Reload(AssetDescriptor),
    /// Normalize the already-loaded scene again; no fetch, no parse.
    Renormalize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ViewSession {
    selected: AssetDescriptor,
    wireframe: bool,
    show_grid: bool,
    environment: EnvironmentPreset,
    camera: CameraPose,
    view_error: Option<String>,
}

impl ViewSession {
    /// Fresh session for the first selected asset.
    pub fn new(selected: AssetDescriptor) -> Self {
        Self {
            selected,
            wireframe: false,
            show_grid: true,
            environment: EnvironmentPreset::Studio,
            camera: CameraPose::DEFAULT,
            view_error: None,
        }
    }

    pub fn apply(&mut self, command: ViewCommand) -> ViewEffect {
        match command {
            ViewCommand::SelectAsset(descriptor) => self.select_asset(descriptor),
            ViewCommand::ToggleWireframe => self.toggle_wireframe(),
            ViewCommand::ToggleGrid => {
                self.toggle_grid();
                ViewEffect::None
            }
            ViewCommand::SetEnvironment(preset) => {
                self.set_environment(preset);
                ViewEffect::None
            }
            ViewCommand::Zoom(factor) => {
                self.zoom(factor);
                ViewEffect::None
            }
            ViewCommand::Orbit { yaw, pitch } => {
                self.camera.orbit(yaw, pitch);
                ViewEffect::None
            }
            ViewCommand::ResetView => {
                self.reset_view();
                ViewEffect::None
            }
        }
    }

    pub fn select_asset(&mut self, descriptor: AssetDescriptor) -> ViewEffect {
        self.view_error = None;
        self.selected = descriptor.clone();
        ViewEffect::Reload(descriptor)
    }

    pub fn toggle_wireframe(&mut self) -> ViewEffect {
        self.wireframe = !self.wireframe;
        ViewEffect::Renormalize
    }

    pub fn toggle_grid(&mut self) {
        self.show_grid = !self.show_grid;
    }

    pub fn set_environment(&mut self, preset: EnvironmentPreset) {
        self.environment = preset;
    }

    /// Scale the camera distance from the origin; the renderer enforces distance bounds.
    pub fn zoom(&mut self, factor: f32) {
        self.camera.zoom(factor);
    }

    /// Camera back to the default pose. Display flags are kept.
    pub fn reset_view(&mut self) {
        self.camera.reset();
    }

    pub fn set_view_error(&mut self, message: impl Into<String>) {
        self.view_error = Some(message.into());
    }

    pub fn selected(&self) -> &AssetDescriptor {
        &self.selected
    }

    pub fn wireframe(&self) -> bool {
        self.wireframe
    }

    pub fn show_grid(&self) -> bool {
        self.show_grid
    }

    pub fn environment(&self) -> EnvironmentPreset {
        self.environment
    }

    pub fn camera(&self) -> &CameraPose {
        &self.camera
    }

    pub fn view_error(&self) -> Option<&str> {
        self.view_error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corelib::vec3;

    fn asset(path: &str) -> AssetDescriptor {
        AssetDescriptor::new(path, format!("mem://{path}"))
    }

    #[test]
    fn starts_with_defaults() {
        let s = ViewSession::new(asset("a.obj"));
        assert!(!s.wireframe());
        assert!(s.show_grid());
        assert_eq!(s.environment(), EnvironmentPreset::Studio);
        assert_eq!(*s.camera(), CameraPose::DEFAULT);
        assert_eq!(s.camera().position, vec3(0.0, 5.0, 10.0));
        assert_eq!(s.view_error(), None);
    }

    #[test]
    fn commands_report_their_scene_effect() {
        let mut s = ViewSession::new(asset("a.obj"));
        assert_eq!(s.apply(ViewCommand::ToggleWireframe), ViewEffect::Renormalize);
        assert!(s.wireframe());
        assert_eq!(s.apply(ViewCommand::ToggleGrid), ViewEffect::None);
        assert!(!s.show_grid());
        assert_eq!(
            s.apply(ViewCommand::SetEnvironment(EnvironmentPreset::Dawn)),
            ViewEffect::None
        );
        assert_eq!(s.environment(), EnvironmentPreset::Dawn);

        s.set_view_error("boom");
        let b = asset("b.glb");
        assert_eq!(
            s.apply(ViewCommand::SelectAsset(b.clone())),
            ViewEffect::Reload(b.clone())
        );
        assert_eq!(s.selected(), &b);
        assert_eq!(s.view_error(), None);
        // Selecting keeps the display flags.
        assert!(s.wireframe());
        assert_eq!(s.environment(), EnvironmentPreset::Dawn);
    }

    #[test]
    fn zoom_round_trip_and_reset() {
        let mut s = ViewSession::new(asset("a.obj"));
        let start = s.camera().distance();
        s.apply(ViewCommand::Zoom(ZOOM_IN_FACTOR));
        s.apply(ViewCommand::Zoom(1.0 / ZOOM_IN_FACTOR));
        assert!((s.camera().distance() - start).abs() < 1e-4);

        s.apply(ViewCommand::ToggleWireframe);
        s.apply(ViewCommand::ToggleGrid);
        for _ in 0..5 {
            s.apply(ViewCommand::Zoom(ZOOM_OUT_FACTOR));
            s.apply(ViewCommand::Orbit {
                yaw: 0.3,
                pitch: -0.2,
            });
            s.apply(ViewCommand::ResetView);
            assert_eq!(*s.camera(), CameraPose::DEFAULT);
        }
        assert!(s.wireframe());
        assert!(!s.show_grid());
    }

    #[test]
    fn preset_parsing_and_cycling() {
        assert_eq!("Sunset".parse(), Ok(EnvironmentPreset::Sunset));
        assert_eq!(" city ".parse(), Ok(EnvironmentPreset::City));
        assert!("forest".parse::<EnvironmentPreset>().is_err());

        let mut p = EnvironmentPreset::Studio;
        for expected in ["city", "sunset", "dawn", "studio"] {
            p = p.next();
            assert_eq!(p.to_string(), expected);
        }
    }
}

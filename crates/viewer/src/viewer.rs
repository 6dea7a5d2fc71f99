//! Open viewer: a session plus the scene of its currently selected asset.

use std::sync::Arc;

use asset::{LoadError, SceneGraph, normalize};
use corelib::AssetDescriptor;

use crate::session::{ViewCommand, ViewEffect, ViewSession};

pub struct Viewer {
    session: ViewSession,
    /// Asset whose scene is currently shown.
    displayed: Option<AssetDescriptor>,
    /// Cached parse result of the displayed asset. Never modified.
    raw: Option<Arc<SceneGraph>>,
    /// `raw` normalized with the session's current flags.
    scene: Option<SceneGraph>,
    /// Bumped whenever `scene` is replaced, so renderers know when to re-upload.
    revision: u64,
}

impl Viewer {
    pub fn new(selected: AssetDescriptor) -> Self {
        Self {
            session: ViewSession::new(selected),
            displayed: None,
            raw: None,
            scene: None,
            revision: 0,
        }
    }

    /// Apply a command. Returns the asset the caller must load, if any.
    pub fn apply(&mut self, command: ViewCommand) -> Option<AssetDescriptor> {
        match self.session.apply(command) {
            ViewEffect::None => None,
            ViewEffect::Reload(descriptor) => Some(descriptor),
            ViewEffect::Renormalize => {
                self.renormalize();
                None
            }
        }
    }

    /// Install a finished load. Loads for anything but the current selection are stale
    /// and dropped; returns whether the result was applied.
    pub fn on_asset_loaded(
        &mut self,
        descriptor: &AssetDescriptor,
        result: Result<Arc<SceneGraph>, LoadError>,
    ) -> bool {
        if descriptor != self.session.selected() {
            log::debug!("Discarding stale load of {}", descriptor.path);
            return false;
        }
        match result {
            Ok(raw) => {
                self.displayed = Some(descriptor.clone());
                self.raw = Some(raw);
                self.renormalize();
            }
            Err(err) => {
                log::error!("{err}");
                self.session.set_view_error(err.to_string());
            }
        }
        true
    }

    fn renormalize(&mut self) {
        if let Some(raw) = &self.raw {
            self.scene = Some(normalize(raw, self.session.wireframe()));
            self.revision += 1;
        }
    }

    /// The selection has neither been displayed nor failed yet.
    pub fn is_loading(&self) -> bool {
        self.session.view_error().is_none()
            && self.displayed.as_ref() != Some(self.session.selected())
    }

    pub fn displayed(&self) -> Option<&AssetDescriptor> {
        self.displayed.as_ref()
    }

    pub fn session(&self) -> &ViewSession {
        &self.session
    }

    /// Render-ready scene, if one has been loaded.
    pub fn scene(&self) -> Option<&SceneGraph> {
        self.scene.as_ref()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }
}

//! Application shell: repository loading state and the open viewer.

use std::sync::Arc;

use asset::{LoadError, SceneGraph};
use corelib::{AssetDescriptor, RepositoryReference};
use repo::{ParseError, Resolution, ResolveError};

use crate::session::ViewCommand;
use crate::viewer::Viewer;

/// Repository loading state shown on the selection screen.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum LoadOutcome {
    #[default]
    Idle,
    Loading,
    Loaded {
        assets: Arc<[AssetDescriptor]>,
        repository_label: String,
        truncated: bool,
    },
    Failed(String),
}

/// A resolution the caller must run; its result goes back through
/// [`AppShell::apply_resolution`] with the same `attempt`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolveTicket {
    pub attempt: u64,
    pub reference: RepositoryReference,
}

#[derive(Default)]
pub struct AppShell {
    outcome: LoadOutcome,
    /// Id of the newest resolution. Only responses carrying it are applied.
    latest_attempt: u64,
    viewer: Option<Viewer>,
}

impl AppShell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start loading a repository. A locator that does not parse produces no request.
    pub fn submit(&mut self, locator: &str) -> Result<ResolveTicket, ParseError> {
        let reference = match repo::parse(locator) {
            Ok(reference) => reference,
            Err(err) => {
                log::warn!("Rejected locator {locator:?}");
                self.outcome = LoadOutcome::Failed(err.to_string());
                return Err(err);
            }
        };

        self.latest_attempt += 1;
        self.outcome = LoadOutcome::Loading;
        self.viewer = None;
        log::info!("Resolution #{} for {reference}", self.latest_attempt);
        Ok(ResolveTicket {
            attempt: self.latest_attempt,
            reference,
        })
    }

    /// Publish a resolution result unless a newer attempt has started since.
    pub fn apply_resolution(
        &mut self,
        attempt: u64,
        result: Result<Resolution, ResolveError>,
    ) -> bool {
        if attempt != self.latest_attempt {
            log::debug!(
                "Discarding stale resolution #{attempt} (latest is #{})",
                self.latest_attempt
            );
            return false;
        }

        self.outcome = match result {
            Ok(resolution) => LoadOutcome::Loaded {
                repository_label: resolution.reference.label(),
                assets: resolution.assets.into(),
                truncated: resolution.truncated,
            },
            Err(err) => {
                log::error!("{err}");
                LoadOutcome::Failed(err.to_string())
            }
        };
        true
    }

    /// Published asset list; empty unless a repository is loaded.
    pub fn assets(&self) -> &[AssetDescriptor] {
        match &self.outcome {
            LoadOutcome::Loaded { assets, .. } => assets,
            _ => &[],
        }
    }

    /// Select the asset at `index`, opening the viewer on first use. Returns the asset
    /// to load.
    pub fn select_asset(&mut self, index: usize) -> Option<AssetDescriptor> {
        let descriptor = self.assets().get(index)?.clone();
        match &mut self.viewer {
            Some(viewer) => viewer.apply(ViewCommand::SelectAsset(descriptor)),
            None => {
                self.viewer = Some(Viewer::new(descriptor.clone()));
                Some(descriptor)
            }
        }
    }

    /// Move the selection by `step` entries, clamped to the list.
    pub fn select_relative(&mut self, step: isize) -> Option<AssetDescriptor> {
        let len = self.assets().len();
        if len == 0 {
            return None;
        }
        let index = match self.selected_index() {
            Some(current) => current.saturating_add_signed(step).min(len - 1),
            None if step < 0 => len - 1,
            None => 0,
        };
        if Some(index) == self.selected_index() {
            return None;
        }
        self.select_asset(index)
    }

    pub fn selected_index(&self) -> Option<usize> {
        let selected = self.viewer.as_ref()?.session().selected();
        self.assets().iter().position(|d| d == selected)
    }

    /// Forward a view command to the open viewer. Returns the asset to load, if any.
    pub fn apply_view(&mut self, command: ViewCommand) -> Option<AssetDescriptor> {
        self.viewer.as_mut()?.apply(command)
    }

    pub fn on_asset_loaded(
        &mut self,
        descriptor: &AssetDescriptor,
        result: Result<Arc<SceneGraph>, LoadError>,
    ) -> bool {
        match &mut self.viewer {
            Some(viewer) => viewer.on_asset_loaded(descriptor, result),
            None => false,
        }
    }

    /// Back to repository selection. In-flight resolutions become stale.
    pub fn reset(&mut self) {
        self.latest_attempt += 1;
        self.outcome = LoadOutcome::Idle;
        self.viewer = None;
    }

    pub fn outcome(&self) -> &LoadOutcome {
        &self.outcome
    }

    pub fn viewer(&self) -> Option<&Viewer> {
        self.viewer.as_ref()
    }

    pub fn latest_attempt(&self) -> u64 {
        self.latest_attempt
    }
}

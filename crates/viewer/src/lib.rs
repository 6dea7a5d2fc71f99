//! Viewer state: the per-viewer session, the open viewer and the application shell
//! that ties repository loading to asset selection. Nothing here does I/O; callers
//! run the returned requests and feed results back in.

pub mod session;
pub mod shell;
pub mod viewer;

pub use session::{
    EnvironmentPreset, Lighting, UnknownPreset, ViewCommand, ViewEffect, ViewSession,
    ZOOM_IN_FACTOR, ZOOM_OUT_FACTOR,
};
pub use shell::{AppShell, LoadOutcome, ResolveTicket};
pub use viewer::Viewer;

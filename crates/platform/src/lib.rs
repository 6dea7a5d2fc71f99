//! Platform layer: windowing, event loop and background I/O.
//!
//! - UI state (shell, viewer, renderer) lives on the event-loop thread.
//! - Repository listings and asset loads run on a tokio runtime; results come back as
//!   [`ShellEvent`]s through the event-loop proxy and are applied in arrival order.
//! - No busy loop: redraws are requested only when something visible changed.

pub mod input;
pub mod status;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use asset::{HttpFetcher, LoadError, MeshLoader, SceneGraph};
use corelib::AssetDescriptor;
use renderer::{FrameView, GpuState};
use repo::{GitHubConfig, GitHubIndex, Resolution, ResolveError};
use viewer::{AppShell, LoadOutcome, ViewCommand};
use winit::{
    application::ApplicationHandler,
    dpi::{PhysicalPosition, PhysicalSize},
    event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop, EventLoopProxy},
    window::{Window, WindowId},
};

use crate::input::{Action, InputMode, map_key, orbit_for_drag, zoom_for_scroll};
use crate::status::{APP_NAME, status_line};

/// Startup settings collected by the binary.
#[derive(Clone, Debug)]
pub struct RunConfig {
    pub backends: wgpu::Backends,
    pub width: u32,
    pub height: u32,
    /// Repository submitted as soon as the window is up.
    pub repo: Option<String>,
    pub timeout: Duration,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            backends: wgpu::Backends::all(),
            width: 1280,
            height: 720,
            repo: None,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Results of background work, delivered to the event-loop thread.
#[derive(Debug)]
pub enum ShellEvent {
    Resolved {
        attempt: u64,
        result: Result<Resolution, ResolveError>,
    },
    AssetLoaded {
        descriptor: AssetDescriptor,
        result: Result<Arc<SceneGraph>, LoadError>,
    },
}

/// Open the viewer window and run until it is closed.
pub fn run_viewer(config: RunConfig) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("meshview-io")
        .build()
        .context("Failed to start I/O runtime")?;

    let github = GitHubConfig {
        timeout: config.timeout,
        ..GitHubConfig::default()
    };
    let fetcher = HttpFetcher::new(&github.user_agent, github.timeout)
        .context("Failed to build asset HTTP client")?;
    let index = GitHubIndex::new(github).context("Failed to build GitHub client")?;

    let event_loop = EventLoop::<ShellEvent>::with_user_event()
        .build()
        .context("Failed to create event loop")?;

    let mut app = App {
        proxy: event_loop.create_proxy(),
        runtime,
        index,
        loader: Arc::new(MeshLoader::new(fetcher)),
        shell: AppShell::new(),
        entry: config.repo.clone().unwrap_or_default(),
        last_locator: None,
        window: None,
        gpu: None,
        uploaded_revision: None,
        drag: DragState::default(),
        fatal: None,
        config,
    };

    event_loop
        .run_app(&mut app)
        .map_err(|e| anyhow::anyhow!("Event loop error: {e:?}"))?;

    match app.fatal.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

#[derive(Default)]
struct DragState {
    orbiting: bool,
    last: Option<PhysicalPosition<f64>>,
}

struct App {
    config: RunConfig,
    proxy: EventLoopProxy<ShellEvent>,
    runtime: tokio::runtime::Runtime,
    index: GitHubIndex,
    loader: Arc<MeshLoader<HttpFetcher>>,

    shell: AppShell,
    /// Locator being typed on the selection screen.
    entry: String,
    last_locator: Option<String>,

    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    /// Viewer revision currently on the GPU.
    uploaded_revision: Option<u64>,
    drag: DragState,
    fatal: Option<anyhow::Error>,
}

impl App {
    fn submit(&mut self, locator: String) {
        let ticket = match self.shell.submit(&locator) {
            Ok(ticket) => ticket,
            Err(err) => {
                log::error!("{err}");
                return;
            }
        };
        self.last_locator = Some(locator);
        // Parses of the previous repository are no longer reachable.
        self.loader.clear();

        let index = self.index.clone();
        let proxy = self.proxy.clone();
        self.runtime.spawn(async move {
            let result = repo::resolve(&index, &ticket.reference).await;
            let event = ShellEvent::Resolved {
                attempt: ticket.attempt,
                result,
            };
            if proxy.send_event(event).is_err() {
                log::debug!("Event loop closed; dropping resolution #{}", ticket.attempt);
            }
        });
    }

    fn load(&self, descriptor: AssetDescriptor) {
        let loader = Arc::clone(&self.loader);
        let proxy = self.proxy.clone();
        self.runtime.spawn(async move {
            let result = loader.load(&descriptor).await;
            if proxy
                .send_event(ShellEvent::AssetLoaded { descriptor, result })
                .is_err()
            {
                log::debug!("Event loop closed; dropping asset load");
            }
        });
    }

    fn input_mode(&self) -> InputMode {
        match self.shell.outcome() {
            LoadOutcome::Loaded { .. } => InputMode::Browse,
            _ => InputMode::Entry,
        }
    }

    fn perform(&mut self, action: Action) {
        let to_load = match action {
            Action::Type(text) => {
                self.entry.push_str(&text);
                None
            }
            Action::EraseChar => {
                self.entry.pop();
                None
            }
            Action::ClearEntry => {
                self.entry.clear();
                None
            }
            Action::Submit => {
                self.submit(self.entry.clone());
                None
            }
            Action::Resubmit => {
                if let Some(locator) = self.last_locator.clone() {
                    self.submit(locator);
                }
                None
            }
            Action::Reset => {
                self.shell.reset();
                if let Some(locator) = &self.last_locator {
                    self.entry = locator.clone();
                }
                None
            }
            Action::SelectIndex(index) => self.shell.select_asset(index),
            Action::SelectStep(step) => self.shell.select_relative(step),
            Action::CycleEnvironment => {
                let next = self
                    .shell
                    .viewer()
                    .map(|v| v.session().environment().next());
                next.and_then(|preset| {
                    self.shell
                        .apply_view(ViewCommand::SetEnvironment(preset))
                })
            }
            Action::View(command) => self.shell.apply_view(command),
        };
        if let Some(descriptor) = to_load {
            self.load(descriptor);
        }
        self.refresh();
    }

    fn view_command(&mut self, command: ViewCommand) {
        if let Some(descriptor) = self.shell.apply_view(command) {
            self.load(descriptor);
        }
        self.refresh();
    }

    fn on_shell_event(&mut self, event: ShellEvent) {
        match event {
            ShellEvent::Resolved { attempt, result } => {
                if self.shell.apply_resolution(attempt, result) {
                    self.log_outcome();
                }
            }
            ShellEvent::AssetLoaded { descriptor, result } => {
                self.shell.on_asset_loaded(&descriptor, result);
            }
        }
        self.refresh();
    }

    fn log_outcome(&self) {
        if let LoadOutcome::Loaded {
            assets,
            repository_label,
            truncated,
        } = self.shell.outcome()
        {
            log::info!("{repository_label}: {} supported file(s)", assets.len());
            for (i, asset) in assets.iter().enumerate() {
                log::info!("  [{}] {} ({})", i + 1, asset.path, asset.extension_label());
            }
            if *truncated {
                log::warn!("Listing was truncated; some files may be missing");
            }
        }
    }

    /// Push shell state to the window and the GPU.
    fn refresh(&mut self) {
        let revision = self.shell.viewer().map(|v| v.revision());
        if revision != self.uploaded_revision {
            if let Some(gpu) = &mut self.gpu {
                gpu.upload_scene(self.shell.viewer().and_then(|v| v.scene()));
            }
            self.uploaded_revision = revision;
        }
        if let Some(window) = &self.window {
            window.set_title(&status_line(&self.shell, &self.entry));
            window.request_redraw();
        }
    }

    fn frame_view(&self) -> FrameView {
        match self.shell.viewer() {
            Some(viewer) => {
                let session = viewer.session();
                FrameView {
                    camera: *session.camera(),
                    show_grid: session.show_grid(),
                    environment: session.environment(),
                }
            }
            None => FrameView::default(),
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let view = self.frame_view();
        let Some(gpu) = &mut self.gpu else {
            return;
        };
        match gpu.render(&view) {
            Ok(()) => {}
            Err(err) if GpuState::is_surface_lost(&err) => {
                log::warn!("Surface lost/outdated: {err:?}. Recreating.");
                gpu.recreate_surface();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Out of GPU memory. Exiting.");
                event_loop.exit();
            }
            Err(err) => log::warn!("Dropped frame: {err:?}"),
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.fatal = Some(err);
        event_loop.exit();
    }
}

impl ApplicationHandler<ShellEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title(APP_NAME)
            .with_inner_size(PhysicalSize::new(self.config.width, self.config.height));
        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(err) => return self.fail(event_loop, anyhow::anyhow!("Failed to create window: {err}")),
        };
        log::info!(
            "Window created: {}x{}",
            window.inner_size().width,
            window.inner_size().height
        );

        match pollster::block_on(GpuState::new(window.clone(), self.config.backends)) {
            Ok(gpu) => self.gpu = Some(gpu),
            Err(err) => return self.fail(event_loop, err.context("Failed to initialise GPU")),
        }
        self.window = Some(window);

        match self.config.repo.clone() {
            Some(locator) => self.submit(locator),
            None => log::info!("Type a GitHub repository URL and press Enter"),
        }
        self.refresh();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested. Exiting event loop.");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                log::debug!("Resized: {}x{}", size.width, size.height);
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(size.width, size.height);
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed => {
                if let Some(action) = map_key(&event.logical_key, self.input_mode()) {
                    self.perform(action);
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32,
                };
                if let Some(command) = zoom_for_scroll(lines) {
                    self.view_command(command);
                }
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                self.drag.orbiting = state == ElementState::Pressed;
                self.drag.last = None;
            }
            WindowEvent::CursorMoved { position, .. } => {
                let last = self.drag.last.replace(position);
                if !self.drag.orbiting {
                    return;
                }
                if let Some(command) =
                    last.and_then(|p| orbit_for_drag(position.x - p.x, position.y - p.y))
                {
                    self.view_command(command);
                }
            }
            _ => {}
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: ShellEvent) {
        self.on_shell_event(event);
    }
}

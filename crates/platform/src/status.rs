//! Window title status line.

use viewer::{AppShell, LoadOutcome};

pub const APP_NAME: &str = "meshview";

/// One-line description of the shell state, shown as the window title.
pub fn status_line(shell: &AppShell, entry: &str) -> String {
    match shell.outcome() {
        LoadOutcome::Idle => format!("{APP_NAME} | GitHub repository URL: {entry}_"),
        LoadOutcome::Loading => format!("{APP_NAME} | Loading repository..."),
        LoadOutcome::Failed(message) => format!("{APP_NAME} | {message} | {entry}_"),
        LoadOutcome::Loaded {
            assets,
            repository_label,
            truncated,
        } => {
            let more = if *truncated { "+" } else { "" };
            let Some(viewer) = shell.viewer() else {
                return format!(
                    "{APP_NAME} | {repository_label} | {}{more} file(s), press 1-9 or Up/Down",
                    assets.len()
                );
            };
            let session = viewer.session();
            let selected = session.selected();
            let position = shell
                .selected_index()
                .map(|i| format!("{}/{}{more}", i + 1, assets.len()))
                .unwrap_or_default();

            let mut line = format!(
                "{APP_NAME} | {repository_label} | {} [{position}] {}",
                selected.path,
                selected.extension_label()
            );
            if let Some(error) = session.view_error() {
                line.push_str(&format!(" | {error}"));
            } else if viewer.is_loading() {
                line.push_str(" | loading...");
            }
            line.push_str(&format!(" | env: {}", session.environment()));
            if session.wireframe() {
                line.push_str(" | wireframe");
            }
            if !session.show_grid() {
                line.push_str(" | no grid");
            }
            line
        }
    }
}

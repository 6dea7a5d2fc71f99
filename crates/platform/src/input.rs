//! Key and mouse bindings, mapped onto shell operations.

use viewer::{EnvironmentPreset, ViewCommand, ZOOM_IN_FACTOR, ZOOM_OUT_FACTOR};
use winit::keyboard::{Key, NamedKey};

/// Radians of orbit per pixel of drag.
pub const ORBIT_RADIANS_PER_PIXEL: f32 = 0.005;

/// Which binding table is active.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputMode {
    /// No asset list yet: keys edit the repository locator.
    Entry,
    /// An asset list is loaded: keys select assets and drive the viewer.
    Browse,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    Type(String),
    EraseChar,
    ClearEntry,
    Submit,
    Resubmit,
    Reset,
    SelectIndex(usize),
    SelectStep(isize),
    CycleEnvironment,
    View(ViewCommand),
}

pub fn map_key(key: &Key, mode: InputMode) -> Option<Action> {
    match mode {
        InputMode::Entry => map_entry_key(key),
        InputMode::Browse => map_browse_key(key),
    }
}

fn map_entry_key(key: &Key) -> Option<Action> {
    match key {
        Key::Named(NamedKey::Enter) => Some(Action::Submit),
        Key::Named(NamedKey::Backspace) => Some(Action::EraseChar),
        Key::Named(NamedKey::Escape) => Some(Action::ClearEntry),
        Key::Character(text) if !text.chars().any(char::is_control) => {
            Some(Action::Type(text.to_string()))
        }
        _ => None,
    }
}

fn map_browse_key(key: &Key) -> Option<Action> {
    let action = match key {
        Key::Named(named) => match named {
            NamedKey::ArrowUp => Action::SelectStep(-1),
            NamedKey::ArrowDown => Action::SelectStep(1),
            NamedKey::Escape => Action::Reset,
            NamedKey::Home | NamedKey::Space => Action::View(ViewCommand::ResetView),
            NamedKey::F1 => environment(0),
            NamedKey::F2 => environment(1),
            NamedKey::F3 => environment(2),
            NamedKey::F4 => environment(3),
            _ => return None,
        },
        Key::Character(text) => match text.to_ascii_lowercase().as_str() {
            "w" => Action::View(ViewCommand::ToggleWireframe),
            "g" => Action::View(ViewCommand::ToggleGrid),
            "e" => Action::CycleEnvironment,
            "r" => Action::Resubmit,
            "+" | "=" => Action::View(ViewCommand::Zoom(ZOOM_IN_FACTOR)),
            "-" | "_" => Action::View(ViewCommand::Zoom(ZOOM_OUT_FACTOR)),
            digit => match digit.parse::<usize>() {
                Ok(n @ 1..=9) => Action::SelectIndex(n - 1),
                _ => return None,
            },
        },
        _ => return None,
    };
    Some(action)
}

fn environment(index: usize) -> Action {
    Action::View(ViewCommand::SetEnvironment(EnvironmentPreset::ALL[index]))
}

/// Wheel up zooms in, wheel down zooms out.
pub fn zoom_for_scroll(lines: f32) -> Option<ViewCommand> {
    if lines > 0.0 {
        Some(ViewCommand::Zoom(ZOOM_IN_FACTOR))
    } else if lines < 0.0 {
        Some(ViewCommand::Zoom(ZOOM_OUT_FACTOR))
    } else {
        None
    }
}

/// Dragging right swings the camera left around the model, dragging down raises it.
pub fn orbit_for_drag(dx: f64, dy: f64) -> Option<ViewCommand> {
    if dx == 0.0 && dy == 0.0 {
        return None;
    }
    Some(ViewCommand::Orbit {
        yaw: -(dx as f32) * ORBIT_RADIANS_PER_PIXEL,
        pitch: dy as f32 * ORBIT_RADIANS_PER_PIXEL,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ch(s: &str) -> Key {
        Key::Character(s.into())
    }

    #[test]
    fn entry_mode_edits_the_locator() {
        let mode = InputMode::Entry;
        assert_eq!(map_key(&ch("w"), mode), Some(Action::Type("w".into())));
        assert_eq!(
            map_key(&Key::Named(NamedKey::Enter), mode),
            Some(Action::Submit)
        );
        assert_eq!(
            map_key(&Key::Named(NamedKey::Backspace), mode),
            Some(Action::EraseChar)
        );
        assert_eq!(map_key(&Key::Named(NamedKey::F1), mode), None);
    }

    #[test]
    fn browse_bindings() {
        let mode = InputMode::Browse;
        assert_eq!(
            map_key(&ch("W"), mode),
            Some(Action::View(ViewCommand::ToggleWireframe))
        );
        assert_eq!(
            map_key(&ch("g"), mode),
            Some(Action::View(ViewCommand::ToggleGrid))
        );
        assert_eq!(map_key(&ch("1"), mode), Some(Action::SelectIndex(0)));
        assert_eq!(map_key(&ch("9"), mode), Some(Action::SelectIndex(8)));
        assert_eq!(map_key(&ch("0"), mode), None);
        assert_eq!(
            map_key(&Key::Named(NamedKey::F3), mode),
            Some(Action::View(ViewCommand::SetEnvironment(
                EnvironmentPreset::Sunset
            )))
        );
        assert_eq!(
            map_key(&ch("+"), mode),
            Some(Action::View(ViewCommand::Zoom(0.6)))
        );
        assert_eq!(
            map_key(&ch("-"), mode),
            Some(Action::View(ViewCommand::Zoom(1.5)))
        );
        assert_eq!(
            map_key(&Key::Named(NamedKey::Space), mode),
            Some(Action::View(ViewCommand::ResetView))
        );
        assert_eq!(
            map_key(&Key::Named(NamedKey::Escape), mode),
            Some(Action::Reset)
        );
    }

    #[test]
    fn mouse_helpers() {
        assert_eq!(zoom_for_scroll(1.0), Some(ViewCommand::Zoom(ZOOM_IN_FACTOR)));
        assert_eq!(zoom_for_scroll(-2.0), Some(ViewCommand::Zoom(ZOOM_OUT_FACTOR)));
        assert_eq!(zoom_for_scroll(0.0), None);
        assert_eq!(orbit_for_drag(0.0, 0.0), None);
        match orbit_for_drag(100.0, 0.0) {
            Some(ViewCommand::Orbit { yaw, pitch }) => {
                assert!(yaw < 0.0);
                assert_eq!(pitch, 0.0);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}

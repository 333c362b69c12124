//! Default geometry for each window role, relative to the active screen.

use std::time::Duration;

use crate::models::{Bounds, Position, Size, WindowRole};

/// Delay between building a batch of windows and showing them together.
pub const SHOW_DELAY: Duration = Duration::from_millis(200);

/// Stacked write windows fan out by this many pixels right and down.
pub const WRITE_WINDOW_OFFSET: i32 = 5;

const SEARCH_WIDTH: u32 = 350;
const WRITE_WIDTH: u32 = 420;
const WRITE_HEIGHT: u32 = 280;
const SETTINGS_WIDTH: u32 = 460;
const SETTINGS_HEIGHT: u32 = 180;
const INTRO_WIDTH: u32 = 460;
const INTRO_HEIGHT: u32 = 150;

/// Gap between the tray icon and the top of the settings popover.
const TRAY_ANCHOR_GAP: i32 = 8;

fn fraction(length: u32, factor: f64) -> i32 {
    (f64::from(length) * factor).floor() as i32
}

fn centered_x(screen: &Bounds, width: u32) -> i32 {
    screen.position.x + (screen.size.width as i32 - width as i32) / 2
}

fn upper_y(screen: &Bounds) -> i32 {
    screen.position.y + fraction(screen.size.height, 0.15)
}

/// Where a freshly opened window of `role` goes when nothing is remembered.
pub fn default_bounds(role: WindowRole, screen: &Bounds) -> Bounds {
    match role {
        WindowRole::Search => Bounds {
            position: Position::new(screen.position.x + 20, upper_y(screen)),
            size: Size::new(SEARCH_WIDTH, fraction(screen.size.height, 0.7).max(0) as u32),
        },
        WindowRole::Write => Bounds {
            position: Position::new(centered_x(screen, WRITE_WIDTH), upper_y(screen)),
            size: Size::new(WRITE_WIDTH, WRITE_HEIGHT),
        },
        WindowRole::Settings => Bounds {
            position: Position::new(centered_x(screen, SETTINGS_WIDTH), upper_y(screen)),
            size: Size::new(SETTINGS_WIDTH, SETTINGS_HEIGHT),
        },
        WindowRole::Intro => Bounds {
            position: Position::new(centered_x(screen, INTRO_WIDTH), upper_y(screen)),
            size: Size::new(INTRO_WIDTH, INTRO_HEIGHT),
        },
    }
}

/// Settings popover hanging under the tray icon, kept inside the screen.
pub fn settings_bounds(tray: Option<Position>, screen: &Bounds) -> Bounds {
    let Some(tray) = tray else {
        return default_bounds(WindowRole::Settings, screen);
    };

    let size = Size::new(SETTINGS_WIDTH, SETTINGS_HEIGHT);
    let max_x = (screen.right() - size.width as i32).max(screen.position.x);
    let max_y = (screen.bottom() - size.height as i32).max(screen.position.y);

    let x = (tray.x - size.width as i32 / 2).clamp(screen.position.x, max_x);
    let y = (tray.y + TRAY_ANCHOR_GAP).clamp(screen.position.y, max_y);

    Bounds {
        position: Position::new(x, y),
        size,
    }
}

/// Position of a new write window stacked on top of `previous`.
pub fn stacked_write_position(previous: Position) -> Position {
    previous.offset(WRITE_WINDOW_OFFSET, WRITE_WINDOW_OFFSET)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screen() -> Bounds {
        Bounds::new(0, 0, 1440, 900)
    }

    #[test]
    fn write_window_is_centered_in_upper_screen() {
        let bounds = default_bounds(WindowRole::Write, &screen());
        assert_eq!(bounds, Bounds::new(510, 135, 420, 280));
    }

    #[test]
    fn search_window_hugs_left_edge() {
        let bounds = default_bounds(WindowRole::Search, &screen());
        assert_eq!(bounds, Bounds::new(20, 135, 350, 630));
    }

    #[test]
    fn settings_anchor_under_tray_and_clamped() {
        let bounds = settings_bounds(Some(Position::new(1400, 0)), &screen());
        assert_eq!(bounds.position, Position::new(1440 - 460, 8));

        let bounds = settings_bounds(Some(Position::new(700, 10)), &screen());
        assert_eq!(bounds.position, Position::new(470, 18));
    }

    #[test]
    fn settings_without_tray_falls_back_to_center() {
        assert_eq!(
            settings_bounds(None, &screen()),
            default_bounds(WindowRole::Settings, &screen())
        );
    }

    #[test]
    fn stacked_write_windows_fan_out() {
        assert_eq!(
            stacked_write_position(Position::new(100, 50)),
            Position::new(105, 55)
        );
    }
}

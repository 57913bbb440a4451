//! Pet window movement: horizontal wrap-around and vertical clamping.
//!
//! Applied by the coordination thread to every `MoveBy` event, whichever
//! worker sent it, in arrival order.
//!
//! Horizontally the window wraps when the sprite leaves the screen: past the
//! left edge it reappears on the right and vice versa. The wrap shifts by
//! exactly one screen width, so a total displacement of one screen width
//! brings the window back to where it started.
//!
//! Vertically the window never goes below the floor line. Going above the
//! top of the screen snaps it back down to the floor line as well.

use crate::resources::displaystate::Placement;
use crate::resources::geometry::WindowGeometry;

/// Result of one move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveOutcome {
    pub placement: Placement,
    /// The pet just reached the floor from above.
    pub landed: bool,
}

/// Apply `(dx, dy)` to `from`.
///
/// `on_floor` is the floor-contact flag; it is updated in place and the
/// landing is reported only on the transition from off-floor to on-floor.
pub fn move_window(
    from: Placement,
    dx: f64,
    dy: f64,
    window: &WindowGeometry,
    screen_width: f64,
    on_floor: &mut bool,
) -> MoveOutcome {
    let mut x = from.x + dx;
    if x + window.width < window.border {
        x += screen_width;
    } else if x > screen_width + window.border - window.width {
        x -= screen_width;
    }

    let mut y = from.y + dy;
    let mut landed = false;
    if y < 0.0 {
        // Snapped onto the floor without approaching it: contact, no landing.
        y = window.floor;
        *on_floor = true;
    } else if y >= window.floor {
        y = window.floor;
        if !*on_floor {
            *on_floor = true;
            landed = true;
        }
    } else {
        *on_floor = false;
    }

    MoveOutcome {
        placement: Placement { x, y },
        landed,
    }
}

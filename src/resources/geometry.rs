//! Screen and pet-window geometry.

/// Usable area of the host screen, excluding task bars.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenGeometry {
    pub width: f64,
    pub usable_height: f64,
}

impl Default for ScreenGeometry {
    fn default() -> Self {
        Self {
            width: 1920.0,
            usable_height: 1040.0,
        }
    }
}

/// Extra vertical room between the dialogue bubble and the sprite.
pub const BUBBLE_GAP: f64 = 60.0;

/// Size and anchoring of the pet window, derived from the catalog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowGeometry {
    pub width: f64,
    pub height: f64,
    /// Horizontal wrap border: half the sprite width.
    pub border: f64,
    /// Window y at which the pet stands on the floor.
    pub floor: f64,
    pub start_x: f64,
    pub start_y: f64,
}

impl WindowGeometry {
    /// Lay out a window for a `sprite_width` x `sprite_height` sprite with a
    /// dialogue bubble of `bubble_height` above it.
    ///
    /// The margin is half the larger sprite side. The window starts at 80% of
    /// the screen width with its bottom on the usable-area bottom.
    pub fn for_sprite(
        sprite_width: f64,
        sprite_height: f64,
        bubble_height: f64,
        screen: &ScreenGeometry,
    ) -> Self {
        let margin = 0.5 * sprite_width.max(sprite_height);
        let width = (sprite_width + margin).trunc();
        let height = (bubble_height + margin + BUBBLE_GAP + sprite_height).trunc();
        let floor = screen.usable_height - height;
        Self {
            width,
            height,
            border: sprite_width / 2.0,
            floor,
            start_x: (screen.width * 0.8).trunc(),
            start_y: floor,
        }
    }
}

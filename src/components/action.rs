//! Action data shared read-only by every worker.
//!
//! An [`Action`] is one animated gesture: an ordered list of pre-scaled
//! frames, how many times the whole list plays, and an optional per-frame
//! displacement. An [`ActionGroup`] chains actions into one scene.

use std::sync::Arc;
use std::time::Duration;

use image::RgbaImage;
use serde::{Deserialize, Serialize};

/// A decoded bitmap shared between the catalog, the workers and the display.
pub type Frame = Arc<RgbaImage>;

/// Direction an action moves the pet per displayed frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Screen-space delta for a displacement of `amount` pixels.
    ///
    /// Screen y grows downwards, so `Up` is negative.
    pub fn delta(self, amount: f64) -> (f64, f64) {
        match self {
            Direction::Up => (0.0, -amount),
            Direction::Down => (0.0, amount),
            Direction::Left => (-amount, 0.0),
            Direction::Right => (amount, 0.0),
        }
    }
}

/// One atomic animated gesture. Immutable once built.
#[derive(Debug, Clone)]
pub struct Action {
    /// Key in `act_conf.json` this action was built from.
    pub name: String,
    /// Frames in display order, already scaled.
    pub frames: Vec<Frame>,
    /// Times the whole frame sequence plays (>= 1).
    pub repeat: usize,
    /// Declared `need_move` flag; informative, movement follows `direction`.
    pub need_move: bool,
    pub direction: Option<Direction>,
    /// Pixels moved per displayed frame, already scaled.
    pub frame_move: f64,
    /// How long each frame stays on screen.
    pub frame_duration: Duration,
}

impl Action {
    /// Positional delta applied after each displayed frame.
    pub fn step(&self) -> (f64, f64) {
        match self.direction {
            Some(direction) => direction.delta(self.frame_move),
            None => (0.0, 0.0),
        }
    }

    /// Whether displaying a frame of this action moves the pet at all.
    pub fn moves(&self) -> bool {
        let (dx, dy) = self.step();
        dx != 0.0 || dy != 0.0
    }
}

/// An ordered scene of actions. Never empty once it comes out of the catalog.
#[derive(Debug, Clone)]
pub struct ActionGroup {
    pub name: String,
    pub actions: Vec<Arc<Action>>,
}

impl ActionGroup {
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action(direction: Option<Direction>, frame_move: f64) -> Action {
        Action {
            name: "walk".to_string(),
            frames: vec![Arc::new(RgbaImage::new(1, 1))],
            repeat: 1,
            need_move: direction.is_some(),
            direction,
            frame_move,
            frame_duration: Duration::from_millis(40),
        }
    }

    #[test]
    fn test_step_follows_direction() {
        assert_eq!(action(Some(Direction::Right), 5.0).step(), (5.0, 0.0));
        assert_eq!(action(Some(Direction::Left), 5.0).step(), (-5.0, 0.0));
        assert_eq!(action(Some(Direction::Up), 5.0).step(), (0.0, -5.0));
        assert_eq!(action(Some(Direction::Down), 5.0).step(), (0.0, 5.0));
    }

    #[test]
    fn test_no_direction_never_moves() {
        let a = action(None, 10.0);
        assert_eq!(a.step(), (0.0, 0.0));
        assert!(!a.moves());
    }

    #[test]
    fn test_direction_parses_lowercase() {
        let d: Direction = serde_json::from_str("\"left\"").unwrap();
        assert_eq!(d, Direction::Left);
        assert!(serde_json::from_str::<Direction>("\"sideways\"").is_err());
    }
}

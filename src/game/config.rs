use std::time::Duration;

use super::action::Direction;

/// Board width in cells
pub const GRID_WIDTH: usize = 32;
/// Board height in cells
pub const GRID_HEIGHT: usize = 24;
/// Game speed
pub const TICKS_PER_SECOND: u64 = 20;
pub const START_DIRECTION: Direction = Direction::Right;

/// Configuration for the game
///
/// Values come from the constants above; there is no runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    /// Width of the game grid
    pub grid_width: usize,
    /// Height of the game grid
    pub grid_height: usize,
    /// Number of game ticks per second
    pub ticks_per_second: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: GRID_WIDTH,
            grid_height: GRID_HEIGHT,
            ticks_per_second: TICKS_PER_SECOND,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size.
    ///
    /// The grid always has room for the snake and an apple: zero sizes become
    /// 1, and a 1x1 grid is widened to 2x1.
    pub fn new(width: usize, height: usize) -> Self {
        let height = height.max(1);
        let width = if height == 1 { width.max(2) } else { width.max(1) };
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(1000 / self.ticks_per_second.max(1))
    }

    pub fn cell_count(&self) -> usize {
        self.grid_width * self.grid_height
    }
}

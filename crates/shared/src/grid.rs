//! Odd-row offset hex grid math used for optimistic move prediction.
//!
//! Odd rows are shifted half a cell to the east. North is decreasing `y`.

use crate::domain::{Direction, Vec2};

pub const DEFAULT_GRID_WIDTH: u32 = 20;
pub const DEFAULT_GRID_HEIGHT: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridBounds {
    pub width: u32,
    pub height: u32,
}

impl Default for GridBounds {
    fn default() -> Self {
        Self {
            width: DEFAULT_GRID_WIDTH,
            height: DEFAULT_GRID_HEIGHT,
        }
    }
}

impl GridBounds {
    pub fn contains(&self, pos: Vec2) -> bool {
        pos.x < self.width && pos.y < self.height
    }
}

fn offset(pos: Vec2, direction: Direction) -> (i64, i64) {
    let odd_row = pos.y % 2 == 1;
    match (direction, odd_row) {
        (Direction::East, _) => (1, 0),
        (Direction::West, _) => (-1, 0),
        (Direction::NorthEast, false) => (0, -1),
        (Direction::NorthEast, true) => (1, -1),
        (Direction::NorthWest, false) => (-1, -1),
        (Direction::NorthWest, true) => (0, -1),
        (Direction::SouthWest, false) => (-1, 1),
        (Direction::SouthWest, true) => (0, 1),
        (Direction::SouthEast, false) => (0, 1),
        (Direction::SouthEast, true) => (1, 1),
    }
}

fn neighbor(pos: Vec2, direction: Direction) -> Option<Vec2> {
    let (dx, dy) = offset(pos, direction);
    let x = u32::try_from(i64::from(pos.x) + dx).ok()?;
    let y = u32::try_from(i64::from(pos.y) + dy).ok()?;
    Some(Vec2::new(x, y))
}

/// Cell a move in `direction` would land on, if it stays inside `bounds`.
pub fn predict_move(pos: Vec2, direction: Direction, bounds: GridBounds) -> Option<Vec2> {
    neighbor(pos, direction).filter(|next| bounds.contains(*next))
}

/// Direction leading from `from` to an adjacent cell `to`.
pub fn direction_between(from: Vec2, to: Vec2) -> Option<Direction> {
    Direction::ALL
        .into_iter()
        .find(|direction| neighbor(from, *direction) == Some(to))
}

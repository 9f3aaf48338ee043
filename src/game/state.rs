use super::action::Direction;
use super::config::START_DIRECTION;

/// A cell on the wrap-around game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Fold the position back onto a `width` x `height` torus
    pub fn wrapped(&self, width: usize, height: usize) -> Self {
        Self {
            x: self.x.rem_euclid(width as i32),
            y: self.y.rem_euclid(height as i32),
        }
    }

    /// Move one cell in a direction, wrapping at the grid edges
    pub fn moved_in_direction(&self, direction: Direction, width: usize, height: usize) -> Self {
        let (dx, dy) = direction.delta();
        Self::new(self.x + dx, self.y + dy).wrapped(width, height)
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    pub body: Vec<Position>,
    /// Direction used for the current move
    pub direction: Direction,
    /// Buffered turn, applied on the next tick
    pub next_direction: Direction,
    /// Target length; the body is trimmed to this after every move
    pub length: usize,
}

impl Snake {
    /// Create a one-cell snake
    pub fn new(head: Position, direction: Direction) -> Self {
        Self {
            body: vec![head],
            direction,
            next_direction: direction,
            length: 1,
        }
    }

    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get body segments (excluding head)
    pub fn body_segments(&self) -> &[Position] {
        &self.body[1..]
    }

    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// True when the head overlaps any other segment
    pub fn head_hits_body(&self) -> bool {
        self.body_segments().contains(&self.head())
    }

    /// Buffer a turn. Reversals relative to the current direction are dropped.
    pub fn turn(&mut self, direction: Direction) -> bool {
        if self.direction.is_opposite(direction) {
            return false;
        }
        self.next_direction = direction;
        true
    }

    pub fn update_direction(&mut self) {
        if !self.direction.is_opposite(self.next_direction) {
            self.direction = self.next_direction;
        }
    }

    /// Step the head forward and drop tail cells beyond the target length
    pub fn advance(&mut self, width: usize, height: usize) {
        let new_head = self.head().moved_in_direction(self.direction, width, height);
        self.body.insert(0, new_head);
        self.body.truncate(self.length);
    }

    pub fn grow(&mut self) {
        self.length += 1;
    }

    /// Shrink back to a single cell at `head`, heading the start direction
    pub fn reset(&mut self, head: Position) {
        self.body.clear();
        self.body.push(head);
        self.length = 1;
        self.direction = START_DIRECTION;
        self.next_direction = START_DIRECTION;
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// The apple the snake is chasing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Apple {
    pub position: Position,
}

impl Apple {
    pub fn new(position: Position) -> Self {
        Self { position }
    }
}

/// Complete game state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    pub apple: Apple,
    pub grid_width: usize,
    pub grid_height: usize,
    /// Apples eaten since the last reset
    pub score: u32,
    pub steps: u32,
}

impl GameState {
    pub fn new(snake: Snake, apple: Apple, grid_width: usize, grid_height: usize) -> Self {
        Self {
            snake,
            apple,
            grid_width,
            grid_height,
            score: 0,
            steps: 0,
        }
    }

    /// Cell the snake starts from, and returns to after a reset
    pub fn center(&self) -> Position {
        Position::new((self.grid_width / 2) as i32, (self.grid_height / 2) as i32)
    }

    pub fn is_in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0
            && pos.x < self.grid_width as i32
            && pos.y >= 0
            && pos.y < self.grid_height as i32
    }

    /// A cell the apple may be placed on
    pub fn is_free(&self, pos: Position) -> bool {
        self.is_in_bounds(pos) && !self.snake.occupies(pos)
    }

    pub fn is_full(&self) -> bool {
        self.snake.len() >= self.grid_width * self.grid_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snake_from(cells: &[(i32, i32)], direction: Direction) -> Snake {
        let mut snake = Snake::new(Position::new(cells[0].0, cells[0].1), direction);
        snake.body = cells.iter().map(|&(x, y)| Position::new(x, y)).collect();
        snake.length = cells.len();
        snake
    }

    #[test]
    fn test_position_wraps() {
        assert_eq!(Position::new(-1, 0).wrapped(10, 8), Position::new(9, 0));
        assert_eq!(Position::new(10, 8).wrapped(10, 8), Position::new(0, 0));
        assert_eq!(Position::new(3, -1).wrapped(10, 8), Position::new(3, 7));
        assert_eq!(Position::new(4, 4).wrapped(10, 8), Position::new(4, 4));
    }

    #[test]
    fn test_movement_wraps_at_every_edge() {
        let (w, h) = (10, 8);
        assert_eq!(
            Position::new(9, 3).moved_in_direction(Direction::Right, w, h),
            Position::new(0, 3)
        );
        assert_eq!(
            Position::new(0, 3).moved_in_direction(Direction::Left, w, h),
            Position::new(9, 3)
        );
        assert_eq!(
            Position::new(4, 0).moved_in_direction(Direction::Up, w, h),
            Position::new(4, 7)
        );
        assert_eq!(
            Position::new(4, 7).moved_in_direction(Direction::Down, w, h),
            Position::new(4, 0)
        );
    }

    #[test]
    fn test_snake_creation() {
        let snake = Snake::new(Position::new(5, 5), Direction::Right);
        assert_eq!(snake.len(), 1);
        assert_eq!(snake.length, 1);
        assert_eq!(snake.head(), Position::new(5, 5));
        assert_eq!(snake.next_direction, Direction::Right);
    }

    #[test]
    fn test_advance_keeps_target_length() {
        let mut snake = Snake::new(Position::new(5, 5), Direction::Right);

        snake.advance(10, 10);
        assert_eq!(snake.body, vec![Position::new(6, 5)]);

        snake.grow();
        snake.advance(10, 10);
        assert_eq!(snake.body, vec![Position::new(7, 5), Position::new(6, 5)]);

        snake.advance(10, 10);
        assert_eq!(snake.len(), 2);
        assert_eq!(snake.head(), Position::new(8, 5));
    }

    #[test]
    fn test_turn_rejects_reversal() {
        let mut snake = Snake::new(Position::new(5, 5), Direction::Right);
        assert!(!snake.turn(Direction::Left));
        assert_eq!(snake.next_direction, Direction::Right);

        assert!(snake.turn(Direction::Up));
        // Still checked against the direction actually travelled
        assert!(!snake.turn(Direction::Left));
        assert_eq!(snake.next_direction, Direction::Up);

        snake.update_direction();
        assert_eq!(snake.direction, Direction::Up);
        assert!(!snake.turn(Direction::Down));
        assert!(snake.turn(Direction::Left));
    }

    #[test]
    fn test_turn_is_buffered_until_update() {
        let mut snake = Snake::new(Position::new(5, 5), Direction::Right);
        snake.turn(Direction::Down);
        assert_eq!(snake.direction, Direction::Right);
        snake.update_direction();
        assert_eq!(snake.direction, Direction::Down);
    }

    #[test]
    fn test_head_hits_body() {
        let coiled = snake_from(&[(5, 5), (5, 6), (4, 6), (4, 5), (5, 5)], Direction::Up);
        assert!(coiled.head_hits_body());

        let straight = snake_from(&[(5, 5), (4, 5), (3, 5)], Direction::Right);
        assert!(!straight.head_hits_body());
    }

    #[test]
    fn test_reset() {
        let mut snake = snake_from(&[(2, 2), (2, 3), (2, 4)], Direction::Up);
        snake.next_direction = Direction::Left;
        snake.reset(Position::new(5, 4));

        assert_eq!(snake.body, vec![Position::new(5, 4)]);
        assert_eq!(snake.length, 1);
        assert_eq!(snake.direction, START_DIRECTION);
        assert_eq!(snake.next_direction, START_DIRECTION);
    }

    #[test]
    fn test_free_cells() {
        let snake = snake_from(&[(5, 5), (4, 5)], Direction::Right);
        let state = GameState::new(snake, Apple::new(Position::new(0, 0)), 20, 20);

        assert!(state.is_free(Position::new(0, 0)));
        assert!(!state.is_free(Position::new(4, 5)));
        assert!(!state.is_free(Position::new(20, 0)));
        assert!(!state.is_free(Position::new(-1, 3)));
        assert!(!state.is_full());
        assert_eq!(state.center(), Position::new(10, 10));
    }
}

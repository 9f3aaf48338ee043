use log::{debug, info};
use rand::{Rng, SeedableRng, rngs::StdRng};

use super::{
    action::{Action, Direction},
    config::{GameConfig, START_DIRECTION},
    state::{Apple, GameState, Position, Snake},
};

/// Result of a game step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepResult {
    /// Whether the snake ate the apple this step
    pub ate_apple: bool,
    /// Whether the head ran into the body (the snake has been reset)
    pub collided: bool,
    /// Whether the snake filled the whole grid (the snake has been reset)
    pub board_cleared: bool,
    /// Score reached this step, taken before any reset
    pub final_score: u32,
}

impl StepResult {
    pub fn was_reset(&self) -> bool {
        self.collided || self.board_cleared
    }
}

/// The game engine that handles all game logic
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
}

impl GameEngine {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            rng: StdRng::from_entropy(),
        }
    }

    /// Engine with a fixed apple sequence
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Build the starting state: a one-cell snake in the centre and an apple
    /// somewhere else
    pub fn reset(&mut self) -> GameState {
        let center = Position::new(
            (self.config.grid_width / 2) as i32,
            (self.config.grid_height / 2) as i32,
        );
        let snake = Snake::new(center, START_DIRECTION);
        let mut state = GameState::new(
            snake,
            Apple::new(center),
            self.config.grid_width,
            self.config.grid_height,
        );
        self.place_apple(&mut state);
        state
    }

    /// Execute one tick of the game
    pub fn step(&mut self, state: &mut GameState, action: Action) -> StepResult {
        let mut result = StepResult::default();

        if let Action::Move(direction) = action {
            self.buffer_turn(state, direction);
        }
        state.snake.update_direction();
        state.snake.advance(state.grid_width, state.grid_height);
        state.steps += 1;

        result.ate_apple = state.snake.head() == state.apple.position;
        if result.ate_apple {
            state.snake.grow();
            state.score += 1;
            debug!("apple eaten at {:?}, score {}", state.apple.position, state.score);
        }
        result.final_score = state.score;

        if result.ate_apple && !self.place_apple(state) {
            info!("board cleared with length {}", state.snake.len());
            result.board_cleared = true;
            self.reset_snake(state);
        }

        if state.snake.head_hits_body() {
            info!(
                "self-collision at {:?} with length {}",
                state.snake.head(),
                state.snake.len()
            );
            result.collided = true;
            self.reset_snake(state);
        }

        result
    }

    fn buffer_turn(&self, state: &mut GameState, direction: Direction) {
        if !state.snake.turn(direction) {
            debug!(
                "ignored reversal from {:?} to {:?}",
                state.snake.direction, direction
            );
        }
    }

    fn reset_snake(&mut self, state: &mut GameState) {
        let center = state.center();
        state.snake.reset(center);
        state.score = 0;
        self.place_apple(state);
    }

    /// Move the apple to a random cell the snake does not occupy.
    /// Returns false when the snake covers the whole grid.
    fn place_apple(&mut self, state: &mut GameState) -> bool {
        if state.is_full() {
            return false;
        }

        loop {
            let x = self.rng.gen_range(0..state.grid_width) as i32;
            let y = self.rng.gen_range(0..state.grid_height) as i32;
            let pos = Position::new(x, y);

            if state.is_free(pos) {
                state.apple.position = pos;
                return true;
            }
        }
    }
}

use anyhow::{Context, Result};
use crossterm::{
    cursor::Show,
    event::{Event, EventStream},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use log::{debug, info, warn};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, Write, stderr};
use tokio::time::{MissedTickBehavior, interval};

use crate::game::{Action, GameConfig, GameEngine, GameState};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::Renderer;

/// Keyboard-driven game in the terminal
pub struct HumanMode {
    engine: GameEngine,
    state: GameState,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
}

impl HumanMode {
    pub fn new(config: GameConfig) -> Self {
        Self::with_engine(GameEngine::new(config))
    }

    fn with_engine(mut engine: GameEngine) -> Self {
        let state = engine.reset();

        Self {
            engine,
            state,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        enable_raw_mode().context("Failed to enable raw mode")?;

        // From here on every exit goes through the restore below
        let result = match setup_terminal() {
            Ok(mut terminal) => self.run_game_loop(&mut terminal).await,
            Err(err) => Err(err),
        };

        let restored = restore_terminal(&mut stderr());
        result.and(restored)
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // One update and one frame per tick
        let mut tick_timer = interval(self.engine.config().tick_interval());
        tick_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(
            "starting on a {}x{} grid at {} ticks/s",
            self.state.grid_width,
            self.state.grid_height,
            self.engine.config().ticks_per_second
        );

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(err)) => warn!("terminal event error: {err}"),
                        None => self.should_quit = true,
                    }
                }

                // Game logic tick
                _ = tick_timer.tick() => {
                    self.update_game();
                    self.metrics.update();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &self.state, &self.metrics);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                info!("quitting after {} ticks", self.state.steps);
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            match self.input_handler.handle_key_event(key) {
                KeyAction::GameAction(action) => self.queue_action(action),
                KeyAction::Quit => self.should_quit = true,
                KeyAction::None => {}
            }
        }
    }

    /// Buffer a turn for the next tick. Each key is checked against the
    /// direction the snake is travelling, so a quick second key cannot
    /// sneak in a reversal.
    fn queue_action(&mut self, action: Action) {
        if let Action::Move(direction) = action {
            if !self.state.snake.turn(direction) {
                debug!("ignored reversal to {:?}", direction);
            }
        }
    }

    fn update_game(&mut self) {
        let result = self.engine.step(&mut self.state, Action::Continue);

        // `state.score` is already zero if this step reset the snake
        if result.ate_apple {
            self.metrics.on_score(result.final_score);
        }
        if result.was_reset() {
            self.metrics.on_reset();
        }
    }
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stderr>>> {
    let mut stderr = stderr();
    execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stderr);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
    terminal.hide_cursor().context("Failed to hide cursor")?;
    terminal.clear().context("Failed to clear terminal")?;
    Ok(terminal)
}

/// Undo `run`'s terminal setup. Every step runs even if an earlier one
/// fails; the first error is returned.
fn restore_terminal(out: &mut impl Write) -> Result<()> {
    let raw = disable_raw_mode().context("Failed to disable raw mode");
    let screen = execute!(out, LeaveAlternateScreen).context("Failed to leave alternate screen");
    let cursor = execute!(out, Show).context("Failed to show cursor");
    raw.and(screen).and(cursor)
}

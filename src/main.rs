//! Terminal capsule puzzle runner.
//!
//! crossterm for input, the framebuffer renderer from the term crate for
//! output, and a fixed-timestep loop driving the core game state.

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};

use tui_capsule::cli::{parse_args, Command, USAGE};
use tui_capsule::core::{GameConfig, GameState};
use tui_capsule::input::{handle_key_event, held_key, should_quit, InputHandler};
use tui_capsule::term::{FrameBuffer, GameView, TerminalRenderer, Viewport};
use tui_capsule::types::{GameAction, TICK_MS};

fn time_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u32)
        .unwrap_or(1)
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = match parse_args(&args, time_seed())? {
        Command::Play(config) => config,
        Command::Help => {
            println!("{}", USAGE);
            return Ok(());
        }
    };

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, config);

    // Always try to restore terminal state.
    if let Err(e) = term.exit() {
        eprintln!("[tui-capsule] failed to restore terminal: {e:#}");
    }
    match &result {
        Ok(summary) => eprintln!("[tui-capsule] {}", summary),
        Err(e) => eprintln!("[tui-capsule] error: {e:#}"),
    }
    result.map(|_| ())
}

fn run(term: &mut TerminalRenderer, config: GameConfig) -> Result<String> {
    let mut game = GameState::with_config(config);
    game.start();

    let view = GameView::default();
    let mut input = InputHandler::new();
    let mut fb = FrameBuffer::new(0, 0);

    let tick = Duration::from_millis(TICK_MS as u64);
    let mut last_tick = Instant::now();

    loop {
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        view.render_into(&game, Viewport::new(w, h), &mut fb);
        term.draw_swap(&mut fb)?;

        let timeout = tick.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => match key.kind {
                    KeyEventKind::Press | KeyEventKind::Repeat => {
                        if should_quit(key) {
                            return Ok(format!(
                                "quit at level {} with score {}",
                                game.level(),
                                game.score()
                            ));
                        }
                        if held_key(key.code).is_some() {
                            if let Some(action) = input.handle_key_press(key.code) {
                                game.apply_action(action);
                            }
                        } else if let Some(action) = handle_key_event(key) {
                            if action == GameAction::Restart {
                                input.reset();
                            }
                            game.apply_action(action);
                        }
                    }
                    KeyEventKind::Release => input.handle_key_release(key.code),
                },
                Event::Resize(_, _) => term.invalidate(),
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick {
            last_tick = Instant::now();
            for action in input.update(TICK_MS) {
                game.apply_action(action);
            }
            game.tick(TICK_MS, input.is_soft_dropping());
        }
    }
}

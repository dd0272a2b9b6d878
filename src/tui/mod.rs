pub mod form;
pub mod render;
pub mod state;

use crate::ev::types::{EvResponse, WagerRequest};
use crate::ev::{EvError, EvService};
use anyhow::Result;
use crossterm::{
    event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use futures_util::StreamExt;
use ratatui::prelude::*;
use state::AppState;
use std::io::stdout;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// What the event loop should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    None,
    Submit,
    Quit,
}

/// Run the TUI until the user quits.
pub async fn run_tui(state: AppState, service: Arc<dyn EvService>) -> Result<()> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = tui_loop(&mut terminal, state, service).await;

    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

async fn tui_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    mut state: AppState,
    service: Arc<dyn EvService>,
) -> Result<()> {
    let (outcome_tx, mut outcome_rx) = mpsc::channel::<Result<EvResponse, EvError>>(1);
    let mut events = EventStream::new();
    // Redraw every 100ms so the spinner moves while a request is in flight
    let mut tick = tokio::time::interval(Duration::from_millis(100));
    let mut spinner_frame: u8 = 0;

    loop {
        terminal.draw(|f| render::draw(f, &state, spinner_frame))?;

        tokio::select! {
            _ = tick.tick() => {
                spinner_frame = spinner_frame.wrapping_add(1);
            }
            Some(outcome) = outcome_rx.recv() => {
                state.finish_submit(outcome);
            }
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) => match handle_key(&mut state, key) {
                    KeyAction::Quit => return Ok(()),
                    KeyAction::Submit => {
                        if let Some(request) = state.begin_submit() {
                            spawn_submit(service.clone(), request, outcome_tx.clone());
                        }
                    }
                    KeyAction::None => {}
                },
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => return Ok(()),
            },
        }
    }
}

/// Send one request on a background task; the outcome comes back on `tx`.
pub fn spawn_submit(
    service: Arc<dyn EvService>,
    request: WagerRequest,
    tx: mpsc::Sender<Result<EvResponse, EvError>>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let outcome = service.evaluate(&request).await;
        if tx.send(outcome).await.is_err() {
            tracing::debug!("ev outcome dropped: ui closed");
        }
    })
}

/// Apply a key press to the state.
pub fn handle_key(state: &mut AppState, key: KeyEvent) -> KeyAction {
    if key.kind != KeyEventKind::Press {
        return KeyAction::None;
    }

    if state.form.editing {
        match key.code {
            KeyCode::Enter => state.form.commit_edit(),
            KeyCode::Esc => state.form.cancel_edit(),
            KeyCode::Backspace => state.form.backspace(),
            KeyCode::Char(c) => state.form.push_char(c),
            _ => {}
        }
        return KeyAction::None;
    }

    if state.log_focus {
        match key.code {
            KeyCode::Esc | KeyCode::Char('l') => {
                state.log_focus = false;
                state.log_scroll_offset = 0;
            }
            KeyCode::Char('j') | KeyCode::Down => {
                state.log_scroll_offset = state.log_scroll_offset.saturating_sub(1);
            }
            KeyCode::Char('k') | KeyCode::Up => {
                let max = state.logs.len().saturating_sub(1);
                state.log_scroll_offset = (state.log_scroll_offset + 1).min(max);
            }
            KeyCode::Char('g') => state.log_scroll_offset = state.logs.len().saturating_sub(1),
            KeyCode::Char('G') => state.log_scroll_offset = 0,
            KeyCode::Char('q') => return KeyAction::Quit,
            _ => {}
        }
        return KeyAction::None;
    }

    match key.code {
        KeyCode::Char('q') => return KeyAction::Quit,
        KeyCode::Char('s') => return KeyAction::Submit,
        KeyCode::Char('l') => state.log_focus = true,
        KeyCode::Up | KeyCode::Char('k') => state.form.select_prev(),
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => state.form.select_next(),
        KeyCode::Enter => state.form.begin_edit(),
        KeyCode::Left => state.form.cycle(-1),
        KeyCode::Right | KeyCode::Char(' ') => state.form.cycle(1),
        _ => {}
    }
    KeyAction::None
}

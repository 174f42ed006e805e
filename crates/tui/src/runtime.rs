//! Runtime: event loop and input routing for the TUI.
//!
//! Responsibilities
//! - Own the terminal lifecycle (enter/leave alternate screen, raw mode).
//! - Drive a single event loop over terminal input, animation ticks, and
//!   completed background submits.
//! - Route keys to [`Msg`]s, run the resulting [`Effect`]s through the
//!   command layer, and re-render after every state change.
//!
//! Input is read on a dedicated task that blocks on `crossterm` and forwards
//! events over a channel; keeping `poll()` and `read()` together avoids lost
//! or delayed events in some terminals. Ticking is fast only while a submit
//! is animating and slow when idle.

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use gradecast_api::PredictClient;
use gradecast_types::SubmitOutcome;
use ratatui::{Terminal, prelude::*};
use std::time::Duration;
use tokio::{
    signal,
    sync::mpsc,
    time::{self, MissedTickBehavior},
};

use crate::app::{App, Msg};
use crate::cmd;
use crate::ui;

/// Spawn a dedicated task that blocks on terminal input and forwards
/// `crossterm` events over a channel.
async fn spawn_input_thread() -> mpsc::Receiver<Event> {
    let (sender, receiver) = mpsc::channel(500);
    tokio::spawn(async move {
        let sixteen_ms = Duration::from_millis(16);
        loop {
            if event::poll(sixteen_ms).unwrap_or(false) {
                match event::read() {
                    Ok(event) => {
                        if let Err(e) = sender.send(event).await {
                            tracing::warn!("Failed to send event: {}", e);
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::warn!("Failed to read event: {}", e);
                        break;
                    }
                }
            }
        }
    });
    receiver
}

/// Put the terminal into raw mode and enter the alternate screen.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal settings and leave the alternate screen.
fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Map a raw terminal event to an application message.
///
/// Returns `None` for events the form does not react to; quit keys are
/// handled directly in the loop.
fn msg_for_event(input_event: &Event) -> Option<Msg> {
    match input_event {
        Event::Key(key) if key.kind != KeyEventKind::Release => match key.code {
            KeyCode::Up | KeyCode::BackTab => Some(Msg::FieldPrev),
            KeyCode::Down | KeyCode::Tab => Some(Msg::FieldNext),
            KeyCode::Enter => Some(Msg::Submit),
            KeyCode::Backspace => Some(Msg::InputBackspace),
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Msg::InputClear),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => Some(Msg::InputChar(c)),
            _ => None,
        },
        Event::Resize(w, h) => Some(Msg::Resize(*w, *h)),
        _ => None,
    }
}

fn is_quit(input_event: &Event) -> bool {
    matches!(
        input_event,
        Event::Key(key) if key.code == KeyCode::Esc
            || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
    )
}

/// Entry point for the TUI runtime: sets up the terminal, spawns the input
/// producer, runs the event loop, and restores the terminal on exit.
pub async fn run_app(client: PredictClient) -> Result<()> {
    let mut input_receiver = spawn_input_thread().await;
    let (mut app, mut exec_receiver): (App, mpsc::UnboundedReceiver<SubmitOutcome>) = App::new(client);
    let mut terminal = setup_terminal()?;

    // Ticking strategy: fast while a submit is animating, slow when idle.
    let fast_interval = Duration::from_millis(100);
    let idle_interval = Duration::from_millis(5000);
    let mut current_interval = idle_interval;
    let mut ticker = time::interval(current_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    terminal.draw(|frame| ui::draw(frame, &mut app))?;

    loop {
        let target_interval = if app.executing { fast_interval } else { idle_interval };
        if target_interval != current_interval {
            current_interval = target_interval;
            ticker = time::interval(current_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        }

        let mut needs_render = false;
        tokio::select! {
            maybe_event = input_receiver.recv() => {
                let Some(input_event) = maybe_event else {
                    // Input channel closed; shut down cleanly.
                    break;
                };
                if is_quit(&input_event) {
                    break;
                }
                if let Some(msg) = msg_for_event(&input_event) {
                    let effects = app.update(msg);
                    let commands = cmd::from_effects(&mut app, effects);
                    cmd::run_cmds(&mut app, commands);
                }
                needs_render = true;
            }

            _ = ticker.tick() => {
                let _ = app.update(Msg::Tick);
                needs_render = app.executing;
            }

            Some(outcome) = exec_receiver.recv() => {
                let _ = app.update(Msg::SubmitCompleted(outcome));
                needs_render = true;
            }

            _ = signal::ctrl_c() => { break; }
        }

        if needs_render {
            terminal.draw(|frame| ui::draw(frame, &mut app))?;
        }
    }

    cleanup_terminal(&mut terminal)?;
    Ok(())
}

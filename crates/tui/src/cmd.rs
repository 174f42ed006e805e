//! Command execution layer.
//!
//! Translates high-level application effects (`Effect`) into imperative
//! commands (`Cmd`) and executes them. This is the boundary where the pure
//! state management of `app.rs` meets side effects: here, spawning the
//! background HTTP submit against the prediction service.
//!
//! State updates stay pure; each submit runs as an independent Tokio task
//! that reports back over the app's outcome channel. Nothing cancels or
//! serializes in-flight submits, so outcomes land in arrival order.

use std::sync::atomic::Ordering;

use gradecast_types::{PredictionRequest, SubmitOutcome};
use tokio::task::spawn;

use crate::app::{App, Effect};

/// Side-effectful system commands executed outside of pure state updates.
#[derive(Debug)]
pub enum Cmd {
    /// Submit a coerced form snapshot to the prediction service.
    ///
    /// Carries the request body and the sequence number of this submit.
    Submit(PredictionRequest, u64),
}

/// Convert application [`Effect`]s into [`Cmd`] instances.
///
/// `SubmitRequested` snapshots the form at this moment; edits made while
/// the request is in flight do not alter the payload already built.
pub fn from_effects(app: &mut App, effects: Vec<Effect>) -> Vec<Cmd> {
    let mut commands = Vec::new();
    for effect in effects {
        match effect {
            Effect::SubmitRequested => {
                app.submit_seq += 1;
                let request = PredictionRequest::from_form(&app.form);
                commands.push(Cmd::Submit(request, app.submit_seq));
            }
        }
    }
    commands
}

/// Execute a batch of commands.
pub fn run_cmds(app: &mut App, commands: Vec<Cmd>) {
    for command in commands {
        match command {
            Cmd::Submit(request, seq) => execute_submit(app, request, seq),
        }
    }
}

/// Spawn a background task that runs one prediction request to completion.
///
/// The task owns a clone of the client and the outcome sender; the caller
/// gets the result back as a `Msg::SubmitCompleted` through the event loop.
/// Errors are already display strings at this point (detail message or
/// stringified failure), so the UI renders them verbatim.
fn execute_submit(app: &mut App, request: PredictionRequest, seq: u64) {
    app.executing = true;
    app.throbber_idx = 0;

    let client = app.client.clone();
    let tx = app.exec_sender.clone();
    let active = app.active_exec_count.clone();
    active.fetch_add(1, Ordering::Relaxed);

    spawn(async move {
        tracing::debug!(seq, "starting prediction submit");
        let outcome = client.predict(&request).await.map_err(|e| e.to_string());

        // Mark this execution finished before the outcome is applied, so the
        // state update sees an accurate in-flight count.
        active.fetch_sub(1, Ordering::Relaxed);
        if tx.send(SubmitOutcome { seq, outcome }).is_err() {
            tracing::warn!(seq, "event loop gone; dropping submit outcome");
        }
    });
}

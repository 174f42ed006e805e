//! # Gradecast TUI Library
//!
//! Terminal user interface for the student performance predictor. One form
//! screen collects the 19 model features, Enter submits them to the remote
//! prediction service, and the outcome area below the form shows either the
//! prediction or the failure message.
//!
//! ## Architecture
//!
//! The crate follows a functional core / imperative shell split:
//! - `app` holds the state and a pure `update(Msg) -> Vec<Effect>`
//! - `cmd` turns effects into background submits
//! - `ui` renders, with the outcome projection kept pure
//! - `runtime` owns the terminal and the event loop

mod app;
mod cmd;
mod runtime;
mod theme;
mod ui;

use anyhow::Result;
use gradecast_api::PredictClient;

/// Run the TUI against a configured prediction client until the user quits.
///
/// # Errors
///
/// Returns an error for terminal setup/teardown failures or event loop
/// runtime issues. Prediction failures never propagate here; they surface
/// in the result area instead.
pub async fn run(client: PredictClient) -> Result<()> {
    runtime::run_app(client).await
}

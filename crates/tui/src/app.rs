//! Application state and logic for the Gradecast TUI.
//!
//! This module contains the main application state and the pure update
//! function that drives it. State changes happen only through [`Msg`]
//! values; side effects are described by [`Effect`] values and executed by
//! the command layer in `cmd.rs`.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use gradecast_api::PredictClient;
use gradecast_types::{FIELD_SCHEMA, FieldDescriptor, FormState, PredictionResult, SubmitOutcome};
use tokio::sync::mpsc;

/// Messages that update the application state.
#[derive(Debug, Clone)]
pub enum Msg {
    /// Move to the previous form field
    FieldPrev,
    /// Move to the next form field
    FieldNext,
    /// Append a character to the focused field's value
    InputChar(char),
    /// Remove the last character of the focused field's value
    InputBackspace,
    /// Clear the focused field's value
    InputClear,
    /// Submit the current form snapshot
    Submit,
    /// Periodic UI tick (throbber animation)
    Tick,
    /// Terminal resized
    Resize(u16, u16),
    /// Background submit completed with an outcome
    SubmitCompleted(SubmitOutcome),
}

/// Side effects requested by state changes, executed by `cmd.rs`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Snapshot the form and start a background submit.
    SubmitRequested,
}

/// Central state container for the TUI.
pub struct App {
    /// Configured prediction service client
    pub client: PredictClient,
    /// Raw form values, one slot per schema field
    pub form: FormState,
    /// Index of the focused field in schema order
    pub field_idx: usize,
    /// Last successful prediction; mutually exclusive with `error`
    pub result: Option<PredictionResult>,
    /// Last failure display string; mutually exclusive with `result`
    pub error: Option<String>,
    /// Whether at least one submit is in flight
    pub executing: bool,
    /// Animation frame for the execution throbber
    pub throbber_idx: usize,
    /// Sequence number handed to the next submit, for log correlation
    pub submit_seq: u64,
    /// Sender half used by background submits to report outcomes
    pub exec_sender: mpsc::UnboundedSender<SubmitOutcome>,
    /// Number of submits currently in flight
    pub active_exec_count: Arc<AtomicUsize>,
}

impl App {
    /// Create the application state and the receiver the event loop drains
    /// for completed submits.
    pub fn new(client: PredictClient) -> (Self, mpsc::UnboundedReceiver<SubmitOutcome>) {
        let (exec_sender, exec_receiver) = mpsc::unbounded_channel();
        let app = Self {
            client,
            form: FormState::new(),
            field_idx: 0,
            result: None,
            error: None,
            executing: false,
            throbber_idx: 0,
            submit_seq: 0,
            exec_sender,
            active_exec_count: Arc::new(AtomicUsize::new(0)),
        };
        (app, exec_receiver)
    }

    /// Descriptor of the focused field.
    pub fn focused_field(&self) -> &'static FieldDescriptor {
        &FIELD_SCHEMA[self.field_idx]
    }

    /// Process a message and return the side effects it requests.
    ///
    /// Submits are never serialized here: a `Submit` while another request
    /// is in flight starts a second, independent request, and whichever
    /// completion arrives last wins. That matches the reference behavior
    /// and is exercised by the tests below rather than silently locked.
    pub fn update(&mut self, msg: Msg) -> Vec<Effect> {
        let mut effects = Vec::new();
        match msg {
            Msg::Tick => {
                if self.executing {
                    self.throbber_idx = (self.throbber_idx + 1) % 10;
                }
            }
            Msg::Resize(_, _) => {}
            Msg::FieldPrev => {
                self.field_idx = if self.field_idx == 0 {
                    FIELD_SCHEMA.len() - 1
                } else {
                    self.field_idx - 1
                };
            }
            Msg::FieldNext => {
                self.field_idx = (self.field_idx + 1) % FIELD_SCHEMA.len();
            }
            Msg::InputChar(c) => {
                let name = self.focused_field().name;
                let mut value = self.form.get(name).to_string();
                value.push(c);
                self.form.set(name, value);
            }
            Msg::InputBackspace => {
                let name = self.focused_field().name;
                let mut value = self.form.get(name).to_string();
                value.pop();
                self.form.set(name, value);
            }
            Msg::InputClear => {
                let name = self.focused_field().name;
                self.form.set(name, "");
            }
            Msg::Submit => {
                effects.push(Effect::SubmitRequested);
            }
            Msg::SubmitCompleted(out) => {
                self.executing = self.active_exec_count.load(Ordering::Relaxed) > 0;
                if !self.executing {
                    self.throbber_idx = 0;
                }
                tracing::debug!(seq = out.seq, ok = out.outcome.is_ok(), "submit completed");
                // Both slots are fully replaced on every completion; result
                // and error are never visible at the same time.
                match out.outcome {
                    Ok(result) => {
                        self.result = Some(result);
                        self.error = None;
                    }
                    Err(message) => {
                        self.error = Some(message);
                        self.result = None;
                    }
                }
            }
        }
        effects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gradecast_api::ClientConfig;

    fn test_app() -> App {
        let config = ClientConfig {
            base_url: "http://127.0.0.1:8000".into(),
        };
        let client = PredictClient::new(&config).unwrap();
        App::new(client).0
    }

    fn completed(seq: u64, outcome: Result<PredictionResult, String>) -> Msg {
        Msg::SubmitCompleted(SubmitOutcome { seq, outcome })
    }

    #[test]
    fn typing_edits_only_the_focused_field() {
        let mut app = test_app();
        app.update(Msg::FieldNext); // Attendance
        app.update(Msg::InputChar('9'));
        app.update(Msg::InputChar('2'));

        assert_eq!(app.form.get("Attendance"), "92");
        for d in FIELD_SCHEMA.iter().filter(|d| d.name != "Attendance") {
            assert_eq!(app.form.get(d.name), "");
        }
    }

    #[test]
    fn backspace_and_clear_edit_the_focused_field() {
        let mut app = test_app();
        app.update(Msg::InputChar('1'));
        app.update(Msg::InputChar('2'));
        app.update(Msg::InputBackspace);
        assert_eq!(app.form.get("Hours_Studied"), "1");
        app.update(Msg::InputClear);
        assert_eq!(app.form.get("Hours_Studied"), "");
    }

    #[test]
    fn field_navigation_wraps_around_the_schema() {
        let mut app = test_app();
        app.update(Msg::FieldPrev);
        assert_eq!(app.field_idx, FIELD_SCHEMA.len() - 1);
        app.update(Msg::FieldNext);
        assert_eq!(app.field_idx, 0);
    }

    #[test]
    fn submit_is_not_blocked_while_another_is_in_flight() {
        let mut app = test_app();
        let first = app.update(Msg::Submit);
        app.executing = true;
        let second = app.update(Msg::Submit);
        assert_eq!(first, vec![Effect::SubmitRequested]);
        assert_eq!(second, vec![Effect::SubmitRequested]);
    }

    #[test]
    fn success_replaces_error_and_failure_replaces_result() {
        let mut app = test_app();
        app.update(completed(1, Err("feature X out of range".into())));
        assert_eq!(app.error.as_deref(), Some("feature X out of range"));
        assert!(app.result.is_none());

        let result = PredictionResult {
            prediction: 1,
            probability_pass: 0.823,
        };
        app.update(completed(2, Ok(result.clone())));
        assert_eq!(app.result, Some(result));
        assert!(app.error.is_none());
    }

    #[test]
    fn later_completion_wins_regardless_of_submit_order() {
        // Submit 1 resolves after submit 2: the final state is submit 1's,
        // because outcomes apply in arrival order.
        let mut app = test_app();
        let result = PredictionResult {
            prediction: 0,
            probability_pass: 0.41,
        };
        app.update(completed(2, Ok(result)));
        app.update(completed(1, Err("connection reset".into())));

        assert_eq!(app.error.as_deref(), Some("connection reset"));
        assert!(app.result.is_none());
    }

    #[test]
    fn executing_clears_only_when_no_submit_is_in_flight() {
        let mut app = test_app();
        app.executing = true;
        app.active_exec_count.store(1, Ordering::Relaxed);
        app.update(completed(1, Ok(PredictionResult::default())));
        assert!(app.executing);

        app.active_exec_count.store(0, Ordering::Relaxed);
        app.update(completed(2, Ok(PredictionResult::default())));
        assert!(!app.executing);
        assert_eq!(app.throbber_idx, 0);
    }
}

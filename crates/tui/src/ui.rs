//! Rendering for the Gradecast TUI.
//!
//! One screen: the 19-field form on top, a hint line, and the outcome area
//! below. The outcome area is a pure projection of the (result, error)
//! slots; see [`outcome_lines`].

use gradecast_types::{FIELD_SCHEMA, FieldKind, PredictionResult};
use ratatui::{prelude::*, widgets::*};

use crate::app::App;
use crate::theme;

const THROBBER_FRAMES: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

pub fn draw(f: &mut Frame, app: &mut App) {
    let size = f.area();

    let constraints = [
        Constraint::Min(5),    // form
        Constraint::Length(1), // hints
        Constraint::Length(5), // outcome
    ];
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(size);

    draw_form(f, app, chunks[0]);
    draw_hints(f, chunks[1]);
    draw_outcome(f, app, chunks[2]);
}

fn draw_form(f: &mut Frame, app: &App, area: Rect) {
    let title = if app.executing {
        let frame = THROBBER_FRAMES[app.throbber_idx % THROBBER_FRAMES.len()];
        format!("Student Performance Predictor  {frame}")
    } else {
        "Student Performance Predictor".to_string()
    };
    let block = Block::default()
        .title(Span::styled(title, theme::title_style()))
        .borders(Borders::ALL)
        .border_style(theme::border_style(true));
    f.render_widget(block.clone(), area);
    let inner = block.inner(area);

    // Keep the focused row visible when the terminal is shorter than the form.
    let visible_rows = inner.height as usize;
    let offset = if visible_rows == 0 {
        0
    } else {
        app.field_idx.saturating_sub(visible_rows.saturating_sub(1))
    };

    let mut lines: Vec<Line> = Vec::new();
    let mut cursor_row: Option<u16> = None;
    let mut cursor_col: Option<u16> = None;
    for (row, (i, field)) in FIELD_SCHEMA.iter().enumerate().skip(offset).take(visible_rows).enumerate() {
        let kind_hint = match field.kind {
            FieldKind::Numeric => "number",
            FieldKind::Text => "text",
        };
        let label = field.name.replace('_', " ");
        let value = app.form.get(field.name);

        if i == app.field_idx {
            let prefix = format!("{label} ({kind_hint}): ");
            cursor_col = Some((prefix.chars().count() + value.chars().count()) as u16);
            cursor_row = Some(row as u16);
        }

        let mut line = Line::from(vec![
            Span::styled(label, theme::text_style()),
            Span::raw(" "),
            Span::styled(format!("({kind_hint})"), theme::text_muted()),
            Span::raw(": "),
            Span::styled(value.to_string(), theme::text_style()),
        ]);
        if i == app.field_idx {
            line = line.style(theme::highlight_style());
        }
        lines.push(line);
    }

    let form = Paragraph::new(Text::from(lines)).style(theme::text_style());
    f.render_widget(form, inner);

    if let (Some(row), Some(col)) = (cursor_row, cursor_col) {
        let x = inner.x.saturating_add(col);
        let y = inner.y.saturating_add(row);
        f.set_cursor_position((x, y));
    }
}

fn draw_hints(f: &mut Frame, area: Rect) {
    let hints = Paragraph::new(Line::from(vec![
        Span::styled("Hints: ", theme::text_muted()),
        Span::styled("↑/↓", theme::title_style().fg(theme::ACCENT)),
        Span::styled(" field  ", theme::text_muted()),
        Span::styled("Enter", theme::title_style().fg(theme::ACCENT)),
        Span::styled(" predict  ", theme::text_muted()),
        Span::styled("Ctrl-U", theme::title_style().fg(theme::ACCENT)),
        Span::styled(" clear field  ", theme::text_muted()),
        Span::styled("Esc", theme::title_style().fg(theme::ACCENT)),
        Span::styled(" quit", theme::text_muted()),
    ]))
    .style(theme::text_muted());
    f.render_widget(hints, area);
}

fn draw_outcome(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(Span::styled("Result", theme::title_style()))
        .borders(Borders::ALL)
        .border_style(theme::border_style(false));
    let is_error = app.error.is_some();
    let lines = outcome_lines(app.result.as_ref(), app.error.as_deref());
    let style = if is_error { theme::error_style() } else { theme::text_style() };
    let text: Vec<Line> = lines.into_iter().map(Line::from).collect();
    let p = Paragraph::new(Text::from(text))
        .style(style)
        .block(block)
        .wrap(Wrap { trim: false });
    f.render_widget(p, area);
}

/// Pure projection of the outcome slots into display lines.
///
/// - An error renders verbatim, alone.
/// - A result renders as Pass/Fail plus the pass probability to three
///   decimal places.
/// - Neither renders nothing (initial state, before the first submit).
pub fn outcome_lines(result: Option<&PredictionResult>, error: Option<&str>) -> Vec<String> {
    if let Some(message) = error {
        return vec![message.to_string()];
    }
    if let Some(result) = result {
        let label = if result.prediction == 1 { "Pass" } else { "Fail" };
        return vec![
            format!("Prediction: {label}"),
            format!("Probability (pass): {:.3}", result.probability_pass),
        ];
    }
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passing_result_renders_pass_and_three_decimals() {
        let result = PredictionResult {
            prediction: 1,
            probability_pass: 0.823,
        };
        let lines = outcome_lines(Some(&result), None);
        assert_eq!(lines, vec!["Prediction: Pass", "Probability (pass): 0.823"]);
    }

    #[test]
    fn failing_result_renders_fail_and_pads_the_probability() {
        let result = PredictionResult {
            prediction: 0,
            probability_pass: 0.41,
        };
        let lines = outcome_lines(Some(&result), None);
        assert_eq!(lines, vec!["Prediction: Fail", "Probability (pass): 0.410"]);
    }

    #[test]
    fn error_renders_verbatim_and_suppresses_any_result() {
        let stale = PredictionResult {
            prediction: 1,
            probability_pass: 0.9,
        };
        let lines = outcome_lines(Some(&stale), Some("feature X out of range"));
        assert_eq!(lines, vec!["feature X out of range"]);
    }

    #[test]
    fn initial_state_renders_nothing() {
        assert!(outcome_lines(None, None).is_empty());
    }
}

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use serde_json::Value;

use crate::app::AppState;
use crate::wizard::form::UserForm;
use crate::wizard::state::Summary;
use crate::wizard::steps::StepContent;
use crate::ui::components::{centered_rect, marker};

pub fn render_wizard(f: &mut Frame, area: Rect, app: &AppState) {
    let Some(session) = app.wizard.as_ref() else {
        return;
    };
    let controller = &session.controller;
    let rect = centered_rect(72, 22, area);

    let mut steps: Vec<Span> = Vec::new();
    for (i, step) in controller.steps().iter().enumerate() {
        let style = if i == controller.index() {
            Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.muted)
        };
        if i > 0 {
            steps.push(Span::raw("  ›  "));
        }
        steps.push(Span::styled(format!("{} {}", step.icon.glyph(), step.title), style));
    }

    let mut lines = vec![Line::from(steps), Line::raw("")];
    match &session.content {
        StepContent::GeneralDetails(form) => lines.extend(form_lines(app, form)),
        StepContent::Summary(summary) => lines.extend(summary_lines(app, summary.as_ref())),
    }
    lines.push(Line::raw(""));

    let primary = if controller.in_flight() {
        "Adding user..."
    } else if controller.is_last_step() {
        "Enter: finish"
    } else {
        "Enter: next"
    };
    let mut footer = vec![Span::styled(primary, Style::default().fg(app.theme.highlight_fg))];
    if controller.can_retreat() {
        footer.push(Span::raw("   Ctrl+p: previous"));
    }
    footer.push(Span::raw("   Esc: cancel"));
    lines.push(Line::from(footer));

    let p = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title("Add User")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

fn form_lines(app: &AppState, form: &UserForm) -> Vec<Line<'static>> {
    let focused_field = form.focused_field();
    let mut lines = Vec::new();
    for field in form.visible_fields() {
        let focused = field == focused_field;
        let style = if focused {
            Style::default().fg(app.theme.highlight_fg).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text)
        };
        let value = form.display_value(field);
        let value = if field.is_choice() { format!("‹ {value} ›") } else { value };
        lines.push(Line::styled(
            format!("{}{}: {}", marker(focused), field.label(), value),
            style,
        ));
        if let Some(err) = form.error_for(field) {
            lines.push(Line::styled(format!("    {err}"), Style::default().fg(app.theme.error)));
        }
    }
    lines
}

fn summary_lines(app: &AppState, summary: Option<&Summary>) -> Vec<Line<'static>> {
    let Some(summary) = summary else {
        return vec![Line::styled(
            "Nothing to review yet.",
            Style::default().fg(app.theme.muted),
        )];
    };
    summary
        .as_map()
        .iter()
        .filter(|(key, _)| !key.to_ascii_lowercase().contains("password") || key.as_str() == "passwordOption")
        .map(|(key, value)| {
            let shown = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            Line::from(vec![
                Span::styled(format!("{key}: "), Style::default().fg(app.theme.title)),
                Span::styled(shown, Style::default().fg(app.theme.text)),
            ])
        })
        .collect()
}

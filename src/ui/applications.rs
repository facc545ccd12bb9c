use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap};

use crate::app::AppState;
use crate::application::{AppField, ApplicationForm, SettingsPanel};
use crate::ui::components::{centered_rect, marker, render_confirm_dialog};

pub fn render_applications_table(f: &mut Frame, area: Rect, app: &AppState) {
    let visible = app.visible_applications();
    let rows = visible.iter().enumerate().filter_map(|(pos, idx)| {
        let a = app.applications.applications.get(*idx)?;
        let style = if pos == app.selected_app_index {
            Style::default().fg(app.theme.highlight_fg).bg(app.theme.highlight_bg).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text)
        };
        Some(
            Row::new(vec![
                Cell::from(a.name.clone()),
                Cell::from(a.description.clone().unwrap_or_default()),
            ])
            .style(style),
        )
    });
    let widths = [Constraint::Percentage(35), Constraint::Percentage(65)];
    let header = Row::new(vec!["NAME", "DESCRIPTION"])
        .style(Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD));
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().title("Applications").borders(Borders::ALL).border_style(Style::default().fg(app.theme.border)))
        .column_spacing(1);
    f.render_widget(table, area);
}

pub fn render_application_details(f: &mut Frame, area: Rect, app: &AppState) {
    let selected = app
        .visible_applications()
        .get(app.selected_app_index)
        .and_then(|idx| app.applications.applications.get(*idx));
    let text = match selected {
        Some(a) => format!(
            "Name: {}\nDescription: {}\nAccess URL: {}\nID: {}\n\nEnter: open settings",
            a.name,
            a.description.as_deref().unwrap_or("-"),
            a.access_url.as_deref().unwrap_or("-"),
            a.id
        ),
        None => "No application selected.".to_string(),
    };
    let p = Paragraph::new(text).style(Style::default().fg(app.theme.text)).block(
        Block::default().title("Details").borders(Borders::ALL).border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(p, area);
}

/// General settings overlay, with the edit form or delete confirmation on top when open.
pub fn render_settings_panel(f: &mut Frame, area: Rect, app: &AppState) {
    let Some(panel) = app.settings.as_ref() else {
        return;
    };
    let rect = centered_rect(76, 20, area);
    let lines = match panel.editor.as_ref() {
        Some(form) => editor_lines(app, form),
        None => overview_lines(app, panel),
    };
    let title = format!("General Settings: {}", panel.application.name);
    let p = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);

    if let Some(confirm) = panel.confirm.as_ref() {
        render_confirm_dialog(
            f,
            area,
            app,
            "Are you sure?",
            "This action is irreversible and will permanently delete the application.",
            confirm,
            app.settings_busy,
        );
    }
}

fn overview_lines<'a>(app: &AppState, panel: &'a SettingsPanel) -> Vec<Line<'a>> {
    let a = &panel.application;
    let mut lines = vec![
        Line::raw(format!("Name: {}", a.name)),
        Line::raw(format!("Description: {}", a.description.as_deref().unwrap_or("-"))),
        Line::raw(format!("Image URL: {}", a.image_url.as_deref().unwrap_or("-"))),
        Line::raw(format!("Access URL: {}", a.access_url.as_deref().unwrap_or("-"))),
        Line::raw(format!(
            "Discoverable: {}",
            if a.advanced_configurations.discoverable_by_end_users { "yes" } else { "no" }
        )),
    ];
    if let Some(cert) = a.advanced_configurations.certificate.as_ref() {
        lines.push(Line::raw(format!("Certificate: {}", cert.kind)));
    }
    lines.push(Line::raw(""));
    if panel.read_only() {
        lines.push(Line::styled("Read only: missing update permission", Style::default().fg(app.theme.muted)));
    } else {
        lines.push(Line::raw("Enter / e: edit"));
    }
    if let Some(zone) = panel.danger_zone() {
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(
            zone.header,
            Style::default().fg(app.theme.error).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::raw(format!("{}: {}", zone.title, zone.subheader)));
        lines.push(Line::styled(
            format!("d: {}", zone.action_title),
            Style::default().fg(app.theme.error),
        ));
    }
    lines.push(Line::raw(""));
    lines.push(Line::styled("Esc: close", Style::default().fg(app.theme.muted)));
    lines
}

fn editor_lines(app: &AppState, form: &ApplicationForm) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for field in AppField::ALL {
        let focused = form.focused() == field;
        let style = if focused {
            Style::default().fg(app.theme.highlight_fg).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text)
        };
        lines.push(Line::styled(
            format!("{}{}: {}", marker(focused), field.label(), form.value(field)),
            style,
        ));
        if let Some(err) = form.error_for(field) {
            lines.push(Line::styled(format!("    {err}"), Style::default().fg(app.theme.error)));
        }
    }
    lines.push(Line::raw(""));
    let save = if app.settings_busy { "Saving..." } else { "Enter: update" };
    lines.push(Line::styled(
        format!("{save}   Esc: discard   Space: toggle"),
        Style::default().fg(app.theme.muted),
    ));
    lines
}

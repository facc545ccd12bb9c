use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};

use crate::app::AppState;
use crate::idp::Placeholder;
use crate::ui::components::render_confirm_dialog;

pub fn render_idp_table(f: &mut Frame, area: Rect, app: &AppState) {
    let block = Block::default()
        .title("Identity Providers")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border));

    if let Some(placeholder) = app.idps.placeholder() {
        let text = match placeholder {
            Placeholder::NoSearchResults(query) => format!(
                "No results found\n\nWe couldn't find any results for \"{query}\".\n\nEnter: clear search query"
            ),
            Placeholder::EmptyList => {
                "No identity providers yet\n\nEnter / n: new identity provider".to_string()
            }
        };
        let p = Paragraph::new(text).style(Style::default().fg(app.theme.muted)).block(block);
        f.render_widget(p, area);
        return;
    }

    let rows = app.idps.visible().into_iter().enumerate().map(|(pos, idp)| {
        let style = if pos == app.idps.selected {
            Style::default().fg(app.theme.highlight_fg).bg(app.theme.highlight_bg).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text)
        };
        let enabled = if idp.is_enabled { "enabled" } else { "disabled" };
        let actions = if app.idps.actions_hidden(idp) { "" } else { "edit, delete" };
        Row::new(vec![
            Cell::from(idp.name.clone()),
            Cell::from(idp.description.clone().unwrap_or_default()),
            Cell::from(enabled),
            Cell::from(actions),
        ])
        .style(style)
    });
    let widths = [
        Constraint::Percentage(25),
        Constraint::Percentage(45),
        Constraint::Length(9),
        Constraint::Length(13),
    ];
    let header = Row::new(vec!["NAME", "DESCRIPTION", "STATUS", "ACTIONS"])
        .style(Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD));
    let table = Table::new(rows, widths).header(header).block(block).column_spacing(1);
    f.render_widget(table, area);
}

pub fn render_idp_details(f: &mut Frame, area: Rect, app: &AppState) {
    let text = match app.idps.selected_idp() {
        Some(idp) if app.idps.actions_hidden(idp) => format!(
            "Name: {}\nDescription: {}\n\nThis identity provider is protected.",
            idp.name,
            idp.description.as_deref().unwrap_or("-")
        ),
        Some(idp) => format!(
            "Name: {}\nDescription: {}\nID: {}\n\nEnter: edit   d: delete",
            idp.name,
            idp.description.as_deref().unwrap_or("-"),
            idp.id
        ),
        None => String::new(),
    };
    let p = Paragraph::new(text).style(Style::default().fg(app.theme.text)).block(
        Block::default().title("Details").borders(Borders::ALL).border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(p, area);
}

pub fn render_delete_confirm(f: &mut Frame, area: Rect, app: &AppState) {
    let Some(confirm) = app.idps.confirm.as_ref() else {
        return;
    };
    render_confirm_dialog(
        f,
        area,
        app,
        "Are you sure?",
        "This action is irreversible and will permanently delete the identity provider.",
        confirm,
        app.idps.deleting.is_some(),
    );
}

use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};

use crate::app::AppState;

pub fn render_users_table(f: &mut Frame, area: Rect, app: &AppState) {
    let visible = app.visible_users();
    let rows = visible.iter().enumerate().filter_map(|(pos, idx)| {
        let u = app.users.resources.get(*idx)?;
        let style = if pos == app.selected_user_index {
            Style::default().fg(app.theme.highlight_fg).bg(app.theme.highlight_bg).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text)
        };
        Some(
            Row::new(vec![
                Cell::from(u.user_name.clone()),
                Cell::from(u.display_name()),
                Cell::from(u.primary_email().unwrap_or_default().to_string()),
            ])
            .style(style),
        )
    });

    let widths = [Constraint::Percentage(35), Constraint::Percentage(30), Constraint::Percentage(35)];
    let header = Row::new(vec!["USERNAME", "NAME", "EMAIL"])
        .style(Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD));

    let title = if visible.is_empty() && !app.search_query.is_empty() {
        format!("Users (no match for \"{}\")", app.search_query)
    } else {
        "Users".to_string()
    };
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().title(title).borders(Borders::ALL).border_style(Style::default().fg(app.theme.border)))
        .column_spacing(1);
    f.render_widget(table, area);
}

pub fn render_user_details(f: &mut Frame, area: Rect, app: &AppState) {
    let user = app
        .visible_users()
        .get(app.selected_user_index)
        .and_then(|idx| app.users.resources.get(*idx));
    let text = match user {
        Some(u) => {
            let emails: Vec<&str> = u.emails.iter().map(|e| e.value()).collect();
            format!(
                "Username: {}\nName: {}\nEmails: {}\nID: {}",
                u.user_name,
                u.display_name(),
                emails.join(", "),
                u.id
            )
        }
        None => "No user selected.\n\nPress n to add a user.".to_string(),
    };
    let p = Paragraph::new(text).style(Style::default().fg(app.theme.text)).block(
        Block::default().title("Details").borders(Borders::ALL).border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(p, area);
}

//! Shared UI components (status bar, toasts, modal helpers).
//!
//! Contains small building blocks reused by every tab.
//!
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::keymap::{KeyAction, Keymap};
use crate::app::{ActiveTab, AppState, InputMode, ModalState};
use crate::confirm::Confirmation;
use crate::notify::AlertLevel;

/// Render the bottom status bar with mode, counts and outstanding requests.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let mode = match app.input_mode {
        InputMode::Normal => "NORMAL",
        InputMode::Search => "SEARCH",
        InputMode::Modal => "MODAL",
    };
    let (page, pages) = match app.active_tab {
        ActiveTab::Users => app.users_paging.page_of(app.users.total_results),
        ActiveTab::Applications => app.applications_paging.page_of(app.applications.total_results),
        ActiveTab::IdentityProviders => app.idps_paging.page_of(app.idps.list.total_results),
    };
    let busy = match app.worker.in_flight() {
        0 => String::new(),
        n => format!("  requests:{n}"),
    };
    let route = app
        .route
        .as_deref()
        .map(|r| format!("  route:{r}"))
        .unwrap_or_default();
    let msg = format!(
        "mode: {mode}  users:{}  applications:{}  idps:{}  page {page}/{pages}{busy}{route}",
        app.users.total_results,
        app.applications.total_results,
        app.idps.list.total_results,
    );
    let p = Paragraph::new(msg).style(
        Style::default()
            .fg(app.theme.status_fg)
            .bg(app.theme.status_bg),
    );
    f.render_widget(p, area);
}

/// Compute a rectangle centered within `area` with a maximum size.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// `▶ label` for the focused row, two spaces otherwise.
pub fn marker(focused: bool) -> &'static str {
    if focused { "▶ " } else { "  " }
}

/// Render a generic informational modal dialog.
pub fn render_info_modal(f: &mut Frame, area: Rect, app: &AppState, state: &ModalState) {
    if let ModalState::Info { message } = state {
        let max_w = area.width.saturating_sub(6).max(30);
        let min_w = 50u16.min(max_w);
        let approx_lines = (message.len() as u16 / (min_w.saturating_sub(4).max(10))).max(1);
        let max_h = area.height.saturating_sub(6).max(5);
        let height = (approx_lines + 4).min(max_h).max(5);
        let rect = centered_rect(min_w, height, area);
        let p = Paragraph::new(message.clone())
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .title("Info")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(app.theme.border)),
            );
        f.render_widget(Clear, rect);
        f.render_widget(p, rect);
    }
}

fn key_line(label: &str, keys: String) -> Line<'static> {
    Line::from(vec![
        Span::raw(format!("{label}: ")),
        Span::styled(keys, Style::default().add_modifier(Modifier::ITALIC)),
    ])
}

fn section(title: &'static str) -> Line<'static> {
    Line::from(Span::styled(
        title,
        Style::default().add_modifier(Modifier::BOLD),
    ))
}

fn bound(keymap: &Keymap, action: KeyAction) -> String {
    keymap.keys_for(action).join(" / ")
}

/// Render the help modal; list keys come from the live keymap.
pub fn render_help_modal(f: &mut Frame, area: Rect, app: &AppState, scroll: u16) {
    let width = 80u16.min(area.width.saturating_sub(4)).max(60);
    let height = 26u16.min(area.height.saturating_sub(4)).max(14);
    let rect = centered_rect(width, height, area);
    let km = &app.keymap;

    let lines: Vec<Line> = vec![
        section("Lists"),
        key_line("Move", format!("{} | {}", bound(km, KeyAction::MoveUp), bound(km, KeyAction::MoveDown))),
        key_line(
            "Previous / next page",
            format!("{} | {}", bound(km, KeyAction::MoveLeftPage), bound(km, KeyAction::MoveRightPage)),
        ),
        key_line("Search", bound(km, KeyAction::StartSearch)),
        key_line("Switch tab", bound(km, KeyAction::SwitchTab)),
        key_line("Refresh", bound(km, KeyAction::Refresh)),
        key_line("Open selection", bound(km, KeyAction::EnterAction)),
        key_line("New user / identity provider", bound(km, KeyAction::NewEntity)),
        key_line("Delete identity provider", bound(km, KeyAction::DeleteSelection)),
        key_line("Quit", bound(km, KeyAction::Quit)),
        Line::raw(""),
        section("Add-user wizard"),
        key_line("Next / finish", "Enter".to_string()),
        key_line("Previous step", "Ctrl+p (Backspace on summary)".to_string()),
        key_line("Field focus", "Up / Down / Tab".to_string()),
        key_line("Cycle choice", "Left / Right / Space".to_string()),
        key_line("Cancel", "Esc".to_string()),
        Line::raw(""),
        section("Application settings"),
        key_line("Edit", "Enter / e".to_string()),
        key_line("Save edit", "Enter".to_string()),
        key_line("Delete (danger zone)", "d / Delete".to_string()),
        key_line("Close", "Esc".to_string()),
        Line::raw(""),
        key_line("Close help", "Esc / Enter".to_string()),
    ];

    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .block(
            Block::default()
                .title("Help")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

/// Typed-assertion dialog shared by the application and IdP deletes.
pub fn render_confirm_dialog(
    f: &mut Frame,
    area: Rect,
    app: &AppState,
    title: &str,
    message: &str,
    confirm: &Confirmation,
    busy: bool,
) {
    let rect = centered_rect(64, 10, area);
    let action_style = if confirm.is_confirmable() && !busy {
        Style::default().fg(app.theme.error).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.muted)
    };
    let action = if busy { "Deleting..." } else { "Enter: confirm" };
    let lines = vec![
        Line::raw(message.to_string()),
        Line::raw(""),
        Line::from(vec![
            Span::raw("Type "),
            Span::styled(
                confirm.assertion.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(" to confirm:"),
        ]),
        Line::raw(format!("{}{}", marker(true), confirm.typed)),
        Line::raw(""),
        Line::from(vec![
            Span::styled(action, action_style),
            Span::raw("   Esc: cancel"),
        ]),
    ];
    let p = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title(title.to_string())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.error)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

/// Stack live notifications in the top-right corner, newest on top.
pub fn render_toasts(f: &mut Frame, area: Rect, app: &AppState) {
    let width = 48u16.min(area.width);
    let mut y = area.y + 1;
    for n in app.notifications.visible() {
        let height = 4u16;
        if y + height > area.y + area.height {
            break;
        }
        let color = match n.level {
            AlertLevel::Success => app.theme.success,
            AlertLevel::Error => app.theme.error,
            AlertLevel::Info => app.theme.title,
        };
        let rect = Rect {
            x: area.x + area.width.saturating_sub(width + 1),
            y,
            width,
            height,
        };
        let p = Paragraph::new(n.description.clone())
            .wrap(Wrap { trim: true })
            .style(Style::default().fg(app.theme.text))
            .block(
                Block::default()
                    .title(Span::styled(
                        n.title.clone(),
                        Style::default().fg(color).add_modifier(Modifier::BOLD),
                    ))
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color)),
            );
        f.render_widget(Clear, rect);
        f.render_widget(p, rect);
        y += height;
    }
}

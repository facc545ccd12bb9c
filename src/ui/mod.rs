pub mod applications;
pub mod components;
pub mod idps;
pub mod users;
pub mod wizard;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{ActiveTab, AppState, InputMode, ModalState};

const TABS: [ActiveTab; 3] = [
    ActiveTab::Users,
    ActiveTab::Applications,
    ActiveTab::IdentityProviders,
];

pub fn render(f: &mut Frame, app: &mut AppState) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5), Constraint::Length(1)].as_ref())
        .split(f.area());

    let tabs: Vec<String> = TABS
        .iter()
        .map(|t| {
            if *t == app.active_tab {
                format!("[{}]", t.title())
            } else {
                t.title().to_string()
            }
        })
        .collect();
    let prompt = match app.input_mode {
        InputMode::Search => format!("  Search: {}", app.search_query),
        InputMode::Normal | InputMode::Modal => String::new(),
    };
    let p = Paragraph::new(format!(
        "{} as {}  {}{prompt}  Tab: switch tab; /: search; n: new; r: refresh; ?: help; q: quit",
        app.config.base_url,
        app.operator,
        tabs.join("  "),
    ))
    .block(
        Block::default()
            .title("iam-console")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    )
    .style(Style::default().fg(app.theme.header_fg).bg(app.theme.header_bg));
    f.render_widget(p, root[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)].as_ref())
        .split(root[1]);

    match app.active_tab {
        ActiveTab::Users => {
            users::render_users_table(f, body[0], app);
            users::render_user_details(f, body[1], app);
        }
        ActiveTab::Applications => {
            applications::render_applications_table(f, body[0], app);
            applications::render_application_details(f, body[1], app);
        }
        ActiveTab::IdentityProviders => {
            idps::render_idp_table(f, body[0], app);
            idps::render_idp_details(f, body[1], app);
        }
    }

    components::render_status_bar(f, root[2], app);

    let area = f.area();
    if app.settings.is_some() {
        applications::render_settings_panel(f, area, app);
    }
    if app.idps.confirm.is_some() {
        idps::render_delete_confirm(f, area, app);
    }
    if app.wizard.is_some() {
        wizard::render_wizard(f, area, app);
    }
    match &app.modal {
        Some(ModalState::Help { scroll }) => components::render_help_modal(f, area, app, *scroll),
        Some(state @ ModalState::Info { .. }) => components::render_info_modal(f, area, app, state),
        None => {}
    }
    components::render_toasts(f, area, app);
}

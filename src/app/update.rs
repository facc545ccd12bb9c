//! Event loop and key dispatch.
//!
//! Keys go to the topmost thing on screen: a modal, then the wizard, then the
//! settings panel, then an open IdP delete confirmation, then the search box,
//! and finally the keymap for the active tab.
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::Backend;
use std::time::Duration;
use tracing::{debug, info};

use crate::api::worker::Request;
use crate::app::keymap::KeyAction;
use crate::app::{ActiveTab, AppState, InputMode, ModalState};
use crate::idp::{NEW_IDP_ROUTE, Placeholder};
use crate::wizard::Advance;
use crate::wizard::steps::StepContent;

/// Whether the loop keeps running after a key.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut AppState) -> Result<()> {
    app.refresh_all();
    loop {
        app.drain_responses();
        terminal.draw(|f| crate::ui::render(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && handle_key(app, key) == Flow::Quit {
                    info!("quit requested");
                    break;
                }
            }
        }
    }
    Ok(())
}

pub fn handle_key(app: &mut AppState, key: KeyEvent) -> Flow {
    if app.modal.is_some() {
        handle_modal_key(app, key.code);
        return Flow::Continue;
    }
    if app.wizard.is_some() {
        handle_wizard_key(app, key);
        return Flow::Continue;
    }
    if app.settings.is_some() {
        handle_settings_key(app, key.code);
        return Flow::Continue;
    }
    if app.idps.confirm.is_some() {
        handle_idp_confirm_key(app, key.code);
        return Flow::Continue;
    }
    if app.input_mode == InputMode::Search {
        handle_search_key(app, key.code);
        return Flow::Continue;
    }
    match app.keymap.resolve(&key) {
        Some(action) => handle_action(app, action),
        None => Flow::Continue,
    }
}

fn handle_action(app: &mut AppState, action: KeyAction) -> Flow {
    match action {
        KeyAction::Quit => return Flow::Quit,
        KeyAction::Ignore => {}
        KeyAction::OpenHelp => {
            app.modal = Some(ModalState::Help { scroll: 0 });
            app.input_mode = InputMode::Modal;
        }
        KeyAction::StartSearch => {
            app.search_query.clear();
            app.apply_search();
            app.input_mode = InputMode::Search;
        }
        KeyAction::SwitchTab => app.switch_tab(),
        KeyAction::Refresh => app.refresh_current(),
        KeyAction::NewEntity => match app.active_tab {
            ActiveTab::Users => app.open_wizard(),
            ActiveTab::IdentityProviders => app.show_route(NEW_IDP_ROUTE.to_string()),
            ActiveTab::Applications => {}
        },
        KeyAction::EnterAction => enter_selection(app),
        KeyAction::DeleteSelection => delete_selection(app),
        KeyAction::MoveUp => move_selection(app, -1),
        KeyAction::MoveDown => move_selection(app, 1),
        KeyAction::MoveLeftPage | KeyAction::PageUp => change_page(app, false),
        KeyAction::MoveRightPage | KeyAction::PageDown => change_page(app, true),
    }
    Flow::Continue
}

fn move_selection(app: &mut AppState, delta: isize) {
    match app.active_tab {
        ActiveTab::Users => {
            let n = app.visible_users().len();
            app.selected_user_index = step_index(app.selected_user_index, delta, n);
        }
        ActiveTab::Applications => {
            let n = app.visible_applications().len();
            app.selected_app_index = step_index(app.selected_app_index, delta, n);
        }
        ActiveTab::IdentityProviders => app.idps.move_selection(delta),
    }
}

fn step_index(current: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    current.saturating_add_signed(delta).min(len - 1)
}

fn change_page(app: &mut AppState, forward: bool) {
    let moved = match app.active_tab {
        ActiveTab::Users => {
            let total = app.users.total_results;
            let moved = if forward { app.users_paging.next(total) } else { app.users_paging.prev() };
            if moved {
                app.selected_user_index = 0;
            }
            moved
        }
        ActiveTab::Applications => {
            let total = app.applications.total_results;
            let moved = if forward {
                app.applications_paging.next(total)
            } else {
                app.applications_paging.prev()
            };
            if moved {
                app.selected_app_index = 0;
            }
            moved
        }
        ActiveTab::IdentityProviders => {
            let total = app.idps.list.total_results;
            if forward { app.idps_paging.next(total) } else { app.idps_paging.prev() }
        }
    };
    if moved {
        debug!(tab = ?app.active_tab, forward, "page changed");
        app.refresh_current();
    }
}

fn enter_selection(app: &mut AppState) {
    match app.active_tab {
        ActiveTab::Users => {}
        ActiveTab::Applications => {
            let visible = app.visible_applications();
            let id = visible
                .get(app.selected_app_index)
                .and_then(|i| app.applications.applications.get(*i))
                .map(|a| a.id.clone());
            if let Some(id) = id {
                app.open_application(&id);
            }
        }
        ActiveTab::IdentityProviders => {
            if let Some(placeholder) = app.idps.placeholder() {
                match placeholder {
                    Placeholder::NoSearchResults(_) => app.clear_search(),
                    Placeholder::EmptyList => app.show_route(NEW_IDP_ROUTE.to_string()),
                }
                return;
            }
            let route = app.idps.selected_idp().and_then(|idp| app.idps.edit(&idp.id));
            if let Some(route) = route {
                app.show_route(route);
            }
        }
    }
}

fn delete_selection(app: &mut AppState) {
    if app.active_tab != ActiveTab::IdentityProviders {
        return;
    }
    let Some(id) = app.idps.selected_idp().map(|idp| idp.id.clone()) else {
        return;
    };
    app.idps.begin_delete(&id);
}

fn handle_search_key(app: &mut AppState, code: KeyCode) {
    match code {
        KeyCode::Esc => {
            app.clear_search();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Enter => app.input_mode = InputMode::Normal,
        KeyCode::Backspace => {
            app.search_query.pop();
            app.apply_search();
        }
        KeyCode::Char(c) => {
            app.search_query.push(c);
            app.apply_search();
        }
        _ => {}
    }
}

fn handle_modal_key(app: &mut AppState, code: KeyCode) {
    match code {
        KeyCode::Down | KeyCode::Char('j') => {
            if let Some(ModalState::Help { scroll }) = app.modal.as_mut() {
                *scroll = scroll.saturating_add(1);
            }
        }
        KeyCode::Up | KeyCode::Char('k') => {
            if let Some(ModalState::Help { scroll }) = app.modal.as_mut() {
                *scroll = scroll.saturating_sub(1);
            }
        }
        KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') | KeyCode::Char('?') => close_modal(app),
        _ => {}
    }
}

fn close_modal(app: &mut AppState) {
    app.modal = None;
    app.input_mode = InputMode::Normal;
}

fn handle_wizard_key(app: &mut AppState, key: KeyEvent) {
    let domains = app.config.user_store_domains.clone();
    let Some(session) = app.wizard.as_mut() else {
        return;
    };
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let on_summary = matches!(session.content, StepContent::Summary(_));

    match key.code {
        KeyCode::Esc => {
            app.close_wizard();
            return;
        }
        KeyCode::Char('p') if ctrl => {
            if session.controller.retreat().is_ok() {
                session.sync_content(&domains);
            }
            return;
        }
        KeyCode::Backspace | KeyCode::Left if on_summary => {
            if session.controller.retreat().is_ok() {
                session.sync_content(&domains);
            }
            return;
        }
        KeyCode::Enter => {
            match session.controller.advance() {
                Advance::Finish => app.submit_wizard(),
                Advance::SubmitStep(step) => {
                    let values = match &mut session.content {
                        StepContent::GeneralDetails(form) => form.validate().map(|d| d.into_values()),
                        StepContent::Summary(_) => Some(Default::default()),
                    };
                    if let Some(values) = values {
                        session.controller.complete_step(step, values);
                        session.sync_content(&domains);
                    } else {
                        debug!(step = step.as_str(), "step did not validate");
                    }
                }
            }
            return;
        }
        _ => {}
    }

    let StepContent::GeneralDetails(form) = &mut session.content else {
        return;
    };
    match key.code {
        KeyCode::Down | KeyCode::Tab => form.focus_next(),
        KeyCode::Up | KeyCode::BackTab => form.focus_prev(),
        KeyCode::Left => form.cycle(false),
        KeyCode::Right => form.cycle(true),
        KeyCode::Backspace => form.backspace(),
        KeyCode::Char(c) if !ctrl => form.input_char(c),
        _ => {}
    }
}

fn handle_settings_key(app: &mut AppState, code: KeyCode) {
    let busy = app.settings_busy;
    let Some(panel) = app.settings.as_mut() else {
        return;
    };

    if let Some(confirm) = panel.confirm.as_mut() {
        match code {
            KeyCode::Esc => panel.cancel_delete(),
            KeyCode::Backspace => confirm.backspace(),
            KeyCode::Char(c) => confirm.input_char(c),
            KeyCode::Enter if !busy => {
                if let Some(id) = panel.confirm_delete() {
                    info!(app = %id, "deleting application");
                    app.settings_busy = true;
                    app.worker.send(Request::DeleteApplication(id));
                }
            }
            _ => {}
        }
        return;
    }

    if let Some(form) = panel.editor.as_mut() {
        match code {
            KeyCode::Esc => panel.close_editor(),
            KeyCode::Down | KeyCode::Tab => form.focus_next(),
            KeyCode::Up | KeyCode::BackTab => form.focus_prev(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Char(c) => form.input_char(c),
            KeyCode::Enter if !busy => {
                if let Some(update) = panel.submit_editor() {
                    info!(app = %update.id, "updating application");
                    app.settings_busy = true;
                    app.worker.send(Request::UpdateApplication(update));
                }
            }
            _ => {}
        }
        return;
    }

    match code {
        KeyCode::Esc | KeyCode::Char('q') => app.close_settings(),
        KeyCode::Enter | KeyCode::Char('e') => {
            panel.open_editor();
        }
        KeyCode::Delete | KeyCode::Char('d') => {
            panel.request_delete();
        }
        _ => {}
    }
}

fn handle_idp_confirm_key(app: &mut AppState, code: KeyCode) {
    let Some(confirm) = app.idps.confirm.as_mut() else {
        return;
    };
    match code {
        KeyCode::Esc => app.idps.cancel_delete(),
        KeyCode::Backspace => confirm.backspace(),
        KeyCode::Char(c) => confirm.input_char(c),
        KeyCode::Enter => {
            if let Some(id) = app.idps.confirm_delete() {
                info!(idp = %id, "deleting identity provider");
                app.idps.deleting = Some(id.clone());
                app.worker.send(Request::DeleteIdentityProvider(id));
            }
        }
        _ => {}
    }
}

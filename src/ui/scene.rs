use std::cell::RefCell;
use std::rc::Rc;

use gtk4 as gtk;
use gtk4::prelude::*;

use super::deck::{refresh_card_view, refresh_memorize_view, refresh_mode_buttons};
use super::hud::{start_timer, stop_timer, update_subtitle};
use super::quiz::refresh_game_view;
use super::session::{ModeChange, ViewMode};
use super::state::AppState;

pub(super) const LOGIN_PAGE: &str = "login";

fn show_page(st: &AppState, page: &str, transition: gtk::StackTransitionType) {
    if let Some(stack) = &st.view_stack {
        stack.set_transition_type(transition);
        stack.set_visible_child_name(page);
    }
}

pub(super) fn apply_mode(state: &Rc<RefCell<AppState>>, mode: ViewMode) {
    let change = {
        let mut st = state.borrow_mut();
        if !st.auth.is_signed_in() {
            return;
        }
        let change = st.session.set_mode(mode);
        if change == ModeChange::LeftGame {
            stop_timer(&mut st);
        }
        change
    };
    match change {
        ModeChange::Unchanged => return,
        ModeChange::EnteredGame => start_timer(state),
        ModeChange::LeftGame | ModeChange::Switched => {}
    }
    tracing::debug!(mode = mode.name(), "view mode changed");

    {
        let st = state.borrow();
        show_page(&st, mode.name(), gtk::StackTransitionType::Crossfade);
    }
    refresh_views(state);

    if mode == ViewMode::Game {
        let entry = state.borrow().answer_entry.clone();
        if let Some(entry) = entry {
            entry.grab_focus();
        }
    }
}

pub(super) fn refresh_views(state: &Rc<RefCell<AppState>>) {
    let st = state.borrow();
    refresh_mode_buttons(&st);
    refresh_card_view(&st);
    refresh_memorize_view(&st);
    refresh_game_view(&st);
    update_subtitle(&st);
}

pub(super) fn show_login(state: &Rc<RefCell<AppState>>) {
    {
        let mut st = state.borrow_mut();
        stop_timer(&mut st);
        st.session.reset(&mut rand::rng());
        if let Some(bar) = &st.study_bar {
            bar.set_visible(false);
        }
        if let Some(button) = &st.sign_out_button {
            button.set_visible(false);
        }
        show_page(&st, LOGIN_PAGE, gtk::StackTransitionType::SlideRight);
    }
    refresh_views(state);
}

pub(super) fn show_signed_in(state: &Rc<RefCell<AppState>>) {
    {
        let st = state.borrow();
        if let Some(bar) = &st.study_bar {
            bar.set_visible(true);
        }
        if let Some(button) = &st.sign_out_button {
            button.set_visible(true);
        }
        show_page(&st, st.session.mode.name(), gtk::StackTransitionType::SlideLeft);
    }
    refresh_views(state);
}

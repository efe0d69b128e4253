use std::cell::RefCell;
use std::rc::Rc;

use gettextrs::gettext;
use gtk4::glib;

use super::dialogs::show_alert;
use super::game::TickOutcome;
use super::session::ViewMode;
use super::state::AppState;

pub(super) fn game_subtitle(score: u32, level: u32, time_left: u32) -> String {
    gettext("Score {score} | Level {level} | Time {time}s")
        .replace("{score}", &score.to_string())
        .replace("{level}", &level.to_string())
        .replace("{time}", &time_left.to_string())
}

pub(super) fn level_up_message(level: u32) -> String {
    gettext("Level {level}").replace("{level}", &level.to_string())
}

pub(super) fn update_subtitle(st: &AppState) {
    let Some(title) = &st.window_title else {
        return;
    };
    let Some(identity) = st.auth.current() else {
        title.set_subtitle("");
        return;
    };
    let game = &st.session.game;
    let subtitle = if st.session.mode == ViewMode::Game {
        game_subtitle(game.score, game.level, game.time_left)
    } else {
        let who = identity.display_name.unwrap_or(identity.owner_id);
        format!("{} | {}", who, gettext(st.session.mode.label()))
    };
    title.set_subtitle(&subtitle);
}

pub(super) fn stop_timer(st: &mut AppState) {
    if let Some(handle) = st.timer_handle.take() {
        handle.remove();
    }
}

pub(super) fn start_timer(state: &Rc<RefCell<AppState>>) {
    let mut st = state.borrow_mut();
    stop_timer(&mut st);

    let state_clone = state.clone();
    let handle = glib::timeout_add_local(std::time::Duration::from_secs(1), move || {
        let outcome = {
            let mut st = state_clone.borrow_mut();
            let outcome = st.session.tick();
            if outcome == TickOutcome::Ignored {
                // Returning Break removes the source; forget the handle so it is not removed twice.
                st.timer_handle = None;
            } else {
                update_subtitle(&st);
            }
            outcome
        };
        match outcome {
            TickOutcome::Ignored => glib::ControlFlow::Break,
            TickOutcome::Running(_) => glib::ControlFlow::Continue,
            TickOutcome::Expired => {
                tracing::debug!("quiz countdown expired");
                show_alert(&state_clone, &gettext("Time is up!"), None);
                glib::ControlFlow::Continue
            }
        }
    });
    st.timer_handle = Some(handle);
}

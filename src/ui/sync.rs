use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use gettextrs::gettext;
use gtk4::prelude::*;

use super::dialogs::{show_alert, show_toast};
use super::scene;
use super::state::AppState;
use crate::error::{AppError, ErrorKind};
use crate::gateway::{self, Credentials, Flashcard};

type Joined<T> = Result<Result<T, AppError>, Box<dyn Any + Send + 'static>>;

fn joined<T>(result: Joined<T>) -> Result<T, AppError> {
    result.map_err(|_| AppError::Worker)?
}

pub(super) fn sign_in(state: &Rc<RefCell<AppState>>, credentials: Credentials) {
    let provider = state.borrow().gateway.identity.clone();
    let state = state.clone();
    glib::spawn_future_local(async move {
        let result = joined(gio::spawn_blocking(move || provider.sign_in(&credentials)).await);
        match result {
            Ok(identity) => {
                tracing::info!(owner = %identity.owner_id, "signed in");
                let auth = state.borrow().auth.clone();
                auth.set_identity(Some(identity));
            }
            Err(err) => {
                tracing::warn!(error = %err, "sign in failed");
                show_alert(&state, &gettext("Login failed"), Some(&err.detail()));
            }
        }
    });
}

pub(super) fn sign_out(state: &Rc<RefCell<AppState>>) {
    let (provider, auth) = {
        let st = state.borrow();
        (st.gateway.identity.clone(), st.auth.clone())
    };
    let Some(identity) = auth.current() else {
        return;
    };
    if let Err(err) = provider.sign_out(&identity) {
        tracing::warn!(owner = %identity.owner_id, error = %err, "sign out reported an error");
    }
    tracing::info!(owner = %identity.owner_id, "signed out");
    auth.set_identity(None);
}

pub(super) fn load_cards(state: &Rc<RefCell<AppState>>) {
    let (store, identity) = {
        let st = state.borrow();
        (st.gateway.store.clone(), st.auth.current())
    };
    let Some(identity) = identity else {
        return;
    };
    let owner = identity.owner_id.clone();
    let state = state.clone();
    glib::spawn_future_local(async move {
        let result =
            joined(gio::spawn_blocking(move || store.list_cards_for_owner(&identity)).await);
        apply_cards(&state, &owner, result);
    });
}

pub(super) fn add_card(state: &Rc<RefCell<AppState>>, front: String, back: String) {
    let (store, identity) = {
        let st = state.borrow();
        (st.gateway.store.clone(), st.auth.current())
    };
    let Some(identity) = identity else {
        return;
    };
    let owner = identity.owner_id.clone();
    {
        let mut st = state.borrow_mut();
        st.pending_inserts += 1;
        refresh_add_button(&st);
    }
    let state = state.clone();
    glib::spawn_future_local(async move {
        let result = joined(
            gio::spawn_blocking(move || {
                gateway::add_card_and_refresh(store.as_ref(), &identity, &front, &back)
            })
            .await,
        );
        {
            let mut st = state.borrow_mut();
            st.pending_inserts = st.pending_inserts.saturating_sub(1);
            refresh_add_button(&st);
        }
        match result {
            Err(err) if err.kind() == ErrorKind::ValidationFailure => {
                tracing::debug!(error = %err, "ignoring incomplete flashcard");
            }
            Ok(cards) => {
                clear_add_form(&state);
                apply_cards(&state, &owner, Ok(cards));
            }
            Err(err) => apply_cards(&state, &owner, Err(err)),
        }
    });
}

fn refresh_add_button(st: &AppState) {
    if let Some(button) = &st.add_button {
        button.set_sensitive(st.pending_inserts == 0);
    }
}

fn clear_add_form(state: &Rc<RefCell<AppState>>) {
    let (front, back) = {
        let st = state.borrow();
        (st.front_entry.clone(), st.back_entry.clone())
    };
    for entry in [front, back].into_iter().flatten() {
        entry.set_text("");
    }
}

fn apply_cards(
    state: &Rc<RefCell<AppState>>,
    owner: &str,
    result: Result<Vec<Flashcard>, AppError>,
) {
    let still_current = state.borrow().auth.is_current_owner(owner);
    if !still_current {
        tracing::debug!(owner, "dropping result for a previous session");
        return;
    }
    match result {
        Ok(cards) => {
            tracing::info!(owner, count = cards.len(), "flashcards loaded");
            state.borrow_mut().session.set_cards(cards);
            scene::refresh_views(state);
        }
        Err(err) if err.kind() == ErrorKind::AuthFailure => {
            tracing::warn!(owner, error = %err, "session is no longer valid");
            sign_out(state);
            show_alert(
                state,
                &gettext("Session expired"),
                Some(&gettext("Sign in again to keep studying.")),
            );
        }
        Err(err) => {
            tracing::error!(owner, error = %err, "flashcard store request failed");
            show_toast(state, &gettext("Could not reach the flashcard store"));
        }
    }
}

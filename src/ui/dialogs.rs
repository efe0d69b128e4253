use std::cell::RefCell;
use std::rc::Rc;

use gettextrs::gettext;
use gtk4 as gtk;
use gtk4::prelude::*;
use libadwaita as adw;

use adw::prelude::*;

use super::app::APP_ID;
use super::state::AppState;
use super::sync;
use crate::gateway::Credentials;

pub fn show_instructions_dialog(app: &adw::Application) -> adw::AlertDialog {
    let dialog = adw::AlertDialog::new(
        Some(&gettext("Instructions")),
        Some(&gettext(
            "Add cards with a front and a back.\n\
Card mode shows one card at a time; click it to flip.\n\
Memorize mode lists every card with its answer.\n\
Game mode asks for the back of each card: type it and press Enter. \
Every right answer is worth 10 points and every 100 points is a new level.",
        )),
    );
    dialog.add_response("ok", &gettext("Got it"));
    dialog.set_default_response(Some("ok"));
    dialog.set_close_response("ok");
    dialog.present(app.active_window().as_ref());
    dialog
}

pub fn show_about_dialog(app: &adw::Application) -> adw::AboutDialog {
    let dialog = adw::AboutDialog::builder()
        .application_name("Flashgem")
        .application_icon(APP_ID)
        .developer_name("Sebastian Dávila (Basshift)")
        .developers(vec!["Sebastian Dávila (Basshift)"])
        .version(env!("CARGO_PKG_VERSION"))
        .comments(gettext("Flashcards with a jewel quiz."))
        .build();
    dialog.add_legal_section(
        "Flashgem",
        Some("© 2026 Sebastian Dávila (Basshift)"),
        gtk::License::MitX11,
        None,
    );
    dialog.present(app.active_window().as_ref());
    dialog
}

/// Blocking notification over the main window.
pub(super) fn show_alert(state: &Rc<RefCell<AppState>>, heading: &str, body: Option<&str>) {
    let window = state.borrow().window.clone();
    let dialog = adw::AlertDialog::new(Some(heading), body);
    dialog.add_response("ok", &gettext("OK"));
    dialog.set_default_response(Some("ok"));
    dialog.set_close_response("ok");
    dialog.present(window.as_ref());
}

pub(super) fn show_toast(state: &Rc<RefCell<AppState>>, text: &str) {
    let overlay = state.borrow().toast_overlay.clone();
    if let Some(overlay) = overlay {
        let toast = adw::Toast::new(text);
        toast.set_timeout(2);
        overlay.add_toast(toast);
    }
}

pub(super) fn show_sign_in_dialog(state: &Rc<RefCell<AppState>>) {
    let window = state.borrow().window.clone();
    let dialog = adw::AlertDialog::new(
        Some(&gettext("Sign in")),
        Some(&gettext("Use your account to load your flashcards.")),
    );

    let form = gtk::Box::new(gtk::Orientation::Vertical, 8);
    let email_entry = gtk::Entry::builder()
        .placeholder_text(gettext("Email"))
        .activates_default(true)
        .build();
    let password_entry = gtk::PasswordEntry::builder()
        .placeholder_text(gettext("Password"))
        .show_peek_icon(true)
        .activates_default(true)
        .build();
    form.append(&email_entry);
    form.append(&password_entry);
    dialog.set_extra_child(Some(&form));

    dialog.add_response("cancel", &gettext("Cancel"));
    dialog.add_response("sign-in", &gettext("Sign In"));
    dialog.set_response_appearance("sign-in", adw::ResponseAppearance::Suggested);
    dialog.set_default_response(Some("sign-in"));
    dialog.set_close_response("cancel");

    dialog.connect_response(None, {
        let state = state.clone();
        move |_, response| {
            if response == "sign-in" {
                let credentials = Credentials {
                    email: email_entry.text().to_string(),
                    password: password_entry.text().to_string(),
                };
                sync::sign_in(&state, credentials);
            } else {
                tracing::info!("sign in cancelled");
                show_alert(&state, &gettext("Login failed"), None);
            }
        }
    });
    dialog.present(window.as_ref());
}

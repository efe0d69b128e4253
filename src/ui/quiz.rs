use std::cell::RefCell;
use std::rc::Rc;

use gettextrs::gettext;
use gtk4 as gtk;
use gtk4::prelude::*;

use super::board::{CONTENT_MARGIN, build_board_area};
use super::dialogs::show_toast;
use super::hud::level_up_message;
use super::scene::refresh_views;
use super::session::AnswerOutcome;
use super::state::AppState;

pub fn build_game_view(state: &Rc<RefCell<AppState>>) -> gtk::Stack {
    let content = gtk::Box::new(gtk::Orientation::Vertical, 12);
    content.set_halign(gtk::Align::Center);
    content.set_valign(gtk::Align::Center);
    content.set_margin_top(CONTENT_MARGIN);
    content.set_margin_bottom(CONTENT_MARGIN);
    content.set_margin_start(CONTENT_MARGIN);
    content.set_margin_end(CONTENT_MARGIN);

    let title = gtk::Label::new(Some(&gettext("Jewels of Wisdom")));
    title.add_css_class("title-2");
    title.add_css_class("game-title");

    let board_frame = gtk::AspectFrame::new(0.5, 0.5, 1.0, false);
    board_frame.set_size_request(280, 280);
    board_frame.set_vexpand(true);
    let board = build_board_area(state);
    board_frame.set_child(Some(&board));

    let prompt = gtk::Label::new(None);
    prompt.add_css_class("quiz-prompt");
    prompt.set_wrap(true);
    prompt.set_justify(gtk::Justification::Center);

    let answer_entry = gtk::Entry::builder()
        .placeholder_text(gettext("Your Answer..."))
        .halign(gtk::Align::Center)
        .css_classes(vec!["answer-entry"])
        .build();
    answer_entry.connect_activate({
        let state = state.clone();
        move |entry| handle_answer(&state, entry)
    });

    content.append(&title);
    content.append(&board_frame);
    content.append(&prompt);
    content.append(&answer_entry);

    let empty = gtk::Label::new(Some(&gettext("Add a card to play")));
    empty.add_css_class("title-3");
    empty.add_css_class("dim-label");

    let stack = gtk::Stack::new();
    stack.set_transition_type(gtk::StackTransitionType::Crossfade);
    stack.add_named(&content, Some("play"));
    stack.add_named(&empty, Some("empty"));

    {
        let mut st = state.borrow_mut();
        st.board_area = Some(board);
        st.quiz_prompt = Some(prompt);
        st.answer_entry = Some(answer_entry);
        st.game_stack = Some(stack.clone());
    }

    stack
}

pub(super) fn refresh_game_view(st: &AppState) {
    if let Some(stack) = &st.game_stack {
        let page = if st.session.has_cards() { "play" } else { "empty" };
        stack.set_visible_child_name(page);
    }
    if let Some(prompt) = &st.quiz_prompt {
        let front = st
            .session
            .current_card()
            .map(|card| card.front.as_str())
            .unwrap_or_default();
        prompt.set_text(front);
    }
    if let Some(board) = &st.board_area {
        board.queue_draw();
    }
}

fn handle_answer(state: &Rc<RefCell<AppState>>, entry: &gtk::Entry) {
    let submitted = entry.text().to_string();
    entry.set_text("");

    let outcome = state
        .borrow_mut()
        .session
        .submit_answer(&submitted, &mut rand::rng());
    match outcome {
        AnswerOutcome::Inactive => {}
        AnswerOutcome::Mismatch => {
            tracing::debug!("answer did not match");
            show_toast(state, &gettext("Try again!"));
        }
        AnswerOutcome::Correct(reward) => {
            let (score, level, cleared_total) = {
                let st = state.borrow();
                let game = &st.session.game;
                (game.score, game.level, game.grid.cleared_count())
            };
            tracing::debug!(score, level, cleared = ?reward.cleared, cleared_total, "answer matched");
            if reward.level_up {
                show_toast(state, &level_up_message(level));
            }
            refresh_views(state);
        }
    }
}

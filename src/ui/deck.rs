use std::cell::RefCell;
use std::rc::Rc;

use gettextrs::gettext;
use gtk4 as gtk;
use gtk4::pango;
use gtk4::prelude::*;
use libadwaita as adw;

use super::board::CONTENT_MARGIN;
use super::scene::{apply_mode, refresh_views};
use super::session::ViewMode;
use super::state::AppState;
use super::sync;

pub fn build_study_bar(state: &Rc<RefCell<AppState>>) -> gtk::Box {
    let bar = gtk::Box::new(gtk::Orientation::Vertical, 8);
    bar.add_css_class("study-bar");
    bar.set_halign(gtk::Align::Center);

    let form = gtk::Box::new(gtk::Orientation::Horizontal, 6);
    form.set_halign(gtk::Align::Center);
    let front_entry = gtk::Entry::builder()
        .placeholder_text(gettext("Front"))
        .build();
    let back_entry = gtk::Entry::builder()
        .placeholder_text(gettext("Back"))
        .build();
    let add_button = gtk::Button::with_label(&gettext("Add"));
    add_button.add_css_class("suggested-action");

    let submit = {
        let state = state.clone();
        let front_entry = front_entry.clone();
        let back_entry = back_entry.clone();
        move || {
            let front = front_entry.text().to_string();
            let back = back_entry.text().to_string();
            sync::add_card(&state, front, back);
        }
    };
    add_button.connect_clicked({
        let submit = submit.clone();
        move |_| submit()
    });
    back_entry.connect_activate(move |_| submit());

    form.append(&front_entry);
    form.append(&back_entry);
    form.append(&add_button);

    let switcher = gtk::Box::new(gtk::Orientation::Horizontal, 8);
    switcher.add_css_class("mode-switcher");
    switcher.set_halign(gtk::Align::Center);
    let mut mode_buttons = Vec::new();
    for mode in ViewMode::ALL {
        let button = gtk::Button::with_label(&gettext(mode.label()));
        if mode == ViewMode::Game {
            button.add_css_class("game-mode");
        }
        button.connect_clicked({
            let state = state.clone();
            move |_| apply_mode(&state, mode)
        });
        switcher.append(&button);
        mode_buttons.push((mode, button));
    }

    bar.append(&form);
    bar.append(&switcher);

    {
        let mut st = state.borrow_mut();
        st.front_entry = Some(front_entry);
        st.back_entry = Some(back_entry);
        st.add_button = Some(add_button);
        st.mode_buttons = mode_buttons;
        st.study_bar = Some(bar.clone());
    }

    bar
}

pub(super) fn refresh_mode_buttons(st: &AppState) {
    for (mode, button) in &st.mode_buttons {
        if *mode == st.session.mode {
            button.add_css_class("suggested-action");
        } else {
            button.remove_css_class("suggested-action");
        }
    }
}

pub fn build_card_view(state: &Rc<RefCell<AppState>>) -> gtk::Box {
    let root = gtk::Box::new(gtk::Orientation::Vertical, 12);
    root.set_margin_top(CONTENT_MARGIN);
    root.set_margin_bottom(CONTENT_MARGIN);
    root.set_margin_start(CONTENT_MARGIN);
    root.set_margin_end(CONTENT_MARGIN);
    root.set_halign(gtk::Align::Center);
    root.set_valign(gtk::Align::Center);

    let face = gtk::DrawingArea::builder()
        .content_width(360)
        .content_height(220)
        .css_classes(vec!["card-face"])
        .build();

    let state_draw = state.clone();
    face.set_draw_func(move |area, cr, width, height| {
        let st = state_draw.borrow();
        let session = &st.session;
        let (text, hint) = match session.current_card() {
            Some(card) if session.show_back => (card.back.clone(), gettext("Back")),
            Some(card) => (card.front.clone(), gettext("Front")),
            None => (gettext("No cards yet"), gettext("Add one above")),
        };

        let fg = area.style_context().color();
        cr.set_source_rgba(
            fg.red() as f64,
            fg.green() as f64,
            fg.blue() as f64,
            fg.alpha() as f64,
        );

        let min_dim = width.min(height) as f64;
        let layout = pangocairo::functions::create_layout(cr);
        let mut font_desc = pango::FontDescription::new();
        font_desc.set_family("Cantarell, Noto Sans, sans");
        font_desc.set_weight(pango::Weight::Bold);
        font_desc.set_size((min_dim * 0.14 * pango::SCALE as f64) as i32);
        layout.set_font_description(Some(&font_desc));
        layout.set_width(((width as f64 * 0.9) * pango::SCALE as f64) as i32);
        layout.set_wrap(pango::WrapMode::WordChar);
        layout.set_alignment(pango::Alignment::Center);
        layout.set_text(&text);
        let (text_width, text_height) = layout.pixel_size();
        cr.move_to(
            (width as f64 - text_width as f64) / 2.0,
            (height as f64 - text_height as f64) / 2.0,
        );
        pangocairo::functions::show_layout(cr, &layout);

        let hint_layout = pangocairo::functions::create_layout(cr);
        let mut hint_font = pango::FontDescription::new();
        hint_font.set_family("Cantarell, Noto Sans, sans");
        hint_font.set_size((min_dim * 0.06 * pango::SCALE as f64) as i32);
        hint_layout.set_font_description(Some(&hint_font));
        hint_layout.set_text(&hint);
        let (hint_width, hint_height) = hint_layout.pixel_size();
        cr.set_source_rgba(
            fg.red() as f64,
            fg.green() as f64,
            fg.blue() as f64,
            fg.alpha() as f64 * 0.55,
        );
        cr.move_to(
            (width as f64 - hint_width as f64) / 2.0,
            height as f64 - hint_height as f64 - 12.0,
        );
        pangocairo::functions::show_layout(cr, &hint_layout);
    });

    let flip = gtk::GestureClick::new();
    flip.connect_released({
        let state = state.clone();
        move |_, _, _, _| flip_card(&state)
    });
    face.add_controller(flip);

    let position = gtk::Label::new(None);
    position.add_css_class("caption");
    position.add_css_class("dim-label");

    let buttons = gtk::Box::new(gtk::Orientation::Horizontal, 8);
    buttons.set_halign(gtk::Align::Center);
    let flip_button = gtk::Button::with_label(&gettext("Flip"));
    flip_button.connect_clicked({
        let state = state.clone();
        move |_| flip_card(&state)
    });
    let next_button = gtk::Button::with_label(&gettext("Next"));
    next_button.add_css_class("suggested-action");
    next_button.connect_clicked({
        let state = state.clone();
        move |_| {
            state.borrow_mut().session.next_card();
            refresh_views(&state);
        }
    });
    buttons.append(&flip_button);
    buttons.append(&next_button);

    root.append(&face);
    root.append(&position);
    root.append(&buttons);

    {
        let mut st = state.borrow_mut();
        st.card_face = Some(face);
        st.card_position_label = Some(position);
    }

    root
}

fn flip_card(state: &Rc<RefCell<AppState>>) {
    state.borrow_mut().session.toggle_reveal();
    refresh_views(state);
}

pub fn build_memorize_view(state: &Rc<RefCell<AppState>>) -> gtk::ScrolledWindow {
    let list = gtk::ListBox::new();
    list.set_selection_mode(gtk::SelectionMode::None);
    list.add_css_class("boxed-list");
    list.set_margin_top(CONTENT_MARGIN);
    list.set_margin_bottom(CONTENT_MARGIN);
    list.set_margin_start(CONTENT_MARGIN);
    list.set_margin_end(CONTENT_MARGIN);
    list.set_valign(gtk::Align::Start);

    let placeholder = gtk::Label::new(Some(&gettext("No cards to memorize yet")));
    placeholder.add_css_class("dim-label");
    placeholder.set_margin_top(24);
    placeholder.set_margin_bottom(24);
    list.set_placeholder(Some(&placeholder));

    let clamp = adw::Clamp::builder()
        .maximum_size(560)
        .child(&list)
        .build();
    let scroller = gtk::ScrolledWindow::builder()
        .hscrollbar_policy(gtk::PolicyType::Never)
        .vexpand(true)
        .child(&clamp)
        .build();

    state.borrow_mut().memorize_list = Some(list);
    scroller
}

pub(super) fn refresh_card_view(st: &AppState) {
    if let Some(face) = &st.card_face {
        face.queue_draw();
    }
    if let Some(label) = &st.card_position_label {
        let session = &st.session;
        if session.has_cards() {
            label.set_text(&format!("{} / {}", session.index + 1, session.cards.len()));
        } else {
            label.set_text("");
        }
    }
}

pub(super) fn refresh_memorize_view(st: &AppState) {
    let Some(list) = &st.memorize_list else {
        return;
    };
    while let Some(row) = list.row_at_index(0) {
        list.remove(&row);
    }
    for card in &st.session.cards {
        let row = gtk::Box::new(gtk::Orientation::Horizontal, 12);
        row.add_css_class("memorize-row");
        let front = gtk::Label::builder()
            .label(card.front.as_str())
            .xalign(0.0)
            .hexpand(true)
            .wrap(true)
            .css_classes(vec!["memorize-front"])
            .build();
        let back = gtk::Label::builder()
            .label(card.back.as_str())
            .xalign(1.0)
            .wrap(true)
            .build();
        row.append(&front);
        row.append(&back);
        list.append(&row);
    }
}

use std::rc::Rc;

use gtk4 as gtk;
use libadwaita as adw;

use super::session::{StudySession, ViewMode};
use crate::gateway::{AuthSession, Gateway};

pub struct AppState {
    pub gateway: Gateway,
    pub auth: Rc<AuthSession>,
    pub window: Option<adw::ApplicationWindow>,
    pub view_stack: Option<gtk::Stack>,
    pub toast_overlay: Option<adw::ToastOverlay>,
    pub window_title: Option<adw::WindowTitle>,
    pub sign_out_button: Option<gtk::Button>,
    pub study_bar: Option<gtk::Box>,
    pub front_entry: Option<gtk::Entry>,
    pub back_entry: Option<gtk::Entry>,
    pub add_button: Option<gtk::Button>,
    pub mode_buttons: Vec<(ViewMode, gtk::Button)>,
    pub card_face: Option<gtk::DrawingArea>,
    pub card_position_label: Option<gtk::Label>,
    pub memorize_list: Option<gtk::ListBox>,
    pub game_stack: Option<gtk::Stack>,
    pub board_area: Option<gtk::DrawingArea>,
    pub quiz_prompt: Option<gtk::Label>,
    pub answer_entry: Option<gtk::Entry>,

    // Session state
    pub session: StudySession,
    pub timer_handle: Option<glib::SourceId>,
    pub pending_inserts: u32,
}

impl AppState {
    pub fn new(gateway: Gateway, auth: Rc<AuthSession>) -> Self {
        AppState {
            gateway,
            auth,
            window: None,
            view_stack: None,
            toast_overlay: None,
            window_title: None,
            sign_out_button: None,
            study_bar: None,
            front_entry: None,
            back_entry: None,
            add_button: None,
            mode_buttons: Vec::new(),
            card_face: None,
            card_position_label: None,
            memorize_list: None,
            game_stack: None,
            board_area: None,
            quiz_prompt: None,
            answer_entry: None,
            session: StudySession::new(&mut rand::rng()),
            timer_handle: None,
            pending_inserts: 0,
        }
    }
}

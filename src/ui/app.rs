use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Once;

use gettextrs::gettext;
use gio::SimpleAction;
use gtk4 as gtk;
use gtk4::gdk;
use gtk4::glib;
use gtk4::prelude::*;
use libadwaita as adw;
use adw::prelude::*;

use super::deck::{build_card_view, build_memorize_view, build_study_bar};
use super::dialogs::{show_about_dialog, show_instructions_dialog, show_sign_in_dialog};
use super::hud::stop_timer;
use super::quiz::build_game_view;
use super::scene::{LOGIN_PAGE, apply_mode, show_login, show_signed_in};
use super::session::ViewMode;
use super::state::AppState;
use super::sync;
use crate::gateway::{AuthSession, Gateway};

pub const APP_ID: &str = "io.basshift.Flashgem";
const ICON_RESOURCE_PATH: &str = "/io/basshift/Flashgem/icons/hicolor";

pub fn run(gateway: Gateway) -> glib::ExitCode {
    glib::set_prgname(Some(APP_ID));
    let app = adw::Application::builder().application_id(APP_ID).build();

    app.connect_activate(move |app| {
        load_css();
        gtk::Window::set_default_icon_name(APP_ID);

        let auth = Rc::new(AuthSession::new());
        let state = Rc::new(RefCell::new(AppState::new(gateway.clone(), auth.clone())));

        auth.on_auth_change({
            let state = state.clone();
            move |identity| match identity {
                Some(_) => {
                    show_signed_in(&state);
                    sync::load_cards(&state);
                }
                None => show_login(&state),
            }
        });

        let instructions_action = SimpleAction::new("instructions", None);
        instructions_action.connect_activate({
            let app = app.clone();
            move |_, _| {
                show_instructions_dialog(&app);
            }
        });
        app.add_action(&instructions_action);

        let about_action = SimpleAction::new("about", None);
        about_action.connect_activate({
            let app = app.clone();
            move |_, _| {
                show_about_dialog(&app);
            }
        });
        app.add_action(&about_action);

        let quit_action = SimpleAction::new("quit", None);
        quit_action.connect_activate({
            let app = app.clone();
            move |_, _| app.quit()
        });
        app.add_action(&quit_action);
        app.set_accels_for_action("app.quit", &["<Control>q"]);

        let window_title = adw::WindowTitle::new("Flashgem", "");
        let header = adw::HeaderBar::builder()
            .title_widget(&window_title)
            .build();
        header.add_css_class("flat");

        let sign_out_button = gtk::Button::builder()
            .icon_name("system-log-out-symbolic")
            .build();
        sign_out_button.set_tooltip_text(Some(&gettext("Sign Out")));
        sign_out_button.set_visible(false);
        sign_out_button.connect_clicked({
            let state = state.clone();
            move |_| sync::sign_out(&state)
        });
        header.pack_start(&sign_out_button);

        let menu_model = gio::Menu::new();
        menu_model.append(Some(&gettext("Instructions")), Some("app.instructions"));
        menu_model.append(Some(&gettext("About Flashgem")), Some("app.about"));
        menu_model.append(Some(&gettext("Quit")), Some("app.quit"));
        let menu_button = gtk::MenuButton::builder()
            .icon_name("open-menu-symbolic")
            .menu_model(&menu_model)
            .build();
        header.pack_end(&menu_button);

        let study_bar = build_study_bar(&state);
        study_bar.set_visible(false);

        let view_stack = gtk::Stack::new();
        view_stack.set_hexpand(true);
        view_stack.set_vexpand(true);
        view_stack.set_hhomogeneous(false);
        view_stack.set_vhomogeneous(false);
        view_stack.set_transition_duration(250);

        let login_view = build_login_view(&state);
        view_stack.add_named(&login_view, Some(LOGIN_PAGE));
        let card_view = build_card_view(&state);
        view_stack.add_named(&card_view, Some(ViewMode::Card.name()));
        let memorize_view = build_memorize_view(&state);
        view_stack.add_named(&memorize_view, Some(ViewMode::Memorize.name()));
        let game_view = build_game_view(&state);
        view_stack.add_named(&game_view, Some(ViewMode::Game.name()));
        view_stack.set_visible_child_name(LOGIN_PAGE);

        let body = gtk::Box::new(gtk::Orientation::Vertical, 0);
        body.append(&study_bar);
        body.append(&view_stack);

        let toast_overlay = adw::ToastOverlay::new();
        toast_overlay.set_child(Some(&body));

        let toolbar = adw::ToolbarView::new();
        toolbar.add_top_bar(&header);
        toolbar.set_content(Some(&toast_overlay));

        let win = adw::ApplicationWindow::builder()
            .application(app)
            .title("Flashgem")
            .default_width(760)
            .default_height(720)
            .content(&toolbar)
            .build();
        win.set_size_request(360, 560);
        win.add_css_class("app-window");

        let style_manager = adw::StyleManager::default();
        if style_manager.is_dark() {
            win.add_css_class("theme-dark");
        }
        style_manager.connect_notify_local(Some("dark"), {
            let win = win.clone();
            move |manager, _| {
                if manager.is_dark() {
                    win.add_css_class("theme-dark");
                } else {
                    win.remove_css_class("theme-dark");
                }
            }
        });

        {
            let mut st = state.borrow_mut();
            st.window = Some(win.clone());
            st.view_stack = Some(view_stack);
            st.toast_overlay = Some(toast_overlay);
            st.window_title = Some(window_title);
            st.sign_out_button = Some(sign_out_button);
        }

        let global_key = gtk::EventControllerKey::new();
        global_key.set_propagation_phase(gtk::PropagationPhase::Capture);
        global_key.connect_key_pressed({
            let state = state.clone();
            let win = win.clone();
            move |_, key, _, _| {
                if key == gdk::Key::Escape {
                    let target = state
                        .borrow()
                        .session
                        .escape_target(win.visible_dialog().is_some());
                    if let Some(mode) = target {
                        apply_mode(&state, mode);
                        return glib::Propagation::Stop;
                    }
                }
                glib::Propagation::Proceed
            }
        });
        win.add_controller(global_key);

        win.connect_close_request({
            let state = state.clone();
            move |_| {
                let mut st = state.borrow_mut();
                stop_timer(&mut st);
                glib::Propagation::Proceed
            }
        });

        win.present();
    });

    app.run()
}

fn load_css() {
    static RESOURCES_INIT: Once = Once::new();
    RESOURCES_INIT.call_once(|| {
        gio::resources_register_include!("flashgem.gresource")
            .expect("failed to register embedded resources");
    });

    let Some(display) = gdk::Display::default() else {
        return;
    };

    let icon_theme = gtk::IconTheme::for_display(&display);
    icon_theme.add_resource_path(ICON_RESOURCE_PATH);

    for resource_path in [
        "/io/basshift/Flashgem/style.css",
        "/io/basshift/Flashgem/style.dark.css",
    ] {
        let provider = gtk::CssProvider::new();
        provider.load_from_resource(resource_path);
        gtk::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
}

fn build_login_view(state: &Rc<RefCell<AppState>>) -> gtk::CenterBox {
    let center = gtk::CenterBox::new();
    center.set_hexpand(true);
    center.set_vexpand(true);

    let content = gtk::Box::new(gtk::Orientation::Vertical, 16);
    content.set_halign(gtk::Align::Center);
    content.set_valign(gtk::Align::Center);

    let icon = gtk::Image::from_icon_name(APP_ID);
    icon.set_pixel_size(128);

    let title = gtk::Label::new(Some(&gettext("Welcome to Flashgem")));
    title.add_css_class("title-1");
    title.add_css_class("login-title");

    let sign_in_button = gtk::Button::with_label(&gettext("Sign In"));
    sign_in_button.add_css_class("suggested-action");
    sign_in_button.add_css_class("pill");
    sign_in_button.set_halign(gtk::Align::Center);
    sign_in_button.connect_clicked({
        let state = state.clone();
        move |_| show_sign_in_dialog(&state)
    });

    content.append(&icon);
    content.append(&title);
    content.append(&sign_in_button);
    center.set_center_widget(Some(&content));
    center
}

mod config;
mod error;
mod gateway;
mod ui;

use gettextrs::LocaleCategory;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::gateway::Gateway;

const GETTEXT_PACKAGE: &str = "flashgem";
const LOCALEDIR: &str = match option_env!("FLASHGEM_LOCALEDIR") {
    Some(dir) => dir,
    None => "/usr/share/locale",
};

fn init_i18n() {
    gettextrs::setlocale(LocaleCategory::LcAll, "");
    if let Err(err) = gettextrs::bindtextdomain(GETTEXT_PACKAGE, LOCALEDIR) {
        tracing::warn!(error = %err, "could not bind text domain");
    }
    if let Err(err) = gettextrs::bind_textdomain_codeset(GETTEXT_PACKAGE, "UTF-8") {
        tracing::warn!(error = %err, "could not set text domain codeset");
    }
    if let Err(err) = gettextrs::textdomain(GETTEXT_PACKAGE) {
        tracing::warn!(error = %err, "could not switch text domain");
    }
}

fn main() -> glib::ExitCode {
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    init_i18n();

    let config = match AppConfig::load().and_then(|config| {
        config.validate()?;
        Ok(config)
    }) {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(error = %err, path = %config::config_path().display(), "invalid configuration");
            return glib::ExitCode::FAILURE;
        }
    };

    let gateway = match Gateway::from_config(&config) {
        Ok(gateway) => gateway,
        Err(err) => {
            tracing::error!(error = %err, "could not set up the flashcard gateway");
            return glib::ExitCode::FAILURE;
        }
    };
    tracing::info!(backend = ?config.backend, "starting flashgem");

    ui::app::run(gateway)
}

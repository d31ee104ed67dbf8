use adw::prelude::*;
use adw::Application;
use gtk4 as gtk;
use vetchat::{Config, Conversation, KeyValueStore, MemoryStore, Session, SqliteStore};

pub type Store = Box<dyn KeyValueStore>;

fn open_store(config: &Config) -> Store {
    let opened = match &config.store_path {
        Some(path) => SqliteStore::open(path),
        None => SqliteStore::open_default(),
    };
    match opened {
        Ok(store) => Box::new(store),
        Err(e) => {
            log::warn!("phone number will not be remembered: {e}");
            Box::new(MemoryStore::new())
        }
    }
}

/// Write a default config file on first run so there is something to edit.
fn ensure_config_file() {
    if Config::path().is_some_and(|path| !path.exists()) {
        if let Err(e) = Config::default().save() {
            log::warn!("could not write default config: {e}");
        }
    }
}

pub fn build_ui(app: &Application) {
    ensure_config_file();
    let config = Config::load();
    let backend = match config.backend() {
        Ok(backend) => backend,
        Err(e) => {
            log::error!("cannot reach chat backend: {e}");
            show_error_window(app, &format!("Could not set up the chat client: {e}"));
            return;
        }
    };

    if !config.requires_identity() {
        crate::ui::main_window::show_main_window(app, Conversation::anonymous(backend));
        return;
    }

    let session = Session::restore(open_store(&config));
    match session.identity().cloned() {
        Some(phone) => {
            crate::ui::main_window::show_main_window(app, Conversation::identified(backend, phone));
        }
        None => crate::ui::login::show_login_window(app, session, backend),
    }
}

fn show_error_window(app: &Application, text: &str) {
    let window = adw::ApplicationWindow::builder()
        .application(app)
        .title("VetChat")
        .default_width(420)
        .default_height(160)
        .build();
    let container = gtk::Box::new(gtk::Orientation::Vertical, 0);
    container.append(&adw::HeaderBar::new());
    let label = gtk::Label::new(Some(text));
    label.set_wrap(true);
    label.set_margin_top(24);
    label.set_margin_bottom(24);
    label.set_margin_start(24);
    label.set_margin_end(24);
    container.append(&label);
    window.set_content(Some(&container));
    window.present();
}

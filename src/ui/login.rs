use adw::prelude::*;
use adw::Application;
use gtk4 as gtk;
use std::cell::RefCell;
use std::rc::Rc;
use vetchat::{Conversation, HttpChatBackend, Session, SessionError};

use crate::app::Store;

pub fn show_login_window(app: &Application, session: Session<Store>, backend: HttpChatBackend) {
    let window = adw::ApplicationWindow::builder()
        .application(app)
        .title("VetChat Login")
        .default_width(420)
        .default_height(240)
        .resizable(false)
        .build();

    let root = gtk::Box::new(gtk::Orientation::Vertical, 12);
    root.set_margin_top(24);
    root.set_margin_bottom(24);
    root.set_margin_start(24);
    root.set_margin_end(24);

    let title = gtk::Label::new(Some("Sign in with your phone number"));
    title.add_css_class("title-2");
    title.set_halign(gtk::Align::Start);
    root.append(&title);

    let phone_entry = gtk::Entry::new();
    phone_entry.set_placeholder_text(Some("(555) 123-4567"));
    phone_entry.set_input_purpose(gtk::InputPurpose::Phone);
    phone_entry.set_hexpand(true);
    root.append(&phone_entry);

    let login_btn = gtk::Button::with_label("Continue");
    login_btn.add_css_class("suggested-action");
    login_btn.set_halign(gtk::Align::End);
    root.append(&login_btn);

    let container = gtk::Box::new(gtk::Orientation::Vertical, 0);
    let header = adw::HeaderBar::new();
    let header_title = gtk::Label::new(Some("VetChat"));
    header.set_title_widget(Some(&header_title));
    container.append(&header);
    container.append(&root);
    window.set_content(Some(&container));

    let session = Rc::new(RefCell::new(session));

    // Re-format on every keystroke; the nested `changed` from set_text is a no-op.
    {
        let session = session.clone();
        phone_entry.connect_changed(move |entry| {
            let text = entry.text();
            let formatted = session.borrow_mut().update_draft(&text).to_string();
            if formatted != text.as_str() {
                entry.set_text(&formatted);
                entry.set_position(-1);
            }
        });
    }

    let on_login = {
        let app = app.clone();
        let window = window.clone();
        move || {
            let result = session.borrow_mut().login_with_draft();
            match result {
                Ok(phone) => {
                    crate::ui::main_window::show_main_window(
                        &app,
                        Conversation::identified(backend.clone(), phone),
                    );
                    window.close();
                }
                Err(SessionError::Validation(e)) => {
                    log::debug!("rejected phone draft: {e}");
                    show_notice(&window, "Please enter a valid 10-digit phone number.");
                }
                Err(e) => {
                    log::error!("login failed: {e}");
                    show_notice(&window, &format!("Could not sign in: {e}"));
                }
            }
        }
    };

    let on_login: Rc<dyn Fn()> = Rc::new(on_login);
    {
        let on_login = on_login.clone();
        login_btn.connect_clicked(move |_| (on_login)());
    }
    {
        let on_login = on_login.clone();
        phone_entry.connect_activate(move |_| (on_login)());
    }

    window.present();
}

/// Modal notice; the user has to dismiss it before editing again.
fn show_notice(parent: &adw::ApplicationWindow, text: &str) {
    let dialog = gtk::MessageDialog::builder()
        .transient_for(parent)
        .modal(true)
        .message_type(gtk::MessageType::Warning)
        .buttons(gtk::ButtonsType::Ok)
        .text(text)
        .build();
    dialog.connect_response(|dialog, _| dialog.close());
    dialog.present();
}

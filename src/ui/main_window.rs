use adw::prelude::*;
use adw::Application;
use vetchat::{Conversation, HttpChatBackend};

pub fn show_main_window(app: &Application, conversation: Conversation<HttpChatBackend>) {
    let window = adw::ApplicationWindow::builder()
        .application(app)
        .title("VetChat")
        .default_width(480)
        .default_height(640)
        .build();

    let container = gtk4::Box::new(gtk4::Orientation::Vertical, 0);
    let header = adw::HeaderBar::new();
    let title = gtk4::Label::new(Some("VetChat 🪖"));
    header.set_title_widget(Some(&title));
    if let Some(phone) = conversation.identity() {
        let who = gtk4::Label::new(Some(phone.as_str()));
        who.add_css_class("dim-label");
        header.pack_end(&who);
    }
    container.append(&header);

    let chat = crate::ui::chat_view::ChatView::new(conversation);
    chat.set_vexpand(true);
    container.append(&chat);

    window.set_content(Some(&container));
    window.present();
}

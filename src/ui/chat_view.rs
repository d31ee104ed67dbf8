use gtk4 as gtk;
use gtk4::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;
use vetchat::{Conversation, HttpChatBackend, Message, Outcome};

type SharedConversation = Rc<RefCell<Conversation<HttpChatBackend>>>;

pub struct ChatView;

impl ChatView {
    pub fn new(conversation: Conversation<HttpChatBackend>) -> gtk::Widget {
        let root = gtk::Box::new(gtk::Orientation::Vertical, 6);
        root.set_margin_top(8);
        root.set_margin_bottom(8);
        root.set_margin_start(8);
        root.set_margin_end(8);

        let scroller = gtk::ScrolledWindow::builder()
            .vexpand(true)
            .hexpand(true)
            .build();
        let messages_box = gtk::Box::new(gtk::Orientation::Vertical, 6);
        for message in conversation.transcript() {
            append_message(&messages_box, message);
        }
        scroller.set_child(Some(&messages_box));
        root.append(&scroller);

        let typing = gtk::Label::new(Some("AI is typing..."));
        typing.add_css_class("dim-label");
        typing.set_halign(gtk::Align::Start);
        typing.set_visible(conversation.is_pending());
        root.append(&typing);

        // Input row
        let input_row = gtk::Box::new(gtk::Orientation::Horizontal, 6);
        let entry = gtk::Entry::new();
        entry.set_hexpand(true);
        entry.set_placeholder_text(Some("Type your message..."));
        let send_btn = gtk::Button::with_label("Send");
        input_row.append(&entry);
        input_row.append(&send_btn);
        root.append(&input_row);

        let conversation: SharedConversation = Rc::new(RefCell::new(conversation));

        {
            let conversation = conversation.clone();
            entry.connect_changed(move |entry| {
                conversation.borrow_mut().set_draft(entry.text().as_str());
            });
        }

        let send: Rc<dyn Fn()> = {
            let entry = entry.clone();
            let send_btn = send_btn.clone();
            Rc::new(move || {
                // One exchange at a time; Enter is ignored like the insensitive button.
                if conversation.borrow().is_pending() {
                    return;
                }
                let exchange = conversation.borrow_mut().submit_draft();
                let Some(exchange) = exchange else {
                    return;
                };
                if let Some(message) = conversation.borrow().transcript().last() {
                    append_message(&messages_box, message);
                }
                entry.set_text("");
                typing.set_visible(true);
                send_btn.set_sensitive(false);
                scroll_to_end(&scroller);

                let conversation = conversation.clone();
                let send_btn = send_btn.clone();
                let messages_box = messages_box.clone();
                let typing = typing.clone();
                let scroller = scroller.clone();
                glib::MainContext::default().spawn_local(async move {
                    let outcome = crate::utils::run_async_to_main(exchange.run())
                        .await
                        .unwrap_or(Outcome::Fallback);
                    let mut conversation = conversation.borrow_mut();
                    append_message(&messages_box, conversation.settle(outcome));
                    typing.set_visible(conversation.is_pending());
                    send_btn.set_sensitive(!conversation.is_pending());
                    scroll_to_end(&scroller);
                });
            })
        };
        {
            let send = send.clone();
            send_btn.connect_clicked(move |_| (send)());
        }
        {
            let send = send.clone();
            entry.connect_activate(move |_| (send)());
        }

        root.upcast()
    }
}

fn append_message(messages_box: &gtk::Box, message: &Message) {
    let label = gtk::Label::new(Some(message.content.as_str()));
    label.set_wrap(true);
    label.set_selectable(true);
    label.set_max_width_chars(48);
    label.set_xalign(0.0);
    label.add_css_class("card");
    label.set_margin_start(4);
    label.set_margin_end(4);
    if message.is_user() {
        label.set_halign(gtk::Align::End);
        label.add_css_class("accent");
    } else {
        label.set_halign(gtk::Align::Start);
    }
    messages_box.append(&label);
}

fn scroll_to_end(scroller: &gtk::ScrolledWindow) {
    let adj = scroller.vadjustment();
    adj.set_value(adj.upper());
}

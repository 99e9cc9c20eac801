use chrono::Utc;
use eframe::egui;

use crate::store::ChatStore;
use crate::ui::format;

pub enum ChatListAction {
    Select(String),
    NewChat,
    Refresh,
}

pub fn render(ui: &mut egui::Ui, store: &ChatStore) -> Option<ChatListAction> {
    let mut action = None;

    ui.horizontal(|ui| {
        ui.heading("Mensajes");
        if ui.small_button("＋").on_hover_text("Nuevo chat").clicked() {
            action = Some(ChatListAction::NewChat);
        }
        if ui.small_button("⟳").on_hover_text("Recargar").clicked() {
            action = Some(ChatListAction::Refresh);
        }
    });
    ui.separator();

    let Some(me) = store.current_user().map(|u| u.id.clone()) else {
        ui.label("Inicia sesión para ver tus conversaciones");
        return action;
    };

    if store.is_loading_chats() && store.chats().next().is_none() {
        ui.spinner();
        return action;
    }
    if store.chats().next().is_none() {
        ui.label(egui::RichText::new("No tienes conversaciones").weak());
        return action;
    }

    let now = Utc::now();
    egui::ScrollArea::vertical().show(ui, |ui| {
        for chat in store.chats() {
            let selected = store.active_chat_id() == Some(chat.id.as_str());
            let unread = chat.unread_count(&me);
            let online = !chat.is_group
                && chat.counterpart(&me).is_some_and(|user| user.is_online);

            ui.vertical(|ui| {
                ui.horizontal(|ui| {
                    if online {
                        ui.colored_label(egui::Color32::GREEN, "●");
                    }
                    let title = egui::RichText::new(chat.display_name(&me)).strong();
                    if ui.selectable_label(selected, title).clicked() {
                        action = Some(ChatListAction::Select(chat.id.clone()));
                    }
                    ui.label(
                        egui::RichText::new(format::list_timestamp(chat.last_message_at, now))
                            .small()
                            .weak(),
                    );
                    if unread > 0 {
                        ui.colored_label(egui::Color32::LIGHT_BLUE, format!("({unread})"));
                    }
                });
                let preview = format::last_message_preview(chat, &me);
                ui.add(egui::Label::new(egui::RichText::new(preview).weak()).truncate());
            });
            ui.separator();
        }
    });

    action
}

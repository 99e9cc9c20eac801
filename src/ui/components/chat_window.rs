use eframe::egui;

use crate::common::Chat;
use crate::ui::format;

/// Header, typing or presence line, then messages oldest at the top.
/// Returns true when the user asked to reload the conversation.
pub fn render(ui: &mut egui::Ui, chat: &Chat, me: &str, typing: &[&str]) -> bool {
    let mut refresh = false;
    ui.horizontal(|ui| {
        ui.heading(chat.display_name(me));
        if ui.small_button("⟳").on_hover_text("Recargar conversación").clicked() {
            refresh = true;
        }
    });

    match format::typing_line(typing) {
        Some(line) => {
            ui.label(egui::RichText::new(line).italics().color(egui::Color32::LIGHT_BLUE));
        }
        None if chat.is_group => {
            ui.label(egui::RichText::new(format!("{} participantes", chat.participants.len())).weak());
        }
        None => {
            let online = chat.counterpart(me).is_some_and(|user| user.is_online);
            ui.label(egui::RichText::new(if online { "En línea" } else { "Desconectado" }).weak());
        }
    }
    ui.separator();

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .stick_to_bottom(true)
        .max_height(ui.available_height() - 40.0)
        .show(ui, |ui| {
            for message in chat.messages.iter().rev() {
                if message.is_system() {
                    ui.vertical_centered(|ui| {
                        ui.label(egui::RichText::new(&message.content).small().italics().weak());
                    });
                    continue;
                }

                let own = message.is_from(me);
                let layout = if own {
                    egui::Layout::right_to_left(egui::Align::TOP)
                } else {
                    egui::Layout::left_to_right(egui::Align::TOP)
                };
                ui.with_layout(layout, |ui| {
                    ui.vertical(|ui| {
                        if chat.is_group && !own {
                            let author = message
                                .user
                                .as_ref()
                                .map(|u| u.name.as_str())
                                .or_else(|| {
                                    let id = message.user_id.as_deref()?;
                                    chat.participants.iter().find(|p| p.id == id).map(|p| p.name.as_str())
                                })
                                .unwrap_or("Usuario");
                            ui.label(egui::RichText::new(author).small().strong());
                        }
                        ui.label(&message.content);
                        let mut meta = format::message_time(message.created_at);
                        if own {
                            meta.push_str(if message.read { " ✓✓" } else { " ✓" });
                        }
                        ui.label(egui::RichText::new(meta).small().weak());
                    });
                });
                ui.add_space(4.0);
            }
        });

    refresh
}

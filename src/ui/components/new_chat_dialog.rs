use eframe::egui;

use crate::store::ChatStore;
use crate::ui::state::{NewChatForm, NewChatRequest};

/// User picker backed by the store's directory. Returns the request once the
/// user confirms.
pub fn render(ctx: &egui::Context, form: &mut NewChatForm, store: &ChatStore) -> Option<NewChatRequest> {
    if !form.open {
        return None;
    }

    let mut open = true;
    let mut confirmed = None;
    let mut cancel = false;

    egui::Window::new("Nuevo chat")
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .show(ctx, |ui| {
            ui.label("Nombre del grupo (opcional)");
            ui.text_edit_singleline(&mut form.name);
            ui.add_space(6.0);

            ui.add(egui::TextEdit::singleline(&mut form.filter).hint_text("Buscar usuarios"));
            let filter = form.filter.trim().to_lowercase();

            if store.is_loading_users() {
                ui.spinner();
            }
            egui::ScrollArea::vertical().max_height(240.0).show(ui, |ui| {
                for user in store.directory() {
                    if !filter.is_empty() && !user.name.to_lowercase().contains(&filter) {
                        continue;
                    }
                    let mut checked = form.selected.contains(&user.id);
                    let label = match &user.role {
                        Some(role) => format!("{} ({role})", user.name),
                        None => user.name.clone(),
                    };
                    if ui.checkbox(&mut checked, label).changed() {
                        form.toggle(&user.id);
                    }
                }
            });

            ui.separator();
            ui.horizontal(|ui| {
                if ui.button("Cancelar").clicked() {
                    cancel = true;
                }
                let request = form.request();
                if ui
                    .add_enabled(request.is_some(), egui::Button::new("Crear chat"))
                    .clicked()
                {
                    confirmed = request;
                }
            });
        });

    if !open || cancel || confirmed.is_some() {
        form.close();
    }
    confirmed
}

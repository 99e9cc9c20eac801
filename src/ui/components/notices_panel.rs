use eframe::egui;

use crate::store::{NoticeLevel, Notices};

/// Returns true when the user asked to clear the list.
pub fn render(ui: &mut egui::Ui, notices: &Notices, connected: bool) -> bool {
    let mut clear = false;
    ui.horizontal(|ui| {
        ui.heading("Avisos");
        if ui.small_button("Limpiar").clicked() {
            clear = true;
        }
    });
    ui.horizontal(|ui| {
        ui.label("Tiempo real:");
        if connected {
            ui.colored_label(egui::Color32::GREEN, "conectado");
        } else {
            ui.colored_label(egui::Color32::GRAY, "sin conexión");
        }
    });
    ui.separator();

    egui::ScrollArea::vertical().show(ui, |ui| {
        for notice in notices.iter() {
            let time_str = notice.at.with_timezone(&chrono::Local).format("%H:%M:%S");
            let color = match notice.level {
                NoticeLevel::Info => egui::Color32::LIGHT_BLUE,
                NoticeLevel::Error => egui::Color32::RED,
            };
            ui.horizontal_wrapped(|ui| {
                ui.colored_label(color, format!("[{time_str}]"));
                ui.label(egui::RichText::new(&notice.title).strong());
            });
            ui.label(&notice.body);
            ui.add_space(4.0);
        }
    });

    clear
}

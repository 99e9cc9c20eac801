use eframe::egui;

use crate::ui::state::{AuthForm, AuthMode};

pub fn render(ui: &mut egui::Ui, form: &mut AuthForm, pending: bool) -> bool {
    let mut submit = false;

    ui.vertical_centered(|ui| {
        ui.add_space(40.0);
        ui.heading("WorkFlowConnect");
        ui.add_space(12.0);

        ui.horizontal(|ui| {
            ui.selectable_value(&mut form.mode, AuthMode::Login, "Iniciar sesión");
            ui.selectable_value(&mut form.mode, AuthMode::Register, "Registrarse");
        });
        ui.add_space(8.0);

        ui.add_enabled_ui(!pending, |ui| {
            egui::Grid::new("auth_form").num_columns(2).show(ui, |ui| {
                if form.mode == AuthMode::Register {
                    ui.label("Nombre");
                    ui.text_edit_singleline(&mut form.name);
                    ui.end_row();
                }
                ui.label("Correo");
                ui.text_edit_singleline(&mut form.email);
                ui.end_row();

                ui.label("Contraseña");
                let response = ui.add(egui::TextEdit::singleline(&mut form.password).password(true));
                if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    submit = true;
                }
                ui.end_row();
            });

            let label = match form.mode {
                AuthMode::Login => "Entrar",
                AuthMode::Register => "Crear cuenta",
            };
            if ui.add_enabled(form.is_complete(), egui::Button::new(label)).clicked() {
                submit = true;
            }
        });

        if pending {
            ui.spinner();
        }
    });

    submit && form.is_complete() && !pending
}

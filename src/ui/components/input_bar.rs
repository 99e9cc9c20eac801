use eframe::egui;

pub enum InputAction {
    Typed,
    Send(String),
}

pub fn render(ui: &mut egui::Ui, input_text: &mut String, enabled: bool) -> Option<InputAction> {
    let mut send = false;
    let mut typed = false;
    ui.add_enabled_ui(enabled, |ui| {
        ui.horizontal(|ui| {
            let response = ui.add(
                egui::TextEdit::singleline(input_text)
                    .hint_text("Escribe un mensaje")
                    .desired_width(ui.available_width() - 80.0),
            );
            typed = response.changed();

            if ui.button("Enviar").clicked() {
                send = true;
            }

            if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                send = true;
                response.request_focus();
            }
        });
    });

    if send && !input_text.trim().is_empty() {
        let message = input_text.clone();
        input_text.clear();
        return Some(InputAction::Send(message));
    }
    typed.then_some(InputAction::Typed)
}

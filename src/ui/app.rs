use std::time::{Duration, Instant};

use eframe::egui;
use tokio::sync::mpsc;

use crate::common::NetworkEvent;
use crate::store::ChatStore;

use super::components::chat_list::{self, ChatListAction};
use super::components::input_bar::{self, InputAction};
use super::components::{chat_window, login_form, new_chat_dialog, notices_panel};
use super::state::{AuthMode, UiState};

/// Upper bound between frames so network events are drained promptly.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

pub struct ChatApp {
    state: UiState,
    store: ChatStore,
    event_receiver: mpsc::Receiver<NetworkEvent>,
}

impl ChatApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        mut store: ChatStore,
        event_receiver: mpsc::Receiver<NetworkEvent>,
    ) -> Self {
        store.restore_session();
        Self {
            state: UiState::default(),
            store,
            event_receiver,
        }
    }

    fn handle_network_events(&mut self) {
        while let Ok(event) = self.event_receiver.try_recv() {
            self.store.apply(event);
        }
        self.store.tick(Instant::now());
    }

    fn schedule_repaint(&self, ctx: &egui::Context) {
        let now = Instant::now();
        let wait = self
            .store
            .next_typing_deadline()
            .map(|deadline| deadline.saturating_duration_since(now).min(POLL_INTERVAL))
            .unwrap_or(POLL_INTERVAL);
        ctx.request_repaint_after(wait);
    }

    fn submit_auth(&mut self) {
        let form = &self.state.auth;
        match form.mode {
            AuthMode::Login => self.store.login(&form.email, &form.password),
            AuthMode::Register => self.store.register(&form.name, &form.email, &form.password),
        }
        self.state.auth.clear_secrets();
    }

    fn on_chat_list(&mut self, action: ChatListAction) {
        let result = match action {
            ChatListAction::Select(chat_id) => self.store.select_chat(&chat_id),
            ChatListAction::Refresh => self.store.load_chats(),
            ChatListAction::NewChat => {
                self.state.new_chat.open = true;
                self.store.load_users()
            }
        };
        if let Err(err) = result {
            log::debug!("Chat list action rejected: {err}");
        }
    }

    fn on_input(&mut self, action: InputAction) {
        match action {
            InputAction::Typed => {
                if let Some(chat_id) = self.store.active_chat_id().map(str::to_string) {
                    self.store.handle_typing(&chat_id);
                }
            }
            InputAction::Send(content) => {
                if let Err(err) = self.store.send_message(&content) {
                    log::debug!("Message not sent: {err}");
                }
            }
        }
    }

    fn top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.strong("WorkFlowConnect");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Cerrar sesión").clicked() {
                        self.store.logout();
                    }
                    ui.toggle_value(&mut self.state.show_notices, "Avisos");
                    if let Some(user) = self.store.current_user() {
                        ui.label(&user.name);
                    }
                });
            });
        });
    }
}

impl eframe::App for ChatApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_network_events();

        if !self.store.is_authenticated() {
            let pending = self.store.is_auth_pending();
            let mut submit = false;
            egui::CentralPanel::default().show(ctx, |ui| {
                submit = login_form::render(ui, &mut self.state.auth, pending);
                if let Some(notice) = self.store.notices().latest() {
                    ui.vertical_centered(|ui| ui.weak(&notice.body));
                }
            });
            if submit {
                self.submit_auth();
            }
            self.schedule_repaint(ctx);
            return;
        }

        self.top_bar(ctx);

        if self.state.show_notices {
            let mut clear = false;
            egui::SidePanel::right("notices_panel").show(ctx, |ui| {
                clear = notices_panel::render(ui, self.store.notices(), self.store.is_connected());
            });
            if clear {
                self.store.clear_notices();
            }
        }

        let mut list_action = None;
        egui::SidePanel::left("chat_list")
            .min_width(240.0)
            .show(ctx, |ui| {
                list_action = chat_list::render(ui, &self.store);
            });
        if let Some(action) = list_action {
            self.on_chat_list(action);
        }

        if let Some(request) = new_chat_dialog::render(ctx, &mut self.state.new_chat, &self.store) {
            if let Err(err) =
                self.store
                    .create_chat(&request.participant_ids, request.name.as_deref(), request.is_group)
            {
                log::warn!("Could not create chat: {err}");
            }
        }

        let mut input_action = None;
        let mut refresh = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            let me = self.store.current_user().map(|u| u.id.clone()).unwrap_or_default();
            match self.store.active_chat() {
                Some(chat) => {
                    let typing = self.store.typing_names(&chat.id);
                    if chat_window::render(ui, chat, &me, &typing) {
                        refresh = Some(chat.id.clone());
                    }
                    ui.separator();
                    let ready = self.store.is_chat_ready(&chat.id);
                    if !ready {
                        ui.weak("Creando el chat...");
                    }
                    input_action = input_bar::render(
                        ui,
                        &mut self.state.input_text,
                        ready && !self.store.is_sending(),
                    );
                }
                None => {
                    ui.centered_and_justified(|ui| {
                        ui.weak("Selecciona una conversación para comenzar");
                    });
                }
            }
        });
        if let Some(action) = input_action {
            self.on_input(action);
        }
        if let Some(chat_id) = refresh {
            if let Err(err) = self.store.refresh_chat(&chat_id) {
                log::debug!("Refresh rejected: {err}");
            }
        }

        self.schedule_repaint(ctx);
    }
}

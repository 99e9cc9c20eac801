pub mod chat_list;
pub mod chat_window;
pub mod input_bar;
pub mod login_form;
pub mod new_chat_dialog;
pub mod notices_panel;

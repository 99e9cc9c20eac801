//! Text shown by the chat widgets.

use chrono::{DateTime, Datelike, Local, Utc};

use crate::common::Chat;

pub fn last_message_preview(chat: &Chat, me: &str) -> String {
    match chat.last_message() {
        None => "No hay mensajes aún".to_string(),
        Some(message) if message.is_from(me) => format!("Tú: {}", message.content),
        Some(message) => message.content.clone(),
    }
}

/// Time of day for today, weekday within a week, day and month within the
/// year, full date otherwise.
pub fn list_timestamp(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let at = at.with_timezone(&Local);
    let now = now.with_timezone(&Local);
    if at.date_naive() == now.date_naive() {
        return at.format("%H:%M").to_string();
    }
    if (now - at).num_days() < 7 {
        return at.format("%a").to_string();
    }
    if at.year() == now.year() {
        return at.format("%d %b").to_string();
    }
    at.format("%d %b %Y").to_string()
}

pub fn message_time(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%H:%M").to_string()
}

pub fn typing_line(names: &[&str]) -> Option<String> {
    match names {
        [] => None,
        [name] => Some(format!("{name} está escribiendo...")),
        _ => Some("Varias personas están escribiendo...".to_string()),
    }
}

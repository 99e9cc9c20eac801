//! Canned dataset used in mock mode and as the fallback when the backend
//! cannot be reached.

use chrono::{DateTime, Duration, Utc};

use crate::common::{Chat, ChatMessage, User};

pub const MOCK_TOKEN: &str = "mock-token";

const HOUR: i64 = 3_600;
const DAY: i64 = 86_400;

fn user(id: &str, name: &str, email: &str, role: &str, photo: &str, online: bool, offline_secs: i64) -> User {
    let now = Utc::now();
    User {
        id: id.to_string(),
        name: name.to_string(),
        photo_url: Some(format!("https://randomuser.me/api/portraits/{photo}.jpg")),
        is_online: online,
        last_seen: Some(now - Duration::seconds(offline_secs)),
        email: Some(email.to_string()),
        role: Some(role.to_string()),
    }
}

pub fn users() -> Vec<User> {
    vec![
        user("user1", "Juan Pérez", "juan@example.com", "freelancer", "men/1", true, 0),
        user("user2", "María López", "maria@example.com", "client", "women/1", false, HOUR),
        user("user3", "Carlos Rodríguez", "carlos@example.com", "freelancer", "men/2", true, 0),
        user("user4", "Ana García", "ana@example.com", "client", "women/2", false, 2 * HOUR),
        user("user5", "Luis Martínez", "luis@example.com", "freelancer", "men/3", true, 0),
    ]
}

/// The mock user the client signs in as.
pub fn current_user() -> User {
    users().remove(0)
}

fn find(users: &[User], id: &str) -> User {
    users
        .iter()
        .find(|u| u.id == id)
        .cloned()
        .unwrap_or_else(|| User::new(id, "Usuario"))
}

fn message(id: &str, chat_id: &str, user_id: &str, content: &str, at: DateTime<Utc>) -> ChatMessage {
    ChatMessage {
        id: id.to_string(),
        chat_id: chat_id.to_string(),
        user_id: Some(user_id.to_string()),
        user: None,
        content: content.to_string(),
        created_at: at,
        read: true,
    }
}

pub fn chats() -> Vec<Chat> {
    let now = Utc::now();
    let all = users();
    let ago = |secs: i64| now - Duration::seconds(secs);

    let mut chat1 = Chat {
        id: "chat1".to_string(),
        name: String::new(),
        is_group: false,
        last_message_at: ago(DAY - 2 * HOUR),
        participants: vec![find(&all, "user1"), find(&all, "user2")],
        messages: vec![
            message("message1", "chat1", "user1", "Hola, ¿cómo estás?", ago(DAY)),
            message(
                "message2",
                "chat1",
                "user2",
                "¡Hola! Muy bien, gracias. ¿En qué puedo ayudarte?",
                ago(DAY - HOUR),
            ),
            message(
                "message3",
                "chat1",
                "user1",
                "Me interesa tu oferta de trabajo para diseño de logotipo",
                ago(DAY - 2 * HOUR),
            ),
        ],
    };

    let mut chat2 = Chat {
        id: "chat2".to_string(),
        name: String::new(),
        is_group: false,
        last_message_at: ago(2 * DAY - HOUR),
        participants: vec![find(&all, "user3"), find(&all, "user4")],
        messages: vec![
            message(
                "message4",
                "chat2",
                "user4",
                "Hola Carlos, vi tu perfil y creo que serías perfecto para mi proyecto de desarrollo web",
                ago(2 * DAY),
            ),
            message(
                "message5",
                "chat2",
                "user3",
                "Hola Ana, gracias por contactarme. Me encantaría saber más detalles sobre el proyecto",
                ago(2 * DAY - HOUR),
            ),
        ],
    };

    let chat3 = Chat {
        id: "chat3".to_string(),
        name: "Proyecto diseño web".to_string(),
        is_group: true,
        last_message_at: ago(3 * DAY),
        participants: vec![find(&all, "user1"), find(&all, "user2"), find(&all, "user3")],
        messages: Vec::new(),
    };

    chat1.normalize();
    chat2.normalize();
    vec![chat1, chat2, chat3]
}

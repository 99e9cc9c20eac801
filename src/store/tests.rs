use std::cell::{Cell, RefCell};
use std::rc::Rc;

use chrono::{DateTime, Duration as ChronoDuration, Utc};

use super::*;

#[derive(Clone, Default)]
struct RecordingSink {
    sent: Rc<RefCell<Vec<NetworkCommand>>>,
    closed: Rc<Cell<bool>>,
}

impl CommandSink for RecordingSink {
    fn dispatch(&self, command: NetworkCommand) -> bool {
        if self.closed.get() {
            return false;
        }
        self.sent.borrow_mut().push(command);
        true
    }
}

impl RecordingSink {
    fn take(&self) -> Vec<NetworkCommand> {
        std::mem::take(&mut *self.sent.borrow_mut())
    }

    fn take_emits(&self) -> Vec<ClientEvent> {
        self.take()
            .into_iter()
            .filter_map(|command| match command {
                NetworkCommand::Emit(event) => Some(event),
                _ => None,
            })
            .collect()
    }
}

fn me() -> User {
    User::new("user1", "Juan Pérez")
}

fn message(id: &str, chat_id: &str, from: &str, at: DateTime<Utc>, read: bool) -> ChatMessage {
    ChatMessage {
        id: id.to_string(),
        chat_id: chat_id.to_string(),
        user_id: Some(from.to_string()),
        user: None,
        content: format!("contenido {id}"),
        created_at: at,
        read,
    }
}

fn store_with(options: StoreOptions, chats: Vec<Chat>) -> (ChatStore, RecordingSink) {
    let sink = RecordingSink::default();
    let mut store = ChatStore::new(Box::new(sink.clone()), options);
    store.apply(NetworkEvent::SignedIn {
        user: me(),
        token: "t".to_string(),
    });
    store.apply(NetworkEvent::ChatsLoaded(chats));
    store.apply(NetworkEvent::UsersLoaded(mock::users()));
    sink.take();
    (store, sink)
}

fn signed_in_store() -> (ChatStore, RecordingSink) {
    store_with(StoreOptions::default(), mock::chats())
}

fn chat_ids(store: &ChatStore) -> Vec<String> {
    store.chats().map(|c| c.id.clone()).collect()
}

fn assert_sorted(store: &ChatStore) {
    let stamps: Vec<_> = store.chats().map(|c| c.last_message_at).collect();
    assert!(
        stamps.windows(2).all(|w| w[0] >= w[1]),
        "chat list out of order: {:?}",
        chat_ids(store)
    );
}

/// chat1 between user1 and user2 with unread messages in both directions.
fn unread_chat() -> Chat {
    let base = Utc::now() - ChronoDuration::minutes(10);
    Chat {
        id: "chat1".to_string(),
        name: String::new(),
        is_group: false,
        last_message_at: base,
        participants: vec![me(), User::new("user2", "María López")],
        messages: vec![
            message("m1", "chat1", "user1", base, false),
            message("m2", "chat1", "user2", base + ChronoDuration::minutes(1), false),
            message("m3", "chat1", "user1", base + ChronoDuration::minutes(2), false),
        ],
    }
}

#[test]
fn signing_in_loads_chats_and_users() {
    let sink = RecordingSink::default();
    let mut store = ChatStore::new(Box::new(sink.clone()), StoreOptions::default());
    store.apply(NetworkEvent::SignedIn {
        user: me(),
        token: "t".to_string(),
    });
    assert!(store.is_authenticated());
    assert!(store.is_loading_chats());
    assert_eq!(
        sink.take(),
        vec![NetworkCommand::LoadChats, NetworkCommand::LoadUsers]
    );

    store.apply(NetworkEvent::ChatsLoaded(mock::chats()));
    assert!(!store.is_loading_chats());
    assert_eq!(chat_ids(&store), vec!["chat1", "chat2", "chat3"]);
}

#[test]
fn list_stays_sorted_after_every_mutation() {
    let (mut store, _sink) = signed_in_store();
    assert_sorted(&store);

    // A message in the oldest-but-one chat moves it to the top.
    store.apply(NetworkEvent::Server(ServerEvent::NewMessage(message(
        "m-new",
        "chat2",
        "user4",
        Utc::now(),
        false,
    ))));
    assert_sorted(&store);
    assert_eq!(chat_ids(&store)[0], "chat2");

    store.select_chat("chat3").unwrap();
    store.send_message("¿Empezamos el lunes?").unwrap();
    assert_sorted(&store);
    assert_eq!(chat_ids(&store)[0], "chat3");

    store.apply(NetworkEvent::Server(ServerEvent::UserStatusChange(PresenceChange {
        user_id: "user2".to_string(),
        is_online: true,
        last_seen: Utc::now(),
    })));
    assert_sorted(&store);

    let id = store
        .create_chat(&["user5".to_string()], None, false)
        .unwrap();
    assert_sorted(&store);
    assert_eq!(chat_ids(&store)[0], id);
}

#[test]
fn send_without_selection_is_rejected_without_side_effects() {
    let (mut store, sink) = signed_in_store();
    let before: Vec<Chat> = store.chats().cloned().collect();

    let err = store.send_message("hola").unwrap_err();
    assert!(matches!(err, Error::NoActiveChat));

    let after: Vec<Chat> = store.chats().cloned().collect();
    assert_eq!(before, after);
    assert!(sink.take().is_empty());
    assert!(!store.is_sending());
}

#[test]
fn blank_message_is_rejected() {
    let (mut store, sink) = signed_in_store();
    store.select_chat("chat1").unwrap();
    sink.take();

    assert!(matches!(store.send_message("   "), Err(Error::EmptyMessage)));
    assert!(sink.take().is_empty());
    assert_eq!(store.chat("chat1").unwrap().messages.len(), 3);
}

#[test]
fn operations_require_a_session() {
    let sink = RecordingSink::default();
    let mut store = ChatStore::new(Box::new(sink.clone()), StoreOptions::default());
    assert!(matches!(store.load_chats(), Err(Error::NotAuthenticated)));
    assert!(matches!(store.send_message("x"), Err(Error::NotAuthenticated)));
    assert!(matches!(
        store.create_chat(&["user2".to_string()], None, false),
        Err(Error::NotAuthenticated)
    ));
    store.handle_typing("chat1");
    assert!(sink.take().is_empty());
}

#[test]
fn send_message_is_provisional_until_persisted() {
    let (mut store, sink) = signed_in_store();
    store.select_chat("chat1").unwrap();
    sink.take();

    store.send_message("  ¿Qué te parece el boceto?  ").unwrap();
    let chat = store.active_chat().unwrap();
    let sent = &chat.messages[0];
    assert!(sent.id.starts_with(PROVISIONAL_PREFIX));
    assert_eq!(sent.content, "¿Qué te parece el boceto?");
    assert!(sent.is_from("user1"));
    assert!(!sent.read);
    assert_eq!(chat.last_message_at, sent.created_at);
    assert!(store.is_sending());

    let provisional = sent.id.clone();
    assert_eq!(
        sink.take(),
        vec![
            NetworkCommand::Emit(ClientEvent::SendMessage {
                chat_id: "chat1".to_string(),
                content: "¿Qué te parece el boceto?".to_string(),
            }),
            NetworkCommand::PersistMessage {
                provisional_id: provisional.clone(),
                chat_id: "chat1".to_string(),
                content: "¿Qué te parece el boceto?".to_string(),
            },
        ]
    );

    let mut persisted = message("srv-42", "chat1", "user1", Utc::now(), false);
    persisted.content = "¿Qué te parece el boceto?".to_string();
    store.apply(NetworkEvent::MessagePersisted {
        provisional_id: provisional.clone(),
        message: persisted,
    });

    assert!(!store.is_sending());
    let chat = store.active_chat().unwrap();
    assert_eq!(chat.messages[0].id, "srv-42");
    assert!(chat.messages.iter().all(|m| m.id != provisional));
    assert_eq!(chat.messages.len(), 4);
}

#[test]
fn sending_flag_is_cleared_when_persisting_fails() {
    let (mut store, sink) = signed_in_store();
    store.select_chat("chat1").unwrap();
    store.send_message("hola").unwrap();
    let provisional = store.active_chat().unwrap().messages[0].id.clone();
    sink.take();

    store.apply(NetworkEvent::MessagePersistFailed {
        provisional_id: provisional.clone(),
        error: "500".to_string(),
    });

    assert!(!store.is_sending());
    assert_eq!(store.active_chat().unwrap().messages[0].id, provisional);
    assert_eq!(store.notices().latest().unwrap().level, NoticeLevel::Error);
}

#[test]
fn sending_flag_is_cleared_when_worker_is_gone() {
    let (mut store, sink) = signed_in_store();
    store.select_chat("chat1").unwrap();
    sink.closed.set(true);

    store.send_message("hola").unwrap();
    assert!(!store.is_sending());
    assert_eq!(store.active_chat().unwrap().messages[0].content, "hola");
}

#[test]
fn mock_mode_never_asks_for_persistence() {
    let options = StoreOptions {
        persist: false,
        ..StoreOptions::default()
    };
    let (mut store, sink) = store_with(options, mock::chats());
    store.select_chat("chat2").unwrap();
    store.send_message("hola").unwrap();
    store.create_chat(&["user3".to_string()], None, false).unwrap();

    assert!(!store.is_sending());
    let commands = sink.take();
    assert!(commands.iter().all(|c| matches!(c, NetworkCommand::Emit(_))));
}

#[test]
fn messages_read_flips_only_own_messages() {
    let (mut store, _sink) = store_with(StoreOptions::default(), vec![unread_chat()]);

    store.apply(NetworkEvent::Server(ServerEvent::MessagesRead(ReadReceipt {
        chat_id: "chat1".to_string(),
        user_id: "user2".to_string(),
    })));

    let chat = store.chat("chat1").unwrap();
    for m in &chat.messages {
        if m.is_from("user1") {
            assert!(m.read, "own message {} should be read", m.id);
        } else {
            assert!(!m.read, "peer message {} should be untouched", m.id);
        }
    }
}

#[test]
fn messages_read_for_unknown_chat_is_ignored() {
    let (mut store, _sink) = signed_in_store();
    let before: Vec<Chat> = store.chats().cloned().collect();
    store.apply(NetworkEvent::Server(ServerEvent::MessagesRead(ReadReceipt {
        chat_id: "nope".to_string(),
        user_id: "user2".to_string(),
    })));
    assert_eq!(before, store.chats().cloned().collect::<Vec<_>>());
}

#[test]
fn typing_indicator_appears_and_expires() {
    let (mut store, _sink) = signed_in_store();
    let t0 = Instant::now();

    store.apply_at(
        NetworkEvent::Server(ServerEvent::UserTyping(TypingNotice {
            chat_id: "chat1".to_string(),
            user_id: "user4".to_string(),
            user_name: "Ana".to_string(),
        })),
        t0,
    );
    assert_eq!(store.typing_names("chat1"), vec!["Ana"]);
    assert!(store.typing_names("chat2").is_empty());

    store.tick(t0 + Duration::from_millis(2_500));
    assert_eq!(store.typing_names("chat1"), vec!["Ana"]);

    assert!(store.tick(t0 + Duration::from_secs(3)));
    assert!(store.typing_names("chat1").is_empty());
}

#[test]
fn own_typing_echo_is_ignored() {
    let (mut store, _sink) = signed_in_store();
    store.apply(NetworkEvent::Server(ServerEvent::UserTyping(TypingNotice {
        chat_id: "chat1".to_string(),
        user_id: "user1".to_string(),
        user_name: "Juan Pérez".to_string(),
    })));
    assert!(store.typing_names("chat1").is_empty());
}

#[test]
fn handle_typing_only_emits() {
    let (mut store, sink) = signed_in_store();
    let before: Vec<Chat> = store.chats().cloned().collect();
    store.handle_typing("chat1");
    assert_eq!(
        sink.take_emits(),
        vec![ClientEvent::Typing {
            chat_id: "chat1".to_string()
        }]
    );
    assert_eq!(before, store.chats().cloned().collect::<Vec<_>>());
    assert!(store.typing_names("chat1").is_empty());
}

#[test]
fn create_one_to_one_chat() {
    let (mut store, sink) = signed_in_store();

    let id = store.create_chat(&["user2".to_string()], None, false).unwrap();
    let chat = store.chat(&id).unwrap();

    let mut participants: Vec<&str> = chat.participants.iter().map(|p| p.id.as_str()).collect();
    participants.sort();
    assert_eq!(participants, vec!["user1", "user2"]);
    assert!(!chat.is_group);
    assert_eq!(chat.name, "");
    assert_eq!(chat.messages.len(), 1);
    assert!(chat.messages[0].is_system());
    assert_eq!(chat.messages[0].content, "Juan Pérez inició la conversación");
    assert_eq!(chat.participants[0].name, "María López");

    assert_eq!(store.active_chat_id(), Some(id.as_str()));
    assert_eq!(
        sink.take(),
        vec![
            NetworkCommand::Emit(ClientEvent::JoinChat { chat_id: id.clone() }),
            NetworkCommand::CreateChat {
                provisional_id: id.clone(),
                participant_ids: vec!["user2".to_string()],
                name: None,
                is_group: false,
            },
        ]
    );
}

#[test]
fn create_group_chat_defaults_name() {
    let (mut store, _sink) = signed_in_store();
    let ids = vec!["user2".to_string(), "user3".to_string(), "user1".to_string()];

    let id = store.create_chat(&ids, Some("  "), true).unwrap();
    let chat = store.chat(&id).unwrap();
    assert!(chat.is_group);
    assert_eq!(chat.name, "Nuevo grupo");
    assert_eq!(chat.participants.len(), 3);
    assert_eq!(chat.messages[0].content, "Juan Pérez creó el grupo Nuevo grupo");
}

#[test]
fn unknown_participant_gets_placeholder_name() {
    let (mut store, _sink) = signed_in_store();
    let id = store.create_chat(&["user99".to_string()], None, false).unwrap();
    let chat = store.chat(&id).unwrap();
    assert_eq!(chat.counterpart("user1").unwrap().name, "Usuario");
}

#[test]
fn persisted_chat_replaces_provisional_and_keeps_selection() {
    let (mut store, sink) = signed_in_store();
    let provisional = store.create_chat(&["user2".to_string()], None, false).unwrap();
    sink.take();

    let server_chat = Chat {
        id: "chat77".to_string(),
        name: String::new(),
        is_group: false,
        last_message_at: Utc::now(),
        participants: vec![me(), User::new("user2", "María López")],
        messages: Vec::new(),
    };
    store.apply(NetworkEvent::ChatPersisted {
        provisional_id: provisional.clone(),
        chat: server_chat,
    });

    assert!(store.chat(&provisional).is_none());
    assert_eq!(store.active_chat_id(), Some("chat77"));
    let chat = store.active_chat().unwrap();
    assert_eq!(chat.messages.len(), 1);
    assert_eq!(chat.messages[0].chat_id, "chat77");
    assert_eq!(
        sink.take_emits(),
        vec![ClientEvent::JoinChat {
            chat_id: "chat77".to_string()
        }]
    );
}

#[test]
fn select_chat_joins_and_marks_read() {
    let (mut store, sink) = store_with(StoreOptions::default(), vec![unread_chat()]);
    assert_eq!(store.chat("chat1").unwrap().unread_count("user1"), 1);

    store.select_chat("chat1").unwrap();
    assert_eq!(store.active_chat_id(), Some("chat1"));
    assert_eq!(
        sink.take_emits(),
        vec![
            ClientEvent::JoinChat {
                chat_id: "chat1".to_string()
            },
            ClientEvent::MarkRead {
                chat_id: "chat1".to_string()
            },
        ]
    );
    let chat = store.chat("chat1").unwrap();
    assert_eq!(chat.unread_count("user1"), 0);
    // our own messages wait for the peer's receipt
    assert!(chat.messages.iter().filter(|m| m.is_from("user1")).all(|m| !m.read));
}

#[test]
fn selecting_unknown_chat_changes_nothing() {
    let (mut store, sink) = signed_in_store();
    store.select_chat("chat2").unwrap();
    sink.take();

    assert!(matches!(store.select_chat("ghost"), Err(Error::UnknownChat(_))));
    assert_eq!(store.active_chat_id(), Some("chat2"));
    assert!(sink.take().is_empty());
}

#[test]
fn new_message_in_active_chat_is_read_back() {
    let (mut store, sink) = signed_in_store();
    store.select_chat("chat1").unwrap();
    sink.take();
    let notices_before = store.notices().len();

    store.apply(NetworkEvent::Server(ServerEvent::NewMessage(message(
        "m10",
        "chat1",
        "user2",
        Utc::now(),
        false,
    ))));

    let chat = store.active_chat().unwrap();
    assert_eq!(chat.messages[0].id, "m10");
    assert!(chat.messages[0].read);
    assert_eq!(
        sink.take_emits(),
        vec![ClientEvent::MarkRead {
            chat_id: "chat1".to_string()
        }]
    );
    assert_eq!(store.notices().len(), notices_before);
}

#[test]
fn new_message_in_background_chat_raises_notice() {
    let (mut store, sink) = signed_in_store();
    store.select_chat("chat1").unwrap();
    sink.take();

    store.apply(NetworkEvent::Server(ServerEvent::NewMessage(message(
        "m11",
        "chat3",
        "user3",
        Utc::now(),
        false,
    ))));

    let chat = store.chat("chat3").unwrap();
    assert_eq!(chat.unread_count("user1"), 1);
    assert!(sink.take_emits().is_empty());
    let notice = store.notices().latest().unwrap();
    assert_eq!(notice.title, "Mensaje nuevo de Carlos Rodríguez");
    assert_eq!(notice.body, "contenido m11");
}

#[test]
fn redelivered_message_is_not_deduplicated() {
    let (mut store, _sink) = signed_in_store();
    let m = message("m12", "chat2", "user4", Utc::now(), false);
    store.apply(NetworkEvent::Server(ServerEvent::NewMessage(m.clone())));
    store.apply(NetworkEvent::Server(ServerEvent::NewMessage(m)));
    let count = store
        .chat("chat2")
        .unwrap()
        .messages
        .iter()
        .filter(|x| x.id == "m12")
        .count();
    assert_eq!(count, 2);
}

#[test]
fn message_for_unknown_chat_is_dropped() {
    let (mut store, _sink) = signed_in_store();
    store.apply(NetworkEvent::Server(ServerEvent::NewMessage(message(
        "m13",
        "chat404",
        "user2",
        Utc::now(),
        false,
    ))));
    assert!(store.chat("chat404").is_none());
    assert_eq!(store.chats().count(), 3);
}

#[test]
fn presence_updates_every_chat_with_that_user() {
    let (mut store, _sink) = signed_in_store();
    let seen = Utc::now();
    store.apply(NetworkEvent::Server(ServerEvent::UserStatusChange(PresenceChange {
        user_id: "user2".to_string(),
        is_online: true,
        last_seen: seen,
    })));

    for chat_id in ["chat1", "chat3"] {
        let chat = store.chat(chat_id).unwrap();
        let maria = chat.participants.iter().find(|p| p.id == "user2").unwrap();
        assert!(maria.is_online);
        assert_eq!(maria.last_seen, Some(seen));
    }
    assert!(!store.chat("chat2").unwrap().has_participant("user2"));
    let entry = store.directory().into_iter().find(|u| u.id == "user2").unwrap();
    assert!(entry.is_online);
}

#[test]
fn load_failure_keeps_previous_chats() {
    let (mut store, _sink) = signed_in_store();
    store.load_chats().unwrap();
    assert!(store.is_loading_chats());

    store.apply(NetworkEvent::ChatsLoadFailed("timeout".to_string()));
    assert!(!store.is_loading_chats());
    assert_eq!(chat_ids(&store), vec!["chat1", "chat2", "chat3"]);
    assert_eq!(store.notices().latest().unwrap().level, NoticeLevel::Error);
}

#[test]
fn load_failure_falls_back_to_mock_dataset_when_enabled() {
    let options = StoreOptions {
        fallback_to_mock: true,
        ..StoreOptions::default()
    };
    let (mut store, _sink) = store_with(options, Vec::new());
    assert_eq!(store.chats().count(), 0);

    store.apply(NetworkEvent::ChatsLoadFailed("connection refused".to_string()));
    assert_eq!(chat_ids(&store), vec!["chat1", "chat2", "chat3"]);
}

#[test]
fn foreign_messages_in_snapshot_are_dropped() {
    let mut chat = unread_chat();
    chat.messages.push(message("stray", "chat9", "user2", Utc::now(), false));
    let (store, _sink) = store_with(StoreOptions::default(), vec![chat]);
    let chat = store.chat("chat1").unwrap();
    assert!(chat.messages.iter().all(|m| m.chat_id == "chat1"));
    assert_eq!(chat.messages.len(), 3);
}

#[test]
fn sign_out_clears_the_store() {
    let (mut store, _sink) = signed_in_store();
    store.select_chat("chat1").unwrap();

    store.apply(NetworkEvent::SignedOut {
        reason: Some("session expired or invalid token".to_string()),
    });
    assert!(!store.is_authenticated());
    assert_eq!(store.chats().count(), 0);
    assert!(store.active_chat().is_none());
    assert!(store.directory().is_empty());
    assert_eq!(store.notices().latest().unwrap().title, "Sesión finalizada");
}

#[test]
fn directory_excludes_current_user() {
    let (store, _sink) = signed_in_store();
    let names: Vec<&str> = store.directory().iter().map(|u| u.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Ana García", "Carlos Rodríguez", "Luis Martínez", "María López"]
    );
}

#[test]
fn refreshed_chat_replaces_entry_and_keeps_selection() {
    let (mut store, sink) = signed_in_store();
    store.select_chat("chat2").unwrap();
    sink.take();

    store.refresh_chat("chat2").unwrap();
    assert_eq!(
        sink.take(),
        vec![NetworkCommand::LoadChat {
            chat_id: "chat2".to_string()
        }]
    );
    assert!(matches!(store.refresh_chat("ghost"), Err(Error::UnknownChat(_))));

    let mut fresh = store.chat("chat2").unwrap().clone();
    fresh.messages.push(message("m20", "chat2", "user4", Utc::now(), false));
    store.apply(NetworkEvent::ChatLoaded(fresh));

    assert_eq!(store.active_chat_id(), Some("chat2"));
    let chat = store.active_chat().unwrap();
    assert_eq!(chat.messages[0].id, "m20");
    assert_eq!(chat_ids(&store)[0], "chat2");
    assert_eq!(store.chats().count(), 3);
}

#[test]
fn sending_waits_until_new_chat_is_saved() {
    let (mut store, sink) = signed_in_store();
    let provisional = store.create_chat(&["user2".to_string()], None, false).unwrap();
    sink.take();
    assert!(!store.is_chat_ready(&provisional));

    let err = store.send_message("hola").unwrap_err();
    assert!(matches!(err, Error::ChatNotReady(ref id) if *id == provisional));
    assert!(sink.take().is_empty());
    assert_eq!(store.chat(&provisional).unwrap().messages.len(), 1);
    assert!(!store.is_sending());

    store.apply(NetworkEvent::ChatPersisted {
        provisional_id: provisional,
        chat: Chat {
            id: "chat88".to_string(),
            name: String::new(),
            is_group: false,
            last_message_at: Utc::now(),
            participants: vec![me(), User::new("user2", "María López")],
            messages: Vec::new(),
        },
    });
    sink.take();
    assert!(store.is_chat_ready("chat88"));

    store.send_message("hola").unwrap();
    let commands = sink.take();
    assert!(commands.contains(&NetworkCommand::Emit(ClientEvent::SendMessage {
        chat_id: "chat88".to_string(),
        content: "hola".to_string(),
    })));
    assert!(commands.iter().all(|c| match c {
        NetworkCommand::PersistMessage { chat_id, .. } => chat_id == "chat88",
        _ => true,
    }));
}

#[test]
fn local_chats_accept_messages_in_mock_mode() {
    let options = StoreOptions {
        persist: false,
        ..StoreOptions::default()
    };
    let (mut store, _sink) = store_with(options, mock::chats());
    let id = store.create_chat(&["user2".to_string()], None, false).unwrap();
    assert!(store.is_chat_ready(&id));
    store.send_message("hola").unwrap();
    assert_eq!(store.chat(&id).unwrap().messages[0].content, "hola");
}

#[test]
fn late_failures_do_not_repopulate_a_signed_out_store() {
    let options = StoreOptions {
        fallback_to_mock: true,
        ..StoreOptions::default()
    };
    let (mut store, _sink) = store_with(options, Vec::new());

    store.apply(NetworkEvent::SignedOut {
        reason: Some("session expired or invalid token".to_string()),
    });
    store.apply(NetworkEvent::ChatsLoadFailed("session expired".to_string()));
    store.apply(NetworkEvent::ChatsLoaded(mock::chats()));
    store.apply(NetworkEvent::UsersLoaded(mock::users()));

    assert!(!store.is_authenticated());
    assert_eq!(store.chats().count(), 0);
    assert!(store.directory().is_empty());
    assert_eq!(store.notices().latest().unwrap().title, "Sesión finalizada");
}

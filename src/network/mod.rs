pub mod api;
pub mod client;
pub mod socket;
pub mod transport;

pub use api::{AuthSession, ChatApi};
pub use client::NetworkWorker;
pub use socket::{ConnectionHandle, SocketClient};

//! WorkFlowConnect chat client: REST accessors, the realtime socket, and a
//! client-side chat store rendered with egui.

pub mod common;
pub mod config;
pub mod error;
pub mod mock;
pub mod network;
pub mod storage;
pub mod store;
pub mod ui;

pub use error::{Error, Result};

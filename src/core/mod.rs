//! Application services. Each one takes the store (and, where it acts on
//! behalf of someone, the signed-in user) explicitly.

pub mod auth;
pub mod config;
pub mod exercises;
pub mod export;
pub mod feed;
pub mod friends;
pub mod history;
pub mod log;
pub mod session;
pub mod templates;
pub mod ticker;

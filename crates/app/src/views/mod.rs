//! The two screens: sign-in and chat.

pub mod chat;
pub mod login;

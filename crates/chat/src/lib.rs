//! View-independent behaviour of the HR assistant client.
//!
//! Everything here runs without a display: the egui views in `app` only
//! read this state and forward user input to it.

pub mod composer;
pub mod controller;
pub mod dispatcher;
pub mod guard;
pub mod login;
pub mod relay;
pub mod renderer;

pub use composer::{Composer, PendingAttachment, Submission};
pub use controller::{ChatController, ChatSink, SendOutcome};
pub use dispatcher::{compose_chat_message, RequestDispatcher};
pub use guard::{landing_view, redirect, View};
pub use login::{CredentialExchange, Credentials, LoginForm};
pub use relay::{spawn_login, spawn_send, ChatPage, EventSink, FinishGuard};
pub use renderer::{ResponseRenderer, FAILURE_MESSAGE, THINKING_PLACEHOLDER};

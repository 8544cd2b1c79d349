//! State management for the HR Assistant app
//!
//! Owns both views' state, spawns background work and applies its results
//! once per frame.

use anyhow::Result;
use backend::{BackendClient, ChatApi, ChatError};
use chat::{
    landing_view, redirect, spawn_login, spawn_send, ChatController, ChatPage, CredentialExchange,
    LoginForm, View,
};
use shared::events::ChatEvent;
use shared::session_store::SessionStore;
use shared::settings::ClientSettings;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;

use crate::widgets::FilePickerWidget;

pub struct AppState {
    pub view: View,
    pub settings: ClientSettings,
    pub login: LoginForm,
    pub chat: ChatPage,
    pub file_picker: FilePickerWidget,
    store: Arc<dyn SessionStore>,
    controller: Arc<ChatController>,
    exchange: Arc<CredentialExchange>,
    chat_tx: Sender<ChatEvent>,
    chat_rx: Receiver<ChatEvent>,
    login_tx: Sender<Result<(), ChatError>>,
    login_rx: Receiver<Result<(), ChatError>>,
}

impl AppState {
    pub fn new(settings: ClientSettings, store: Arc<dyn SessionStore>) -> Result<Self> {
        let api: Arc<dyn ChatApi> = Arc::new(BackendClient::new(&settings)?);
        Ok(Self::with_api(settings, store, api))
    }

    pub fn with_api(
        settings: ClientSettings,
        store: Arc<dyn SessionStore>,
        api: Arc<dyn ChatApi>,
    ) -> Self {
        let controller = Arc::new(ChatController::new(api.clone(), store.clone(), &settings));
        let exchange = Arc::new(CredentialExchange::new(api, store.clone()));
        let (chat_tx, chat_rx) = channel();
        let (login_tx, login_rx) = channel();

        Self {
            view: landing_view(store.as_ref(), settings.require_auth),
            settings,
            login: LoginForm::new(),
            chat: ChatPage::new(),
            file_picker: FilePickerWidget::new().with_title("Attach a file"),
            store,
            controller,
            exchange,
            chat_tx,
            chat_rx,
            login_tx,
            login_rx,
        }
    }

    /// Switch views, subject to the session guard. Entering a view starts
    /// it fresh, like loading a page.
    pub fn navigate(&mut self, view: View) {
        let target = redirect(view, self.store.as_ref(), self.settings.require_auth).unwrap_or(view);
        tracing::info!("navigating to {:?}", target);
        if target == View::Login {
            self.login = LoginForm::new();
        }
        self.chat = ChatPage::new();
        self.view = target;
    }

    pub fn submit_login(&mut self) {
        if let Some(credentials) = self.login.begin() {
            spawn_login(self.exchange.clone(), credentials, self.login_tx.clone());
        }
    }

    pub fn send_message(&mut self) {
        if let Some(submission) = self.chat.submit() {
            spawn_send(self.controller.clone(), submission, self.chat_tx.clone());
        }
    }

    /// Apply finished background work (called each frame).
    pub fn poll(&mut self) {
        while let Ok(result) = self.login_rx.try_recv() {
            if let Some(view) = self.login.finish(result) {
                self.navigate(view);
            }
        }

        while let Ok(event) = self.chat_rx.try_recv() {
            if let Some(view) = self.chat.apply(event) {
                self.navigate(view);
            }
        }
    }

    /// Background work is outstanding and the UI should keep polling.
    pub fn is_waiting(&self) -> bool {
        self.login.is_busy() || !self.chat.composer.is_enabled()
    }
}

//! Which view the user may see, based on token presence alone.

use shared::session_store::SessionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Login,
    Chat,
}

/// Redirect target when entering `view`, or `None` to stay.
///
/// With auth disabled there is nothing to log in to, so the login view
/// forwards to chat.
pub fn redirect(view: View, store: &dyn SessionStore, require_auth: bool) -> Option<View> {
    if !require_auth {
        return (view == View::Login).then_some(View::Chat);
    }
    match (view, store.has_token()) {
        (View::Chat, false) => Some(View::Login),
        (View::Login, true) => Some(View::Chat),
        _ => None,
    }
}

/// First view shown at startup.
pub fn landing_view(store: &dyn SessionStore, require_auth: bool) -> View {
    redirect(View::Chat, store, require_auth).unwrap_or(View::Chat)
}

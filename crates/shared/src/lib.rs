pub mod events;
pub mod session_store;
pub mod transcript;

pub mod settings {
    use serde::{Deserialize, Serialize};

    fn default_true() -> bool {
        true
    }

    /// How the chat endpoint's response body is consumed.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
    #[serde(rename_all = "snake_case")]
    pub enum ResponseMode {
        /// Raw text body, rendered chunk by chunk
        #[default]
        Stream,
        /// One JSON object with a `result` field
        Json,
    }

    /// Backend paths, joined onto `ClientSettings::base_url`.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Endpoints {
        pub token: String,
        pub upload: String,
        pub chat: String,
    }

    impl Default for Endpoints {
        fn default() -> Self {
            Self {
                token: "/auth/token".into(),
                upload: "/upload".into(),
                chat: "/chat".into(),
            }
        }
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct ClientSettings {
        pub base_url: String, // e.g., "http://127.0.0.1:8000"
        #[serde(default)]
        pub endpoints: Endpoints,
        #[serde(default)]
        pub response_mode: ResponseMode,
        /// Attach the bearer token and gate the chat view behind login
        #[serde(default = "default_true")]
        pub require_auth: bool,
    }

    impl Default for ClientSettings {
        fn default() -> Self {
            Self {
                base_url: "http://127.0.0.1:8000".into(),
                endpoints: Endpoints::default(),
                response_mode: ResponseMode::default(),
                require_auth: true,
            }
        }
    }

}

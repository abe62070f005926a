use std::env;

const DEFAULT_BIND: &str = "127.0.0.1:5000";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

impl ServerConfig {
    /// Reads `CHATBOX_BIND`, after loading a `.env` file if one exists.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            bind: env::var("CHATBOX_BIND").unwrap_or_else(|_| DEFAULT_BIND.to_string()),
        }
    }
}

use std::sync::{Arc, Mutex};

use chatbox_shared::Sender;
use crossterm::event::KeyCode;
use tokio::task::JoinHandle;
use tracing::{debug, error, Instrument};

use crate::client::ApiClient;
use crate::view::{lock, ConversationView, InputField, MessageNode};

pub type Shared<T> = Arc<Mutex<T>>;

/// UI events the widget is wired to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trigger {
    SendButton,
    KeyPress(KeyCode),
}

/// Connects the input field and the message view to the `/get_response` endpoint.
pub struct ChatWidget<V, I> {
    view: Shared<V>,
    input: Shared<I>,
    client: ApiClient,
}

impl<V: ConversationView, I: InputField> ChatWidget<V, I> {
    pub fn mount(view: Shared<V>, input: Shared<I>, client: ApiClient) -> Self {
        debug!(server = client.base_url(), "chat widget mounted");
        Self { view, input, client }
    }

    pub fn view(&self) -> &Shared<V> {
        &self.view
    }

    pub fn input(&self) -> &Shared<I> {
        &self.input
    }

    /// Runs `send` for the send button and the Enter key; ignores everything else.
    pub fn handle(&self, trigger: Trigger) -> Option<JoinHandle<()>> {
        match trigger {
            Trigger::SendButton | Trigger::KeyPress(KeyCode::Enter) => self.send(),
            Trigger::KeyPress(_) => None,
        }
    }

    /// Appends the typed message, clears the input and spawns the request.
    ///
    /// Returns `None` without touching the view when the trimmed input is empty.
    /// The returned task cannot be cancelled through the widget; on failure it
    /// logs and leaves the view as it is.
    pub fn send(&self) -> Option<JoinHandle<()>> {
        let text = lock(&self.input).value().trim().to_string();
        if text.is_empty() {
            return None;
        }

        append_message(&self.view, Sender::User, &text);
        lock(&self.input).clear();

        let view = Arc::clone(&self.view);
        let client = self.client.clone();

        let request = async move {
            match client.get_response(&text).await {
                Ok(reply) => {
                    debug!(len = reply.len(), "reply received");
                    append_message(&view, Sender::Bot, &reply);
                }
                Err(e) => {
                    error!(error = %e, "get_response failed");
                }
            }
        };

        Some(tokio::spawn(request.in_current_span()))
    }

    pub fn append_message(&self, sender: Sender, text: &str) {
        append_message(&self.view, sender, text);
    }
}

fn append_message<V: ConversationView>(view: &Mutex<V>, sender: Sender, text: &str) {
    let mut view = lock(view);
    view.append(MessageNode::new(sender, text));
    view.scroll_to_bottom();
}

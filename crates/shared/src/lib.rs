pub mod message;
pub mod wire;

pub use message::{Message, Sender};
pub use wire::{GetResponseForm, ReplyBody, DEFAULT_USER_ID, GET_RESPONSE_PATH};

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::Result;
use chrono::NaiveDate;

use crate::booking::Booking;

/// In-memory booking dialogues keyed by user id. Nothing survives a restart.
#[derive(Clone, Debug, Default)]
pub struct Conversations {
    bookings: Arc<Mutex<HashMap<String, Booking>>>,
}

impl Conversations {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, Booking>>> {
        self.bookings.lock().map_err(|e| anyhow::anyhow!("Lock error: {}", e))
    }

    /// Feeds `message` into the dialogue of `user_id`, starting one if needed.
    pub fn reply(&self, user_id: &str, message: &str, today: NaiveDate) -> Result<String> {
        let mut bookings = self.lock()?;
        let booking = bookings.entry(user_id.to_string()).or_default();
        Ok(booking.reply(message, today))
    }

    pub fn booking(&self, user_id: &str) -> Result<Option<Booking>> {
        Ok(self.lock()?.get(user_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::{ASK_DATE, ASK_NAME};

    #[test]
    fn users_have_separate_dialogues() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let conversations = Conversations::new();

        assert_eq!(conversations.reply("a", "I'm Ann", today).unwrap(), ASK_DATE);
        assert_eq!(conversations.reply("b", "hi", today).unwrap(), ASK_NAME);

        let a = conversations.booking("a").unwrap().unwrap();
        assert_eq!(a.name.as_deref(), Some("Ann"));
        assert_eq!(conversations.booking("b").unwrap().unwrap().name, None);
        assert!(conversations.booking("c").unwrap().is_none());
    }
}

pub mod extract;
pub mod validate;

use chrono::{NaiveDate, NaiveTime};
use tracing::debug;

pub use extract::{extract, Details};
pub use validate::{validate_visit, Rejection};

pub const PRICE_PER_TICKET_USD: u32 = 10;

pub const ASK_NAME: &str = "What's your name?";
pub const ASK_DATE: &str = "What date would you like to visit the museum?";
pub const ASK_TIME: &str = "At what time would you like to visit?";
pub const ASK_TICKETS: &str = "How many tickets would you like to book?";

/// What one visitor has told the booking dialogue so far.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Booking {
    pub name: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub tickets: Option<u32>,
}

impl Booking {
    /// Fills the empty slots from `details`. Slots already set are kept.
    pub fn absorb(&mut self, details: Details) {
        if self.name.is_none() {
            self.name = details.name;
        }
        if self.date.is_none() {
            self.date = details.date;
        }
        if self.time.is_none() {
            self.time = details.time;
        }
        if self.tickets.is_none() {
            self.tickets = details.tickets;
        }
    }

    /// Question for the first missing slot, or `None` once everything is known.
    pub fn next_prompt(&self) -> Option<&'static str> {
        if self.name.is_none() {
            Some(ASK_NAME)
        } else if self.date.is_none() {
            Some(ASK_DATE)
        } else if self.time.is_none() {
            Some(ASK_TIME)
        } else if self.tickets.is_none() {
            Some(ASK_TICKETS)
        } else {
            None
        }
    }

    /// Advances the dialogue with one visitor message and returns the reply.
    pub fn reply(&mut self, message: &str, today: NaiveDate) -> String {
        let details = extract(message, today, self.name.is_none());
        debug!(?details, "extracted booking details");
        self.absorb(details);

        let (Some(name), Some(date), Some(time), Some(tickets)) =
            (self.name.clone(), self.date, self.time, self.tickets)
        else {
            return self.next_prompt().unwrap_or(ASK_NAME).to_string();
        };

        match validate_visit(date, time) {
            Ok(()) => confirmation(&name, date, time, tickets),
            Err(rejection) => {
                // Forget the offending slot so the next message can replace it
                match rejection {
                    Rejection::ClosedOnSunday => self.date = None,
                    Rejection::OutsideOpeningHours => self.time = None,
                }
                rejection.to_string()
            }
        }
    }
}

fn confirmation(name: &str, date: NaiveDate, time: NaiveTime, tickets: u32) -> String {
    format!(
        "Thank you {}! You have booked {} ticket(s) for {} at {}. \
         The total is {} USD ({} USD per ticket).",
        name,
        tickets,
        date.format("%Y-%m-%d"),
        time.format("%H:%M"),
        tickets * PRICE_PER_TICKET_USD,
        PRICE_PER_TICKET_USD,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[test]
    fn prompts_follow_slot_order() {
        let mut booking = Booking::default();
        assert_eq!(booking.reply("hello", today()), ASK_NAME);
        assert_eq!(booking.reply("Ann", today()), ASK_DATE);
        assert_eq!(booking.reply("2026-10-24", today()), ASK_TIME);
        assert_eq!(booking.reply("11am", today()), ASK_TICKETS);
        assert_eq!(
            booking.reply("2", today()),
            "Thank you Ann! You have booked 2 ticket(s) for 2026-10-24 at 11:00. \
             The total is 20 USD (10 USD per ticket)."
        );
    }

    #[test]
    fn later_slots_can_arrive_early() {
        let mut booking = Booking::default();
        assert_eq!(booking.reply("3 tickets for tomorrow at 2pm", today()), ASK_NAME);
        assert_eq!(booking.date, NaiveDate::from_ymd_opt(2026, 10, 20));
        assert_eq!(booking.tickets, Some(3));

        let reply = booking.reply("My name is Ann", today());
        assert!(reply.starts_with("Thank you Ann! You have booked 3 ticket(s) for 2026-10-20 at 14:00."));
    }

    #[test]
    fn filled_slots_are_not_overwritten() {
        let mut booking = Booking::default();
        booking.reply("I'm Ann", today());
        booking.reply("I'm Bob, 2026-10-24", today());
        assert_eq!(booking.name.as_deref(), Some("Ann"));
        assert_eq!(booking.date, NaiveDate::from_ymd_opt(2026, 10, 24));
    }

    #[test]
    fn sunday_is_rejected_and_can_be_replaced() {
        let mut booking = Booking {
            name: Some("Ann".to_string()),
            time: NaiveTime::from_hms_opt(10, 0, 0),
            tickets: Some(1),
            ..Booking::default()
        };

        assert_eq!(
            booking.reply("2026-10-25", today()),
            Rejection::ClosedOnSunday.to_string()
        );
        assert_eq!(booking.date, None);

        assert!(booking.reply("what about October 24?", today()).starts_with("Thank you Ann!"));
    }

    #[test]
    fn hours_outside_opening_are_rejected() {
        let mut booking = Booking {
            name: Some("Ann".to_string()),
            date: NaiveDate::from_ymd_opt(2026, 10, 24),
            tickets: Some(4),
            ..Booking::default()
        };

        assert_eq!(
            booking.reply("8pm", today()),
            "The museum is open only from 9 AM to 5 PM. Please choose a time within this range."
        );
        assert_eq!(booking.time, None);
        assert!(booking.reply("5pm", today()).contains("The total is 40 USD"));
    }
}

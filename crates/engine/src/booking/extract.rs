use chrono::{Datelike, Days, NaiveDate, NaiveTime};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::ops::Range;

const MONTHS: &str = r"(jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)";

const NUMBER_WORDS: [&str; 12] = [
    "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten", "eleven",
    "twelve",
];

// Words that are never taken as a bare name reply
const NOT_NAMES: [&str; 16] = [
    "hi", "hello", "hey", "yes", "no", "ok", "okay", "thanks", "thank", "please", "sure",
    "book", "booking", "ticket", "tickets", "museum",
];

// A stated name ends before any of these
const NAME_STOPS: [&str; 18] = [
    "and", "but", "i", "want", "would", "like", "to", "for", "with", "please", "book",
    "booking", "ticket", "tickets", "at", "on", "today", "tomorrow",
];

fn regex(pattern: &str) -> Regex {
    Regex::new(pattern).expect("invalid built-in pattern")
}

static ISO_DATE: Lazy<Regex> = Lazy::new(|| regex(r"\b(\d{4})-(\d{1,2})-(\d{1,2})\b"));
static SLASH_DATE: Lazy<Regex> = Lazy::new(|| regex(r"\b(\d{1,2})/(\d{1,2})/(\d{4})\b"));
static MONTH_DAY: Lazy<Regex> = Lazy::new(|| {
    regex(&format!(
        r"\b{MONTHS}\.?\s+(\d{{1,2}})(?:st|nd|rd|th)?(?:,?\s+(\d{{4}}))?\b"
    ))
});
static DAY_MONTH: Lazy<Regex> = Lazy::new(|| {
    regex(&format!(
        r"\b(\d{{1,2}})(?:st|nd|rd|th)?\s+(?:of\s+)?{MONTHS}\b\.?(?:,?\s+(\d{{4}})\b)?"
    ))
});
static RELATIVE_DATE: Lazy<Regex> = Lazy::new(|| regex(r"\b(today|tomorrow)\b"));

static MERIDIEM_TIME: Lazy<Regex> =
    Lazy::new(|| regex(r"\b(\d{1,2})(?::([0-5]\d))?\s*(a\.m\.|p\.m\.|am\b|pm\b)"));
static CLOCK_TIME: Lazy<Regex> = Lazy::new(|| regex(r"\b([01]?\d|2[0-3]):([0-5]\d)\b"));
static NAMED_TIME: Lazy<Regex> = Lazy::new(|| regex(r"\b(noon|midday|midnight)\b"));

static TICKET_PHRASE: Lazy<Regex> = Lazy::new(|| {
    regex(&format!(
        r"\b(\d{{1,3}}|{})\s+(?:[a-z]+\s+)?tickets?\b",
        NUMBER_WORDS.join("|")
    ))
});
static BARE_NUMBER: Lazy<Regex> =
    Lazy::new(|| regex(&format!(r"\b(\d{{1,3}}|{})\b", NUMBER_WORDS.join("|"))));

static NAME_STATED: Lazy<Regex> = Lazy::new(|| {
    regex(r"\b(?i:my name is|my name's|name's|call me)\s+([A-Za-z][A-Za-z'\-]*(?:\s+[A-Za-z][A-Za-z'\-]*){0,2})")
});
static NAME_INTRODUCED: Lazy<Regex> = Lazy::new(|| {
    regex(r"\b(?i:i'm|i am|this is)\s+([A-Z][A-Za-z'\-]*(?:\s+[A-Z][A-Za-z'\-]*){0,2})")
});

/// Booking details found in one message. Unrecognised slots stay `None`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Details {
    pub name: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub tickets: Option<u32>,
}

impl Details {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.date.is_none() && self.time.is_none() && self.tickets.is_none()
    }
}

/// Pulls whatever booking details `text` mentions.
///
/// `today` anchors relative dates and dates without a year. With
/// `expecting_name` set, a short reply made only of words is taken as the name.
pub fn extract(text: &str, today: NaiveDate, expecting_name: bool) -> Details {
    // ASCII lowercasing keeps byte offsets aligned with `text`
    let mut scratch = text.to_ascii_lowercase();
    let mut details = Details::default();

    if let Some((date, span)) = find_date(&scratch, today) {
        details.date = Some(date);
        blank(&mut scratch, span);
    }

    if let Some((time, span)) = find_time(&scratch) {
        details.time = Some(time);
        blank(&mut scratch, span);
    }

    details.tickets = find_tickets(&scratch);
    details.name = find_name(text);

    if details.is_empty() && expecting_name {
        details.name = bare_name(text);
    }

    details
}

fn blank(scratch: &mut String, span: Range<usize>) {
    let width = span.len();
    scratch.replace_range(span, &" ".repeat(width));
}

fn find_date(text: &str, today: NaiveDate) -> Option<(NaiveDate, Range<usize>)> {
    type Parse = fn(&Captures, NaiveDate) -> Option<NaiveDate>;
    let parsers: [(&Regex, Parse); 5] = [
        (&*ISO_DATE, iso_date),
        (&*SLASH_DATE, slash_date),
        (&*MONTH_DAY, month_day),
        (&*DAY_MONTH, day_month),
        (&*RELATIVE_DATE, relative_date),
    ];

    for (pattern, parse) in parsers {
        for captures in pattern.captures_iter(text) {
            if let Some(date) = parse(&captures, today) {
                return Some((date, captures.get(0)?.range()));
            }
        }
    }
    None
}

fn iso_date(c: &Captures, _today: NaiveDate) -> Option<NaiveDate> {
    ymd(number(c, 1)?, number(c, 2)?, number(c, 3)?)
}

// Month first, as in 12/25/2026. Read day first only when the first number
// cannot be a month.
fn slash_date(c: &Captures, _today: NaiveDate) -> Option<NaiveDate> {
    let (first, second, year) = (number(c, 1)?, number(c, 2)?, number(c, 3)?);
    ymd(year, first, second).or_else(|| ymd(year, second, first))
}

fn month_day(c: &Captures, today: NaiveDate) -> Option<NaiveDate> {
    ymd(year_or_current(c, 3, today)?, month(c.get(1)?.as_str())?, number(c, 2)?)
}

fn day_month(c: &Captures, today: NaiveDate) -> Option<NaiveDate> {
    ymd(year_or_current(c, 3, today)?, month(c.get(2)?.as_str())?, number(c, 1)?)
}

fn relative_date(c: &Captures, today: NaiveDate) -> Option<NaiveDate> {
    match c.get(1)?.as_str() {
        "today" => Some(today),
        _ => today.checked_add_days(Days::new(1)),
    }
}

fn year_or_current(c: &Captures, group: usize, today: NaiveDate) -> Option<u32> {
    match c.get(group) {
        Some(year) => year.as_str().parse().ok(),
        None => u32::try_from(today.year()).ok(),
    }
}

fn find_time(text: &str) -> Option<(NaiveTime, Range<usize>)> {
    for c in MERIDIEM_TIME.captures_iter(text) {
        let hour = number(&c, 1)?;
        let minute = c.get(2).map_or(Some(0), |m| m.as_str().parse().ok())?;
        if !(1..=12).contains(&hour) {
            continue;
        }
        let afternoon = c.get(3)?.as_str().starts_with('p');
        let hour = match (hour, afternoon) {
            (12, false) => 0,
            (12, true) => 12,
            (h, true) => h + 12,
            (h, false) => h,
        };
        if let Some(time) = NaiveTime::from_hms_opt(hour, minute, 0) {
            return Some((time, c.get(0)?.range()));
        }
    }

    if let Some(c) = CLOCK_TIME.captures(text) {
        let time = NaiveTime::from_hms_opt(number(&c, 1)?, number(&c, 2)?, 0)?;
        return Some((time, c.get(0)?.range()));
    }

    let c = NAMED_TIME.captures(text)?;
    let time = match c.get(1)?.as_str() {
        "midnight" => NaiveTime::MIN,
        _ => NaiveTime::from_hms_opt(12, 0, 0)?,
    };
    Some((time, c.get(0)?.range()))
}

fn find_tickets(text: &str) -> Option<u32> {
    let c = TICKET_PHRASE
        .captures(text)
        .or_else(|| BARE_NUMBER.captures(text))?;
    let raw = c.get(1)?.as_str();

    let count = match NUMBER_WORDS.iter().position(|w| *w == raw) {
        Some(index) => index as u32 + 1,
        None => raw.parse().ok()?,
    };
    (count > 0).then_some(count)
}

fn find_name(text: &str) -> Option<String> {
    let c = NAME_STATED
        .captures(text)
        .or_else(|| NAME_INTRODUCED.captures(text))?;
    let words: Vec<&str> = c
        .get(1)?
        .as_str()
        .split_whitespace()
        .take_while(|w| !NAME_STOPS.contains(&w.to_ascii_lowercase().as_str()))
        .collect();
    let name = words.join(" ");
    if name.is_empty() || NOT_NAMES.contains(&name.to_ascii_lowercase().as_str()) {
        return None;
    }
    Some(title_case(&name))
}

fn bare_name(text: &str) -> Option<String> {
    let trimmed = text.trim().trim_end_matches(['.', '!', '?', ',']);
    let words: Vec<&str> = trimmed.split_whitespace().collect();
    if words.is_empty() || words.len() > 3 {
        return None;
    }

    let all_wordlike = words.iter().all(|w| {
        w.chars().next().is_some_and(|c| c.is_alphabetic())
            && w.chars().all(|c| c.is_alphabetic() || c == '\'' || c == '-')
    });
    let has_filler = words
        .iter()
        .any(|w| NOT_NAMES.contains(&w.to_lowercase().as_str()));

    (all_wordlike && !has_filler).then(|| title_case(&words.join(" ")))
}

fn title_case(name: &str) -> String {
    name.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

fn number(c: &Captures, group: usize) -> Option<u32> {
    c.get(group)?.as_str().parse().ok()
}

fn month(name: &str) -> Option<u32> {
    const ABBREVIATIONS: [&str; 12] = [
        "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
    ];
    let prefix = name.get(..3)?;
    ABBREVIATIONS
        .iter()
        .position(|m| *m == prefix)
        .map(|i| i as u32 + 1)
}

fn ymd(year: u32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, month, day)
}

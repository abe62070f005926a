use chatbox_shared::{Message, Sender};
use std::borrow::Cow;
use std::sync::{Mutex, MutexGuard, PoisonError};
use unicode_width::UnicodeWidthChar;

const USER_PREFIX: &str = "You: ";
const BOT_PREFIX: &str = "Bot: ";
const PREFIX_WIDTH: usize = 5;

/// Locks a shared handle, recovering the data if a previous holder panicked.
pub fn lock<T>(handle: &Mutex<T>) -> MutexGuard<'_, T> {
    handle.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Literal text content of a message node. Never interpreted as markup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextNode {
    content: String,
}

impl TextNode {
    pub const CLASS: &'static str = "message-text";

    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// One rendered message in the view container.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageNode {
    sender: Sender,
    text: TextNode,
}

impl MessageNode {
    pub const CLASS: &'static str = "message";

    pub fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            sender,
            text: TextNode::new(text),
        }
    }

    pub fn sender(&self) -> Sender {
        self.sender
    }

    pub fn text(&self) -> &str {
        self.text.content()
    }

    /// Style tags of the outer node, sender scoped.
    pub fn classes(&self) -> [&'static str; 2] {
        [Self::CLASS, self.sender.as_str()]
    }

    pub fn to_message(&self) -> Message {
        Message::new(self.sender, self.text.content())
    }

    pub fn to_html(&self) -> String {
        format!(
            r#"<div class="{}"><div class="{}">{}</div></div>"#,
            self.classes().join(" "),
            TextNode::CLASS,
            escape_html(self.text.content())
        )
    }
}

impl From<Message> for MessageNode {
    fn from(message: Message) -> Self {
        Self::new(message.sender, message.text)
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// The container that holds the ordered, append-only list of message nodes.
pub trait ConversationView: Send + 'static {
    fn append(&mut self, node: MessageNode);

    /// Moves the scroll offset to its maximum.
    fn scroll_to_bottom(&mut self);

    fn nodes(&self) -> &[MessageNode];

    fn len(&self) -> usize {
        self.nodes().len()
    }

    fn is_empty(&self) -> bool {
        self.nodes().is_empty()
    }
}

/// The text field the user types into.
pub trait InputField: Send + 'static {
    fn value(&self) -> String;
    fn clear(&mut self);
}

/// A single wrapped row of the message list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Row {
    pub sender: Sender,
    /// Sender label on the first row of a message, padding on the rest.
    pub prefix: &'static str,
    pub text: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 80,
            height: 20,
        }
    }
}

/// In-memory view container with a scrollable viewport.
#[derive(Debug, Default)]
pub struct MessageList {
    nodes: Vec<MessageNode>,
    viewport: Viewport,
    scroll_offset: usize,
}

impl MessageList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Resizes the viewport. A list scrolled to the bottom stays there.
    pub fn set_viewport(&mut self, width: u16, height: u16) {
        let new = Viewport { width, height };
        if new == self.viewport {
            return;
        }

        let pinned = self.is_at_bottom();
        self.viewport = new;
        if pinned {
            self.scroll_to_bottom();
        } else {
            self.scroll_offset = self.scroll_offset.min(self.max_scroll());
        }
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    pub fn content_height(&self) -> usize {
        self.rows().len()
    }

    pub fn max_scroll(&self) -> usize {
        self.content_height()
            .saturating_sub(self.viewport.height as usize)
    }

    pub fn is_at_bottom(&self) -> bool {
        self.scroll_offset >= self.max_scroll()
    }

    /// Scrolls by `delta` rows, clamped to the scrollable range.
    pub fn scroll_by(&mut self, delta: isize) {
        let target = self.scroll_offset.saturating_add_signed(delta);
        self.scroll_offset = target.min(self.max_scroll());
    }

    /// All rows of the list, wrapped to the viewport width in display columns.
    pub fn rows(&self) -> Vec<Row> {
        let width = (self.viewport.width as usize)
            .saturating_sub(PREFIX_WIDTH)
            .max(1);

        let mut rows = Vec::new();
        for node in &self.nodes {
            let label = match node.sender() {
                Sender::User => USER_PREFIX,
                Sender::Bot => BOT_PREFIX,
            };
            let mut first = true;
            for line in node.text().split('\n') {
                for chunk in wrap(line, width) {
                    rows.push(Row {
                        sender: node.sender(),
                        prefix: if first { label } else { "     " },
                        text: chunk,
                    });
                    first = false;
                }
            }
        }
        rows
    }

    /// Rows currently inside the viewport.
    pub fn visible_rows(&self) -> Vec<Row> {
        self.rows()
            .into_iter()
            .skip(self.scroll_offset)
            .take(self.viewport.height as usize)
            .collect()
    }
}

impl ConversationView for MessageList {
    fn append(&mut self, node: MessageNode) {
        self.nodes.push(node);
    }

    fn scroll_to_bottom(&mut self) {
        self.scroll_offset = self.max_scroll();
    }

    fn nodes(&self) -> &[MessageNode] {
        &self.nodes
    }
}

fn wrap(line: &str, width: usize) -> Vec<String> {
    let mut rows: Vec<String> = textwrap::wrap(line, width)
        .into_iter()
        .map(Cow::into_owned)
        .collect();
    if rows.is_empty() {
        rows.push(String::new());
    }
    rows
}

/// Single-line editable buffer. The cursor is a char index.
#[derive(Debug, Default, Clone)]
pub struct TextInput {
    buffer: String,
    cursor: usize,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: impl Into<String>) -> Self {
        let mut input = Self::new();
        input.set_value(value);
        input
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.buffer = value.into();
        self.cursor = self.buffer.chars().count();
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn insert(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.buffer.insert(at, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = self.byte_index(self.cursor);
        self.buffer.remove(at);
    }

    pub fn delete(&mut self) {
        if self.cursor < self.buffer.chars().count() {
            let at = self.byte_index(self.cursor);
            self.buffer.remove(at);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.buffer.chars().count());
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.buffer.chars().count();
    }

    /// The part of the buffer that fits in `width` columns with the cursor
    /// visible, and the cursor's column inside it.
    pub fn window(&self, width: usize) -> (String, usize) {
        let width = width.max(1);
        let chars: Vec<char> = self.buffer.chars().collect();
        let column = |from: usize| -> usize {
            chars[from..self.cursor].iter().map(|c| c.width().unwrap_or(0)).sum()
        };

        let mut start = 0;
        while start < self.cursor && column(start) >= width {
            start += 1;
        }

        let mut shown = String::new();
        let mut used = 0;
        for c in &chars[start..] {
            let w = c.width().unwrap_or(0);
            if used + w > width {
                break;
            }
            used += w;
            shown.push(*c);
        }
        (shown, column(start))
    }

    fn byte_index(&self, cursor: usize) -> usize {
        self.buffer
            .char_indices()
            .nth(cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.buffer.len())
    }
}

impl InputField for TextInput {
    fn value(&self) -> String {
        self.buffer.clone()
    }

    fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_with(width: u16, height: u16, texts: &[&str]) -> MessageList {
        let mut list = MessageList::new();
        list.set_viewport(width, height);
        for text in texts {
            list.append(MessageNode::new(Sender::User, *text));
        }
        list
    }

    #[test]
    fn node_carries_sender_scoped_classes() {
        let node = MessageNode::new(Sender::Bot, "Hi there");
        assert_eq!(node.classes(), ["message", "bot"]);
        assert_eq!(node.text(), "Hi there");
        assert_eq!(node.to_message(), Message::bot("Hi there"));
    }

    #[test]
    fn html_rendering_keeps_markup_literal() {
        let node = MessageNode::new(Sender::User, "<script>alert(1)</script>");
        assert_eq!(node.text(), "<script>alert(1)</script>");

        let html = node.to_html();
        assert_eq!(
            html,
            r#"<div class="message user"><div class="message-text">&lt;script&gt;alert(1)&lt;/script&gt;</div></div>"#
        );
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn html_escapes_quotes_and_ampersands() {
        let node = MessageNode::new(Sender::Bot, r#"a & "b" 'c'"#);
        assert!(node.to_html().contains("a &amp; &quot;b&quot; &#39;c&#39;"));
    }

    #[test]
    fn rows_wrap_to_viewport_width() {
        // 5 columns of prefix leave 5 for text
        let list = list_with(10, 5, &["abcdefghijkl", "x\ny"]);
        let rows = list.rows();

        let texts: Vec<_> = rows.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, ["abcde", "fghij", "kl", "x", "y"]);
        assert_eq!(rows[0].prefix, "You: ");
        assert_eq!(rows[1].prefix, "     ");
        assert_eq!(rows[3].prefix, "You: ");
    }

    #[test]
    fn wide_characters_wrap_by_display_width() {
        use unicode_width::UnicodeWidthStr;

        let mut list = MessageList::new();
        list.set_viewport(15, 5);
        list.append(MessageNode::new(Sender::Bot, "博物館のチケットを予約"));

        let rows = list.rows();
        assert!(rows.len() >= 3);
        assert!(rows.iter().all(|row| row.text.width() <= 10), "{rows:?}");
        assert_eq!(rows.iter().map(|r| r.text.as_str()).collect::<String>(), "博物館のチケットを予約");
        assert_eq!(list.content_height(), rows.len());
    }

    #[test]
    fn words_wrap_at_spaces() {
        let list = list_with(15, 5, &["see you at the museum"]);
        let texts: Vec<_> = list.rows().into_iter().map(|r| r.text).collect();
        assert_eq!(texts, ["see you at", "the museum"]);
    }

    #[test]
    fn input_window_keeps_wide_cursor_visible() {
        let mut input = TextInput::with_value("あいうえお");

        let (shown, column) = input.window(6);
        assert_eq!(shown, "えお");
        assert_eq!(column, 4);

        input.home();
        let (shown, column) = input.window(6);
        assert_eq!(shown, "あいう");
        assert_eq!(column, 0);
    }

    #[test]
    fn scroll_to_bottom_uses_max_offset() {
        let mut list = list_with(20, 3, &["1", "2", "3", "4", "5"]);
        assert_eq!(list.scroll_offset(), 0);

        list.scroll_to_bottom();
        assert_eq!(list.max_scroll(), 2);
        assert_eq!(list.scroll_offset(), 2);

        let visible: Vec<_> = list.visible_rows().into_iter().map(|r| r.text).collect();
        assert_eq!(visible, ["3", "4", "5"]);
    }

    #[test]
    fn short_content_never_scrolls() {
        let mut list = list_with(20, 10, &["only"]);
        list.scroll_to_bottom();
        assert_eq!(list.scroll_offset(), 0);
        assert!(list.is_at_bottom());
    }

    #[test]
    fn manual_scroll_is_clamped() {
        let mut list = list_with(20, 2, &["1", "2", "3", "4"]);
        list.scroll_by(-5);
        assert_eq!(list.scroll_offset(), 0);
        list.scroll_by(100);
        assert_eq!(list.scroll_offset(), 2);
    }

    #[test]
    fn resize_keeps_bottom_pinned() {
        let mut list = list_with(20, 2, &["1", "2", "3", "4"]);
        list.scroll_to_bottom();
        list.set_viewport(20, 1);
        assert_eq!(list.scroll_offset(), 3);
    }

    #[test]
    fn text_input_edits_at_cursor() {
        let mut input = TextInput::with_value("héllo");
        assert_eq!(input.cursor(), 5);

        input.home();
        input.move_right();
        input.delete();
        assert_eq!(input.value(), "hllo");

        input.insert('é');
        input.end();
        input.backspace();
        input.move_left();
        input.insert('!');
        assert_eq!(input.value(), "hél!l");

        input.clear();
        assert_eq!(input.value(), "");
        assert_eq!(input.cursor(), 0);
    }
}

//! Ordered style lists.
//!
//! A [`Style`] is a list of style-setting messages. Applying it replays every
//! message, in append order, through the same [`Dispatcher`] entry point live
//! input uses. Duplicates are kept: the last write wins when the list is
//! replayed, and the writer reproduces every entry.

use plume_core::logging::targets;
use plume_core::{Dispatcher, Message, MessageKind};

/// An ordered list of style messages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Style {
    messages: Vec<Message>,
}

impl Style {
    /// Create an empty style.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message.
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Builder form of [`push`](Self::push).
    pub fn with(mut self, message: Message) -> Self {
        self.push(message);
        self
    }

    /// Append every message of another style.
    pub fn extend_from(&mut self, other: &Style) {
        self.messages.extend(other.messages.iter().cloned());
    }

    /// Remove the entry at `index`.
    pub fn remove(&mut self, index: usize) -> Option<Message> {
        (index < self.messages.len()).then(|| self.messages.remove(index))
    }

    /// Remove every entry with the given kind and subtype. Returns how many were removed.
    pub fn remove_kind(&mut self, kind: MessageKind, subtype: u16) -> usize {
        let before = self.messages.len();
        self.messages.retain(|m| m.kind != kind || m.subtype != subtype);
        before - self.messages.len()
    }

    /// The entry that wins for `(kind, subtype)` when the style is replayed.
    pub fn effective(&self, kind: MessageKind, subtype: u16) -> Option<&Message> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.kind == kind && m.subtype == subtype)
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    /// Replay every message into `target` in append order.
    ///
    /// Returns the number of messages the target handled. Unhandled entries
    /// are not an error; a style may carry attributes only some widget types
    /// understand.
    pub fn apply<D: Dispatcher + ?Sized>(&self, target: &mut D) -> usize {
        let mut handled = 0;
        for message in &self.messages {
            if target.dispatch(message).is_handled() {
                handled += 1;
            } else {
                tracing::trace!(target: targets::STYLE, kind = ?message.kind, "style entry not handled");
            }
        }
        handled
    }
}

impl FromIterator<Message> for Style {
    fn from_iter<I: IntoIterator<Item = Message>>(iter: I) -> Self {
        Self {
            messages: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Style {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

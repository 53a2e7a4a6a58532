//! Transcript view model: one bubble per stored message.

use chrono::Local;

use crate::format::{self, Block};
use crate::store::{Message, Session};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Author {
    User,
    Bot,
}

/// A rendered message, ready for the terminal or HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bubble {
    pub message_id: i64,
    pub author: Author,
    /// Local `HH:MM` time the message was added.
    pub time: String,
    pub model: String,
    pub blocks: Vec<Block>,
}

pub fn render_bubble(message: &Message) -> Bubble {
    Bubble {
        message_id: message.id,
        author: if message.is_user {
            Author::User
        } else {
            Author::Bot
        },
        time: message
            .timestamp
            .with_timezone(&Local)
            .format("%H:%M")
            .to_string(),
        model: message.model.clone(),
        blocks: format::parse(&message.content),
    }
}

/// Renders the whole session from scratch.
///
/// The result depends only on the session, so repeated calls yield the same
/// bubbles.
pub fn render_transcript(session: &Session) -> Vec<Bubble> {
    session.messages.iter().map(render_bubble).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn session(n: usize) -> Session {
        let now = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let mut session = Session::with_id("chat_v", "openai/gpt-4", now);
        for i in 0..n {
            session.push_message(format!("message {i}"), i % 2 == 0, "openai/gpt-4", now);
        }
        session
    }

    #[test]
    fn test_one_bubble_per_message() {
        let session = session(7);
        assert_eq!(render_transcript(&session).len(), 7);
    }

    #[test]
    fn test_rerender_is_idempotent() {
        let session = session(5);

        let first = render_transcript(&session);
        let second = render_transcript(&session);
        let third = render_transcript(&session);

        assert_eq!(first.len(), 5);
        assert_eq!(first, second);
        assert_eq!(second, third);
    }

    #[test]
    fn test_bubble_author_and_order() {
        let bubbles = render_transcript(&session(3));
        let authors: Vec<Author> = bubbles.iter().map(|b| b.author).collect();

        assert_eq!(authors, vec![Author::User, Author::Bot, Author::User]);
        assert!(bubbles.windows(2).all(|w| w[0].message_id < w[1].message_id));
    }

    #[test]
    fn test_bubble_time_format() {
        let bubble = &render_transcript(&session(1))[0];
        assert_eq!(bubble.time.len(), 5);
        assert_eq!(bubble.time.as_bytes()[2], b':');
    }

    #[test]
    fn test_empty_session_has_no_bubbles() {
        assert!(render_transcript(&session(0)).is_empty());
    }
}

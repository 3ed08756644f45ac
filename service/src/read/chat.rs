//! Chat read model definitions.

use std::collections::HashMap;

use crate::domain::{
    chat::{Message, Participants},
    user,
};
#[cfg(doc)]
use crate::domain::User;

/// Most recent [`Message`] of a conversation.
#[derive(Clone, Debug)]
pub struct Latest(pub Message);

/// Conversation of a [`User`] as shown in its chat list.
#[derive(Clone, Debug)]
pub struct Conversation {
    /// ID of the [`User`] on the other side of this [`Conversation`].
    pub partner_id: user::Id,

    /// [`user::Profile`] of the partner.
    ///
    /// [`None`] if the partner is not a counterpart of the [`User`] listing
    /// its chats (or doesn't exist anymore).
    pub partner: Option<user::Profile>,

    /// Most recent [`Message`] of this [`Conversation`].
    pub last_message: Message,
}

/// Picks the most recent [`Message`] of every conversation the provided
/// [`User`] participates in, ordered from the newest to the oldest.
///
/// Conversations are identified by unordered [`Participants`], so messages
/// sent in both directions belong to the same conversation.
pub fn latest_per_conversation(
    user_id: user::Id,
    messages: impl IntoIterator<Item = Message>,
) -> Vec<Latest> {
    let mut latest = HashMap::<Participants, Message>::new();
    for msg in messages {
        let participants = msg.participants();
        if !participants.contains(user_id) {
            continue;
        }
        let is_newer = latest
            .get(&participants)
            .map_or(true, |m| m.created_at <= msg.created_at);
        if is_newer {
            _ = latest.insert(participants, msg);
        }
    }

    let mut latest = latest.into_values().collect::<Vec<_>>();
    latest.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    latest.into_iter().map(Latest).collect()
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::DateTime;

    use crate::domain::{
        chat::{self, Message, Text},
        user,
    };

    use super::latest_per_conversation;

    fn message(
        from: user::Id,
        to: user::Id,
        text: &str,
        at: DateTime,
    ) -> Message {
        Message {
            id: chat::Id::new(),
            sender_id: from,
            recipient_id: to,
            text: Text::new(text).unwrap(),
            is_read: false,
            created_at: at.coerce(),
        }
    }

    #[test]
    fn keeps_latest_message_of_both_directions() {
        let (a, b) = (user::Id::new(), user::Id::new());
        let t1 = DateTime::now();
        let t2 = t1 + Duration::from_secs(1);
        let t3 = t2 + Duration::from_secs(1);

        let latest = latest_per_conversation(
            a,
            [
                message(a, b, "first", t1),
                message(b, a, "second", t2),
                message(a, b, "third", t3),
            ],
        );

        assert_eq!(latest.len(), 1);
        assert_eq!(latest[0].0.text.to_string(), "third");
        assert_eq!(latest[0].0.created_at, t3.coerce());
    }

    #[test]
    fn orders_conversations_newest_first() {
        let (a, b, c, d) = (
            user::Id::new(),
            user::Id::new(),
            user::Id::new(),
            user::Id::new(),
        );
        let t1 = DateTime::now();
        let t2 = t1 + Duration::from_secs(1);
        let t3 = t2 + Duration::from_secs(1);

        let latest = latest_per_conversation(
            a,
            [
                message(c, a, "from c", t3),
                message(a, b, "to b", t2),
                message(b, a, "older from b", t1),
                message(b, d, "not mine", t3),
            ],
        );

        let texts = latest
            .iter()
            .map(|l| l.0.text.to_string())
            .collect::<Vec<_>>();
        assert_eq!(texts, ["from c", "to b"]);
    }

    #[test]
    fn empty_without_messages() {
        assert!(latest_per_conversation(user::Id::new(), []).is_empty());
    }
}

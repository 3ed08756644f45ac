//! Chat [`Message`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::user;
#[cfg(doc)]
use crate::domain::User;

/// Message sent from one [`User`] to another.
#[derive(Clone, Debug)]
pub struct Message {
    /// ID of this [`Message`].
    pub id: Id,

    /// ID of the [`User`] who sent this [`Message`].
    pub sender_id: user::Id,

    /// ID of the [`User`] this [`Message`] is addressed to.
    pub recipient_id: user::Id,

    /// [`Text`] of this [`Message`].
    pub text: Text,

    /// Indicator whether the recipient has read this [`Message`].
    pub is_read: bool,

    /// [`DateTime`] when this [`Message`] was sent.
    pub created_at: CreationDateTime,
}

impl Message {
    /// Returns [`Participants`] of the conversation this [`Message`] belongs
    /// to.
    #[must_use]
    pub fn participants(&self) -> Participants {
        Participants::new(self.sender_id, self.recipient_id)
    }
}

/// Unordered pair of [`User`]s identifying a conversation.
///
/// `(a, b)` and `(b, a)` are the same [`Participants`].
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Participants {
    /// Lesser ID of the pair.
    lo: user::Id,

    /// Greater ID of the pair.
    hi: user::Id,
}

impl Participants {
    /// Creates new [`Participants`] out of the provided [`User`]s in any
    /// order.
    #[must_use]
    pub fn new(a: user::Id, b: user::Id) -> Self {
        if a <= b {
            Self { lo: a, hi: b }
        } else {
            Self { lo: b, hi: a }
        }
    }

    /// Returns IDs of these [`Participants`], the lesser one first.
    #[must_use]
    pub const fn ids(&self) -> (user::Id, user::Id) {
        (self.lo, self.hi)
    }

    /// Indicates whether the provided [`User`] is one of these
    /// [`Participants`].
    #[must_use]
    pub fn contains(&self, user_id: user::Id) -> bool {
        self.lo == user_id || self.hi == user_id
    }

    /// Returns the counterpart of the provided [`User`], if it's one of these
    /// [`Participants`].
    #[must_use]
    pub fn partner_of(&self, user_id: user::Id) -> Option<user::Id> {
        if self.lo == user_id {
            Some(self.hi)
        } else if self.hi == user_id {
            Some(self.lo)
        } else {
            None
        }
    }
}

/// Marking of [`Message`]s sent by a partner to a reader as read.
#[derive(Clone, Copy, Debug)]
pub struct MarkRead {
    /// ID of the [`User`] who read the [`Message`]s.
    pub reader_id: user::Id,

    /// ID of the [`User`] who sent the [`Message`]s.
    pub partner_id: user::Id,
}

/// ID of a [`Message`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Text of a [`Message`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Text(String);

impl Text {
    /// [`Text`] opening a new conversation.
    pub const GREETING: &'static str = "Hi";

    /// Maximum number of characters in a [`Text`].
    pub const MAX_CHARS: usize = 4096;

    /// Creates a new [`Text`] if the given `text` is valid.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        Self::check(&text).then_some(Self(text))
    }

    /// Returns the [`Text`] opening a new conversation.
    #[must_use]
    pub fn greeting() -> Self {
        Self(Self::GREETING.into())
    }

    /// Checks whether the given `text` is a valid [`Text`].
    fn check(text: impl AsRef<str>) -> bool {
        let text = text.as_ref();
        !text.trim().is_empty() && text.chars().count() <= Self::MAX_CHARS
    }
}

impl FromStr for Text {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Text`")
    }
}

/// [`DateTime`] when a [`Message`] was sent.
pub type CreationDateTime = DateTimeOf<(Message, unit::Creation)>;

#[cfg(test)]
mod spec {
    use crate::domain::user;

    use super::{Participants, Text};

    #[test]
    fn participants_are_unordered() {
        let (a, b, c) = (user::Id::new(), user::Id::new(), user::Id::new());

        assert_eq!(Participants::new(a, b), Participants::new(b, a));
        assert_ne!(Participants::new(a, b), Participants::new(a, c));

        let pair = Participants::new(b, a);
        assert!(pair.contains(a));
        assert!(!pair.contains(c));
        assert_eq!(pair.partner_of(a), Some(b));
        assert_eq!(pair.partner_of(b), Some(a));
        assert_eq!(pair.partner_of(c), None);
    }

    #[test]
    fn validates_text() {
        assert!(Text::new("Hello there").is_some());
        assert!(Text::new("   ").is_none());
        assert!(Text::new("").is_none());
        assert_eq!(Text::greeting().to_string(), "Hi");
    }
}

//! [`Query`] collection related to the [`Message`]s of a conversation.

use common::operations::By;

use crate::domain::{chat::Participants, Message};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries all the [`Message`]s exchanged between [`Participants`], the
/// oldest first.
pub type Between = DatabaseQuery<By<Vec<Message>, Participants>>;

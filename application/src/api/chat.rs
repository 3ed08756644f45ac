//! Chat-related definitions.

use common::DateTime;
use derive_more::{AsRef, Display, From, Into};
use juniper::{graphql_object, GraphQLObject, GraphQLScalar};
use service::{command, domain, read};
use uuid::Uuid;

use crate::{
    api::{self, scalar},
    Context, Error,
};

/// Chat message sent from one `User` to another.
#[derive(Clone, Debug, From)]
pub struct Message(domain::Message);

impl Message {
    /// Returns the ID of the `User` the [`Message`] is addressed to.
    pub(crate) fn recipient_id(&self) -> api::user::Id {
        self.0.recipient_id.into()
    }
}

/// Chat message sent from one `User` to another.
#[graphql_object(context = Context, name = "ChatMessage")]
impl Message {
    /// Unique identifier of this `ChatMessage`.
    #[must_use]
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// `User` who sent this `ChatMessage`.
    #[must_use]
    pub fn sender(&self) -> api::User {
        api::User::new(self.0.sender_id)
    }

    /// `User` this `ChatMessage` is addressed to.
    #[must_use]
    pub fn recipient(&self) -> api::User {
        api::User::new(self.0.recipient_id)
    }

    /// Indicator whether this `ChatMessage` is sent by the authenticated
    /// `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "ChatMessage.fromSelf",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn from_self(&self, ctx: &Context) -> Result<bool, Error> {
        let my_id = ctx.current_session().await?.user_id;
        Ok(api::user::Id::from(self.0.sender_id) == my_id)
    }

    /// Text of this `ChatMessage`.
    #[must_use]
    pub fn message(&self) -> Text {
        self.0.text.clone().into()
    }

    /// Indicator whether this `ChatMessage` is read by its recipient.
    #[must_use]
    pub fn is_read(&self) -> bool {
        self.0.is_read
    }

    /// `DateTime` when this `ChatMessage` was sent.
    #[must_use]
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }
}

/// Conversation with a partner, represented by its latest `ChatMessage`.
#[derive(Clone, Debug, From)]
pub struct Conversation(read::chat::Conversation);

/// Conversation with a partner, represented by its latest `ChatMessage`.
#[graphql_object(context = Context, name = "ChatConversation")]
impl Conversation {
    /// ID of the conversation partner.
    #[must_use]
    pub fn partner_id(&self) -> api::user::Id {
        self.0.partner_id.into()
    }

    /// Profile of the conversation partner.
    ///
    /// Absent if the partner is not a counterpart of the authenticated
    /// `User`.
    #[must_use]
    pub fn partner(&self) -> Option<api::user::Profile> {
        self.0.partner.clone().map(Into::into)
    }

    /// Latest `ChatMessage` of this conversation.
    #[must_use]
    pub fn last_message(&self) -> Message {
        self.0.last_message.clone().into()
    }
}

/// Result of opening a conversation.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(context = Context, name = "CreateChatResult")]
pub struct CreateResult {
    /// Latest `ChatMessage` of the conversation.
    pub message: Message,

    /// Indicator whether the conversation has been opened just now.
    pub is_created: bool,
}

impl From<command::create_chat::Output> for CreateResult {
    fn from(output: command::create_chat::Output) -> Self {
        let command::create_chat::Output {
            message,
            is_created,
        } = output;
        Self {
            message: message.into(),
            is_created,
        }
    }
}

/// Unique identifier of a `ChatMessage`.
#[derive(Clone, Copy, Debug, Display, From, GraphQLScalar, Into)]
#[from(domain::chat::Id)]
#[into(domain::chat::Id)]
#[graphql(name = "ChatMessageId", transparent)]
pub struct Id(Uuid);

/// Text of a `ChatMessage`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(name = "ChatText", with = scalar::Via::<domain::chat::Text>)]
pub struct Text(domain::chat::Text);

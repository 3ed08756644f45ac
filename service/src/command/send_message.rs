//! [`Command`] for sending a chat [`Message`].

use std::collections::HashMap;

use common::{
    operations::{By, Insert, Select},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{chat, user, Message, User},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for sending a chat [`Message`] to another [`User`].
///
/// The sent [`Message`] is published to live subscribers.
#[derive(Clone, Debug)]
pub struct SendMessage {
    /// ID of the [`User`] sending the [`Message`].
    pub sender_id: user::Id,

    /// ID of the [`User`] the [`Message`] is addressed to.
    pub recipient_id: user::Id,

    /// [`chat::Text`] of the [`Message`].
    pub text: chat::Text,
}

impl<Db> Command<SendMessage> for Service<Db>
where
    Db: Database<
            Select<By<HashMap<user::Id, User>, [user::Id; 2]>>,
            Ok = HashMap<user::Id, User>,
            Err = Traced<database::Error>,
        > + Database<Insert<Message>, Err = Traced<database::Error>>,
{
    type Ok = Message;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: SendMessage) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let SendMessage {
            sender_id,
            recipient_id,
            text,
        } = cmd;

        let users = self
            .database()
            .execute(Select(By::new([sender_id, recipient_id])))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        let sender = users
            .get(&sender_id)
            .ok_or(E::UserNotExists(sender_id))
            .map_err(tracerr::wrap!())?;
        users
            .get(&recipient_id)
            .filter(|r| r.role == sender.role.opposite())
            .ok_or(E::RecipientNotExists(recipient_id))
            .map_err(tracerr::wrap!())?;

        let message = Message {
            id: chat::Id::new(),
            sender_id,
            recipient_id,
            text,
            is_read: false,
            created_at: DateTime::now().coerce(),
        };
        self.database()
            .execute(Insert(message.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        self.publish_message(message.clone());

        Ok(message)
    }
}

/// Error of [`SendMessage`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Recipient [`User`] does not exist among the sender's counterparts.
    #[display("Recipient `User(id: {_0})` does not exist")]
    RecipientNotExists(#[error(not(source))] user::Id),

    /// Sending [`User`] does not exist.
    #[display("`User(id: {_0})` does not exist")]
    UserNotExists(#[error(not(source))] user::Id),
}

#[cfg(test)]
mod spec {
    use crate::{
        domain::{chat, user::Role},
        test_util, Command as _,
    };

    use super::{ExecutionError, SendMessage};

    #[tokio::test]
    async fn publishes_sent_message() {
        let service = test_util::service();
        let owner = test_util::user(&service, Role::Owner, "Olivia").await;
        let tenant = test_util::user(&service, Role::Tenant, "Tom").await;
        let mut feed = service.subscribe_messages();

        let sent = service
            .execute(SendMessage {
                sender_id: tenant.id,
                recipient_id: owner.id,
                text: chat::Text::new("Is the flat still available?").unwrap(),
            })
            .await
            .unwrap();

        assert!(!sent.is_read);
        let published = feed.recv().await.unwrap();
        assert_eq!(published.id, sent.id);
        assert_eq!(published.recipient_id, owner.id);
    }

    #[tokio::test]
    async fn requires_existing_recipient() {
        let service = test_util::service();
        let tenant = test_util::user(&service, Role::Tenant, "Tom").await;
        let ghost = crate::domain::user::Id::new();

        let err = service
            .execute(SendMessage {
                sender_id: tenant.id,
                recipient_id: ghost,
                text: chat::Text::new("Hello?").unwrap(),
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::RecipientNotExists(id) if *id == ghost,
        ));
    }
}

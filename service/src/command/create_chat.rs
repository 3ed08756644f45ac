//! [`Command`] for opening a chat between two [`User`]s.

use std::collections::HashMap;

use common::{
    operations::{By, Insert, Select},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        chat::{self, Participants},
        user, Message, User,
    },
    infra::{database, Database},
    read::chat::Latest,
    Service,
};

use super::Command;

/// [`Command`] for opening a chat between two [`User`]s.
///
/// Returns the latest [`Message`] of the conversation if there is one,
/// otherwise the initiator greets the partner.
#[derive(Clone, Copy, Debug)]
pub struct CreateChat {
    /// ID of the [`User`] opening the chat.
    pub initiator_id: user::Id,

    /// ID of the [`User`] to chat with.
    pub partner_id: user::Id,
}

/// Outcome of a [`CreateChat`] [`Command`].
#[derive(Clone, Debug)]
pub struct Output {
    /// Latest [`Message`] of the conversation.
    pub message: Message,

    /// Indicator whether the conversation has been opened just now.
    pub is_created: bool,
}

impl<Db> Command<CreateChat> for Service<Db>
where
    Db: Database<
            Select<By<HashMap<user::Id, User>, [user::Id; 2]>>,
            Ok = HashMap<user::Id, User>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Latest>, Participants>>,
            Ok = Option<Latest>,
            Err = Traced<database::Error>,
        > + Database<Insert<Message>, Err = Traced<database::Error>>,
{
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateChat) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateChat {
            initiator_id,
            partner_id,
        } = cmd;

        let users = self
            .database()
            .execute(Select(By::new([initiator_id, partner_id])))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        let initiator = users
            .get(&initiator_id)
            .ok_or(E::UserNotExists(initiator_id))
            .map_err(tracerr::wrap!())?;
        users
            .get(&partner_id)
            .filter(|p| p.role == initiator.role.opposite())
            .ok_or(E::PartnerNotExists(partner_id))
            .map_err(tracerr::wrap!())?;

        if let Some(Latest(message)) = self
            .database()
            .execute(Select(By::new(Participants::new(initiator_id, partner_id))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
        {
            return Ok(Output {
                message,
                is_created: false,
            });
        }

        let message = Message {
            id: chat::Id::new(),
            sender_id: initiator_id,
            recipient_id: partner_id,
            text: chat::Text::greeting(),
            is_read: false,
            created_at: DateTime::now().coerce(),
        };
        self.database()
            .execute(Insert(message.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        self.publish_message(message.clone());

        Ok(Output {
            message,
            is_created: true,
        })
    }
}

/// Error of [`CreateChat`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Partner [`User`] does not exist among the initiator's counterparts.
    #[display("Chat partner `User(id: {_0})` does not exist")]
    PartnerNotExists(#[error(not(source))] user::Id),

    /// Initiating [`User`] does not exist.
    #[display("`User(id: {_0})` does not exist")]
    UserNotExists(#[error(not(source))] user::Id),
}

#[cfg(test)]
mod spec {
    use crate::{domain::user::Role, test_util, Command as _};

    use super::{CreateChat, ExecutionError};

    #[tokio::test]
    async fn greets_once_then_returns_latest() {
        let service = test_util::service();
        let owner = test_util::user(&service, Role::Owner, "Olivia").await;
        let tenant = test_util::user(&service, Role::Tenant, "Tom").await;
        let mut feed = service.subscribe_messages();

        let created = service
            .execute(CreateChat {
                initiator_id: owner.id,
                partner_id: tenant.id,
            })
            .await
            .unwrap();
        assert!(created.is_created);
        assert_eq!(created.message.text.to_string(), "Hi");
        assert_eq!(created.message.sender_id, owner.id);
        assert_eq!(feed.recv().await.unwrap().id, created.message.id);

        let reopened = service
            .execute(CreateChat {
                initiator_id: tenant.id,
                partner_id: owner.id,
            })
            .await
            .unwrap();
        assert!(!reopened.is_created);
        assert_eq!(reopened.message.id, created.message.id);
    }

    #[tokio::test]
    async fn requires_counterpart_partner() {
        let service = test_util::service();
        let owner = test_util::user(&service, Role::Owner, "Olivia").await;
        let other = test_util::user(&service, Role::Owner, "Oscar").await;

        let err = service
            .execute(CreateChat {
                initiator_id: owner.id,
                partner_id: other.id,
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::PartnerNotExists(id) if *id == other.id,
        ));
    }
}

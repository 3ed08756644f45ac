//! [`Command`] for marking chat [`Message`]s as read.

use common::operations::Update;
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{chat::MarkRead, user},
    infra::{database, Database},
    Service,
};
#[cfg(doc)]
use crate::domain::{Message, User};

use super::Command;

/// [`Command`] for marking all the unread [`Message`]s sent by a partner to a
/// reader as read.
#[derive(Clone, Copy, Debug)]
pub struct MarkMessagesRead {
    /// ID of the [`User`] who has read the [`Message`]s.
    pub reader_id: user::Id,

    /// ID of the [`User`] who has sent the [`Message`]s.
    pub partner_id: user::Id,
}

impl<Db> Command<MarkMessagesRead> for Service<Db>
where
    Db: Database<Update<MarkRead>, Ok = u64, Err = Traced<database::Error>>,
{
    /// Number of [`Message`]s marked as read.
    type Ok = u64;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: MarkMessagesRead,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let MarkMessagesRead {
            reader_id,
            partner_id,
        } = cmd;

        self.database()
            .execute(Update(MarkRead {
                reader_id,
                partner_id,
            }))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
    }
}

/// Error of [`MarkMessagesRead`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),
}

#[cfg(test)]
mod spec {
    use crate::{
        command::SendMessage,
        domain::{chat, user::Role},
        test_util, Command as _,
    };

    use super::MarkMessagesRead;

    #[tokio::test]
    async fn marks_only_partner_messages() {
        let service = test_util::service();
        let owner = test_util::user(&service, Role::Owner, "Olivia").await;
        let tenant = test_util::user(&service, Role::Tenant, "Tom").await;
        for (from, to, text) in [
            (tenant.id, owner.id, "Hello"),
            (tenant.id, owner.id, "Are you there?"),
            (owner.id, tenant.id, "Yes"),
        ] {
            drop(
                service
                    .execute(SendMessage {
                        sender_id: from,
                        recipient_id: to,
                        text: chat::Text::new(text).unwrap(),
                    })
                    .await
                    .unwrap(),
            );
        }

        let marked = service
            .execute(MarkMessagesRead {
                reader_id: owner.id,
                partner_id: tenant.id,
            })
            .await
            .unwrap();
        assert_eq!(marked, 2);

        let marked = service
            .execute(MarkMessagesRead {
                reader_id: owner.id,
                partner_id: tenant.id,
            })
            .await
            .unwrap();
        assert_eq!(marked, 0);
    }
}

//! [`Chats`] definition.

use std::collections::HashMap;

use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    domain::{
        user::{self, Role},
        User,
    },
    infra::{database, Database},
    read::chat::{Conversation, Latest},
    Query, Service,
};
#[cfg(doc)]
use crate::domain::Message;

/// [`Query`] listing the conversations of a [`User`], one per partner, the
/// most recently active first.
#[derive(Clone, Copy, Debug)]
pub struct Chats {
    /// ID of the [`User`] listing its conversations.
    pub user_id: user::Id,

    /// [`Role`] the [`User`] acts in.
    ///
    /// Only partners of the opposite [`Role`] are given a [`user::Profile`].
    pub role: Role,
}

impl<Db> Query<Chats> for Service<Db>
where
    Db: Database<
            Select<By<Vec<Latest>, user::Id>>,
            Ok = Vec<Latest>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<HashMap<user::Id, User>, Vec<user::Id>>>,
            Ok = HashMap<user::Id, User>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Vec<Conversation>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Chats { user_id, role }: Chats,
    ) -> Result<Self::Ok, Self::Err> {
        let latest = self
            .database()
            .execute(Select(By::<Vec<Latest>, _>::new(user_id)))
            .await
            .map_err(tracerr::wrap!())?;

        let partner_ids = latest
            .iter()
            .filter_map(|Latest(m)| m.participants().partner_of(user_id))
            .collect::<Vec<_>>();
        let partners = self
            .database()
            .execute(Select(By::<HashMap<user::Id, User>, _>::new(partner_ids)))
            .await
            .map_err(tracerr::wrap!())?;

        Ok(latest
            .into_iter()
            .filter_map(|Latest(last_message)| {
                let partner_id =
                    last_message.participants().partner_of(user_id)?;
                let partner = partners
                    .get(&partner_id)
                    .filter(|p| p.role == role.opposite())
                    .map(User::profile);
                Some(Conversation {
                    partner_id,
                    partner,
                    last_message,
                })
            })
            .collect())
    }
}

#[cfg(test)]
mod spec {
    use crate::{
        command::SendMessage,
        domain::{chat, user::Role},
        test_util, Command as _, Query as _,
    };

    use super::Chats;

    #[tokio::test]
    async fn lists_latest_message_per_partner() {
        let service = test_util::service();
        let owner = test_util::user(&service, Role::Owner, "Olivia").await;
        let tom = test_util::user(&service, Role::Tenant, "Tom").await;
        let tina = test_util::user(&service, Role::Tenant, "Tina").await;
        for (from, to, text) in [
            (owner.id, tom.id, "first"),
            (tom.id, owner.id, "second"),
            (tina.id, owner.id, "hello from Tina"),
            (owner.id, tom.id, "third"),
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
            // Keep creation timestamps distinct.
            tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        }

        let chats = service
            .execute(Chats {
                user_id: owner.id,
                role: Role::Owner,
            })
            .await
            .unwrap();

        assert_eq!(chats.len(), 2);
        assert_eq!(chats[0].partner_id, tom.id);
        assert_eq!(chats[0].last_message.text.to_string(), "third");
        assert_eq!(
            chats[0].partner.as_ref().unwrap().first_name.to_string(),
            "Tom",
        );
        assert_eq!(chats[1].partner_id, tina.id);
        assert_eq!(
            chats[1].last_message.text.to_string(),
            "hello from Tina",
        );
    }

    #[tokio::test]
    async fn omits_profile_of_non_counterpart() {
        let service = test_util::service();
        let tenant = test_util::user(&service, Role::Tenant, "Tom").await;
        let owner = test_util::user(&service, Role::Owner, "Olivia").await;
        drop(
            service
                .execute(SendMessage {
                    sender_id: owner.id,
                    recipient_id: tenant.id,
                    text: chat::Text::new("Welcome").unwrap(),
                })
                .await
                .unwrap(),
        );

        // Listing as an owner, the owner partner has no counterpart profile.
        let chats = service
            .execute(Chats {
                user_id: tenant.id,
                role: Role::Owner,
            })
            .await
            .unwrap();

        assert_eq!(chats.len(), 1);
        assert!(chats[0].partner.is_none());
    }
}

//! [`Command`] for authorizing a [`User`].

use common::operations::{By, Select};
use derive_more::{Display, Error, From};
use jsonwebtoken::{DecodingKey, Validation};
use tracerr::Traced;

use crate::{
    domain::{
        user::{self, session, Role, Session},
        User,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for authorizing a [`User`].
///
/// The [`Role`] of the [`Session`] is determined by the key the
/// [`session::Token`] is signed with.
#[derive(Clone, Debug, From)]
pub struct AuthorizeUserSession {
    /// [`Session`] token to authorize.
    pub token: session::Token,
}

/// Decodes [`session::Claims`] of the provided [`session::Token`] with the
/// given [`DecodingKey`].
fn decode(
    token: &session::Token,
    key: &DecodingKey,
) -> Result<session::Claims, jsonwebtoken::errors::Error> {
    jsonwebtoken::decode::<session::Claims>(
        token.as_ref(),
        key,
        &Validation::default(),
    )
    .map(|data| data.claims)
}

impl<Db> Command<AuthorizeUserSession> for Service<Db>
where
    Db: Database<
        Select<By<Option<User>, user::Id>>,
        Ok = Option<User>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Session;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: AuthorizeUserSession,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let AuthorizeUserSession { token } = cmd;

        let (claims, role) =
            match decode(&token, &self.config.owner_jwt_decoding_key) {
                Ok(claims) => (claims, Role::Owner),
                Err(_) => (
                    decode(&token, &self.config.tenant_jwt_decoding_key)
                        .map_err(tracerr::from_and_wrap!(=> E))?,
                    Role::Tenant,
                ),
            };

        let user = self
            .database()
            .execute(Select(By::new(claims.user_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::UserNotExists(claims.user_id))
            .map_err(tracerr::wrap!())?;
        if user.role != role {
            return Err(tracerr::new!(E::UserNotExists(user.id)));
        }

        Ok(Session {
            user_id: user.id,
            role,
            expires_at: claims.expires_at,
        })
    }
}

/// Error of [`AuthorizeUserSession`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`jsonwebtoken`] decoding error.
    #[display("Failed to decode a JSON Web Token: {_0}")]
    JsonWebTokenDecodeError(jsonwebtoken::errors::Error),

    /// [`User`] the [`Session`] belongs to does not exist in the [`Role`] the
    /// token was issued for.
    #[display("`User(id: {_0})` does not exist")]
    #[from(ignore)]
    UserNotExists(#[error(not(source))] user::Id),
}

#[cfg(test)]
mod spec {
    use crate::{
        domain::user::{self, Role},
        test_util, Command as _,
    };

    use super::{AuthorizeUserSession, ExecutionError};

    #[tokio::test]
    async fn resolves_role_by_signing_key() {
        let service = test_util::service();
        let owner = test_util::user(&service, Role::Owner, "Olivia").await;
        let tenant = test_util::user(&service, Role::Tenant, "Tom").await;

        let session = service
            .execute(AuthorizeUserSession {
                token: test_util::token(owner.id, test_util::OWNER_SECRET),
            })
            .await
            .unwrap();
        assert_eq!(session.user_id, owner.id);
        assert_eq!(session.role, Role::Owner);

        let session = service
            .execute(AuthorizeUserSession {
                token: test_util::token(tenant.id, test_util::TENANT_SECRET),
            })
            .await
            .unwrap();
        assert_eq!(session.user_id, tenant.id);
        assert_eq!(session.role, Role::Tenant);
    }

    #[tokio::test]
    async fn rejects_token_of_foreign_role() {
        let service = test_util::service();
        let tenant = test_util::user(&service, Role::Tenant, "Tom").await;

        let err = service
            .execute(AuthorizeUserSession {
                token: test_util::token(tenant.id, test_util::OWNER_SECRET),
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::UserNotExists(id) if *id == tenant.id,
        ));
    }

    #[tokio::test]
    async fn rejects_unknown_signature() {
        let service = test_util::service();
        let owner = test_util::user(&service, Role::Owner, "Olivia").await;

        let err = service
            .execute(AuthorizeUserSession {
                token: test_util::token(owner.id, b"unknown-secret"),
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::JsonWebTokenDecodeError(_),
        ));
    }

    #[tokio::test]
    async fn rejects_missing_user() {
        let service = test_util::service();
        let id = user::Id::new();

        let err = service
            .execute(AuthorizeUserSession {
                token: test_util::token(id, test_util::OWNER_SECRET),
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::UserNotExists(_)));
    }
}

//! [`User`]-related definitions.

use common::DateTime;
use derive_more::{AsRef, Display, From, Into};
use futures::{future, TryFutureExt as _};
use juniper::{graphql_object, GraphQLEnum, GraphQLObject, GraphQLScalar};
use service::{domain, query, Query as _};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{
    api::{self, scalar},
    define_error, AsError, Context, Error,
};

/// A [`User`] of the platform.
#[derive(Clone, Debug)]
pub struct User {
    /// ID of this [`User`].
    pub id: Id,

    /// [`domain::User`] representing this [`User`].
    user: OnceCell<domain::User>,
}

impl From<domain::User> for User {
    fn from(user: domain::User) -> Self {
        Self {
            id: user.id.into(),
            user: OnceCell::new_with(Some(user)),
        }
    }
}

impl User {
    /// Creates a new [`User`] referenced by the provided ID.
    ///
    /// [`domain::User`] is loaded on the first access, failing with
    /// `USER_NOT_EXISTS` code if it doesn't exist.
    #[must_use]
    pub fn new(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            user: OnceCell::new(),
        }
    }

    /// Returns the [`domain::User`] representing this [`User`].
    ///
    /// # Errors
    ///
    /// Error if the [`domain::User`] doesn't exist.
    async fn user(&self, ctx: &Context) -> Result<&domain::User, Error> {
        let id = self.id.into();
        self.user
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::user::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|u| {
                        future::ready(
                            u.ok_or_else(|| UserError::NotExists.into())
                                .map_err(ctx.error()),
                        )
                    })
            })
            .await
    }
}

/// A `User` of the platform.
#[graphql_object(context = Context)]
impl User {
    /// Unique identifier of this `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "User.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Role of this `User` on the platform.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "User.role",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn role(&self, ctx: &Context) -> Result<Role, Error> {
        Ok(self.user(ctx).await?.role.into())
    }

    /// First name of this `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "User.firstName",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn first_name(&self, ctx: &Context) -> Result<Name, Error> {
        Ok(self.user(ctx).await?.first_name.clone().into())
    }

    /// Last name of this `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "User.lastName",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn last_name(&self, ctx: &Context) -> Result<Name, Error> {
        Ok(self.user(ctx).await?.last_name.clone().into())
    }

    /// Email of this `User`.
    ///
    /// Visible to the `User` itself only.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "User.email",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn email(&self, ctx: &Context) -> Result<Option<Email>, Error> {
        let my_id = ctx.current_session().await?.user_id;
        if my_id != self.id {
            return Ok(None);
        }
        Ok(Some(self.user(ctx).await?.email.clone().into()))
    }

    /// URL of the profile image of this `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "User.profileImage",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn profile_image(
        &self,
        ctx: &Context,
    ) -> Result<Option<String>, Error> {
        Ok(self
            .user(ctx)
            .await?
            .profile_image
            .as_ref()
            .map(ToString::to_string))
    }

    /// URL-friendly handle of this `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "User.slug",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn slug(&self, ctx: &Context) -> Result<Slug, Error> {
        Ok(self.user(ctx).await?.slug.clone().into())
    }

    /// `DateTime` when this `User` was created.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "User.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.user(ctx).await?.created_at.coerce())
    }
}

/// Public profile of a `User`.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(name = "UserProfile")]
pub struct Profile {
    /// Unique identifier of the `User`.
    pub id: Id,

    /// First name of the `User`.
    pub first_name: Name,

    /// Last name of the `User`.
    pub last_name: Name,

    /// URL of the profile image of the `User`.
    pub profile_image: Option<String>,

    /// URL-friendly handle of the `User`.
    pub slug: Slug,
}

impl From<domain::user::Profile> for Profile {
    fn from(profile: domain::user::Profile) -> Self {
        let domain::user::Profile {
            id,
            first_name,
            last_name,
            profile_image,
            slug,
        } = profile;
        Self {
            id: id.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            profile_image: profile_image.map(|i| i.to_string()),
            slug: slug.into(),
        }
    }
}

/// Role of a `User` on the platform.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "UserRole")]
pub enum Role {
    /// `User` listing and renting out properties.
    Owner,

    /// `User` renting properties.
    Tenant,
}

impl From<domain::user::Role> for Role {
    fn from(role: domain::user::Role) -> Self {
        use domain::user::Role as R;

        match role {
            R::Owner => Self::Owner,
            R::Tenant => Self::Tenant,
        }
    }
}

/// Unique identifier of a `User`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::user::Id)]
#[into(domain::user::Id)]
#[graphql(name = "UserId", transparent)]
pub struct Id(Uuid);

/// First or last name of a `User`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(name = "UserName", with = scalar::Via::<domain::user::Name>)]
pub struct Name(domain::user::Name);

/// Email address of a `User`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(name = "UserEmail", with = scalar::Via::<domain::user::Email>)]
pub struct Email(domain::user::Email);

/// URL-friendly handle of a `User`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(name = "UserSlug", with = scalar::Via::<domain::user::Slug>)]
pub struct Slug(domain::user::Slug);

define_error! {
    enum UserError {
        #[code = "USER_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`User` with the specified ID does not exist"]
        NotExists,
    }
}

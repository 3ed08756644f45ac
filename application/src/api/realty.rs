//! [`Realty`]-related definitions.

use common::{DateTime, Money};
use derive_more::{AsRef, Display, From, Into};
use futures::{future, TryFutureExt as _};
use juniper::{graphql_object, GraphQLScalar};
use service::{domain, query, Query as _};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{api, api::scalar, define_error, AsError, Context, Error};

/// A real estate listed by an owner.
#[derive(Clone, Debug)]
pub struct Realty {
    /// ID of this [`Realty`].
    id: Id,

    /// Underlying [`domain::Realty`].
    realty: OnceCell<domain::Realty>,
}

impl From<domain::Realty> for Realty {
    fn from(realty: domain::Realty) -> Self {
        Self {
            id: realty.id.into(),
            realty: OnceCell::new_with(Some(realty)),
        }
    }
}

impl Realty {
    /// Creates a new [`Realty`] referenced by the provided ID.
    ///
    /// [`domain::Realty`] is loaded on the first access, failing with
    /// `REALTY_NOT_EXISTS` code if it doesn't exist.
    #[must_use]
    pub fn new(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            realty: OnceCell::new(),
        }
    }

    /// Returns the underlying [`domain::Realty`].
    ///
    /// # Errors
    ///
    /// Errors if the [`domain::Realty`] doesn't exist.
    async fn realty(&self, ctx: &Context) -> Result<&domain::Realty, Error> {
        let id = self.id.into();
        self.realty
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::realty::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|r| {
                        future::ready(
                            r.ok_or_else(|| RealtyError::NotExists.into())
                                .map_err(ctx.error()),
                        )
                    })
            })
            .await
    }
}

/// A real estate listed by an owner.
#[graphql_object(context = Context)]
impl Realty {
    /// Unique identifier of this `Realty`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Realty.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Owner listing this `Realty`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Realty.owner",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn owner(&self, ctx: &Context) -> Result<api::User, Error> {
        Ok(api::User::new(self.realty(ctx).await?.owner_id))
    }

    /// Title of this `Realty`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Realty.title",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn title(&self, ctx: &Context) -> Result<Title, Error> {
        Ok(self.realty(ctx).await?.title.clone().into())
    }

    /// Monthly rent price of this `Realty`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Realty.price",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn price(&self, ctx: &Context) -> Result<Money, Error> {
        Ok(self.realty(ctx).await?.price)
    }

    /// Indicator whether this `Realty` is free of contracts.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Realty.isAvailable",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn is_available(&self, ctx: &Context) -> Result<bool, Error> {
        Ok(self.realty(ctx).await?.is_available)
    }

    /// `DateTime` when this `Realty` was created.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Realty.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.realty(ctx).await?.created_at.coerce())
    }
}

/// Unique identifier of a `Realty`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::realty::Id)]
#[into(domain::realty::Id)]
#[graphql(name = "RealtyId", transparent)]
pub struct Id(Uuid);

/// Title of a `Realty`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(name = "RealtyTitle", with = scalar::Via::<domain::realty::Title>)]
pub struct Title(domain::realty::Title);

define_error! {
    enum RealtyError {
        #[code = "REALTY_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Realty` with the specified ID does not exist"]
        NotExists,
    }
}

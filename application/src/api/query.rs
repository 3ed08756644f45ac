//! GraphQL [`Query`]s definitions.

use juniper::graphql_object;
use service::{
    domain::{self, chat::Participants, user::Role},
    query, read, Query as _,
};

use crate::{
    api::{self, contract::ContractError, rent_detail::RentDetailError},
    AsError, Context, Error, Session,
};

/// Root of all GraphQL queries.
#[derive(Clone, Copy, Debug)]
pub struct Query;

impl Query {
    /// Name of the [`tracing::Span`] for the queries.
    pub(crate) const SPAN_NAME: &'static str = "GraphQL query";
}

#[graphql_object(context = Context)]
impl Query {
    /// Returns the currently authenticated `User`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the request is not authorized.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "me",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn me(ctx: &Context) -> Result<api::User, Error> {
        let my_id = ctx.current_session().await?.user_id;
        Ok(api::User::new(my_id))
    }

    /// Lists the `RentDetail`s of the authenticated `User`, the newest first.
    ///
    /// Owners see the `RentDetail`s they collect rent by, tenants see the
    /// ones they pay rent by.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "rentDetails",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn rent_details(
        ctx: &Context,
    ) -> Result<api::rent_detail::List, Error> {
        let party = party(&ctx.current_session().await?);

        ctx.service()
            .execute(query::rent_details::ByParty::by(party))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .try_into()
            .map_err(AsError::into_error)
            .map_err(ctx.error())
    }

    /// Returns the `RentDetail` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `RENT_DETAIL_NOT_EXISTS` - the `RentDetail` with the specified ID
    ///                              does not exist, or the authenticated
    ///                              `User` is not its party.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "rentDetail",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn rent_detail(
        id: api::rent_detail::Id,
        ctx: &Context,
    ) -> Result<api::RentDetail, Error> {
        find_rent_detail(id, ctx).await.map(Into::into)
    }

    /// Fetches the page of the `PaymentHistory` of a `RentDetail`, the newest
    /// entries first.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_PAGINATION_ARGUMENTS` - `page` or `limit` is not positive;
    /// - `RENT_DETAIL_NOT_EXISTS` - the `RentDetail` with the specified ID
    ///                              does not exist, or the authenticated
    ///                              `User` is not its party.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "paymentHistory",
            limit = ?limit,
            otel.name = Self::SPAN_NAME,
            page = ?page,
            rent_detail_id = %rent_detail_id,
        ),
    )]
    pub async fn payment_history(
        rent_detail_id: api::rent_detail::Id,
        page: Option<i32>,
        limit: Option<i32>,
        ctx: &Context,
    ) -> Result<api::payment::Page, Error> {
        let positive = |n: Option<i32>| n.map(usize::try_from).transpose().ok();
        let arguments = positive(page)
            .zip(positive(limit))
            .and_then(|(page, limit)| {
                read::payment::list::Arguments::new(
                    page,
                    limit,
                    read::payment::list::DEFAULT_LIMIT,
                )
            })
            .ok_or_else(|| api::PaginationError::Invalid.into())
            .map_err(ctx.error())?;
        let rent_detail = find_rent_detail(rent_detail_id, ctx).await?;

        ctx.service()
            .execute(query::payments::List::by(read::payment::list::Selector {
                arguments,
                filter: read::payment::list::Filter {
                    rent_detail_id: rent_detail.id,
                },
            }))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Checks whether the rent of a `RentDetail` is paid for the provided
    /// billing period, or the current one if omitted.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_PERIOD` - the provided period doesn't start before it ends;
    /// - `RENT_DETAIL_NOT_EXISTS` - the `RentDetail` with the specified ID
    ///                              does not exist, or the authenticated
    ///                              `User` is not its party.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "isRentPaid",
            otel.name = Self::SPAN_NAME,
            period = ?period,
            rent_detail_id = %rent_detail_id,
        ),
    )]
    pub async fn is_rent_paid(
        rent_detail_id: api::rent_detail::Id,
        period: Option<api::plan::PeriodInput>,
        ctx: &Context,
    ) -> Result<bool, Error> {
        let period = period
            .map(api::plan::PeriodInput::validate)
            .transpose()
            .map_err(ctx.error())?;
        let rent_detail = find_rent_detail(rent_detail_id, ctx).await?;

        ctx.service()
            .execute(query::IsRentPaid {
                rent_detail_id: rent_detail.id,
                period,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
    }

    /// Lists the `Contract`s of the authenticated `User`, the newest first.
    ///
    /// Owners see the `Contract`s upon their `Realty`s, tenants see the
    /// `Realty`s they rent.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "contracts",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn contracts(ctx: &Context) -> Result<Vec<api::Contract>, Error> {
        let party = party(&ctx.current_session().await?);

        ctx.service()
            .execute(query::contracts::ByParty::by(party))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|c| c.into_iter().map(Into::into).collect())
    }

    /// Returns the `Contract` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CONTRACT_NOT_EXISTS` - the `Contract` with the specified ID does not
    ///                           exist, or the authenticated `User` is not
    ///                           its party.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "contract",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn contract(
        id: api::contract::Id,
        ctx: &Context,
    ) -> Result<api::Contract, Error> {
        let my_id = ctx.current_session().await?.user_id.into();

        ctx.service()
            .execute(query::contract::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .filter(|c| c.is_party(my_id))
            .ok_or_else(|| ContractError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Lists the conversations of the authenticated `User`, the most recently
    /// active first.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "chats",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn chats(ctx: &Context) -> Result<Vec<api::Conversation>, Error> {
        let Session { user_id, role, .. } = ctx.current_session().await?;

        ctx.service()
            .execute(query::Chats {
                user_id: user_id.into(),
                role,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|c| c.into_iter().map(Into::into).collect())
    }

    /// Lists the `ChatMessage`s exchanged between the authenticated `User`
    /// and the specified one, the oldest first.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "messages",
            otel.name = Self::SPAN_NAME,
            with = %with,
        ),
    )]
    pub async fn messages(
        with: api::user::Id,
        ctx: &Context,
    ) -> Result<Vec<api::Message>, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(query::messages::Between::by(Participants::new(
                my_id.into(),
                with.into(),
            )))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|m| m.into_iter().map(Into::into).collect())
    }
}

/// Returns the [`read::Party`] the provided [`Session`] acts as.
fn party(session: &Session) -> read::Party {
    let id = session.user_id.into();
    match session.role {
        Role::Owner => read::Party::Owner(id),
        Role::Tenant => read::Party::Tenant(id),
    }
}

/// Looks up the [`domain::RentDetail`] with the provided ID among the ones
/// of the authenticated `User`.
///
/// # Errors
///
/// With `RENT_DETAIL_NOT_EXISTS` code if the [`domain::RentDetail`] doesn't
/// exist, or the authenticated `User` is not its party.
async fn find_rent_detail(
    id: api::rent_detail::Id,
    ctx: &Context,
) -> Result<domain::RentDetail, Error> {
    let my_id = ctx.current_session().await?.user_id.into();

    ctx.service()
        .execute(query::rent_detail::ById::by(id.into()))
        .await
        .map_err(AsError::into_error)
        .map_err(ctx.error())?
        .filter(|d| d.is_party(my_id))
        .ok_or_else(|| RentDetailError::NotExists.into())
        .map_err(ctx.error())
}

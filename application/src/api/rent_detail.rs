//! [`RentDetail`]-related definitions.

use common::{Date, DateTime, Money};
use derive_more::{Display, From, Into};
use juniper::{graphql_object, GraphQLObject, GraphQLScalar};
use service::{domain, query, Query as _};
use uuid::Uuid;

use crate::{
    api::{self, plan},
    define_error, AsError, Context, Error,
};

/// Rent payment schedule of a tenancy.
#[derive(Clone, Debug, From)]
pub struct RentDetail(domain::RentDetail);

/// Rent payment schedule of a tenancy.
#[graphql_object(context = Context)]
impl RentDetail {
    /// Unique identifier of this `RentDetail`.
    #[must_use]
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// Owner collecting the rent.
    #[must_use]
    pub fn owner(&self) -> api::User {
        api::User::new(self.0.owner_id)
    }

    /// Tenant paying the rent.
    #[must_use]
    pub fn tenant(&self) -> api::User {
        api::User::new(self.0.tenant_id)
    }

    /// Rented `Realty`.
    #[must_use]
    pub fn realty(&self) -> api::Realty {
        api::Realty::new(self.0.realty_id)
    }

    /// Payment plan of this `RentDetail`.
    #[must_use]
    pub fn payment_plan(&self) -> String {
        self.0.payment_plan.to_string()
    }

    /// Billing period awaiting its payment.
    #[must_use]
    pub fn current_rent_date(&self) -> plan::Period {
        self.0.current_period.into()
    }

    /// Monthly rent of this `RentDetail`.
    #[must_use]
    pub fn monthly_rent(&self) -> Money {
        self.0.monthly_rent
    }

    /// Rent due for a single billing period.
    #[must_use]
    pub fn total_rent(&self) -> Money {
        self.0.total_rent()
    }

    /// `Date` the next payment is due on.
    #[must_use]
    pub fn next_due_date(&self) -> Date {
        self.0.next_due_date()
    }

    /// Indicator whether the current billing period is paid.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "RentDetail.rentStatus",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn rent_status(&self, ctx: &Context) -> Result<bool, Error> {
        ctx.service()
            .execute(query::IsRentPaid {
                rent_detail_id: self.0.id,
                period: Some(self.0.current_period),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
    }

    /// `DateTime` when this `RentDetail` was created.
    #[must_use]
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }
}

/// List of `RentDetail`s.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(context = Context, name = "RentDetailList")]
pub struct List {
    /// `RentDetail`s, the newest first.
    pub nodes: Vec<RentDetail>,

    /// Number of the listed `RentDetail`s.
    pub count: i32,
}

impl TryFrom<Vec<domain::RentDetail>> for List {
    type Error = std::num::TryFromIntError;

    fn try_from(details: Vec<domain::RentDetail>) -> Result<Self, Self::Error> {
        Ok(Self {
            count: details.len().try_into()?,
            nodes: details.into_iter().map(Into::into).collect(),
        })
    }
}

/// Unique identifier of a `RentDetail`.
#[derive(Clone, Copy, Debug, Display, From, GraphQLScalar, Into)]
#[from(domain::rent_detail::Id)]
#[into(domain::rent_detail::Id)]
#[graphql(name = "RentDetailId", transparent)]
pub struct Id(Uuid);

impl AsError for query::is_rent_paid::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::RentDetailNotExists(_) => {
                Some(RentDetailError::NotExists.into())
            }
        }
    }
}

define_error! {
    enum RentDetailError {
        #[code = "RENT_DETAIL_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`RentDetail` with the specified ID does not exist"]
        NotExists,
    }
}

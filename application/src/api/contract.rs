//! [`Contract`]-related definitions.

use common::{Date, DateTime, Money};
use derive_more::{Display, From, Into};
use juniper::{graphql_object, GraphQLEnum, GraphQLScalar};
use service::domain;
use uuid::Uuid;

use crate::{api, define_error, Context};

/// Rental contract between an owner and a tenant upon a `Realty`.
#[derive(Clone, Debug, From)]
pub struct Contract(domain::Contract);

/// Rental contract between an owner and a tenant upon a `Realty`.
#[graphql_object(context = Context)]
impl Contract {
    /// Unique identifier of this `Contract`.
    #[must_use]
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// Owner renting out the `Realty`.
    #[must_use]
    pub fn owner(&self) -> api::User {
        api::User::new(self.0.owner_id)
    }

    /// Tenant renting the `Realty`.
    #[must_use]
    pub fn tenant(&self) -> api::User {
        api::User::new(self.0.tenant_id)
    }

    /// `Realty` being rented.
    #[must_use]
    pub fn realty(&self) -> api::Realty {
        api::Realty::new(self.0.realty_id)
    }

    /// Monthly rent agreed in this `Contract`.
    #[must_use]
    pub fn rent_amount(&self) -> Money {
        self.0.rent_amount
    }

    /// Payment plan agreed in this `Contract`.
    #[must_use]
    pub fn payment_plan(&self) -> String {
        self.0.payment_plan.to_string()
    }

    /// `Date` the rent starts on.
    #[must_use]
    pub fn start_date(&self) -> Date {
        self.0.start_date
    }

    /// Status of this `Contract`.
    #[must_use]
    pub fn status(&self) -> Status {
        self.0.status.into()
    }

    /// `DateTime` when this `Contract` was created.
    #[must_use]
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }
}

/// Status of a `Contract`.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "ContractStatus")]
pub enum Status {
    /// `Contract` awaits the tenant's approval.
    Pending,

    /// `Contract` is approved by the tenant.
    Active,
}

impl From<domain::contract::Status> for Status {
    fn from(status: domain::contract::Status) -> Self {
        use domain::contract::Status as S;

        match status {
            S::Pending => Self::Pending,
            S::Active => Self::Active,
        }
    }
}

/// Unique identifier of a `Contract`.
#[derive(Clone, Copy, Debug, Display, From, GraphQLScalar, Into)]
#[from(domain::contract::Id)]
#[into(domain::contract::Id)]
#[graphql(name = "ContractId", transparent)]
pub struct Id(Uuid);

define_error! {
    enum ContractError {
        #[code = "CONTRACT_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Contract` with the specified ID does not exist"]
        NotExists,
    }
}

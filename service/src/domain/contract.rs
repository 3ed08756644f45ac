//! [`Contract`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, Date, DateTimeOf, Money, PaymentPlan};
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{realty, user};
#[cfg(doc)]
use crate::domain::{Realty, User};

/// Rental agreement between an owner and a tenant upon a [`Realty`].
#[derive(Clone, Debug)]
pub struct Contract {
    /// ID of this [`Contract`].
    pub id: Id,

    /// ID of the [`User`] renting out the [`Realty`].
    pub owner_id: user::Id,

    /// ID of the [`User`] renting the [`Realty`].
    pub tenant_id: user::Id,

    /// ID of the rented [`Realty`].
    pub realty_id: realty::Id,

    /// Agreed monthly rent.
    pub rent_amount: Money,

    /// Agreed [`PaymentPlan`].
    pub payment_plan: PaymentPlan,

    /// [`Date`] the rent starts at.
    pub start_date: Date,

    /// [`Status`] of this [`Contract`].
    pub status: Status,

    /// [`DateTime`] when this [`Contract`] was created.
    pub created_at: CreationDateTime,
}

impl Contract {
    /// Indicates whether the provided [`User`] is a party of this
    /// [`Contract`].
    #[must_use]
    pub fn is_party(&self, user_id: user::Id) -> bool {
        self.owner_id == user_id || self.tenant_id == user_id
    }
}

/// ID of a [`Contract`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

define_kind! {
    #[doc = "Status of a [`Contract`]."]
    enum Status {
        #[doc = "[`Contract`] awaits the tenant's approval."]
        Pending = 1,

        #[doc = "[`Contract`] is approved by the tenant."]
        Active = 2,
    }
}

/// [`DateTime`] when a [`Contract`] was created.
pub type CreationDateTime = DateTimeOf<(Contract, unit::Creation)>;

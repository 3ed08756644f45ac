//! [`RentDetail`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{unit, Date, DateTimeOf, Money, PaymentPlan, Period};
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{realty, user};
#[cfg(doc)]
use crate::domain::{Realty, User};

/// Rent-payment schedule of a tenancy.
///
/// Exactly one [`RentDetail`] may exist per [`Realty`].
#[derive(Clone, Debug)]
pub struct RentDetail {
    /// ID of this [`RentDetail`].
    pub id: Id,

    /// ID of the [`User`] renting out the [`Realty`].
    pub owner_id: user::Id,

    /// ID of the [`User`] renting the [`Realty`].
    pub tenant_id: user::Id,

    /// ID of the rented [`Realty`].
    pub realty_id: realty::Id,

    /// [`PaymentPlan`] the rent is paid by.
    pub payment_plan: PaymentPlan,

    /// Billing [`Period`] the next payment covers.
    pub current_period: Period,

    /// Rent for a single month.
    pub monthly_rent: Money,

    /// [`DateTime`] when this [`RentDetail`] was created.
    pub created_at: CreationDateTime,
}

impl RentDetail {
    /// Returns the amount due for a single [`Period`].
    #[must_use]
    pub fn total_rent(&self) -> Money {
        self.payment_plan.total_rent(self.monthly_rent)
    }

    /// Returns the [`Date`] the next [`Period`] starts at.
    #[must_use]
    pub fn next_due_date(&self) -> Date {
        self.current_period.to().next_day()
    }

    /// Returns the [`Period`] following the current one, if the calendar
    /// allows it.
    #[must_use]
    pub fn next_period(&self) -> Option<Period> {
        self.current_period.next(self.payment_plan)
    }

    /// Indicates whether the provided [`User`] is a party of this
    /// [`RentDetail`].
    #[must_use]
    pub fn is_party(&self, user_id: user::Id) -> bool {
        self.owner_id == user_id || self.tenant_id == user_id
    }
}

/// Conditional advance of a [`RentDetail::current_period`].
///
/// Applies only if the stored [`Period`] still equals the `expected` one.
#[derive(Clone, Copy, Debug)]
pub struct PeriodAdvance {
    /// ID of the [`RentDetail`] to advance.
    pub rent_detail_id: Id,

    /// [`Period`] the [`RentDetail`] is expected to be at.
    pub expected: Period,

    /// [`Period`] to advance the [`RentDetail`] to.
    pub next: Period,
}

/// ID of a [`RentDetail`].
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

/// [`DateTime`] when a [`RentDetail`] was created.
pub type CreationDateTime = DateTimeOf<(RentDetail, unit::Creation)>;

//! [`Payment`]-related definitions.

use common::{DateTime, Money};
use derive_more::{AsRef, Display, From, Into};
use juniper::{graphql_object, GraphQLObject, GraphQLScalar};
use service::{domain, read};
use uuid::Uuid;

use crate::{
    api::{plan, rent_detail, scalar},
    Context,
};

/// Entry of a rent payment history.
#[derive(Clone, Debug, From)]
pub struct Payment(domain::Payment);

/// Entry of a rent payment history.
#[graphql_object(context = Context, name = "PaymentHistory")]
impl Payment {
    /// Unique identifier of this `PaymentHistory` entry.
    #[must_use]
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// ID of the paid `RentDetail`.
    #[must_use]
    pub fn rent_detail_id(&self) -> rent_detail::Id {
        self.0.rent_detail_id.into()
    }

    /// Billing period this `PaymentHistory` entry pays for.
    #[must_use]
    pub fn current_rent_date(&self) -> plan::Period {
        self.0.period.into()
    }

    /// Paid amount.
    #[must_use]
    pub fn amount_paid(&self) -> Money {
        self.0.amount_paid
    }

    /// Method the rent was paid with.
    #[must_use]
    pub fn payment_method(&self) -> Method {
        self.0.method.clone().into()
    }

    /// `DateTime` when this `PaymentHistory` entry was registered.
    #[must_use]
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }
}

/// Page of a rent payment history.
#[derive(Clone, Debug, From)]
pub struct Page(read::payment::list::Page);

/// Page of a rent payment history.
#[graphql_object(context = Context, name = "PaymentHistoryPage")]
impl Page {
    /// `PaymentHistory` entries on this page, the newest first.
    #[must_use]
    pub fn items(&self) -> Vec<Payment> {
        self.0.items.iter().cloned().map(Into::into).collect()
    }

    /// 1-based number of this page.
    #[must_use]
    pub fn page(&self) -> i32 {
        saturate(self.0.arguments.page())
    }

    /// Maximum number of entries on a page.
    #[must_use]
    pub fn limit(&self) -> i32 {
        saturate(self.0.arguments.limit())
    }

    /// Total number of `PaymentHistory` entries.
    #[must_use]
    pub fn total_count(&self) -> i32 {
        saturate(self.0.total_count)
    }

    /// Total number of pages.
    #[must_use]
    pub fn number_of_pages(&self) -> i32 {
        saturate(self.0.number_of_pages())
    }

    /// Indicator whether a page follows this one.
    #[must_use]
    pub fn has_next_page(&self) -> bool {
        self.0.has_next_page()
    }
}

/// Converts the provided [`usize`] into a GraphQL `Int`, saturating at
/// [`i32::MAX`].
fn saturate(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

/// Result of a `PaymentHistory` entry registration.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(context = Context, name = "CreatePaymentHistoryResult")]
pub struct CreateResult {
    /// Registered `PaymentHistory` entry.
    pub payment: Payment,

    /// `RentDetail` advanced to its next billing period.
    pub rent_detail: rent_detail::RentDetail,
}

impl From<(domain::Payment, domain::RentDetail)> for CreateResult {
    fn from((payment, rent_detail): (domain::Payment, domain::RentDetail)) -> Self {
        Self {
            payment: payment.into(),
            rent_detail: rent_detail.into(),
        }
    }
}

/// Unique identifier of a `PaymentHistory` entry.
#[derive(Clone, Copy, Debug, Display, From, GraphQLScalar, Into)]
#[from(domain::payment::Id)]
#[into(domain::payment::Id)]
#[graphql(name = "PaymentHistoryId", transparent)]
pub struct Id(Uuid);

/// Method a rent is paid with.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "PaymentMethod",
    with = scalar::Via::<domain::payment::Method>,
)]
pub struct Method(domain::payment::Method);

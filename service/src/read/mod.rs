//! Read entities definitions.

pub mod chat;
pub mod payment;

use crate::domain::user;
#[cfg(doc)]
use crate::domain::{Contract, RentDetail, User};

/// Party of a tenancy to select [`Contract`]s or [`RentDetail`]s of.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Party {
    /// [`User`] renting out.
    Owner(user::Id),

    /// [`User`] renting.
    Tenant(user::Id),
}

impl Party {
    /// Indicates whether this [`Party`] takes part in a tenancy between the
    /// provided owner and tenant.
    #[must_use]
    pub fn matches(&self, owner_id: user::Id, tenant_id: user::Id) -> bool {
        match *self {
            Self::Owner(id) => id == owner_id,
            Self::Tenant(id) => id == tenant_id,
        }
    }
}

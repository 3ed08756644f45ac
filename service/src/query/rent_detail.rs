//! [`Query`] collection related to a single [`RentDetail`].

use common::operations::By;

use crate::domain::{rent_detail, RentDetail};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`RentDetail`] by its [`rent_detail::Id`].
pub type ById = DatabaseQuery<By<Option<RentDetail>, rent_detail::Id>>;

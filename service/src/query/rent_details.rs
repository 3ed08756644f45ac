//! [`Query`] collection related to the multiple [`RentDetail`]s.

use common::operations::By;

use crate::{domain::RentDetail, read::Party};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries all the [`RentDetail`]s of a [`Party`], the newest first.
pub type ByParty = DatabaseQuery<By<Vec<RentDetail>, Party>>;

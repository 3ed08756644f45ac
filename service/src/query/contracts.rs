//! [`Query`] collection related to the multiple [`Contract`]s.

use common::operations::By;

use crate::{domain::Contract, read::Party};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries all the [`Contract`]s of a [`Party`], the newest first.
pub type ByParty = DatabaseQuery<By<Vec<Contract>, Party>>;

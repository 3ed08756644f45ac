//! [`Session`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf};
use derive_more::{AsRef, Display, From, FromStr};
use serde::{Deserialize, Serialize};

#[cfg(doc)]
use crate::domain::User;
use crate::domain::user::{self, Role};

/// Authorized session of a [`User`].
#[derive(Clone, Copy, Debug)]
pub struct Session {
    /// ID of the [`User`] this [`Session`] belongs to.
    pub user_id: user::Id,

    /// [`Role`] the [`User`] acts in within this [`Session`].
    pub role: Role,

    /// [`DateTime`] when this [`Session`] expires.
    pub expires_at: ExpirationDateTime,
}

/// Claims carried by a [`Token`].
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct Claims {
    /// ID of the [`User`] the [`Token`] was issued for.
    #[serde(rename = "userId")]
    pub user_id: user::Id,

    /// [`DateTime`] when the [`Token`] expires.
    #[serde(rename = "exp", with = "common::datetime::serde::unix_timestamp")]
    pub expires_at: ExpirationDateTime,
}

/// Access token of a [`Session`].
///
/// Its signature is verified on authorization only.
#[derive(AsRef, Clone, Debug, Display, From, FromStr)]
#[as_ref(str)]
#[from(String, &str)]
pub struct Token(String);

/// [`DateTime`] of a [`Session`] expiration.
pub type ExpirationDateTime = DateTimeOf<(Session, unit::Expiration)>;

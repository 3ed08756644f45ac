//! [`User`] definitions.

pub mod session;

use std::sync::LazyLock;

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use self::session::Session;

/// Platform user, either an owner of properties or a tenant renting them.
#[derive(Clone, Debug)]
pub struct User {
    /// ID of this [`User`]
    pub id: Id,

    /// [`Role`] of this [`User`].
    pub role: Role,

    /// First [`Name`] of this [`User`].
    pub first_name: Name,

    /// Last [`Name`] of this [`User`].
    pub last_name: Name,

    /// [`Email`] of this [`User`].
    pub email: Email,

    /// [`ProfileImage`] of this [`User`], if any.
    pub profile_image: Option<ProfileImage>,

    /// [`Slug`] of this [`User`].
    pub slug: Slug,

    /// [`DateTime`] when this [`User`] was created.
    pub created_at: CreationDateTime,
}

impl User {
    /// Returns the [`Profile`] summary of this [`User`].
    #[must_use]
    pub fn profile(&self) -> Profile {
        Profile {
            id: self.id,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            profile_image: self.profile_image.clone(),
            slug: self.slug.clone(),
        }
    }
}

/// Display summary of a [`User`] shown to its counterparts.
#[derive(Clone, Debug)]
pub struct Profile {
    /// ID of the [`User`].
    pub id: Id,

    /// First [`Name`] of the [`User`].
    pub first_name: Name,

    /// Last [`Name`] of the [`User`].
    pub last_name: Name,

    /// [`ProfileImage`] of the [`User`], if any.
    pub profile_image: Option<ProfileImage>,

    /// [`Slug`] of the [`User`].
    pub slug: Slug,
}

define_kind! {
    #[doc = "Role of a [`User`] on the platform."]
    enum Role {
        #[doc = "[`User`] listing and renting out properties."]
        Owner = 1,

        #[doc = "[`User`] renting properties."]
        Tenant = 2,
    }
}

impl Role {
    /// Returns the [`Role`] of the counterparts of this [`Role`].
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Owner => Self::Tenant,
            Self::Tenant => Self::Owner,
        }
    }
}

/// ID of a [`User`].
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
    Ord,
    PartialEq,
    PartialOrd,
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

/// First or last name of a [`User`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Name(String);

impl Name {
    /// Creates a new [`Name`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`Name`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        name.trim() == name && !name.is_empty() && name.chars().count() <= 100
    }
}

impl FromStr for Name {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Name`")
    }
}

/// Email address of a [`User`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Email(String);

impl Email {
    /// Creates a new [`Email`] if the given `address` is valid.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Option<Self> {
        let address = address.into();
        Self::check(&address).then_some(Self(address))
    }

    /// Checks whether the given `address` is a valid [`Email`].
    fn check(address: impl AsRef<str>) -> bool {
        /// Regular expression checking [`Email`] format.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid regex")
        });

        REGEX.is_match(address.as_ref())
    }
}

impl FromStr for Email {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Email`")
    }
}

/// URL of a [`User`]'s profile image.
#[derive(AsRef, Clone, Debug, Display, Eq, From, PartialEq)]
#[as_ref(str, String)]
#[from(&str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct ProfileImage(String);

/// URL-friendly unique handle of a [`User`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Slug(String);

impl Slug {
    /// Creates a new [`Slug`] if the given `slug` is valid.
    #[must_use]
    pub fn new(slug: impl Into<String>) -> Option<Self> {
        let slug = slug.into();
        Self::check(&slug).then_some(Self(slug))
    }

    /// Checks whether the given `slug` is a valid [`Slug`].
    fn check(slug: impl AsRef<str>) -> bool {
        /// Lowercase alphanumeric words joined with single dashes.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").expect("valid regex")
        });

        REGEX.is_match(slug.as_ref())
    }
}

impl FromStr for Slug {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Slug`")
    }
}

/// [`DateTime`] when a [`User`] was created.
pub type CreationDateTime = DateTimeOf<(User, unit::Creation)>;

#[cfg(test)]
mod spec {
    use super::{Email, Name, Role, Slug};

    #[test]
    fn validates_name() {
        assert!(Name::new("Jane").is_some());
        assert!(Name::new("Mary Ann").is_some());
        assert!(Name::new("").is_none());
        assert!(Name::new(" Jane").is_none());
        assert!(Name::new("x".repeat(101)).is_none());
    }

    #[test]
    fn validates_email() {
        assert!(Email::new("owner@example.com").is_some());
        assert!(Email::new("owner@example").is_none());
        assert!(Email::new("owner example.com").is_none());
        assert!(Email::new("@example.com").is_none());
    }

    #[test]
    fn validates_slug() {
        assert!(Slug::new("jane-doe-42").is_some());
        assert!(Slug::new("Jane-Doe").is_none());
        assert!(Slug::new("jane--doe").is_none());
        assert!(Slug::new("-jane").is_none());
    }

    #[test]
    fn roles_are_opposite() {
        assert_eq!(Role::Owner.opposite(), Role::Tenant);
        assert_eq!(Role::Tenant.opposite(), Role::Owner);
        assert_eq!(Role::Owner.to_string(), "OWNER");
    }
}

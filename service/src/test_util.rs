//! Fixtures for [`Service`] tests running against the [`Memory`] database.

use std::time::Duration;

use common::{money::Currency, operations::Insert, Date, DateTime, Money};
use jsonwebtoken::{DecodingKey, EncodingKey, Header};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    domain::{
        realty,
        user::{self, session, Role},
        Realty, User,
    },
    infra::{Database as _, Memory},
    Config, Service,
};

/// Secret signing owners' session tokens.
pub(crate) const OWNER_SECRET: &[u8] = b"owner-secret";

/// Secret signing tenants' session tokens.
pub(crate) const TENANT_SECRET: &[u8] = b"tenant-secret";

/// Creates a new [`Service`] over an empty [`Memory`] database.
pub(crate) fn service() -> Service<Memory> {
    Service::new(
        Config {
            owner_jwt_decoding_key: DecodingKey::from_secret(OWNER_SECRET),
            tenant_jwt_decoding_key: DecodingKey::from_secret(TENANT_SECRET),
            chat_feed_capacity: 16,
        },
        Memory::default(),
    )
}

/// Stores a new [`User`] with the provided [`Role`] and first name.
pub(crate) async fn user(
    service: &Service<Memory>,
    role: Role,
    first_name: &str,
) -> User {
    let id = user::Id::new();
    let user = User {
        id,
        role,
        first_name: user::Name::new(first_name).unwrap(),
        last_name: user::Name::new("Doe").unwrap(),
        email: user::Email::new(format!("{id}@example.com")).unwrap(),
        profile_image: Some(format!("https://cdn.example.com/{id}.png").into()),
        slug: user::Slug::new(format!("user-{}", Uuid::from(id).simple())).unwrap(),
        created_at: DateTime::now().coerce(),
    };
    service.database().execute(Insert(user.clone())).await.unwrap();
    user
}

/// Stores a new available [`Realty`] of the provided owner.
pub(crate) async fn realty(
    service: &Service<Memory>,
    owner_id: user::Id,
) -> Realty {
    let realty = Realty {
        id: realty::Id::new(),
        owner_id,
        title: realty::Title::new("Flat in the city center").unwrap(),
        price: usd(1000),
        is_available: true,
        created_at: DateTime::now().coerce(),
    };
    service.database().execute(Insert(realty.clone())).await.unwrap();
    realty
}

/// Parses the provided `YYYY-MM-DD` [`Date`].
pub(crate) fn date(s: &str) -> Date {
    s.parse().unwrap()
}

/// Creates [`Money`] of the provided amount in US dollars.
pub(crate) fn usd(amount: i64) -> Money {
    Money {
        amount: Decimal::from(amount),
        currency: Currency::Usd,
    }
}

/// Issues a [`session::Token`] for the provided [`User`] signed with the
/// given secret.
pub(crate) fn token(user_id: user::Id, secret: &[u8]) -> session::Token {
    let claims = session::Claims {
        user_id,
        expires_at: (DateTime::now() + Duration::from_secs(3600)).coerce(),
    };
    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret),
    )
    .unwrap()
    .into()
}

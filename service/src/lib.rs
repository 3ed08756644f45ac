//! Service contains the business logic of the application.
//!
//! List of available Cargo features:
#![doc = document_features::document_features!()]
#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod command;
pub mod domain;
pub mod infra;
pub mod query;
pub mod read;

use derive_more::Debug;
use tokio::sync::broadcast;

#[cfg(doc)]
use infra::Database;

use self::domain::chat;

pub use self::{command::Command, query::Query};

/// [`Service`] configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// [JWT] decoding key of owners' session tokens.
    ///
    /// [JWT]: https://datatracker.ietf.org/doc/html/rfc7519
    #[debug(skip)]
    pub owner_jwt_decoding_key: jsonwebtoken::DecodingKey,

    /// [JWT] decoding key of tenants' session tokens.
    ///
    /// [JWT]: https://datatracker.ietf.org/doc/html/rfc7519
    #[debug(skip)]
    pub tenant_jwt_decoding_key: jsonwebtoken::DecodingKey,

    /// Number of sent [`chat::Message`]s buffered for each live subscriber.
    pub chat_feed_capacity: usize,
}

/// Domain service.
#[derive(Clone, Debug)]
pub struct Service<Db> {
    /// Configuration of this [`Service`].
    config: Config,

    /// [`Database`] of this [`Service`].
    database: Db,

    /// Live feed of sent [`chat::Message`]s.
    chat_feed: broadcast::Sender<chat::Message>,
}

impl<Db> Service<Db> {
    /// Creates a new [`Service`] with the provided parameters.
    pub fn new(config: Config, database: Db) -> Self {
        let (chat_feed, _) = broadcast::channel(config.chat_feed_capacity.max(1));
        Self {
            config,
            database,
            chat_feed,
        }
    }

    /// Returns [`Config`] of this [`Service`].
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns [`Database`] of this [`Service`].
    #[must_use]
    pub fn database(&self) -> &Db {
        &self.database
    }

    /// Subscribes to the [`chat::Message`]s sent after this call.
    #[must_use]
    pub fn subscribe_messages(&self) -> broadcast::Receiver<chat::Message> {
        self.chat_feed.subscribe()
    }

    /// Publishes the provided [`chat::Message`] to live subscribers.
    fn publish_message(&self, msg: chat::Message) {
        // No subscribers is not an error.
        _ = self.chat_feed.send(msg);
    }
}

#[cfg(test)]
mod test_util;

//! GraphQL [`Subscription`]s definitions.

use std::time::Duration;

use common::DateTime;
use futures::{
    future,
    stream::{self, BoxStream},
    StreamExt as _,
};
use juniper::graphql_subscription;
use tokio::sync::broadcast::error::RecvError;

use crate::{api, Context, Error};

/// Root of all GraphQL subscription.
#[derive(Clone, Copy, Debug)]
pub struct Subscription;

impl Subscription {
    /// Name of the [`tracing::Span`] for the subscriptions.
    const SPAN_NAME: &'static str = "GraphQL subscription";
}

#[graphql_subscription(context = Context)]
impl Subscription {
    /// Streams the `ChatMessage`s sent to the authenticated `User` after the
    /// subscription is started.
    ///
    /// Ends once the authenticated session expires.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the current session is not authenticated.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "chatMessages",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn chat_messages(
        &self,
        ctx: &Context,
    ) -> Result<BoxStream<'static, api::Message>, Error> {
        let session = ctx.current_session().await?;
        let my_id = session.user_id;

        let ttl = session
            .expires_at
            .unix_timestamp()
            .saturating_sub(DateTime::now().unix_timestamp());
        let expired = Box::pin(tokio::time::sleep(Duration::from_secs(
            u64::try_from(ttl).unwrap_or_default(),
        )));

        let feed = ctx.service().subscribe_messages();
        let messages = stream::unfold(feed, |mut feed| async move {
            loop {
                match feed.recv().await {
                    Ok(msg) => return Some((msg, feed)),
                    Err(RecvError::Lagged(missed)) => {
                        tracing::warn!("chat feed lagged by {missed} messages");
                    }
                    Err(RecvError::Closed) => return None,
                }
            }
        })
        .map(api::Message::from)
        .filter(move |msg| future::ready(msg.recipient_id() == my_id));

        Ok(messages.take_until(expired).boxed())
    }
}

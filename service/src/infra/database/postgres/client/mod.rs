//! Postgres database client definitions.
//!
//! Clients acquire their [`Connection`] from the [`connection::Pool`] lazily,
//! on the first query, and keep it until dropped (or committed).

use std::{future::Future, sync::Arc};

use tokio::sync::{RwLock, RwLockReadGuard};
use tokio_postgres::{types::ToSql, Row, ToStatement};
use tracerr::Traced;

use crate::infra::database::{
    self,
    postgres::{self, connection, Connection},
};

/// Lazily initialized [`Connection`] slot.
#[derive(Debug)]
struct Slot<C>(RwLock<Option<C>>);

impl<C> Slot<C> {
    /// Creates a new empty [`Slot`].
    fn empty() -> Self {
        Self(RwLock::new(None))
    }

    /// Returns the [`Connection`] in this [`Slot`], initializing it with the
    /// provided function if there is none yet.
    async fn get_or_try_init<F, Fut>(
        &self,
        init: F,
    ) -> Result<RwLockReadGuard<'_, C>, Traced<database::Error>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<C, Traced<database::Error>>>,
    {
        let read = self.0.read().await;
        let guard = if read.is_some() {
            read
        } else {
            drop(read);

            let mut write = self.0.write().await;
            if write.is_none() {
                *write = Some(init().await.map_err(tracerr::wrap!())?);
            }
            write.downgrade()
        };

        RwLockReadGuard::try_map(guard, Option::as_ref).map_err(|_| {
            tracerr::new!(database::Error::from(
                postgres::Error::ConnectionReleased
            ))
        })
    }

    /// Takes the [`Connection`] out of this [`Slot`], leaving it empty.
    async fn take(&self) -> Option<C> {
        self.0.write().await.take()
    }
}

/// Acquires a new [`connection::NonTx`] from the provided
/// [`connection::Pool`].
async fn acquire(
    pool: &connection::Pool,
) -> Result<connection::NonTx, Traced<database::Error>> {
    pool.get()
        .await
        .map_err(tracerr::from_and_wrap!(=> postgres::Error))
        .map_err(tracerr::map_from)
}

/// Non-transactional Postgres database client.
#[derive(Clone, Debug)]
pub struct NonTx {
    /// [`connection::Pool`] to acquire [`Connection`]s from.
    pub(crate) pool: connection::Pool,

    /// [`Connection`] used for non-transactional operations, if acquired.
    connection: Arc<Slot<connection::NonTx>>,
}

impl NonTx {
    /// Creates a new [`NonTx`] client from the provided [`connection::Pool`].
    #[must_use]
    pub(crate) fn from_pool(pool: connection::Pool) -> Self {
        Self {
            pool,
            connection: Arc::new(Slot::empty()),
        }
    }

    /// Returns the underlying [`Connection`] of this [`NonTx`] client.
    async fn connection(
        &self,
    ) -> Result<RwLockReadGuard<'_, connection::NonTx>, Traced<database::Error>>
    {
        self.connection
            .get_or_try_init(|| acquire(&self.pool))
            .await
    }

    /// Takes the underlying [`Connection`] out of this [`NonTx`] client.
    ///
    /// The next operation of this [`NonTx`] client acquires a new one.
    async fn take_connection(&self) -> Option<connection::NonTx> {
        self.connection.take().await
    }
}

/// Transactional Postgres database client.
///
/// The transaction starts lazily on the first query, reusing the
/// [`Connection`] of the [`NonTx`] client it was created from, if any.
#[derive(Clone, Debug)]
pub struct Tx {
    /// [`NonTx`] client this [`Tx`] client was created from.
    origin: NonTx,

    /// Lazily started [`connection::Tx`].
    tx: Arc<Slot<connection::Tx>>,
}

impl Tx {
    /// Creates a new [`Tx`] client from the provided [`NonTx`] client.
    #[must_use]
    pub fn from_non_tx(client: NonTx) -> Self {
        Self {
            origin: client,
            tx: Arc::new(Slot::empty()),
        }
    }

    /// Returns the underlying [`Connection`] of this [`Tx`] client.
    async fn connection(
        &self,
    ) -> Result<RwLockReadGuard<'_, connection::Tx>, Traced<database::Error>>
    {
        self.tx
            .get_or_try_init(|| async {
                let conn = match self.origin.take_connection().await {
                    Some(conn) => conn,
                    None => acquire(&self.origin.pool).await?,
                };
                connection::Tx::from_non_tx(conn).await
            })
            .await
    }

    /// Commits this [`Tx`] client.
    ///
    /// Does nothing if no query was made within this [`Tx`] client.
    ///
    /// # Errors
    ///
    /// If failed to commit the transaction of this [`Tx`] client.
    pub async fn commit(&self) -> Result<(), Traced<database::Error>> {
        let Some(tx) = self.tx.take().await else {
            return Ok(());
        };
        tx.commit().await.map_err(tracerr::wrap!())
    }
}

/// Implements [`Connection`] for a lazy client by forwarding to its
/// `connection()`.
macro_rules! forward_connection {
    ($client:ty) => {
        impl Connection for $client {
            async fn query<T>(
                &self,
                stmt: &T,
                params: &[&(dyn ToSql + Sync)],
            ) -> Result<Vec<Row>, Traced<database::Error>>
            where
                T: ToStatement + ?Sized,
            {
                self.connection()
                    .await
                    .map_err(tracerr::wrap!())?
                    .query(stmt, params)
                    .await
                    .map_err(tracerr::wrap!())
            }

            async fn query_opt<T>(
                &self,
                stmt: &T,
                params: &[&(dyn ToSql + Sync)],
            ) -> Result<Option<Row>, Traced<database::Error>>
            where
                T: ToStatement + ?Sized,
            {
                self.connection()
                    .await
                    .map_err(tracerr::wrap!())?
                    .query_opt(stmt, params)
                    .await
                    .map_err(tracerr::wrap!())
            }

            async fn exec<T>(
                &self,
                stmt: &T,
                params: &[&(dyn ToSql + Sync)],
            ) -> Result<u64, Traced<database::Error>>
            where
                T: ToStatement + ?Sized,
            {
                self.connection()
                    .await
                    .map_err(tracerr::wrap!())?
                    .exec(stmt, params)
                    .await
                    .map_err(tracerr::wrap!())
            }
        }
    };
}

forward_connection!(NonTx);
forward_connection!(Tx);

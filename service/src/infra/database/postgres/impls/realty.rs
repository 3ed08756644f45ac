//! [`Realty`]-related [`Database`] implementations.

use common::operations::{By, Insert, Lock, Select, Update};
use tracerr::Traced;

use crate::{
    domain::{realty, Realty},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

impl<C> Database<Select<By<Option<Realty>, realty::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Realty>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Realty>, realty::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        const SQL: &str = "\
            SELECT id, owner_id, title, \
                   price, price_currency, \
                   is_available, created_at \
            FROM realties \
            WHERE id = $1::UUID";
        Ok(self
            .query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| Realty {
                id: row.get("id"),
                owner_id: row.get("owner_id"),
                title: row.get("title"),
                price: super::money(&row, "price", "price_currency"),
                is_available: row.get("is_available"),
                created_at: row.get("created_at"),
            }))
    }
}

impl<C> Database<Insert<Realty>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Realty>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(realty): Insert<Realty>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(realty)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Realty>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(realty): Update<Realty>,
    ) -> Result<Self::Ok, Self::Err> {
        let Realty {
            id,
            owner_id,
            title,
            price,
            is_available,
            created_at,
        } = realty;

        const SQL: &str = "\
            INSERT INTO realties (\
                id, owner_id, title, \
                price, price_currency, \
                is_available, created_at\
            ) \
            VALUES (\
                $1::UUID, $2::UUID, $3::VARCHAR, \
                $4::NUMERIC, $5::INT2, \
                $6::BOOLEAN, $7::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET title = EXCLUDED.title, \
                price = EXCLUDED.price, \
                price_currency = EXCLUDED.price_currency, \
                is_available = EXCLUDED.is_available";
        self.exec(
            SQL,
            &[
                &id,
                &owner_id,
                &title,
                &price.amount,
                &price.currency,
                &is_available,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Lock<By<Realty, realty::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Realty, realty::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: realty::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM realties \
            WHERE id = $1::UUID \
            FOR UPDATE";
        self.query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

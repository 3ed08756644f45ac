//! [`Contract`]-related [`Database`] implementations.

use common::operations::{By, Delete, Insert, Lock, Select, Update};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{contract, realty, user, Contract},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read::Party,
};

/// Columns of the `contracts` table in the order [`from_row()`] expects.
const COLUMNS: &str = "\
    id, owner_id, tenant_id, realty_id, \
    rent_amount, rent_currency, payment_plan, \
    start_date, status, created_at";

/// Builds a [`Contract`] out of the provided [`Row`].
fn from_row(row: &Row) -> Contract {
    Contract {
        id: row.get("id"),
        owner_id: row.get("owner_id"),
        tenant_id: row.get("tenant_id"),
        realty_id: row.get("realty_id"),
        rent_amount: super::money(row, "rent_amount", "rent_currency"),
        payment_plan: row.get("payment_plan"),
        start_date: row.get("start_date"),
        status: row.get("status"),
        created_at: row.get("created_at"),
    }
}

impl<C> Database<Select<By<Option<Contract>, contract::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Contract>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Contract>, contract::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        let sql = format!("SELECT {COLUMNS} FROM contracts WHERE id = $1::UUID");
        Ok(self
            .query_opt(&sql, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(from_row))
    }
}

impl<C> Database<Select<By<Option<Contract>, realty::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Contract>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Contract>, realty::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let realty_id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} FROM contracts WHERE realty_id = $1::UUID",
        );
        Ok(self
            .query_opt(&sql, &[&realty_id])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(from_row))
    }
}

impl<C> Database<Select<By<Vec<Contract>, Party>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Contract>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Contract>, Party>>,
    ) -> Result<Self::Ok, Self::Err> {
        let (column, user_id): (_, user::Id) = match by.into_inner() {
            Party::Owner(id) => ("owner_id", id),
            Party::Tenant(id) => ("tenant_id", id),
        };

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM contracts \
             WHERE {column} = $1::UUID \
             ORDER BY created_at DESC",
        );
        Ok(self
            .query(&sql, &[&user_id])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Insert<Contract>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Contract>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(contract): Insert<Contract>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(contract)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Contract>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(contract): Update<Contract>,
    ) -> Result<Self::Ok, Self::Err> {
        let Contract {
            id,
            owner_id,
            tenant_id,
            realty_id,
            rent_amount,
            payment_plan,
            start_date,
            status,
            created_at,
        } = contract;

        const SQL: &str = "\
            INSERT INTO contracts (\
                id, owner_id, tenant_id, realty_id, \
                rent_amount, rent_currency, payment_plan, \
                start_date, status, created_at\
            ) \
            VALUES (\
                $1::UUID, $2::UUID, $3::UUID, $4::UUID, \
                $5::NUMERIC, $6::INT2, $7::INT2, \
                $8::DATE, $9::INT2, $10::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET rent_amount = EXCLUDED.rent_amount, \
                rent_currency = EXCLUDED.rent_currency, \
                payment_plan = EXCLUDED.payment_plan, \
                start_date = EXCLUDED.start_date, \
                status = EXCLUDED.status";
        self.exec(
            SQL,
            &[
                &id,
                &owner_id,
                &tenant_id,
                &realty_id,
                &rent_amount.amount,
                &rent_amount.currency,
                &payment_plan,
                &start_date,
                &status,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Delete<By<Contract, contract::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Contract, contract::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM contracts \
            WHERE id = $1::UUID";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Lock<By<Contract, contract::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Contract, contract::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: contract::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM contracts \
            WHERE id = $1::UUID \
            FOR UPDATE";
        self.query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

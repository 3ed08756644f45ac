//! [`RentDetail`]-related [`Database`] implementations.

use common::operations::{By, Delete, Insert, Lock, Select, Update};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{realty, rent_detail, rent_detail::PeriodAdvance, user, RentDetail},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read::Party,
};

/// Columns of the `rent_details` table in the order [`from_row()`] expects.
const COLUMNS: &str = "\
    id, owner_id, tenant_id, realty_id, \
    payment_plan, period_from, period_to, \
    monthly_rent, monthly_rent_currency, \
    created_at";

/// Builds a [`RentDetail`] out of the provided [`Row`].
fn from_row(row: &Row) -> RentDetail {
    RentDetail {
        id: row.get("id"),
        owner_id: row.get("owner_id"),
        tenant_id: row.get("tenant_id"),
        realty_id: row.get("realty_id"),
        payment_plan: row.get("payment_plan"),
        current_period: super::period(row, "period_from", "period_to"),
        monthly_rent: super::money(
            row,
            "monthly_rent",
            "monthly_rent_currency",
        ),
        created_at: row.get("created_at"),
    }
}

impl<C> Database<Select<By<Option<RentDetail>, rent_detail::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<RentDetail>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<RentDetail>, rent_detail::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        let sql =
            format!("SELECT {COLUMNS} FROM rent_details WHERE id = $1::UUID");
        Ok(self
            .query_opt(&sql, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(from_row))
    }
}

impl<C> Database<Select<By<Option<RentDetail>, realty::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<RentDetail>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<RentDetail>, realty::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let realty_id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} FROM rent_details WHERE realty_id = $1::UUID",
        );
        Ok(self
            .query_opt(&sql, &[&realty_id])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(from_row))
    }
}

impl<C> Database<Select<By<Vec<RentDetail>, Party>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<RentDetail>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<RentDetail>, Party>>,
    ) -> Result<Self::Ok, Self::Err> {
        let (column, user_id): (_, user::Id) = match by.into_inner() {
            Party::Owner(id) => ("owner_id", id),
            Party::Tenant(id) => ("tenant_id", id),
        };

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM rent_details \
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

impl<C> Database<Insert<RentDetail>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(detail): Insert<RentDetail>,
    ) -> Result<Self::Ok, Self::Err> {
        let RentDetail {
            id,
            owner_id,
            tenant_id,
            realty_id,
            payment_plan,
            current_period,
            monthly_rent,
            created_at,
        } = detail;

        const SQL: &str = "\
            INSERT INTO rent_details (\
                id, owner_id, tenant_id, realty_id, \
                payment_plan, period_from, period_to, \
                monthly_rent, monthly_rent_currency, \
                created_at\
            ) \
            VALUES (\
                $1::UUID, $2::UUID, $3::UUID, $4::UUID, \
                $5::INT2, $6::DATE, $7::DATE, \
                $8::NUMERIC, $9::INT2, \
                $10::TIMESTAMPTZ\
            )";
        self.exec(
            SQL,
            &[
                &id,
                &owner_id,
                &tenant_id,
                &realty_id,
                &payment_plan,
                &current_period.from(),
                &current_period.to(),
                &monthly_rent.amount,
                &monthly_rent.currency,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Update<PeriodAdvance>> for Postgres<C>
where
    C: Connection,
{
    /// Indicator whether the [`RentDetail`] still had the expected period and
    /// was advanced.
    type Ok = bool;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(advance): Update<PeriodAdvance>,
    ) -> Result<Self::Ok, Self::Err> {
        let PeriodAdvance {
            rent_detail_id,
            expected,
            next,
        } = advance;

        const SQL: &str = "\
            UPDATE rent_details \
            SET period_from = $4::DATE, \
                period_to = $5::DATE \
            WHERE id = $1::UUID \
              AND period_from = $2::DATE \
              AND period_to = $3::DATE";
        self.exec(
            SQL,
            &[
                &rent_detail_id,
                &expected.from(),
                &expected.to(),
                &next.from(),
                &next.to(),
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(|affected| affected == 1)
    }
}

impl<C> Database<Delete<By<RentDetail, rent_detail::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<RentDetail, rent_detail::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM rent_details \
            WHERE id = $1::UUID";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Lock<By<RentDetail, rent_detail::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<RentDetail, rent_detail::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: rent_detail::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM rent_details \
            WHERE id = $1::UUID \
            FOR UPDATE";
        self.query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

//! [`Payment`]-related [`Database`] implementations.

use common::{
    operations::{By, Delete, Insert, Select},
    Period,
};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{rent_detail, Payment},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read::payment::list,
};

/// Columns of the `payment_histories` table in the order [`from_row()`]
/// expects.
const COLUMNS: &str = "\
    id, rent_detail_id, \
    period_from, period_to, \
    amount_paid, amount_paid_currency, \
    method, created_at";

/// Builds a [`Payment`] out of the provided [`Row`].
fn from_row(row: &Row) -> Payment {
    Payment {
        id: row.get("id"),
        rent_detail_id: row.get("rent_detail_id"),
        period: super::period(row, "period_from", "period_to"),
        amount_paid: super::money(row, "amount_paid", "amount_paid_currency"),
        method: row.get("method"),
        created_at: row.get("created_at"),
    }
}

impl<C> Database<Select<By<Option<Payment>, (rent_detail::Id, Period)>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Payment>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Payment>, (rent_detail::Id, Period)>>,
    ) -> Result<Self::Ok, Self::Err> {
        let (rent_detail_id, period) = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM payment_histories \
             WHERE rent_detail_id = $1::UUID \
               AND period_from = $2::DATE \
               AND period_to = $3::DATE",
        );
        Ok(self
            .query_opt(&sql, &[&rent_detail_id, &period.from(), &period.to()])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(from_row))
    }
}

impl<C> Database<Select<By<list::Page, list::Selector>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = list::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<list::Page, list::Selector>>,
    ) -> Result<Self::Ok, Self::Err> {
        let list::Selector {
            arguments,
            filter: list::Filter { rent_detail_id },
        } = by.into_inner();

        let limit = i64::try_from(arguments.limit()).unwrap_or(i64::MAX);
        let offset = i64::try_from(arguments.offset()).unwrap_or(i64::MAX);

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM payment_histories \
             WHERE rent_detail_id = $1::UUID \
             ORDER BY created_at DESC, id \
             LIMIT $2::INT8 OFFSET $3::INT8",
        );
        let items = self
            .query(&sql, &[&rent_detail_id, &limit, &offset])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect::<Vec<_>>();

        const COUNT_SQL: &str = "\
            SELECT COUNT(*) \
            FROM payment_histories \
            WHERE rent_detail_id = $1::UUID";
        let total_count = self
            .query_opt(COUNT_SQL, &[&rent_detail_id])
            .await
            .map_err(tracerr::wrap!())?
            .map_or(0, |row| row.get::<_, i64>(0));

        Ok(list::Page::new(
            arguments,
            items,
            usize::try_from(total_count).unwrap_or_default(),
        ))
    }
}

impl<C> Database<Insert<Payment>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(payment): Insert<Payment>,
    ) -> Result<Self::Ok, Self::Err> {
        let Payment {
            id,
            rent_detail_id,
            period,
            amount_paid,
            method,
            created_at,
        } = payment;

        const SQL: &str = "\
            INSERT INTO payment_histories (\
                id, rent_detail_id, \
                period_from, period_to, \
                amount_paid, amount_paid_currency, \
                method, created_at\
            ) \
            VALUES (\
                $1::UUID, $2::UUID, \
                $3::DATE, $4::DATE, \
                $5::NUMERIC, $6::INT2, \
                $7::VARCHAR, $8::TIMESTAMPTZ\
            )";
        self.exec(
            SQL,
            &[
                &id,
                &rent_detail_id,
                &period.from(),
                &period.to(),
                &amount_paid.amount,
                &amount_paid.currency,
                &method,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Delete<By<Vec<Payment>, rent_detail::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Vec<Payment>, rent_detail::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let rent_detail_id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM payment_histories \
            WHERE rent_detail_id = $1::UUID";
        self.exec(SQL, &[&rent_detail_id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

//! Chat [`Message`]-related [`Database`] implementations.

use common::operations::{By, Insert, Select, Update};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{
        chat::{MarkRead, Message, Participants},
        user,
    },
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read::chat::Latest,
};

/// Columns of the `chat_messages` table in the order [`from_row()`] expects.
const COLUMNS: &str = "id, sender_id, recipient_id, text, is_read, created_at";

/// Builds a [`Message`] out of the provided [`Row`].
fn from_row(row: &Row) -> Message {
    Message {
        id: row.get("id"),
        sender_id: row.get("sender_id"),
        recipient_id: row.get("recipient_id"),
        text: row.get("text"),
        is_read: row.get("is_read"),
        created_at: row.get("created_at"),
    }
}

impl<C> Database<Insert<Message>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(msg): Insert<Message>,
    ) -> Result<Self::Ok, Self::Err> {
        let Message {
            id,
            sender_id,
            recipient_id,
            text,
            is_read,
            created_at,
        } = msg;

        const SQL: &str = "\
            INSERT INTO chat_messages (\
                id, sender_id, recipient_id, \
                text, is_read, created_at\
            ) \
            VALUES (\
                $1::UUID, $2::UUID, $3::UUID, \
                $4::TEXT, $5::BOOLEAN, $6::TIMESTAMPTZ\
            )";
        self.exec(
            SQL,
            &[&id, &sender_id, &recipient_id, &text, &is_read, &created_at],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Select<By<Vec<Message>, Participants>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Message>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Message>, Participants>>,
    ) -> Result<Self::Ok, Self::Err> {
        let (a, b) = by.into_inner().ids();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM chat_messages \
             WHERE (sender_id = $1::UUID AND recipient_id = $2::UUID) \
                OR (sender_id = $2::UUID AND recipient_id = $1::UUID) \
             ORDER BY created_at ASC",
        );
        Ok(self
            .query(&sql, &[&a, &b])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Select<By<Option<Latest>, Participants>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Latest>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Latest>, Participants>>,
    ) -> Result<Self::Ok, Self::Err> {
        let (a, b) = by.into_inner().ids();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM chat_messages \
             WHERE (sender_id = $1::UUID AND recipient_id = $2::UUID) \
                OR (sender_id = $2::UUID AND recipient_id = $1::UUID) \
             ORDER BY created_at DESC \
             LIMIT 1",
        );
        Ok(self
            .query_opt(&sql, &[&a, &b])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(|row| Latest(from_row(row))))
    }
}

impl<C> Database<Select<By<Vec<Latest>, user::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Latest>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Latest>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let user_id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM (\
                 SELECT DISTINCT ON (\
                     LEAST(sender_id, recipient_id), \
                     GREATEST(sender_id, recipient_id)\
                 ) {COLUMNS} \
                 FROM chat_messages \
                 WHERE sender_id = $1::UUID OR recipient_id = $1::UUID \
                 ORDER BY LEAST(sender_id, recipient_id), \
                          GREATEST(sender_id, recipient_id), \
                          created_at DESC\
             ) AS latest \
             ORDER BY created_at DESC",
        );
        Ok(self
            .query(&sql, &[&user_id])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(|row| Latest(from_row(row)))
            .collect())
    }
}

impl<C> Database<Update<MarkRead>> for Postgres<C>
where
    C: Connection,
{
    /// Number of [`Message`]s marked as read.
    type Ok = u64;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(mark): Update<MarkRead>,
    ) -> Result<Self::Ok, Self::Err> {
        let MarkRead {
            reader_id,
            partner_id,
        } = mark;

        const SQL: &str = "\
            UPDATE chat_messages \
            SET is_read = TRUE \
            WHERE sender_id = $1::UUID \
              AND recipient_id = $2::UUID \
              AND NOT is_read";
        self.exec(SQL, &[&partner_id, &reader_id])
            .await
            .map_err(tracerr::wrap!())
    }
}

//! In-memory [`Database`] implementation.
//!
//! Every operation is applied immediately, so [`Transact`] shares the state
//! and [`Commit`] does nothing. [`Lock`]s are no-ops, since each operation
//! holds the whole state exclusively.

use std::{collections::HashMap, sync::Arc};

use common::{
    operations::{By, Commit, Delete, Insert, Lock, Select, Transact, Update},
    Period,
};
use tokio::sync::Mutex;
use tracerr::Traced;

use crate::{
    domain::{
        chat::{MarkRead, Message, Participants},
        contract, realty, rent_detail,
        rent_detail::PeriodAdvance,
        user, Contract, Payment, Realty, RentDetail, User,
    },
    infra::{database, Database},
    read::{self, Party},
};

/// In-memory [`Database`].
#[derive(Clone, Debug, Default)]
pub struct Memory(Arc<Mutex<State>>);

/// Stored entities, each collection in insertion order.
#[derive(Debug, Default)]
struct State {
    /// Stored [`User`]s.
    users: Vec<User>,

    /// Stored [`Realty`]s.
    realties: Vec<Realty>,

    /// Stored [`Contract`]s.
    contracts: Vec<Contract>,

    /// Stored [`RentDetail`]s.
    rent_details: Vec<RentDetail>,

    /// Stored [`Payment`]s.
    payments: Vec<Payment>,

    /// Stored [`Message`]s.
    messages: Vec<Message>,
}

/// Replaces the item with the same ID or appends the provided one.
fn upsert<T, Id: PartialEq>(items: &mut Vec<T>, item: T, id: impl Fn(&T) -> Id) {
    if let Some(existing) = items.iter_mut().find(|i| id(i) == id(&item)) {
        *existing = item;
    } else {
        items.push(item);
    }
}

/// Clones the provided items ordered from the newest to the oldest.
fn newest_first<'a, T, K>(
    items: impl DoubleEndedIterator<Item = &'a T>,
    created_at: impl Fn(&T) -> K,
) -> Vec<T>
where
    T: Clone + 'a,
    K: Ord,
{
    let mut items = items.rev().cloned().collect::<Vec<_>>();
    items.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
    items
}

impl Database<Transact> for Memory {
    type Ok = Self;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        Ok(self.clone())
    }
}

impl Database<Commit> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Commit) -> Result<Self::Ok, Self::Err> {
        Ok(())
    }
}

impl<T, Id> Database<Lock<By<T, Id>>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Lock<By<T, Id>>) -> Result<Self::Ok, Self::Err> {
        Ok(())
    }
}

impl Database<Select<By<Option<User>, user::Id>>> for Memory {
    type Ok = Option<User>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<User>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self.0.lock().await.users.iter().find(|u| u.id == id).cloned())
    }
}

impl<IDs> Database<Select<By<HashMap<user::Id, User>, IDs>>> for Memory
where
    IDs: AsRef<[user::Id]>,
{
    type Ok = HashMap<user::Id, User>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<user::Id, User>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        let ids = ids.as_ref();
        Ok(self
            .0
            .lock()
            .await
            .users
            .iter()
            .filter(|u| ids.contains(&u.id))
            .map(|u| (u.id, u.clone()))
            .collect())
    }
}

impl Database<Insert<User>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(user): Insert<User>,
    ) -> Result<Self::Ok, Self::Err> {
        upsert(&mut self.0.lock().await.users, user, |u| u.id);
        Ok(())
    }
}

impl Database<Select<By<Option<Realty>, realty::Id>>> for Memory {
    type Ok = Option<Realty>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Realty>, realty::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .0
            .lock()
            .await
            .realties
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }
}

impl Database<Insert<Realty>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(realty): Insert<Realty>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(realty)).await
    }
}

impl Database<Update<Realty>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(realty): Update<Realty>,
    ) -> Result<Self::Ok, Self::Err> {
        upsert(&mut self.0.lock().await.realties, realty, |r| r.id);
        Ok(())
    }
}

impl Database<Select<By<Option<Contract>, contract::Id>>> for Memory {
    type Ok = Option<Contract>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Contract>, contract::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .0
            .lock()
            .await
            .contracts
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }
}

impl Database<Select<By<Option<Contract>, realty::Id>>> for Memory {
    type Ok = Option<Contract>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Contract>, realty::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let realty_id = by.into_inner();
        Ok(self
            .0
            .lock()
            .await
            .contracts
            .iter()
            .find(|c| c.realty_id == realty_id)
            .cloned())
    }
}

impl Database<Select<By<Vec<Contract>, Party>>> for Memory {
    type Ok = Vec<Contract>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Contract>, Party>>,
    ) -> Result<Self::Ok, Self::Err> {
        let party = by.into_inner();
        let state = self.0.lock().await;
        Ok(newest_first(
            state
                .contracts
                .iter()
                .filter(|c| party.matches(c.owner_id, c.tenant_id)),
            |c| c.created_at,
        ))
    }
}

impl Database<Insert<Contract>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(contract): Insert<Contract>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(contract)).await
    }
}

impl Database<Update<Contract>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(contract): Update<Contract>,
    ) -> Result<Self::Ok, Self::Err> {
        upsert(&mut self.0.lock().await.contracts, contract, |c| c.id);
        Ok(())
    }
}

impl Database<Delete<By<Contract, contract::Id>>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Contract, contract::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.0.lock().await.contracts.retain(|c| c.id != id);
        Ok(())
    }
}

impl Database<Select<By<Option<RentDetail>, rent_detail::Id>>> for Memory {
    type Ok = Option<RentDetail>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<RentDetail>, rent_detail::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .0
            .lock()
            .await
            .rent_details
            .iter()
            .find(|d| d.id == id)
            .cloned())
    }
}

impl Database<Select<By<Option<RentDetail>, realty::Id>>> for Memory {
    type Ok = Option<RentDetail>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<RentDetail>, realty::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let realty_id = by.into_inner();
        Ok(self
            .0
            .lock()
            .await
            .rent_details
            .iter()
            .find(|d| d.realty_id == realty_id)
            .cloned())
    }
}

impl Database<Select<By<Vec<RentDetail>, Party>>> for Memory {
    type Ok = Vec<RentDetail>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<RentDetail>, Party>>,
    ) -> Result<Self::Ok, Self::Err> {
        let party = by.into_inner();
        let state = self.0.lock().await;
        Ok(newest_first(
            state
                .rent_details
                .iter()
                .filter(|d| party.matches(d.owner_id, d.tenant_id)),
            |d| d.created_at,
        ))
    }
}

impl Database<Insert<RentDetail>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(detail): Insert<RentDetail>,
    ) -> Result<Self::Ok, Self::Err> {
        upsert(&mut self.0.lock().await.rent_details, detail, |d| d.id);
        Ok(())
    }
}

impl Database<Update<PeriodAdvance>> for Memory {
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

        let mut state = self.0.lock().await;
        let Some(detail) = state.rent_details.iter_mut().find(|d| {
            d.id == rent_detail_id && d.current_period == expected
        }) else {
            return Ok(false);
        };
        detail.current_period = next;
        Ok(true)
    }
}

impl Database<Delete<By<RentDetail, rent_detail::Id>>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<RentDetail, rent_detail::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.0.lock().await.rent_details.retain(|d| d.id != id);
        Ok(())
    }
}

impl Database<Select<By<Option<Payment>, (rent_detail::Id, Period)>>>
    for Memory
{
    type Ok = Option<Payment>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Payment>, (rent_detail::Id, Period)>>,
    ) -> Result<Self::Ok, Self::Err> {
        let (rent_detail_id, period) = by.into_inner();
        Ok(self
            .0
            .lock()
            .await
            .payments
            .iter()
            .find(|p| p.rent_detail_id == rent_detail_id && p.period == period)
            .cloned())
    }
}

impl
    Database<
        Select<By<read::payment::list::Page, read::payment::list::Selector>>,
    > for Memory
{
    type Ok = read::payment::list::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::payment::list::Page, read::payment::list::Selector>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let selector = by.into_inner();
        let rent_detail_id = selector.filter.rent_detail_id;

        let state = self.0.lock().await;
        let all = newest_first(
            state
                .payments
                .iter()
                .filter(|p| p.rent_detail_id == rent_detail_id),
            |p| p.created_at,
        );
        Ok(selector.select(all))
    }
}

impl Database<Insert<Payment>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(payment): Insert<Payment>,
    ) -> Result<Self::Ok, Self::Err> {
        self.0.lock().await.payments.push(payment);
        Ok(())
    }
}

impl Database<Delete<By<Vec<Payment>, rent_detail::Id>>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Vec<Payment>, rent_detail::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.0.lock().await.payments.retain(|p| p.rent_detail_id != id);
        Ok(())
    }
}

impl Database<Insert<Message>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(msg): Insert<Message>,
    ) -> Result<Self::Ok, Self::Err> {
        self.0.lock().await.messages.push(msg);
        Ok(())
    }
}

impl Database<Select<By<Vec<Message>, Participants>>> for Memory {
    type Ok = Vec<Message>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Message>, Participants>>,
    ) -> Result<Self::Ok, Self::Err> {
        let participants = by.into_inner();
        let mut messages = self
            .0
            .lock()
            .await
            .messages
            .iter()
            .filter(|m| m.participants() == participants)
            .cloned()
            .collect::<Vec<_>>();
        messages.sort_by_key(|m| m.created_at);
        Ok(messages)
    }
}

impl Database<Select<By<Option<read::chat::Latest>, Participants>>>
    for Memory
{
    type Ok = Option<read::chat::Latest>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<read::chat::Latest>, Participants>>,
    ) -> Result<Self::Ok, Self::Err> {
        let participants = by.into_inner();
        let state = self.0.lock().await;
        Ok(newest_first(
            state
                .messages
                .iter()
                .filter(|m| m.participants() == participants),
            |m| m.created_at,
        )
        .into_iter()
        .next()
        .map(read::chat::Latest))
    }
}

impl Database<Select<By<Vec<read::chat::Latest>, user::Id>>> for Memory {
    type Ok = Vec<read::chat::Latest>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<read::chat::Latest>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let user_id = by.into_inner();
        let state = self.0.lock().await;
        Ok(read::chat::latest_per_conversation(
            user_id,
            state.messages.iter().cloned(),
        ))
    }
}

impl Database<Update<MarkRead>> for Memory {
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

        let mut count = 0;
        for msg in &mut self.0.lock().await.messages {
            if msg.sender_id == partner_id
                && msg.recipient_id == reader_id
                && !msg.is_read
            {
                msg.is_read = true;
                count += 1;
            }
        }
        Ok(count)
    }
}

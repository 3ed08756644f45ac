//! [`Command`] for creating a new [`Contract`].

use common::{
    operations::{
        By, Commit, Insert, Lock, Select, Transact, Transacted, Update,
    },
    Date, DateTime, Money, PaymentPlan,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        contract,
        realty,
        user::{self, Role},
        Contract, Realty, User,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Contract`].
///
/// The [`Contract`] awaits the tenant's approval, while its [`Realty`] stops
/// being available.
#[derive(Clone, Debug)]
pub struct CreateContract {
    /// ID of the [`User`] renting out the [`Realty`].
    pub owner_id: user::Id,

    /// ID of the [`User`] renting the [`Realty`].
    pub tenant_id: user::Id,

    /// ID of the [`Realty`] being rented.
    pub realty_id: realty::Id,

    /// Monthly rent agreed upon.
    pub rent_amount: Money,

    /// [`PaymentPlan`] agreed upon.
    pub payment_plan: PaymentPlan,

    /// [`Date`] the tenancy starts on.
    pub start_date: Date,
}

impl<Db> Command<CreateContract> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        >,
    Transacted<Db>: Database<
            Lock<By<Realty, realty::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Realty>, realty::Id>>,
            Ok = Option<Realty>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Contract>, realty::Id>>,
            Ok = Option<Contract>,
            Err = Traced<database::Error>,
        > + Database<Insert<Contract>, Err = Traced<database::Error>>
        + Database<Update<Realty>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Contract;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateContract,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateContract {
            owner_id,
            tenant_id,
            realty_id,
            rent_amount,
            payment_plan,
            start_date,
        } = cmd;

        if !rent_amount.is_positive() {
            return Err(tracerr::new!(E::InvalidRent(rent_amount)));
        }

        self.database()
            .execute(Select(By::<Option<User>, _>::new(tenant_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .filter(|u| u.role == Role::Tenant)
            .ok_or(E::TenantNotExists(tenant_id))
            .map_err(tracerr::wrap!())
            .map(drop)?;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent contracts upon the same `Realty`.
        tx.execute(Lock(By::new(realty_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut realty = tx
            .execute(Select(By::<Option<Realty>, _>::new(realty_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .filter(|r| r.owner_id == owner_id)
            .ok_or(E::RealtyNotExists(realty_id))
            .map_err(tracerr::wrap!())?;

        if let Some(existing) = tx
            .execute(Select(By::<Option<Contract>, _>::new(realty_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
        {
            return Err(tracerr::new!(
                if existing.owner_id == owner_id
                    && existing.tenant_id == tenant_id
                {
                    E::ContractExists(existing.id)
                } else {
                    E::RealtyOccupied(realty_id)
                }
            ));
        }

        let contract = Contract {
            id: contract::Id::new(),
            owner_id,
            tenant_id,
            realty_id,
            rent_amount,
            payment_plan,
            start_date,
            status: contract::Status::Pending,
            created_at: DateTime::now().coerce(),
        };
        tx.execute(Insert(contract.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        realty.is_available = false;
        tx.execute(Update(realty))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(contract)
    }
}

/// Error of [`CreateContract`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Contract`] between the same parties upon the same [`Realty`] exists
    /// already.
    #[display("`Contract(id: {_0})` exists already")]
    ContractExists(#[error(not(source))] contract::Id),

    /// Agreed rent is not a positive amount.
    #[display("Rent must be positive, got `{_0}`")]
    InvalidRent(#[error(not(source))] Money),

    /// [`Realty`] is rented out under another [`Contract`].
    #[display("`Realty(id: {_0})` is occupied by another `Contract`")]
    RealtyOccupied(#[error(not(source))] realty::Id),

    /// [`Realty`] with the provided ID does not exist or belongs to another
    /// owner.
    #[display("`Realty(id: {_0})` does not exist")]
    RealtyNotExists(#[error(not(source))] realty::Id),

    /// Tenant [`User`] with the provided ID does not exist.
    #[display("Tenant `User(id: {_0})` does not exist")]
    TenantNotExists(#[error(not(source))] user::Id),
}

#[cfg(test)]
mod spec {
    use common::{
        operations::{By, Select},
        PaymentPlan,
    };

    use crate::{
        domain::{contract, user::Role, Realty},
        infra::Database as _,
        test_util, Command as _,
    };

    use super::{CreateContract, ExecutionError};

    #[tokio::test]
    async fn creates_pending_contract_and_occupies_realty() {
        let service = test_util::service();
        let owner = test_util::user(&service, Role::Owner, "Olivia").await;
        let tenant = test_util::user(&service, Role::Tenant, "Tom").await;
        let realty = test_util::realty(&service, owner.id).await;

        let contract = service
            .execute(CreateContract {
                owner_id: owner.id,
                tenant_id: tenant.id,
                realty_id: realty.id,
                rent_amount: test_util::usd(1000),
                payment_plan: PaymentPlan::Monthly,
                start_date: test_util::date("2024-01-01"),
            })
            .await
            .unwrap();

        assert_eq!(contract.status, contract::Status::Pending);
        let realty = service
            .database()
            .execute(Select(By::<Option<Realty>, _>::new(realty.id)))
            .await
            .unwrap()
            .unwrap();
        assert!(!realty.is_available);
    }

    #[tokio::test]
    async fn rejects_duplicates() {
        let service = test_util::service();
        let owner = test_util::user(&service, Role::Owner, "Olivia").await;
        let tenant = test_util::user(&service, Role::Tenant, "Tom").await;
        let other = test_util::user(&service, Role::Tenant, "Tina").await;
        let realty = test_util::realty(&service, owner.id).await;
        let cmd = |tenant_id| CreateContract {
            owner_id: owner.id,
            tenant_id,
            realty_id: realty.id,
            rent_amount: test_util::usd(1000),
            payment_plan: PaymentPlan::EveryThreeMonths,
            start_date: test_util::date("2024-01-01"),
        };

        let first = service.execute(cmd(tenant.id)).await.unwrap();

        let err = service.execute(cmd(tenant.id)).await.unwrap_err();
        assert!(matches!(
            err.as_ref(),
            ExecutionError::ContractExists(id) if *id == first.id,
        ));

        let err = service.execute(cmd(other.id)).await.unwrap_err();
        assert!(matches!(
            err.as_ref(),
            ExecutionError::RealtyOccupied(id) if *id == realty.id,
        ));
    }

    #[tokio::test]
    async fn requires_tenant_and_owned_realty() {
        let service = test_util::service();
        let owner = test_util::user(&service, Role::Owner, "Olivia").await;
        let stranger = test_util::user(&service, Role::Owner, "Sam").await;
        let tenant = test_util::user(&service, Role::Tenant, "Tom").await;
        let realty = test_util::realty(&service, stranger.id).await;

        let err = service
            .execute(CreateContract {
                owner_id: owner.id,
                tenant_id: stranger.id,
                realty_id: realty.id,
                rent_amount: test_util::usd(1000),
                payment_plan: PaymentPlan::Monthly,
                start_date: test_util::date("2024-01-01"),
            })
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::TenantNotExists(_)));

        let err = service
            .execute(CreateContract {
                owner_id: owner.id,
                tenant_id: tenant.id,
                realty_id: realty.id,
                rent_amount: test_util::usd(1000),
                payment_plan: PaymentPlan::Monthly,
                start_date: test_util::date("2024-01-01"),
            })
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::RealtyNotExists(_)));
    }

    #[tokio::test]
    async fn rejects_non_positive_rent() {
        let service = test_util::service();
        let owner = test_util::user(&service, Role::Owner, "Olivia").await;
        let tenant = test_util::user(&service, Role::Tenant, "Tom").await;
        let realty = test_util::realty(&service, owner.id).await;

        for rent in [0, -1] {
            let err = service
                .execute(CreateContract {
                    owner_id: owner.id,
                    tenant_id: tenant.id,
                    realty_id: realty.id,
                    rent_amount: test_util::usd(rent),
                    payment_plan: PaymentPlan::Monthly,
                    start_date: test_util::date("2024-01-01"),
                })
                .await
                .unwrap_err();
            assert!(
                matches!(err.as_ref(), ExecutionError::InvalidRent(_)),
                "{rent}",
            );
        }
    }
}

//! [`Command`] for terminating a [`Contract`].

use common::operations::{
    By, Commit, Delete, Lock, Select, Transact, Transacted, Update,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        contract, realty, rent_detail, user, Contract, Payment, Realty,
        RentDetail,
    },
    infra::{database, Database},
    Service,
};
#[cfg(doc)]
use crate::domain::User;

use super::Command;

/// [`Command`] for terminating a [`Contract`] by its owner.
///
/// The [`Realty`] becomes available again, and the [`RentDetail`] of the same
/// tenancy is deleted along with its [`Payment`]s history.
#[derive(Clone, Copy, Debug)]
pub struct TerminateContract {
    /// ID of the [`Contract`] to be terminated.
    pub contract_id: contract::Id,

    /// ID of the owner [`User`] who terminates the [`Contract`].
    pub owner_id: user::Id,
}

impl<Db> Command<TerminateContract> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Contract, contract::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Contract>, contract::Id>>,
            Ok = Option<Contract>,
            Err = Traced<database::Error>,
        > + Database<
            Delete<By<Contract, contract::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Lock<By<Realty, realty::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Realty>, realty::Id>>,
            Ok = Option<Realty>,
            Err = Traced<database::Error>,
        > + Database<Update<Realty>, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<RentDetail>, realty::Id>>,
            Ok = Option<RentDetail>,
            Err = Traced<database::Error>,
        > + Database<
            Delete<By<Vec<Payment>, rent_detail::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Delete<By<RentDetail, rent_detail::Id>>,
            Err = Traced<database::Error>,
        > + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Contract;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: TerminateContract,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let TerminateContract {
            contract_id,
            owner_id,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Lock(By::<Contract, _>::new(contract_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let contract = tx
            .execute(Select(By::<Option<Contract>, _>::new(contract_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .filter(|c| c.owner_id == owner_id)
            .ok_or(E::ContractNotExists(contract_id))
            .map_err(tracerr::wrap!())?;

        // Avoid concurrent actions upon the same `Realty`.
        tx.execute(Lock(By::<Realty, _>::new(contract.realty_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut realty = tx
            .execute(Select(By::<Option<Realty>, _>::new(contract.realty_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::RealtyNotExists(contract.realty_id))
            .map_err(tracerr::wrap!())?;

        tx.execute(Delete(By::<Contract, _>::new(contract.id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        realty.is_available = true;
        tx.execute(Update(realty))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let detail = tx
            .execute(Select(By::<Option<RentDetail>, _>::new(
                contract.realty_id,
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .filter(|d| {
                d.owner_id == contract.owner_id
                    && d.tenant_id == contract.tenant_id
            });
        if let Some(detail) = &detail {
            tx.execute(Delete(By::<Vec<Payment>, _>::new(detail.id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
            tx.execute(Delete(By::<RentDetail, _>::new(detail.id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
        }

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tracing::info!(
            contract.id = %contract.id,
            realty.id = %contract.realty_id,
            rent_detail.id = ?detail.map(|d| d.id.to_string()),
            "contract terminated",
        );

        Ok(contract)
    }
}

/// Error of [`TerminateContract`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Contract`] with the provided ID does not exist or belongs to another
    /// owner.
    #[display("`Contract(id: {_0})` does not exist")]
    ContractNotExists(#[error(not(source))] contract::Id),

    /// [`Realty`] of the [`Contract`] does not exist.
    #[display("`Realty(id: {_0})` does not exist")]
    RealtyNotExists(#[error(not(source))] realty::Id),
}

#[cfg(test)]
mod spec {
    use common::{
        operations::{By, Select},
        PaymentPlan, Period,
    };

    use crate::{
        command::{CreateContract, CreateRentDetail, RegisterPayment},
        domain::{payment, user::Role, Realty, RentDetail},
        infra::Database as _,
        read::payment::list,
        test_util, Command as _,
    };

    use super::{ExecutionError, TerminateContract};

    #[tokio::test]
    async fn removes_tenancy_and_frees_realty() {
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
        let detail = service
            .execute(CreateRentDetail {
                owner_id: owner.id,
                tenant_id: tenant.id,
                realty_id: realty.id,
                payment_plan: PaymentPlan::Monthly,
                monthly_rent: test_util::usd(1000),
                start_date: test_util::date("2024-01-01"),
                end_date: Some(test_util::date("2024-01-31")),
            })
            .await
            .unwrap();
        drop(
            service
                .execute(RegisterPayment {
                    rent_detail_id: detail.id,
                    owner_id: owner.id,
                    period: Period::new(
                        test_util::date("2024-01-01"),
                        test_util::date("2024-01-31"),
                    )
                    .unwrap(),
                    method: payment::Method::new("Cash").unwrap(),
                    amount: None,
                })
                .await
                .unwrap(),
        );

        let err = service
            .execute(TerminateContract {
                contract_id: contract.id,
                owner_id: tenant.id,
            })
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::ContractNotExists(_)));

        drop(
            service
                .execute(TerminateContract {
                    contract_id: contract.id,
                    owner_id: owner.id,
                })
                .await
                .unwrap(),
        );

        let db = service.database();
        let realty = db
            .execute(Select(By::<Option<Realty>, _>::new(realty.id)))
            .await
            .unwrap()
            .unwrap();
        assert!(realty.is_available);
        assert!(db
            .execute(Select(By::<Option<RentDetail>, _>::new(detail.id)))
            .await
            .unwrap()
            .is_none());
        let history = db
            .execute(Select(By::<list::Page, _>::new(list::Selector {
                arguments: list::Arguments::new(None, None, 5).unwrap(),
                filter: list::Filter {
                    rent_detail_id: detail.id,
                },
            })))
            .await
            .unwrap();
        assert_eq!(history.total_count, 0);
    }
}

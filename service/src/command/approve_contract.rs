//! [`Command`] for approving a [`Contract`] by its tenant.

use common::operations::{By, Commit, Lock, Select, Transact, Transacted, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{contract, user, Contract},
    infra::{database, Database},
    Service,
};
#[cfg(doc)]
use crate::domain::User;

use super::Command;

/// [`Command`] for approving a [`Contract`] by its tenant.
#[derive(Clone, Copy, Debug)]
pub struct ApproveContract {
    /// ID of the [`Contract`] to approve.
    pub contract_id: contract::Id,

    /// ID of the tenant [`User`] approving the [`Contract`].
    pub tenant_id: user::Id,
}

impl<Db> Command<ApproveContract> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Contract, contract::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Contract>, contract::Id>>,
            Ok = Option<Contract>,
            Err = Traced<database::Error>,
        > + Database<Update<Contract>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Contract;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: ApproveContract,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let ApproveContract {
            contract_id,
            tenant_id,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Lock(By::new(contract_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut contract = tx
            .execute(Select(By::<Option<Contract>, _>::new(contract_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .filter(|c| c.tenant_id == tenant_id)
            .ok_or(E::ContractNotExists(contract_id))
            .map_err(tracerr::wrap!())?;
        if contract.status == contract::Status::Active {
            return Ok(contract);
        }

        contract.status = contract::Status::Active;
        tx.execute(Update(contract.clone()))
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

/// Error of [`ApproveContract`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Contract`] with the provided ID does not exist or its tenant is
    /// another [`User`].
    #[display("`Contract(id: {_0})` does not exist")]
    ContractNotExists(#[error(not(source))] contract::Id),
}

#[cfg(test)]
mod spec {
    use common::PaymentPlan;

    use crate::{
        command::CreateContract,
        domain::{contract, user::Role},
        test_util, Command as _,
    };

    use super::{ApproveContract, ExecutionError};

    #[tokio::test]
    async fn activates_contract_for_its_tenant_only() {
        let service = test_util::service();
        let owner = test_util::user(&service, Role::Owner, "Olivia").await;
        let tenant = test_util::user(&service, Role::Tenant, "Tom").await;
        let other = test_util::user(&service, Role::Tenant, "Tina").await;
        let realty = test_util::realty(&service, owner.id).await;
        let created = service
            .execute(CreateContract {
                owner_id: owner.id,
                tenant_id: tenant.id,
                realty_id: realty.id,
                rent_amount: test_util::usd(800),
                payment_plan: PaymentPlan::Monthly,
                start_date: test_util::date("2024-03-01"),
            })
            .await
            .unwrap();

        let err = service
            .execute(ApproveContract {
                contract_id: created.id,
                tenant_id: other.id,
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_ref(),
            ExecutionError::ContractNotExists(id) if *id == created.id,
        ));

        let approved = service
            .execute(ApproveContract {
                contract_id: created.id,
                tenant_id: tenant.id,
            })
            .await
            .unwrap();
        assert_eq!(approved.status, contract::Status::Active);
    }
}

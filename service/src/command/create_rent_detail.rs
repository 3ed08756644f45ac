//! [`Command`] for creating a new [`RentDetail`].

use common::{
    operations::{By, Commit, Insert, Lock, Select, Transact, Transacted},
    plan::InvalidPeriodError,
    Date, DateTime, Money, PaymentPlan, Period,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        realty, rent_detail,
        user::{self, Role},
        Realty, RentDetail, User,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`RentDetail`] tracking the rent payments
/// of a tenancy.
#[derive(Clone, Debug)]
pub struct CreateRentDetail {
    /// ID of the owner [`User`] renting out the [`Realty`].
    pub owner_id: user::Id,

    /// ID of the tenant [`User`] renting the [`Realty`].
    pub tenant_id: user::Id,

    /// ID of the rented [`Realty`].
    pub realty_id: realty::Id,

    /// [`PaymentPlan`] of the rent.
    pub payment_plan: PaymentPlan,

    /// Rent for a single month.
    pub monthly_rent: Money,

    /// First day of the first billing [`Period`].
    pub start_date: Date,

    /// Last day of the first billing [`Period`].
    ///
    /// A year after the `start_date`, if omitted.
    pub end_date: Option<Date>,
}

impl<Db> Command<CreateRentDetail> for Service<Db>
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
            Select<By<Option<RentDetail>, realty::Id>>,
            Ok = Option<RentDetail>,
            Err = Traced<database::Error>,
        > + Database<Insert<RentDetail>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = RentDetail;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateRentDetail,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateRentDetail {
            owner_id,
            tenant_id,
            realty_id,
            payment_plan,
            monthly_rent,
            start_date,
            end_date,
        } = cmd;

        if !monthly_rent.is_positive() {
            return Err(tracerr::new!(E::InvalidRent(monthly_rent)));
        }

        let end_date = end_date.unwrap_or_else(|| start_date.add_years(1));
        let period = Period::new(start_date, end_date)
            .map_err(tracerr::from_and_wrap!(=> E))?;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent tenancies upon the same `Realty`.
        tx.execute(Lock(By::new(realty_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        if let Some(existing) = tx
            .execute(Select(By::<Option<RentDetail>, _>::new(realty_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
        {
            return Err(tracerr::new!(
                if existing.owner_id == owner_id
                    && existing.tenant_id == tenant_id
                {
                    E::RentDetailExists(existing.id)
                } else {
                    E::RealtyOccupied(realty_id)
                }
            ));
        }

        self.database()
            .execute(Select(By::<Option<User>, _>::new(tenant_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .filter(|u| u.role == Role::Tenant)
            .ok_or(E::TenantNotExists(tenant_id))
            .map_err(tracerr::wrap!())
            .map(drop)?;

        tx.execute(Select(By::<Option<Realty>, _>::new(realty_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .filter(|r| r.owner_id == owner_id)
            .ok_or(E::RealtyNotExists(realty_id))
            .map_err(tracerr::wrap!())
            .map(drop)?;

        let detail = RentDetail {
            id: rent_detail::Id::new(),
            owner_id,
            tenant_id,
            realty_id,
            payment_plan,
            current_period: period,
            monthly_rent,
            created_at: DateTime::now().coerce(),
        };
        tx.execute(Insert(detail.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tracing::debug!(
            rent_detail.id = %detail.id,
            period = %detail.current_period,
            "rent detail created",
        );

        Ok(detail)
    }
}

/// Error of [`CreateRentDetail`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// Monthly rent is not a positive amount.
    #[display("Monthly rent must be positive, got `{_0}`")]
    #[from(ignore)]
    InvalidRent(#[error(not(source))] Money),

    /// Start of the first billing [`Period`] is not before its end.
    #[display("Invalid billing period: {_0}")]
    InvalidPeriod(InvalidPeriodError),

    /// [`Realty`] is rented out under another [`RentDetail`].
    #[display("`Realty(id: {_0})` is occupied by another tenancy")]
    #[from(ignore)]
    RealtyOccupied(#[error(not(source))] realty::Id),

    /// [`Realty`] with the provided ID does not exist or belongs to another
    /// owner.
    #[display("`Realty(id: {_0})` does not exist")]
    #[from(ignore)]
    RealtyNotExists(#[error(not(source))] realty::Id),

    /// [`RentDetail`] of the same tenancy exists already.
    #[display("`RentDetail(id: {_0})` exists already")]
    #[from(ignore)]
    RentDetailExists(#[error(not(source))] rent_detail::Id),

    /// Tenant [`User`] with the provided ID does not exist.
    #[display("Tenant `User(id: {_0})` does not exist")]
    #[from(ignore)]
    TenantNotExists(#[error(not(source))] user::Id),
}

#[cfg(test)]
mod spec {
    use common::PaymentPlan;

    use crate::{
        domain::user::{self, Role},
        test_util, Command as _,
    };

    use super::{CreateRentDetail, ExecutionError};

    #[tokio::test]
    async fn defaults_end_date_to_a_year_after_start() {
        let service = test_util::service();
        let owner = test_util::user(&service, Role::Owner, "Olivia").await;
        let tenant = test_util::user(&service, Role::Tenant, "Tom").await;
        let realty = test_util::realty(&service, owner.id).await;

        let detail = service
            .execute(CreateRentDetail {
                owner_id: owner.id,
                tenant_id: tenant.id,
                realty_id: realty.id,
                payment_plan: PaymentPlan::EveryThreeMonths,
                monthly_rent: test_util::usd(1000),
                start_date: test_util::date("2024-02-29"),
                end_date: None,
            })
            .await
            .unwrap();

        assert_eq!(
            detail.current_period.from(),
            test_util::date("2024-02-29"),
        );
        assert_eq!(detail.current_period.to(), test_util::date("2025-02-28"));
        assert_eq!(detail.total_rent(), test_util::usd(3000));
        assert_eq!(detail.next_due_date(), test_util::date("2025-03-01"));
    }

    #[tokio::test]
    async fn rejects_unordered_period() {
        let service = test_util::service();
        let owner = test_util::user(&service, Role::Owner, "Olivia").await;
        let tenant = test_util::user(&service, Role::Tenant, "Tom").await;
        let realty = test_util::realty(&service, owner.id).await;

        let err = service
            .execute(CreateRentDetail {
                owner_id: owner.id,
                tenant_id: tenant.id,
                realty_id: realty.id,
                payment_plan: PaymentPlan::Monthly,
                monthly_rent: test_util::usd(1000),
                start_date: test_util::date("2024-05-01"),
                end_date: Some(test_util::date("2024-05-01")),
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::InvalidPeriod(_)));
    }

    #[tokio::test]
    async fn allows_single_tenancy_per_realty() {
        let service = test_util::service();
        let owner = test_util::user(&service, Role::Owner, "Olivia").await;
        let tenant = test_util::user(&service, Role::Tenant, "Tom").await;
        let other = test_util::user(&service, Role::Tenant, "Tina").await;
        let realty = test_util::realty(&service, owner.id).await;
        let cmd = |tenant_id| CreateRentDetail {
            owner_id: owner.id,
            tenant_id,
            realty_id: realty.id,
            payment_plan: PaymentPlan::Monthly,
            monthly_rent: test_util::usd(1000),
            start_date: test_util::date("2024-01-01"),
            end_date: None,
        };

        let first = service.execute(cmd(tenant.id)).await.unwrap();

        let err = service.execute(cmd(tenant.id)).await.unwrap_err();
        assert!(matches!(
            err.as_ref(),
            ExecutionError::RentDetailExists(id) if *id == first.id,
        ));

        let err = service.execute(cmd(other.id)).await.unwrap_err();
        assert!(matches!(
            err.as_ref(),
            ExecutionError::RealtyOccupied(id) if *id == realty.id,
        ));
    }

    #[tokio::test]
    async fn requires_existing_tenant_and_realty() {
        let service = test_util::service();
        let owner = test_util::user(&service, Role::Owner, "Olivia").await;
        let tenant = test_util::user(&service, Role::Tenant, "Tom").await;
        let realty = test_util::realty(&service, owner.id).await;

        let err = service
            .execute(CreateRentDetail {
                owner_id: owner.id,
                tenant_id: owner.id,
                realty_id: realty.id,
                payment_plan: PaymentPlan::Monthly,
                monthly_rent: test_util::usd(1000),
                start_date: test_util::date("2024-01-01"),
                end_date: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::TenantNotExists(_)));

        let err = service
            .execute(CreateRentDetail {
                owner_id: tenant.id,
                tenant_id: tenant.id,
                realty_id: realty.id,
                payment_plan: PaymentPlan::Monthly,
                monthly_rent: test_util::usd(1000),
                start_date: test_util::date("2024-01-01"),
                end_date: None,
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

        for rent in [0, -100] {
            let err = service
                .execute(CreateRentDetail {
                    owner_id: owner.id,
                    tenant_id: tenant.id,
                    realty_id: realty.id,
                    payment_plan: PaymentPlan::Monthly,
                    monthly_rent: test_util::usd(rent),
                    start_date: test_util::date("2024-01-01"),
                    end_date: None,
                })
                .await
                .unwrap_err();
            assert!(
                matches!(err.as_ref(), ExecutionError::InvalidRent(_)),
                "{rent}",
            );
        }
    }

    #[tokio::test]
    async fn reports_occupied_realty_before_missing_tenant() {
        let service = test_util::service();
        let owner = test_util::user(&service, Role::Owner, "Olivia").await;
        let tenant = test_util::user(&service, Role::Tenant, "Tom").await;
        let realty = test_util::realty(&service, owner.id).await;
        let cmd = |tenant_id| CreateRentDetail {
            owner_id: owner.id,
            tenant_id,
            realty_id: realty.id,
            payment_plan: PaymentPlan::Monthly,
            monthly_rent: test_util::usd(1000),
            start_date: test_util::date("2024-01-01"),
            end_date: None,
        };
        _ = service.execute(cmd(tenant.id)).await.unwrap();

        let err = service.execute(cmd(user::Id::new())).await.unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::RealtyOccupied(id) if *id == realty.id,
        ));
    }
}

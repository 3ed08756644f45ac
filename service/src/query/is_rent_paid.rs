//! [`IsRentPaid`] definition.

use common::{
    operations::{By, Select},
    Period,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{rent_detail, Payment, RentDetail},
    infra::{database, Database},
    Query, Service,
};

/// [`Query`] checking whether a [`Payment`] is registered for a billing
/// [`Period`] of a [`RentDetail`].
#[derive(Clone, Copy, Debug)]
pub struct IsRentPaid {
    /// ID of the [`RentDetail`] to check.
    pub rent_detail_id: rent_detail::Id,

    /// Billing [`Period`] to check.
    ///
    /// The current one of the [`RentDetail`], if omitted.
    pub period: Option<Period>,
}

impl<Db> Query<IsRentPaid> for Service<Db>
where
    Db: Database<
            Select<By<Option<RentDetail>, rent_detail::Id>>,
            Ok = Option<RentDetail>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Payment>, (rent_detail::Id, Period)>>,
            Ok = Option<Payment>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = bool;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        IsRentPaid {
            rent_detail_id,
            period,
        }: IsRentPaid,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let period = match period {
            Some(p) => p,
            None => {
                self.database()
                    .execute(Select(By::<Option<RentDetail>, _>::new(
                        rent_detail_id,
                    )))
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))?
                    .ok_or(E::RentDetailNotExists(rent_detail_id))
                    .map_err(tracerr::wrap!())?
                    .current_period
            }
        };

        Ok(self
            .database()
            .execute(Select(By::<Option<Payment>, _>::new((
                rent_detail_id,
                period,
            ))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .is_some())
    }
}

/// Error of [`IsRentPaid`] [`Query`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`RentDetail`] with the provided ID does not exist.
    #[display("`RentDetail(id: {_0})` does not exist")]
    RentDetailNotExists(#[error(not(source))] rent_detail::Id),
}

#[cfg(test)]
mod spec {
    use common::PaymentPlan;

    use crate::{
        command::{CreateRentDetail, RegisterPayment},
        domain::{payment, rent_detail, user::Role},
        test_util, Query as _,
    };

    use super::{ExecutionError, IsRentPaid};

    #[tokio::test]
    async fn becomes_paid_after_registration() {
        let service = test_util::service();
        let owner = test_util::user(&service, Role::Owner, "Olivia").await;
        let tenant = test_util::user(&service, Role::Tenant, "Tom").await;
        let realty = test_util::realty(&service, owner.id).await;
        let detail = service
            .execute(CreateRentDetail {
                owner_id: owner.id,
                tenant_id: tenant.id,
                realty_id: realty.id,
                payment_plan: PaymentPlan::Monthly,
                monthly_rent: test_util::usd(700),
                start_date: test_util::date("2024-06-01"),
                end_date: Some(test_util::date("2024-06-30")),
            })
            .await
            .unwrap();
        let paid = detail.current_period;

        let is_paid = service
            .execute(IsRentPaid {
                rent_detail_id: detail.id,
                period: None,
            })
            .await
            .unwrap();
        assert!(!is_paid);

        drop(
            service
                .execute(RegisterPayment {
                    rent_detail_id: detail.id,
                    owner_id: owner.id,
                    period: paid,
                    method: payment::Method::new("Card").unwrap(),
                    amount: None,
                })
                .await
                .unwrap(),
        );

        let is_paid = service
            .execute(IsRentPaid {
                rent_detail_id: detail.id,
                period: Some(paid),
            })
            .await
            .unwrap();
        assert!(is_paid);

        // The current period has advanced and is not paid yet.
        let is_paid = service
            .execute(IsRentPaid {
                rent_detail_id: detail.id,
                period: None,
            })
            .await
            .unwrap();
        assert!(!is_paid);
    }

    #[tokio::test]
    async fn fails_for_unknown_rent_detail() {
        let service = test_util::service();

        let err = service
            .execute(IsRentPaid {
                rent_detail_id: rent_detail::Id::new(),
                period: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::RentDetailNotExists(_),
        ));
    }
}

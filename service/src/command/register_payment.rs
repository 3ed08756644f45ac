//! [`Command`] for registering a rent [`Payment`].

use common::{
    operations::{
        By, Commit, Insert, Lock, Select, Transact, Transacted, Update,
    },
    DateTime, Money, Period,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        payment,
        rent_detail::{self, PeriodAdvance},
        user, Payment, RentDetail,
    },
    infra::{database, Database},
    Service,
};
#[cfg(doc)]
use crate::domain::User;

use super::Command;

/// [`Command`] for registering a rent [`Payment`] of the current billing
/// [`Period`] of a [`RentDetail`].
///
/// The [`RentDetail`] advances to its next billing [`Period`].
#[derive(Clone, Debug)]
pub struct RegisterPayment {
    /// ID of the paid [`RentDetail`].
    pub rent_detail_id: rent_detail::Id,

    /// ID of the owner [`User`] registering the [`Payment`].
    pub owner_id: user::Id,

    /// Billing [`Period`] being paid, as seen by the initiator.
    pub period: Period,

    /// [`payment::Method`] the rent was paid with.
    pub method: payment::Method,

    /// Paid amount.
    ///
    /// The total rent of the [`Period`], if omitted.
    pub amount: Option<Money>,
}

impl<Db> Command<RegisterPayment> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<RentDetail, rent_detail::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<RentDetail>, rent_detail::Id>>,
            Ok = Option<RentDetail>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Payment>, (rent_detail::Id, Period)>>,
            Ok = Option<Payment>,
            Err = Traced<database::Error>,
        > + Database<
            Update<PeriodAdvance>,
            Ok = bool,
            Err = Traced<database::Error>,
        > + Database<Insert<Payment>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = (Payment, RentDetail);
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: RegisterPayment,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RegisterPayment {
            rent_detail_id,
            owner_id,
            period,
            method,
            amount,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Lock(By::new(rent_detail_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut detail = tx
            .execute(Select(By::<Option<RentDetail>, _>::new(rent_detail_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .filter(|d| d.owner_id == owner_id)
            .ok_or(E::RentDetailNotExists(rent_detail_id))
            .map_err(tracerr::wrap!())?;

        if let Some(amount) = amount.filter(|a| {
            !a.is_positive() || a.currency != detail.monthly_rent.currency
        }) {
            return Err(tracerr::new!(E::InvalidAmount(amount)));
        }

        if tx
            .execute(Select(By::<Option<Payment>, _>::new((
                rent_detail_id,
                period,
            ))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .is_some()
        {
            return Err(tracerr::new!(E::AlreadyPaid(period)));
        }
        if detail.current_period != period {
            return Err(tracerr::new!(E::PeriodMismatch {
                expected: detail.current_period,
                actual: period,
            }));
        }

        let next = detail
            .next_period()
            .ok_or(E::PeriodOutOfRange(period))
            .map_err(tracerr::wrap!())?;
        let advanced = tx
            .execute(Update(PeriodAdvance {
                rent_detail_id,
                expected: period,
                next,
            }))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if !advanced {
            // Concurrent registration has advanced the period already.
            return Err(tracerr::new!(E::AlreadyPaid(period)));
        }

        let payment = Payment {
            id: payment::Id::new(),
            rent_detail_id,
            period,
            amount_paid: amount.unwrap_or_else(|| detail.total_rent()),
            method,
            created_at: DateTime::now().coerce(),
        };
        tx.execute(Insert(payment.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tracing::info!(
            rent_detail.id = %rent_detail_id,
            payment.id = %payment.id,
            paid = %payment.amount_paid,
            period = %period,
            next_period = %next,
            "rent payment registered",
        );

        detail.current_period = next;
        Ok((payment, detail))
    }
}

/// Error of [`RegisterPayment`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Rent of the [`Period`] is paid already.
    #[display("Rent of the `{_0}` period is paid already")]
    AlreadyPaid(#[error(not(source))] Period),

    /// Paid amount is not positive or is in a currency other than the rent
    /// of the [`RentDetail`].
    #[display("Invalid paid amount `{_0}`")]
    InvalidAmount(#[error(not(source))] Money),

    /// Paid [`Period`] is not the current one of the [`RentDetail`].
    #[display("Paid period `{actual}` is not the current one `{expected}`")]
    PeriodMismatch {
        /// Current billing [`Period`] of the [`RentDetail`].
        expected: Period,

        /// Billing [`Period`] requested to be paid.
        actual: Period,
    },

    /// No billing [`Period`] follows the paid one within the calendar.
    #[display("No billing period follows the `{_0}` one")]
    PeriodOutOfRange(#[error(not(source))] Period),

    /// [`RentDetail`] with the provided ID does not exist or belongs to
    /// another owner.
    #[display("`RentDetail(id: {_0})` does not exist")]
    RentDetailNotExists(#[error(not(source))] rent_detail::Id),
}

#[cfg(test)]
mod spec {
    use common::{
        money::Currency,
        operations::{By, Commit, Insert, Lock, Select, Transact, Update},
        Money, PaymentPlan, Period,
    };
    use rust_decimal::Decimal;
    use tracerr::Traced;

    use crate::{
        command::CreateRentDetail,
        domain::{
            payment,
            rent_detail::{self, PeriodAdvance},
            user::Role,
            Payment, RentDetail,
        },
        infra::{database, Database, Memory},
        query, read, test_util, Command as _, Query as _, Service,
    };

    use super::{ExecutionError, RegisterPayment};

    async fn setup(plan: PaymentPlan) -> (Service<Memory>, RentDetail) {
        let service = test_util::service();
        let owner = test_util::user(&service, Role::Owner, "Olivia").await;
        let tenant = test_util::user(&service, Role::Tenant, "Tom").await;
        let realty = test_util::realty(&service, owner.id).await;
        let detail = service
            .execute(CreateRentDetail {
                owner_id: owner.id,
                tenant_id: tenant.id,
                realty_id: realty.id,
                payment_plan: plan,
                monthly_rent: test_util::usd(1000),
                start_date: test_util::date("2024-01-01"),
                end_date: Some(test_util::date("2024-03-31")),
            })
            .await
            .unwrap();
        (service, detail)
    }

    fn pay(detail: &RentDetail, period: Period) -> RegisterPayment {
        RegisterPayment {
            rent_detail_id: detail.id,
            owner_id: detail.owner_id,
            period,
            method: payment::Method::new("Bank transfer").unwrap(),
            amount: None,
        }
    }

    #[tokio::test]
    async fn records_payment_and_advances_period() {
        let (service, detail) = setup(PaymentPlan::EveryThreeMonths).await;

        let (payment, advanced) = service
            .execute(pay(&detail, detail.current_period))
            .await
            .unwrap();

        assert_eq!(payment.period, detail.current_period);
        assert_eq!(payment.amount_paid, test_util::usd(3000));
        assert_eq!(advanced.current_period.from(), test_util::date("2024-04-01"));
        assert_eq!(advanced.current_period.to(), test_util::date("2024-07-01"));

        let stored = service
            .database()
            .execute(Select(By::<Option<RentDetail>, _>::new(detail.id)))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.current_period, advanced.current_period);

        let recorded = service
            .database()
            .execute(Select(By::<Option<Payment>, _>::new((
                detail.id,
                detail.current_period,
            ))))
            .await
            .unwrap();
        assert!(recorded.is_some());
    }

    #[tokio::test]
    async fn rejects_paying_same_period_twice() {
        let (service, detail) = setup(PaymentPlan::Monthly).await;

        drop(
            service
                .execute(pay(&detail, detail.current_period))
                .await
                .unwrap(),
        );
        let err = service
            .execute(pay(&detail, detail.current_period))
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::AlreadyPaid(p) if *p == detail.current_period,
        ));
    }

    #[tokio::test]
    async fn rejects_period_other_than_current() {
        let (service, detail) = setup(PaymentPlan::Monthly).await;
        let future = detail.next_period().unwrap();

        let err = service.execute(pay(&detail, future)).await.unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::PeriodMismatch { expected, actual }
                if *expected == detail.current_period && *actual == future,
        ));
    }

    #[tokio::test]
    async fn keeps_explicit_amount() {
        let (service, detail) = setup(PaymentPlan::Monthly).await;

        let (payment, _) = service
            .execute(RegisterPayment {
                amount: Some(test_util::usd(950)),
                ..pay(&detail, detail.current_period)
            })
            .await
            .unwrap();

        assert_eq!(payment.amount_paid, test_util::usd(950));
    }

    #[tokio::test]
    async fn hides_rent_detail_of_another_owner() {
        let (service, detail) = setup(PaymentPlan::Monthly).await;
        let stranger = test_util::user(&service, Role::Owner, "Sam").await;

        let err = service
            .execute(RegisterPayment {
                owner_id: stranger.id,
                ..pay(&detail, detail.current_period)
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::RentDetailNotExists(id) if *id == detail.id,
        ));
    }

    #[tokio::test]
    async fn rejects_invalid_explicit_amount() {
        let (service, detail) = setup(PaymentPlan::Monthly).await;
        let euros = Money {
            amount: Decimal::from(1000),
            currency: Currency::Eur,
        };

        for amount in [test_util::usd(0), test_util::usd(-5), euros] {
            let err = service
                .execute(RegisterPayment {
                    amount: Some(amount),
                    ..pay(&detail, detail.current_period)
                })
                .await
                .unwrap_err();
            assert!(
                matches!(
                    err.as_ref(),
                    ExecutionError::InvalidAmount(a) if *a == amount,
                ),
                "{amount}",
            );
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn registers_single_payment_among_concurrent_ones() {
        for _ in 0..20 {
            let (service, detail) = setup(PaymentPlan::Monthly).await;

            let (first, second) = tokio::join!(
                tokio::spawn({
                    let (service, cmd) =
                        (service.clone(), pay(&detail, detail.current_period));
                    async move { service.execute(cmd).await }
                }),
                tokio::spawn({
                    let (service, cmd) =
                        (service.clone(), pay(&detail, detail.current_period));
                    async move { service.execute(cmd).await }
                }),
            );
            let results = [first.unwrap(), second.unwrap()];

            assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
            assert!(results.iter().filter_map(|r| r.as_ref().err()).all(
                |e| matches!(
                    e.as_ref(),
                    ExecutionError::AlreadyPaid(p)
                        if *p == detail.current_period,
                ),
            ));

            let page = service
                .execute(query::payments::List::by(
                    read::payment::list::Selector {
                        arguments: read::payment::list::Arguments::new(
                            None, None, 10,
                        )
                        .unwrap(),
                        filter: read::payment::list::Filter {
                            rent_detail_id: detail.id,
                        },
                    },
                ))
                .await
                .unwrap();
            assert_eq!(page.total_count, 1);
        }
    }

    #[tokio::test]
    async fn advances_period_only_from_expected_one() {
        let (service, detail) = setup(PaymentPlan::Monthly).await;
        let next = detail.next_period().unwrap();
        let advance = PeriodAdvance {
            rent_detail_id: detail.id,
            expected: detail.current_period,
            next,
        };

        assert!(service.database().execute(Update(advance)).await.unwrap());
        assert!(!service.database().execute(Update(advance)).await.unwrap());

        let stored = service
            .database()
            .execute(Select(By::<Option<RentDetail>, _>::new(detail.id)))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.current_period, next);
    }

    /// [`Memory`] where a rival registration advances the period of the
    /// [`RentDetail`] right after it has been read.
    #[derive(Clone, Debug)]
    struct Overtaken(Memory);

    impl Database<Transact> for Overtaken {
        type Ok = Self;
        type Err = Traced<database::Error>;

        async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
            Ok(self.clone())
        }
    }

    impl Database<Lock<By<RentDetail, rent_detail::Id>>> for Overtaken {
        type Ok = ();
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            op: Lock<By<RentDetail, rent_detail::Id>>,
        ) -> Result<Self::Ok, Self::Err> {
            self.0.execute(op).await
        }
    }

    impl Database<Select<By<Option<RentDetail>, rent_detail::Id>>>
        for Overtaken
    {
        type Ok = Option<RentDetail>;
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            op: Select<By<Option<RentDetail>, rent_detail::Id>>,
        ) -> Result<Self::Ok, Self::Err> {
            let detail = self.0.execute(op).await?;
            if let Some(d) = &detail {
                let advanced = self
                    .0
                    .execute(Update(PeriodAdvance {
                        rent_detail_id: d.id,
                        expected: d.current_period,
                        next: d.next_period().unwrap(),
                    }))
                    .await?;
                assert!(advanced, "rival registration should win");
            }
            Ok(detail)
        }
    }

    impl Database<Select<By<Option<Payment>, (rent_detail::Id, Period)>>>
        for Overtaken
    {
        type Ok = Option<Payment>;
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            op: Select<By<Option<Payment>, (rent_detail::Id, Period)>>,
        ) -> Result<Self::Ok, Self::Err> {
            self.0.execute(op).await
        }
    }

    impl Database<Update<PeriodAdvance>> for Overtaken {
        type Ok = bool;
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            op: Update<PeriodAdvance>,
        ) -> Result<Self::Ok, Self::Err> {
            self.0.execute(op).await
        }
    }

    impl Database<Insert<Payment>> for Overtaken {
        type Ok = ();
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            op: Insert<Payment>,
        ) -> Result<Self::Ok, Self::Err> {
            self.0.execute(op).await
        }
    }

    impl Database<Commit> for Overtaken {
        type Ok = ();
        type Err = Traced<database::Error>;

        async fn execute(&self, op: Commit) -> Result<Self::Ok, Self::Err> {
            self.0.execute(op).await
        }
    }

    #[tokio::test]
    async fn reports_already_paid_when_overtaken_by_rival() {
        let (service, detail) = setup(PaymentPlan::Monthly).await;
        let overtaken = Service::new(
            service.config().clone(),
            Overtaken(service.database().clone()),
        );

        let err = overtaken
            .execute(pay(&detail, detail.current_period))
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::AlreadyPaid(p) if *p == detail.current_period,
        ));
        let recorded = service
            .database()
            .execute(Select(By::<Option<Payment>, _>::new((
                detail.id,
                detail.current_period,
            ))))
            .await
            .unwrap();
        assert!(recorded.is_none());
    }
}

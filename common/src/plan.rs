//! Rent [`PaymentPlan`]s and billing [`Period`]s.

#[cfg(feature = "postgres")]
use std::error::Error as StdError;
use std::str::FromStr;

use derive_more::{Display, Error};
#[cfg(feature = "postgres")]
use postgres_types::{
    accepts, private::BytesMut, to_sql_checked, FromSql, IsNull, ToSql, Type,
};
use strum::{EnumIter, IntoEnumIterator as _};

use crate::{Date, Money};

/// Schedule of rent payments.
///
/// Discriminant of each variant is the number of months a single payment
/// covers.
#[derive(Clone, Copy, Debug, Display, EnumIter, Eq, Hash, PartialEq)]
#[repr(u8)]
pub enum PaymentPlan {
    /// Rent is paid every month.
    #[display("Monthly")]
    Monthly = 1,

    /// Rent is paid every 2 months.
    #[display("Every 2 Months")]
    EveryTwoMonths = 2,

    /// Rent is paid every 3 months.
    #[display("Every 3 Months")]
    EveryThreeMonths = 3,

    /// Rent is paid every 6 months.
    #[display("Every 6 Months")]
    EverySixMonths = 6,

    /// Rent is paid once a year.
    #[display("Every 12 Months")]
    EveryTwelveMonths = 12,
}

impl PaymentPlan {
    /// Returns the number of months a single payment of this [`PaymentPlan`]
    /// covers.
    #[must_use]
    pub const fn months(self) -> u8 {
        self as u8
    }

    /// Returns the [`PaymentPlan`] covering the provided number of months, if
    /// any.
    #[must_use]
    pub fn from_months(months: u8) -> Option<Self> {
        Self::iter().find(|p| p.months() == months)
    }

    /// Calculates the rent due for a single period of this [`PaymentPlan`].
    #[must_use]
    pub fn total_rent(self, monthly: Money) -> Money {
        monthly * self.months()
    }

    /// Returns the provided [`Date`] advanced by the months of this
    /// [`PaymentPlan`].
    #[must_use]
    pub fn add_to(self, date: Date) -> Date {
        date.add_months(u32::from(self.months()))
    }
}

impl FromStr for PaymentPlan {
    type Err = InvalidPlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "Monthly" => Self::Monthly,
            "Every 2 Months" => Self::EveryTwoMonths,
            "Every 3 Months" => Self::EveryThreeMonths,
            "Every 6 Months" => Self::EverySixMonths,
            "Every 12 Months" => Self::EveryTwelveMonths,
            _ => return Err(InvalidPlanError(s.to_owned())),
        })
    }
}

/// Error of an unrecognized [`PaymentPlan`] label.
#[derive(Clone, Debug, Display, Eq, Error, PartialEq)]
#[display("unrecognized payment plan: `{_0}`")]
pub struct InvalidPlanError(#[error(not(source))] pub String);

#[cfg(feature = "postgres")]
impl FromSql<'_> for PaymentPlan {
    accepts!(INT2);

    fn from_sql(
        ty: &Type,
        raw: &[u8],
    ) -> Result<Self, Box<dyn StdError + Sync + Send>> {
        let months = u8::try_from(i16::from_sql(ty, raw)?)?;
        Self::from_months(months).ok_or_else(|| {
            format!("invalid `PaymentPlan` value: {months}").into()
        })
    }
}

#[cfg(feature = "postgres")]
impl ToSql for PaymentPlan {
    accepts!(INT2);
    to_sql_checked!();

    fn to_sql(
        &self,
        ty: &Type,
        w: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn StdError + Sync + Send>> {
        i16::from(self.months()).to_sql(ty, w)
    }
}

/// Billing period of a rent, inclusive on both ends.
///
/// `from` is always strictly before `to`.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
#[display("{from}..{to}")]
pub struct Period {
    /// First day of this [`Period`].
    from: Date,

    /// Last day of this [`Period`].
    to: Date,
}

impl Period {
    /// Creates a new [`Period`] if `from` is before `to`.
    ///
    /// # Errors
    ///
    /// With [`InvalidPeriodError`] if `from` is not before `to`.
    pub fn new(from: Date, to: Date) -> Result<Self, InvalidPeriodError> {
        if from < to {
            Ok(Self { from, to })
        } else {
            Err(InvalidPeriodError { from, to })
        }
    }

    /// Returns the first day of this [`Period`].
    #[must_use]
    pub const fn from(&self) -> Date {
        self.from
    }

    /// Returns the last day of this [`Period`].
    #[must_use]
    pub const fn to(&self) -> Date {
        self.to
    }

    /// Returns the [`Period`] following this one under the provided
    /// [`PaymentPlan`].
    ///
    /// [`None`] is returned once the calendar is exhausted.
    #[must_use]
    pub fn next(&self, plan: PaymentPlan) -> Option<Self> {
        let from = self.to.next_day();
        Self::new(from, plan.add_to(from)).ok()
    }
}

/// Error of creating a [`Period`] whose start is not before its end.
#[derive(Clone, Copy, Debug, Display, Eq, Error, PartialEq)]
#[display("period start `{from}` is not before its end `{to}`")]
pub struct InvalidPeriodError {
    /// Requested start.
    pub from: Date,

    /// Requested end.
    pub to: Date,
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use rust_decimal::Decimal;
    use strum::IntoEnumIterator as _;

    use crate::{money::Currency, Date, Money};

    use super::{InvalidPlanError, PaymentPlan, Period};

    fn date(s: &str) -> Date {
        s.parse().unwrap()
    }

    fn usd(amount: i64) -> Money {
        Money {
            amount: Decimal::from(amount),
            currency: Currency::Usd,
        }
    }

    #[test]
    fn maps_labels_to_months() {
        for (label, months) in [
            ("Monthly", 1),
            ("Every 2 Months", 2),
            ("Every 3 Months", 3),
            ("Every 6 Months", 6),
            ("Every 12 Months", 12),
        ] {
            let plan = PaymentPlan::from_str(label).unwrap();
            assert_eq!(plan.months(), months, "{label}");
            assert_eq!(plan.to_string(), label);
            assert_eq!(PaymentPlan::from_months(months), Some(plan));
        }
        assert_eq!(PaymentPlan::from_months(4), None);
    }

    #[test]
    fn rejects_unknown_label() {
        assert_eq!(
            PaymentPlan::from_str("Weekly"),
            Err(InvalidPlanError("Weekly".into())),
        );
        assert!(PaymentPlan::from_str("monthly").is_err());
        assert!(PaymentPlan::from_str("").is_err());
    }

    #[test]
    fn total_rent() {
        assert_eq!(PaymentPlan::EveryThreeMonths.total_rent(usd(1000)), usd(3000));
        assert_eq!(PaymentPlan::Monthly.total_rent(usd(750)), usd(750));
        assert_eq!(
            PaymentPlan::EveryTwelveMonths.total_rent(Money {
                amount: "99.5".parse().unwrap(),
                currency: Currency::Eur,
            }),
            Money {
                amount: "1194.0".parse().unwrap(),
                currency: Currency::Eur,
            },
        );
    }

    #[test]
    fn adds_plan_months() {
        let start = date("2024-01-10");
        for plan in PaymentPlan::iter() {
            let added = plan.add_to(start);
            let months = u32::from(plan.months());
            assert_eq!(added.day(), 10, "{plan}");
            assert_eq!(
                (added.year() - 2024) * 12 + i32::from(added.month()) - 1,
                i32::try_from(months).unwrap(),
                "{plan}",
            );
        }
    }

    #[test]
    fn period_requires_order() {
        assert!(Period::new(date("2024-01-01"), date("2024-01-31")).is_ok());
        assert!(Period::new(date("2024-01-01"), date("2024-01-01")).is_err());
        assert!(Period::new(date("2024-02-01"), date("2024-01-01")).is_err());
    }

    #[test]
    fn next_period_follows_current() {
        let current =
            Period::new(date("2024-01-01"), date("2024-01-31")).unwrap();

        let next = current.next(PaymentPlan::Monthly).unwrap();
        assert_eq!(next.from(), date("2024-02-01"));
        assert_eq!(next.to(), date("2024-03-01"));

        let next = current.next(PaymentPlan::EverySixMonths).unwrap();
        assert_eq!(next.from(), date("2024-02-01"));
        assert_eq!(next.to(), date("2024-08-01"));
    }

    #[test]
    fn next_period_is_none_at_calendar_end() {
        let last = Period::new(date("9999-01-01"), Date::MAX).unwrap();
        assert_eq!(last.next(PaymentPlan::Monthly), None);
    }
}

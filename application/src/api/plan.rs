//! Payment plan and billing period definitions.

use common::{Date, PaymentPlan};
use juniper::{GraphQLInputObject, GraphQLObject};

use crate::{define_error, Error};

/// Parses the provided label into a [`PaymentPlan`].
///
/// # Errors
///
/// With `INVALID_PAYMENT_PLAN` code if the label is not one of `Monthly`,
/// `Every 2 Months`, `Every 3 Months`, `Every 6 Months` or `Every 12 Months`.
pub fn parse(label: &str) -> Result<PaymentPlan, Error> {
    label.parse().map_err(|e| {
        tracing::debug!("rejected payment plan: {e}");
        PlanError::Invalid.into()
    })
}

/// Billing period of a rent.
#[derive(Clone, Copy, Debug, GraphQLObject)]
#[graphql(name = "RentPeriod")]
pub struct Period {
    /// First day of this `RentPeriod`.
    pub from: Date,

    /// Day this `RentPeriod` ends on.
    pub to: Date,
}

impl From<common::Period> for Period {
    fn from(period: common::Period) -> Self {
        Self {
            from: period.from(),
            to: period.to(),
        }
    }
}

/// Billing period of a rent, as provided by a client.
#[derive(Clone, Copy, Debug, GraphQLInputObject)]
#[graphql(name = "RentPeriodInput")]
pub struct PeriodInput {
    /// First day of the `RentPeriod`.
    pub from: Date,

    /// Day the `RentPeriod` ends on.
    pub to: Date,
}

impl PeriodInput {
    /// Validates this [`PeriodInput`] into a [`common::Period`].
    ///
    /// # Errors
    ///
    /// With `INVALID_PERIOD` code if `from` is not before `to`.
    pub fn validate(self) -> Result<common::Period, Error> {
        common::Period::new(self.from, self.to)
            .map_err(|_| PeriodError::Invalid.into())
    }
}

define_error! {
    enum PlanError {
        #[code = "INVALID_PAYMENT_PLAN"]
        #[status = BAD_REQUEST]
        #[message = "Unrecognized payment plan"]
        Invalid,
    }
}

define_error! {
    enum PeriodError {
        #[code = "INVALID_PERIOD"]
        #[status = BAD_REQUEST]
        #[message = "Start of a period must precede its end"]
        Invalid,
    }
}

#[cfg(test)]
mod spec {
    use common::{Date, PaymentPlan};

    use super::{parse, PeriodInput};

    #[test]
    fn parses_known_labels() {
        assert_eq!(parse("Monthly").unwrap(), PaymentPlan::Monthly);
        assert_eq!(
            parse("Every 6 Months").unwrap(),
            PaymentPlan::EverySixMonths,
        );
    }

    #[test]
    fn rejects_unknown_label() {
        let err = parse("Weekly").unwrap_err();

        assert_eq!(err.code, "INVALID_PAYMENT_PLAN");
        assert_eq!(err.status_code, http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn rejects_reversed_period() {
        let input = PeriodInput {
            from: "2024-02-01".parse::<Date>().unwrap(),
            to: "2024-01-01".parse::<Date>().unwrap(),
        };

        assert_eq!(input.validate().unwrap_err().code, "INVALID_PERIOD");
    }
}

//! [`Money`]-related definitions.

use std::{fmt, ops, str::FromStr};

use rust_decimal::{prelude::ToPrimitive as _, Decimal};

use crate::define_kind;

/// Amount of money in some [`Currency`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Money {
    /// Amount of this [`Money`].
    pub amount: Decimal,

    /// [`Currency`] of this amount.
    pub currency: Currency,
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { amount, currency } = self;
        if amount.is_integer() {
            write!(f, "{}{currency}", amount.to_i128().expect("integer"))
        } else {
            write!(f, "{amount}{currency}")
        }
    }
}

impl Money {
    /// Indicates whether this [`Money`] amount is greater than zero.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.amount > Decimal::ZERO
    }
}

impl ops::Mul<u8> for Money {
    type Output = Self;

    fn mul(self, times: u8) -> Self::Output {
        Self {
            amount: self.amount * Decimal::from(times),
            currency: self.currency,
        }
    }
}

impl FromStr for Money {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let at = s
            .char_indices()
            .rev()
            .nth(2)
            .map(|(i, _)| i)
            .filter(|i| *i > 0)
            .ok_or("too short")?;

        let (amount, currency) = s.split_at(at);
        let amount = Decimal::from_str(amount).map_err(|_| "invalid amount")?;
        let currency =
            Currency::from_str(currency).map_err(|_| "invalid currency")?;

        Ok(Self { amount, currency })
    }
}

define_kind! {
    #[doc = "Currency of a [`Money`] amount."]
    enum Currency {
        #[doc = "US Dollar."]
        Usd = 1,

        #[doc = "Euro."]
        Eur = 2,

        #[doc = "Russian Ruble."]
        Rub = 3,
    }
}

#[cfg(feature = "juniper")]
mod juniper {
    //! Module providing integration with [`juniper`] crate.

    use std::str::FromStr as _;

    use juniper::{graphql_scalar, InputValue, ScalarValue, Value};

    /// Money in `{major}.{minor}{currency}` format, where:
    /// - `major` is an integer;
    /// - `minor` is an optional integer;
    /// - `currency` is a three-letter currency code.
    #[graphql_scalar(with = Self, parse_token(String))]
    type Money = super::Money;

    impl Money {
        fn to_output<S: ScalarValue>(m: &Money) -> Value<S> {
            Value::scalar(m.to_string())
        }

        fn from_input<S: ScalarValue>(
            input: &InputValue<S>,
        ) -> Result<Self, String> {
            input
                .as_string_value()
                .ok_or_else(|| {
                    format!(
                        "Cannot parse `Money` input scalar from \
                         non-string value: {input}",
                    )
                })
                .and_then(|s| {
                    Self::from_str(s).map_err(|e| {
                        format!("Cannot parse `Money` input scalar: {e}")
                    })
                })
        }
    }
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use rust_decimal::Decimal;

    use super::{Currency, Money};

    fn money(amount: &str, currency: Currency) -> Money {
        Money {
            amount: amount.parse().unwrap(),
            currency,
        }
    }

    #[test]
    fn parses_amount_with_currency() {
        for (input, expected) in [
            ("1500USD", money("1500", Currency::Usd)),
            ("1500.50EUR", money("1500.50", Currency::Eur)),
            ("0.99RUB", money("0.99", Currency::Rub)),
        ] {
            assert_eq!(Money::from_str(input).unwrap(), expected, "{input}");
        }

        for input in ["1500", "USD", "1500Us", "1500Dollars", "abcUSD"] {
            assert!(Money::from_str(input).is_err(), "{input}");
        }
    }

    #[test]
    fn rejects_non_ascii_input() {
        for input in ["é00", "1éUSD", "100US€", "١٠٠USD", "€€€€"] {
            assert!(Money::from_str(input).is_err(), "{input}");
        }
    }

    #[test]
    fn checks_positivity() {
        assert!(money("0.01", Currency::Usd).is_positive());
        assert!(!money("0", Currency::Usd).is_positive());
        assert!(!money("-100", Currency::Eur).is_positive());
    }

    #[test]
    fn formats_without_trailing_zeros_for_integers() {
        assert_eq!(money("1500.00", Currency::Usd).to_string(), "1500USD");
        assert_eq!(money("1500", Currency::Eur).to_string(), "1500EUR");
        assert_eq!(money("1500.5", Currency::Rub).to_string(), "1500.5RUB");
    }

    #[test]
    fn multiplies_keeping_currency() {
        assert_eq!(
            money("1000", Currency::Usd) * 3,
            money("3000", Currency::Usd),
        );
        assert_eq!(
            money("12.25", Currency::Eur) * 2,
            money("24.50", Currency::Eur),
        );
        assert_eq!(
            (money("1", Currency::Usd) * 0).amount,
            Decimal::ZERO,
        );
    }
}

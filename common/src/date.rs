//! Calendar [`Date`] definitions.

#[cfg(feature = "postgres")]
use std::error::Error as StdError;
use std::{fmt, str::FromStr};

use derive_more::{Display, Error};
#[cfg(feature = "postgres")]
use postgres_types::{
    accepts, private::BytesMut, to_sql_checked, FromSql, IsNull, ToSql, Type,
};
use time::{
    format_description::BorrowedFormatItem, macros::format_description,
    util::days_in_year_month, Duration, Month,
};

/// Format of a [`Date`] in its textual representation.
const FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

/// Calendar date without a time of day and a time zone.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Date(time::Date);

impl Date {
    /// Latest representable [`Date`].
    pub const MAX: Self = Self(time::Date::MAX);

    /// Creates a new [`Date`] out of the provided calendar components.
    ///
    /// [`None`] is returned if the components don't form a valid date.
    #[must_use]
    pub fn from_ymd(year: i32, month: u8, day: u8) -> Option<Self> {
        let month = Month::try_from(month).ok()?;
        time::Date::from_calendar_date(year, month, day).ok().map(Self)
    }

    /// Returns the current [`Date`] in UTC.
    #[must_use]
    pub fn today() -> Self {
        Self(time::OffsetDateTime::now_utc().date())
    }

    /// Returns the year of this [`Date`].
    #[must_use]
    pub fn year(self) -> i32 {
        self.0.year()
    }

    /// Returns the month of this [`Date`] in `1..=12` range.
    #[must_use]
    pub fn month(self) -> u8 {
        self.0.month().into()
    }

    /// Returns the day of month of this [`Date`].
    #[must_use]
    pub fn day(self) -> u8 {
        self.0.day()
    }

    /// Returns the [`Date`] following this one.
    ///
    /// Saturates at [`Date::MAX`].
    #[must_use]
    pub fn next_day(self) -> Self {
        Self(self.0.saturating_add(Duration::DAY))
    }

    /// Adds the provided number of calendar months to this [`Date`].
    ///
    /// The day of month is clamped to the last day of the resulting month, so
    /// `2024-01-31` plus one month is `2024-02-29`. Saturates at
    /// [`Date::MAX`].
    #[must_use]
    pub fn add_months(self, months: u32) -> Self {
        let index = i64::from(self.year()) * 12
            + i64::from(self.month() - 1)
            + i64::from(months);
        let Ok(year) = i32::try_from(index.div_euclid(12)) else {
            return Self::MAX;
        };
        #[expect(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "`rem_euclid(12)` is always in `0..12` range",
        )]
        let Ok(month) = Month::try_from(index.rem_euclid(12) as u8 + 1) else {
            return Self::MAX;
        };
        let day = self.day().min(days_in_year_month(year, month));

        time::Date::from_calendar_date(year, month, day)
            .map_or(Self::MAX, Self)
    }

    /// Adds the provided number of calendar years to this [`Date`].
    ///
    /// `02-29` becomes `02-28` in non-leap years. Saturates at [`Date::MAX`].
    #[must_use]
    pub fn add_years(self, years: u32) -> Self {
        years.checked_mul(12).map_or(Self::MAX, |m| self.add_months(m))
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.0.format(FORMAT).map_err(|_| fmt::Error)?;
        f.write_str(&s)
    }
}

impl FromStr for Date {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        time::Date::parse(s, FORMAT).map(Self).map_err(ParseError)
    }
}

/// Error of parsing a [`Date`] from a string.
#[derive(Clone, Copy, Debug, Display, Error)]
#[display("invalid `YYYY-MM-DD` date: {_0}")]
pub struct ParseError(time::error::Parse);

impl From<time::Date> for Date {
    fn from(date: time::Date) -> Self {
        Self(date)
    }
}

impl From<Date> for time::Date {
    fn from(date: Date) -> Self {
        date.0
    }
}

#[cfg(feature = "postgres")]
impl FromSql<'_> for Date {
    accepts!(DATE);

    fn from_sql(
        ty: &Type,
        raw: &[u8],
    ) -> Result<Self, Box<dyn StdError + Sync + Send>> {
        time::Date::from_sql(ty, raw).map(Self)
    }
}

#[cfg(feature = "postgres")]
impl ToSql for Date {
    accepts!(DATE);
    to_sql_checked!();

    fn to_sql(
        &self,
        ty: &Type,
        w: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn StdError + Sync + Send>> {
        self.0.to_sql(ty, w)
    }
}

#[cfg(feature = "serde")]
mod serde {
    //! Module providing integration with [`serde`] crate.

    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

    use super::Date;

    impl Serialize for Date {
        fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
            s.collect_str(self)
        }
    }

    impl<'de> Deserialize<'de> for Date {
        fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
            String::deserialize(d)?.parse().map_err(de::Error::custom)
        }
    }
}

#[cfg(feature = "juniper")]
mod juniper {
    //! Module providing integration with [`juniper`] crate.

    use juniper::{graphql_scalar, InputValue, ScalarValue, Value};

    /// Calendar date in `YYYY-MM-DD` format.
    #[graphql_scalar(with = Self, parse_token(String))]
    type Date = super::Date;

    impl Date {
        fn to_output<S: ScalarValue>(d: &Date) -> Value<S> {
            Value::scalar(d.to_string())
        }

        fn from_input<S: ScalarValue>(
            input: &InputValue<S>,
        ) -> Result<Self, String> {
            input
                .as_string_value()
                .ok_or_else(|| {
                    format!(
                        "Cannot parse `Date` input scalar from \
                         non-string value: {input}",
                    )
                })
                .and_then(|s| {
                    s.parse().map_err(|e| {
                        format!("Cannot parse `Date` input scalar: {e}")
                    })
                })
        }
    }
}

#[cfg(test)]
mod spec {
    use super::Date;

    fn date(s: &str) -> Date {
        s.parse().unwrap()
    }

    #[test]
    fn parses_and_formats() {
        assert_eq!(date("2024-03-05"), Date::from_ymd(2024, 3, 5).unwrap());
        assert_eq!(date("2024-03-05").to_string(), "2024-03-05");

        assert!("2024-3-5".parse::<Date>().is_err());
        assert!("2024-02-30".parse::<Date>().is_err());
        assert!("05.03.2024".parse::<Date>().is_err());
        assert!(Date::from_ymd(2024, 13, 1).is_none());
    }

    #[test]
    fn next_day() {
        assert_eq!(date("2024-01-31").next_day(), date("2024-02-01"));
        assert_eq!(date("2024-02-28").next_day(), date("2024-02-29"));
        assert_eq!(date("2024-12-31").next_day(), date("2025-01-01"));
        assert_eq!(Date::MAX.next_day(), Date::MAX);
    }

    #[test]
    fn adds_months() {
        assert_eq!(date("2024-01-15").add_months(1), date("2024-02-15"));
        assert_eq!(date("2024-11-15").add_months(3), date("2025-02-15"));
        assert_eq!(date("2024-05-01").add_months(12), date("2025-05-01"));
        assert_eq!(date("2024-05-01").add_months(0), date("2024-05-01"));
    }

    #[test]
    fn clamps_day_to_month_end() {
        assert_eq!(date("2024-01-31").add_months(1), date("2024-02-29"));
        assert_eq!(date("2023-01-31").add_months(1), date("2023-02-28"));
        assert_eq!(date("2024-08-31").add_months(1), date("2024-09-30"));
        assert_eq!(date("2024-02-29").add_years(1), date("2025-02-28"));
        assert_eq!(date("2024-02-29").add_years(4), date("2028-02-29"));
    }

    #[test]
    fn saturates_at_max() {
        assert_eq!(Date::MAX.add_months(1), Date::MAX);
        assert_eq!(date("2024-01-01").add_years(u32::MAX), Date::MAX);
    }
}

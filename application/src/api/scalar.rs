//! GraphQL scalar definitions.

use std::{fmt, marker::PhantomData, str::FromStr};

use juniper::{
    GraphQLType, InputValue, ParseScalarResult, ParseScalarValue, ScalarToken,
    ScalarValue, Value,
};

/// Helper type to use in `#[graphql(with = ..)]` attribute.
///
/// Wraps a validated domain string type `As`, converting it to/from a GraphQL
/// string scalar with its [`FromStr`]/[`Display`] impls.
///
/// [`Display`]: fmt::Display
#[derive(Debug)]
pub struct Via<As>(PhantomData<As>);

impl<As> Via<As> {
    /// Converts the target type into a string scalar [`Value`].
    pub fn to_output<T, S>(value: &T) -> Value<S>
    where
        As: fmt::Display,
        T: AsRef<As>,
        S: ScalarValue,
    {
        Value::from(value.as_ref().to_string())
    }

    /// Constructs the target type from a string scalar [`InputValue`].
    ///
    /// # Errors
    ///
    /// Returns an error if the input value is not a string, or it doesn't pass
    /// the validation of `As` type.
    pub fn from_input<T, S>(input: &InputValue<S>) -> Result<T, String>
    where
        As: FromStr,
        As::Err: fmt::Display,
        T: From<As> + GraphQLType<S, TypeInfo = ()>,
        S: ScalarValue,
    {
        let name = T::name(&()).unwrap_or_default();
        let s = input.as_string_value().ok_or_else(|| {
            format!(
                "Cannot parse input scalar `{name}`: expected string input \
                 value, found: {input}",
            )
        })?;
        s.parse::<As>().map(T::from).map_err(|e| {
            format!("Cannot parse input scalar `{name}` from \"{s}\": {e}")
        })
    }

    /// Parses the provided [`ScalarToken`].
    ///
    /// # Errors
    ///
    /// Returns an error if the token cannot be parsed as [`String`].
    pub fn parse_token<S: ScalarValue>(
        value: ScalarToken<'_>,
    ) -> ParseScalarResult<S> {
        <String as ParseScalarValue<S>>::from_str(value)
    }
}

#[cfg(test)]
mod spec {
    use juniper::{DefaultScalarValue, InputValue, Value};
    use service::domain::chat;

    use crate::api::chat::Text;

    use super::Via;

    #[test]
    fn parses_valid_input() {
        let input = InputValue::<DefaultScalarValue>::scalar("Hello");

        let text: Text = Via::<chat::Text>::from_input(&input).unwrap();

        assert_eq!(
            Via::<chat::Text>::to_output::<_, DefaultScalarValue>(&text),
            Value::scalar("Hello"),
        );
    }

    #[test]
    fn rejects_invalid_input() {
        let blank = InputValue::<DefaultScalarValue>::scalar("   ");
        let number = InputValue::<DefaultScalarValue>::scalar(42);

        assert!(Via::<chat::Text>::from_input::<Text, _>(&blank).is_err());
        assert!(Via::<chat::Text>::from_input::<Text, _>(&number).is_err());
    }
}

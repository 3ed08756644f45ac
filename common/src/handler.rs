//! [`Handler`] abstractions.
//!
//! Commands and queries of the rental management service, as well as the
//! storage operations behind them, are all [`Handler`]s differing only in
//! their `Args`.

use std::future::Future;

/// Executable handler of `Args`.
///
/// A single type may handle many `Args`: a storage backend, for example,
/// implements it once per supported operation.
pub trait Handler<Args = ()> {
    /// Type of successful [`Handler`] result.
    type Ok;

    /// Type of this [`Handler`] error.
    type Err;

    /// Executes this [`Handler`] with the provided arguments.
    fn execute(
        &self,
        args: Args,
    ) -> impl Future<Output = Result<Self::Ok, Self::Err>>;
}

#[cfg(test)]
mod spec {
    use rust_decimal::Decimal;

    use super::Handler;

    struct Ledger {
        paid: Vec<Decimal>,
    }

    struct Total;

    struct Paid(usize);

    impl Handler<Total> for Ledger {
        type Ok = Decimal;
        type Err = ();

        async fn execute(&self, _: Total) -> Result<Self::Ok, Self::Err> {
            Ok(self.paid.iter().sum())
        }
    }

    impl Handler<Paid> for Ledger {
        type Ok = Decimal;
        type Err = &'static str;

        async fn execute(&self, Paid(n): Paid) -> Result<Self::Ok, Self::Err> {
            self.paid.get(n).copied().ok_or("no such payment")
        }
    }

    #[tokio::test]
    async fn dispatches_by_args() {
        let ledger = Ledger {
            paid: vec![Decimal::new(1000, 0), Decimal::new(1250, 0)],
        };

        assert_eq!(ledger.execute(Total).await, Ok(Decimal::new(2250, 0)));
        assert_eq!(ledger.execute(Paid(1)).await, Ok(Decimal::new(1250, 0)));
        assert_eq!(ledger.execute(Paid(2)).await, Err("no such payment"));
    }
}

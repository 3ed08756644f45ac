//! [`Query`] collection related to the [`Payment`]s history.

use common::operations::By;

use crate::read::payment::list;
#[cfg(doc)]
use crate::{domain::Payment, Query};

use super::DatabaseQuery;

/// Queries a [`list::Page`] of [`Payment`]s, the newest first.
pub type List = DatabaseQuery<By<list::Page, list::Selector>>;

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::{operations::Insert, DateTime, Period};

    use crate::{
        domain::{payment, rent_detail, Payment},
        infra::Database as _,
        read::payment::list,
        test_util, Query as _,
    };

    use super::List;

    #[tokio::test]
    async fn pages_history_newest_first() {
        let service = test_util::service();
        let rent_detail_id = rent_detail::Id::new();
        let start = DateTime::now();
        let mut from = test_util::date("2024-01-01");
        for i in 0..12 {
            let to = from.add_months(1);
            service
                .database()
                .execute(Insert(Payment {
                    id: payment::Id::new(),
                    rent_detail_id,
                    period: Period::new(from, to).unwrap(),
                    amount_paid: test_util::usd(100),
                    method: payment::Method::new("Cash").unwrap(),
                    created_at: (start + Duration::from_secs(i)).coerce(),
                }))
                .await
                .unwrap();
            from = to.next_day();
        }
        let page = |number| {
            List::by(list::Selector {
                arguments: list::Arguments::new(
                    Some(number),
                    None,
                    list::DEFAULT_LIMIT,
                )
                .unwrap(),
                filter: list::Filter { rent_detail_id },
            })
        };

        let first = service.execute(page(1)).await.unwrap();
        assert_eq!(first.total_count, 12);
        assert_eq!(first.number_of_pages(), 3);
        assert!(first.has_next_page());
        assert_eq!(first.items.len(), 5);
        assert!(first
            .items
            .windows(2)
            .all(|w| w[0].created_at > w[1].created_at));

        let last = service.execute(page(3)).await.unwrap();
        assert_eq!(last.items.len(), 2);
        assert!(!last.has_next_page());
        assert_eq!(last.items[1].period.from(), test_util::date("2024-01-01"));
    }
}

//! [`Payment`] read model definitions.
//!
//! [`Payment`]: crate::domain::Payment

pub mod list {
    //! [`Payment`]s history list definitions.

    use common::define_pagination;

    use crate::domain::{rent_detail, Payment};
    #[cfg(doc)]
    use crate::domain::RentDetail;

    define_pagination!(Payment, Filter);

    /// Default number of [`Payment`]s on a [`Page`].
    pub const DEFAULT_LIMIT: usize = 5;

    /// Filter for [`Selector`].
    #[derive(Clone, Copy, Debug)]
    pub struct Filter {
        /// ID of the [`RentDetail`] to list [`Payment`]s of.
        pub rent_detail_id: rent_detail::Id,
    }
}

//! Abstractions for page-numbered pagination.

use std::num::NonZeroUsize;

/// Pagination arguments.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Arguments {
    /// 1-based number of the requested page.
    page: NonZeroUsize,

    /// Maximum number of items on a page.
    limit: NonZeroUsize,
}

impl Arguments {
    /// Creates new [`Arguments`].
    ///
    /// Missing `page` means the first one, missing `limit` means the provided
    /// `default` one. [`None`] is returned if any of the values is not
    /// positive.
    pub fn new<Num>(
        page: Option<Num>,
        limit: Option<Num>,
        default: Num,
    ) -> Option<Self>
    where
        Num: TryInto<usize>,
    {
        let page = match page {
            Some(p) => NonZeroUsize::new(p.try_into().ok()?)?,
            None => NonZeroUsize::MIN,
        };
        let limit = limit.unwrap_or(default).try_into().ok()?;

        Some(Self {
            page,
            limit: NonZeroUsize::new(limit)?,
        })
    }

    /// Returns the 1-based number of the requested page.
    #[must_use]
    pub const fn page(&self) -> usize {
        self.page.get()
    }

    /// Returns the maximum number of items on a page.
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit.get()
    }

    /// Returns the number of items preceding the requested page.
    #[must_use]
    pub const fn offset(&self) -> usize {
        (self.page.get() - 1).saturating_mul(self.limit.get())
    }
}

/// Page of items.
#[derive(Clone, Debug)]
pub struct Page<I> {
    /// Items on this [`Page`].
    pub items: Vec<I>,

    /// Total number of items on all the pages.
    pub total_count: usize,

    /// [`Arguments`] this [`Page`] was selected with.
    pub arguments: Arguments,
}

impl<I> Page<I> {
    /// Creates a new [`Page`] out of the provided items.
    #[must_use]
    pub fn new(
        arguments: Arguments,
        items: impl IntoIterator<Item = impl Into<I>>,
        total_count: usize,
    ) -> Self {
        Self {
            items: items.into_iter().map(Into::into).collect(),
            total_count,
            arguments,
        }
    }

    /// Returns the total number of pages.
    #[must_use]
    pub fn number_of_pages(&self) -> usize {
        self.total_count.div_ceil(self.arguments.limit())
    }

    /// Indicates whether there is a page after this one.
    #[must_use]
    pub fn has_next_page(&self) -> bool {
        self.arguments.page() < self.number_of_pages()
    }
}

/// Pagination selector.
#[derive(Clone, Copy, Debug)]
pub struct Selector<F> {
    /// Pagination [`Arguments`].
    pub arguments: Arguments,

    /// Additional filter being applied to the result.
    pub filter: F,
}

impl<F> Selector<F> {
    /// Selects the page of items described by this [`Selector`] out of all
    /// the matching items.
    #[must_use]
    pub fn select<I>(&self, all: Vec<I>) -> Page<I> {
        let total_count = all.len();
        let items = all
            .into_iter()
            .skip(self.arguments.offset())
            .take(self.arguments.limit());
        Page::new(self.arguments, items, total_count)
    }
}

/// Defines pagination types.
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_pagination {
    ($node:ty, $filter:ty) => {
        #[doc = "A [`Page`] of nodes."]
        pub type Page = $crate::pagination::Page<$node>;

        #[doc = "Arguments for selecting a [`Page`]."]
        pub type Arguments = $crate::pagination::Arguments;

        #[doc = "[`Page`] selector."]
        pub type Selector = $crate::pagination::Selector<$filter>;
    };
}

#[cfg(test)]
mod spec {
    use super::{Arguments, Page, Selector};

    #[test]
    fn defaults_to_first_page() {
        let args = Arguments::new(None, None, 5).unwrap();
        assert_eq!(args.page(), 1);
        assert_eq!(args.limit(), 5);
        assert_eq!(args.offset(), 0);

        let args = Arguments::new(Some(3), Some(10), 5).unwrap();
        assert_eq!(args.offset(), 20);
    }

    #[test]
    fn rejects_non_positive_values() {
        assert_eq!(Arguments::new(Some(0), None, 5), None);
        assert_eq!(Arguments::new(None, Some(0), 5), None);
        assert_eq!(Arguments::new(Some(-1), Some(5), 5), None);
        assert_eq!(Arguments::new(None, Some(-5), 5), None);
    }

    #[test]
    fn counts_pages() {
        let select = |page| Selector {
            arguments: Arguments::new(Some(page), None, 5).unwrap(),
            filter: (),
        };
        let rows = (1..=12).collect::<Vec<i32>>();

        let page: Page<i32> = select(1).select(rows.clone());
        assert_eq!(page.number_of_pages(), 3);
        assert_eq!(page.items, [1, 2, 3, 4, 5]);
        assert!(page.has_next_page());

        let page = select(3).select(rows.clone());
        assert_eq!(page.items, [11, 12]);
        assert_eq!(page.total_count, 12);
        assert!(!page.has_next_page());

        let page = select(4).select(rows);
        assert!(page.items.is_empty());
        assert_eq!(page.number_of_pages(), 3);
    }

    #[test]
    fn empty_page_has_no_pages() {
        let page = Page::<i32>::new(
            Arguments::new(None, None, 5).unwrap(),
            Vec::<i32>::new(),
            0,
        );
        assert_eq!(page.number_of_pages(), 0);
        assert!(!page.has_next_page());
    }
}

//! Page-number pagination with a forgiving clamp policy.
//!
//! A page number that is not a positive integer resolves to page 1, a page
//! past the end resolves to the last page. The same resolution is used when
//! slicing an in-memory sequence and when a store pages with offset/limit.

use serde::Serialize;

/// Page size of post listings.
pub const POSTS_PER_PAGE: usize = 3;

/// Page size of feeds and sidebar widgets.
pub const WIDGET_PAGE_SIZE: usize = 5;

/// Upper bound on the number of posts a widget request may ask for.
pub const MAX_WIDGET_COUNT: usize = 20;

/// The slice of a sequence a resolved page covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub number: usize,
    pub num_pages: usize,
    pub per_page: usize,
    pub total: usize,
}

impl PageWindow {
    /// Resolve `requested` against a sequence of `total` items.
    pub fn resolve(total: usize, per_page: usize, requested: Option<&str>) -> Self {
        let per_page = per_page.max(1);
        let num_pages = total.div_ceil(per_page).max(1);
        let number = parse_page_number(requested).min(num_pages);

        Self {
            number,
            num_pages,
            per_page,
            total,
        }
    }

    pub fn offset(&self) -> usize {
        (self.number - 1) * self.per_page
    }

    pub fn len(&self) -> usize {
        self.total.saturating_sub(self.offset()).min(self.per_page)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Attach the items of this window.
    pub fn into_page<T>(self, items: Vec<T>) -> Page<T> {
        Page {
            items,
            number: self.number,
            num_pages: self.num_pages,
            per_page: self.per_page,
            total: self.total,
        }
    }
}

fn parse_page_number(requested: Option<&str>) -> usize {
    requested
        .and_then(|raw| raw.trim().parse::<i64>().ok())
        .filter(|n| *n >= 1)
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(1)
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: usize,
    pub num_pages: usize,
    pub per_page: usize,
    pub total: usize,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn next_page_number(&self) -> Option<usize> {
        self.has_next().then_some(self.number + 1)
    }

    pub fn previous_page_number(&self) -> Option<usize> {
        self.has_previous().then_some(self.number - 1)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            num_pages: self.num_pages,
            per_page: self.per_page,
            total: self.total,
        }
    }
}

/// Cut `items` into pages of `per_page` and return the requested one.
pub fn paginate<T>(items: Vec<T>, per_page: usize, requested: Option<&str>) -> Page<T> {
    let window = PageWindow::resolve(items.len(), per_page, requested);
    let page_items = items
        .into_iter()
        .skip(window.offset())
        .take(window.per_page)
        .collect();
    window.into_page(page_items)
}

use serde::{Serialize, Serializer};
use std::fmt;

/// Pager buttons shown before an ellipsis kicks in.
const MAX_PAGES_SHOWN: usize = 5;

pub const ELLIPSIS: &str = "…";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<R> {
    pub items: Vec<R>,
    pub total_pages: usize,
    pub start_index: usize,
    pub end_index: usize,
    pub total_records: usize,
}

pub fn total_pages(total_records: usize, items_per_page: usize) -> usize {
    if total_records == 0 {
        return 0;
    }
    total_records.div_ceil(items_per_page.max(1))
}

/// Slices one page out of `records`. Pages are 1-based; a zero page or page
/// size is treated as one. Pages past the end come back empty.
pub fn paginate<R: Clone>(records: &[R], current_page: usize, items_per_page: usize) -> Page<R> {
    let per_page = items_per_page.max(1);
    let total = records.len();
    let start = (current_page.max(1) - 1).saturating_mul(per_page);
    let end = start.saturating_add(per_page).min(total).max(start);
    let items = records.get(start..end).map(<[R]>::to_vec).unwrap_or_default();

    Page {
        items,
        total_pages: total_pages(total, per_page),
        start_index: start,
        end_index: end,
        total_records: total,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLabel {
    Page(usize),
    Ellipsis,
}

impl fmt::Display for PageLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Page(page) => write!(f, "{}", page),
            Self::Ellipsis => f.write_str(ELLIPSIS),
        }
    }
}

impl Serialize for PageLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Page(page) => serializer.serialize_u64(*page as u64),
            Self::Ellipsis => serializer.serialize_str(ELLIPSIS),
        }
    }
}

pub fn page_labels(current_page: usize, total_pages: usize) -> Vec<PageLabel> {
    use PageLabel::{Ellipsis, Page};

    if total_pages <= MAX_PAGES_SHOWN {
        return (1..=total_pages).map(Page).collect();
    }

    if current_page <= 3 {
        let mut labels: Vec<PageLabel> = (1..=4).map(Page).collect();
        labels.extend([Ellipsis, Page(total_pages)]);
        labels
    } else if current_page >= total_pages - 2 {
        let mut labels = vec![Page(1), Ellipsis];
        labels.extend((total_pages - 3..=total_pages).map(Page));
        labels
    } else {
        vec![
            Page(1),
            Ellipsis,
            Page(current_page - 1),
            Page(current_page),
            Page(current_page + 1),
            Ellipsis,
            Page(total_pages),
        ]
    }
}

/// The "Showing a to b of n" window, 1-based and inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordRange {
    pub first: usize,
    pub last: usize,
    pub total: usize,
}

impl fmt::Display for RecordRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Showing {} to {} of {} results", self.first, self.last, self.total)
    }
}

/// Page position over a collection whose size is known. Keeps the current
/// page within `1..=max(1, total_pages)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pager {
    current_page: usize,
    items_per_page: usize,
    total_records: usize,
}

impl Pager {
    pub fn new(items_per_page: usize) -> Self {
        Self {
            current_page: 1,
            items_per_page: items_per_page.max(1),
            total_records: 0,
        }
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn items_per_page(&self) -> usize {
        self.items_per_page
    }

    pub fn total_records(&self) -> usize {
        self.total_records
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.total_records, self.items_per_page)
    }

    /// New collection size; always returns to the first page.
    pub fn reset(&mut self, total_records: usize) {
        self.total_records = total_records;
        self.current_page = 1;
    }

    pub fn set_items_per_page(&mut self, items_per_page: usize) {
        self.items_per_page = items_per_page.max(1);
        self.current_page = 1;
    }

    /// Moves to `page`. Out-of-range pages and the current page are ignored.
    pub fn go_to(&mut self, page: usize) -> bool {
        if page < 1 || page > self.total_pages() || page == self.current_page {
            return false;
        }
        self.current_page = page;
        true
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        let total_pages = self.total_pages();
        total_pages > 0 && self.current_page < total_pages
    }

    pub fn previous(&mut self) -> bool {
        self.has_previous() && self.go_to(self.current_page - 1)
    }

    pub fn next(&mut self) -> bool {
        self.has_next() && self.go_to(self.current_page + 1)
    }

    pub fn labels(&self) -> Vec<PageLabel> {
        page_labels(self.current_page, self.total_pages())
    }

    pub fn range(&self) -> RecordRange {
        if self.total_records == 0 {
            return RecordRange {
                first: 0,
                last: 0,
                total: 0,
            };
        }
        RecordRange {
            first: (self.current_page - 1) * self.items_per_page + 1,
            last: (self.current_page * self.items_per_page).min(self.total_records),
            total: self.total_records,
        }
    }
}

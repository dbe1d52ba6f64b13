//! Business services. Each service owns one aggregate and is shared as a
//! cheap clone inside [`crate::AppState`].

use serde::{Deserialize, Serialize};

pub mod clients;
pub mod clock;
pub mod delivery_notes;
pub mod invoices;
pub mod numbering;
pub mod pdf;
pub mod products;
pub mod proformas;
pub mod totals;
pub mod users;

pub use clients::ClientService;
pub use clock::{Clock, FixedClock, SystemClock};
pub use delivery_notes::DeliveryNoteService;
pub use invoices::InvoiceService;
pub use pdf::DocumentPdfService;
pub use products::ProductService;
pub use proformas::ProformaService;
pub use users::UserService;

const DEFAULT_PER_PAGE: u64 = 20;
const MAX_PER_PAGE: u64 = 100;

/// One-based page request. Deserialized straight from query strings.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_per_page")]
    pub per_page: u64,
}

fn default_page() -> u64 {
    1
}

fn default_per_page() -> u64 {
    DEFAULT_PER_PAGE
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
        }
    }
}

impl Pagination {
    /// Clamp out-of-range values instead of erroring.
    pub fn clamped(self) -> Self {
        Self {
            page: self.page.max(1),
            per_page: self.per_page.clamp(1, MAX_PER_PAGE),
        }
    }

    pub fn zero_based(&self) -> u64 {
        self.page.saturating_sub(1)
    }
}

/// A page of results with the total row count.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64, page: Pagination) -> Self {
        let total_pages = if total == 0 {
            0
        } else {
            total.div_ceil(page.per_page.max(1))
        };
        Self {
            items,
            total,
            page: page.page,
            per_page: page.per_page,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_clamps_out_of_range_values() {
        let page = Pagination {
            page: 0,
            per_page: 10_000,
        }
        .clamped();
        assert_eq!(page.page, 1);
        assert_eq!(page.per_page, MAX_PER_PAGE);
        assert_eq!(page.zero_based(), 0);
    }

    #[test]
    fn page_counts_total_pages() {
        let page = Page::new(vec![1, 2, 3], 41, Pagination::default());
        assert_eq!(page.total_pages, 3);

        let empty: Page<i32> = Page::new(vec![], 0, Pagination::default());
        assert_eq!(empty.total_pages, 0);
    }
}

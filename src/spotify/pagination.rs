use crate::types::Page;

/// Position within an offset/limit listing.
///
/// Spotify only hands out `next`/`previous` URLs with each page, so after
/// adding or removing playlist items they are rebuilt here from the new
/// total instead of refetching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationCursor {
    pub offset: u32,
    pub limit: u32,
    pub total: u32,
    pub next: Option<String>,
    pub previous: Option<String>,
}

impl PaginationCursor {
    pub fn from_page<T>(page: &Page<T>) -> Self {
        Self {
            offset: page.offset,
            limit: page.limit,
            total: page.total,
            next: page.next.clone(),
            previous: page.previous.clone(),
        }
    }

    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }

    /// 1-based page number and page count, for display.
    pub fn page_position(&self) -> (u32, u32) {
        let limit = self.limit.max(1);
        let pages = self.total.div_ceil(limit).max(1);
        (self.offset / limit + 1, pages)
    }

    /// Applies a new total and rebuilds the continuation URLs against
    /// `endpoint` (the listing URL without paging parameters).
    ///
    /// An offset left past the end, e.g. after removing the only item on the
    /// last page, moves back to the start of the new last page.
    pub fn recompute(&mut self, endpoint: &str, total: u32) {
        let limit = self.limit.max(1);
        self.total = total;

        if self.offset >= total {
            self.offset = if total == 0 {
                0
            } else {
                ((total - 1) / limit) * limit
            };
        }

        self.next = (self.offset + limit < total)
            .then(|| page_url(endpoint, self.offset + limit, limit));
        self.previous = (self.offset > 0)
            .then(|| page_url(endpoint, self.offset.saturating_sub(limit), limit));
    }
}

fn page_url(endpoint: &str, offset: u32, limit: u32) -> String {
    format!("{endpoint}?offset={offset}&limit={limit}")
}

use serde::{Deserialize, Serialize};

/// Limit and offset for an overfetching page query. Widens to u32 before
/// multiplying so large page numbers cannot overflow.
pub fn page_bounds(page_size: u16, page_num: u16) -> (u32, u32) {
    let limit = page_size as u32 + 1;
    let offset = page_size as u32 * page_num as u32;
    (limit, offset)
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PagedResponse<T> {
    pub page_num: u16,
    pub items: Vec<T>,
    pub has_next: bool,
    pub has_prev: bool,
}

impl<T> PagedResponse<T> {
    /// Builds a page from a query that fetched `page_size + 1` rows to
    /// detect whether a next page exists.
    pub fn from_overfetch(mut items: Vec<T>, page_num: u16, page_size: u16) -> Self {
        let has_next = items.len() > page_size as usize;
        if has_next {
            items.truncate(page_size as usize);
        }

        Self {
            page_num,
            items,
            has_next,
            has_prev: page_num > 0,
        }
    }
}

use crate::error::{Result, ServiceError};

/// One page of a filtered table.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
}

/// Slice by 1-based page number. Out-of-range pages (including page 0) yield
/// an empty slice, not an error; a zero page size is an error.
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Result<Page<T>> {
    if page_size == 0 {
        return Err(ServiceError::InvalidQuery(
            "page_size must be at least 1".to_string(),
        ));
    }

    let total = items.len();
    let total_pages = total.div_ceil(page_size);

    let slice = if page == 0 {
        &[][..]
    } else {
        let start = (page - 1).saturating_mul(page_size);
        if start >= total {
            &[][..]
        } else {
            let end = start.saturating_add(page_size).min(total);
            &items[start..end]
        }
    };

    Ok(Page {
        items: slice.to_vec(),
        total,
        page,
        page_size,
        total_pages,
    })
}

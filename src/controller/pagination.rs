//! Results are fetched all at once and paged through locally.

pub const RESULTS_PER_PAGE: usize = 10;

/// Read the `page` parameter. Anything missing, unparseable or below 1 means
/// the first page.
pub fn parse_page(param: Option<&str>) -> usize {
    param
        .and_then(|p| p.trim().parse::<usize>().ok())
        .filter(|&p| p >= 1)
        .unwrap_or(1)
}

pub fn total_pages(result_count: usize) -> usize {
    result_count.div_ceil(RESULTS_PER_PAGE)
}

/// The results shown on `page` (1-indexed). Pages past the end, and page 0,
/// are empty.
pub fn page_slice<T>(items: &[T], page: usize) -> &[T] {
    let Some(start) = page
        .checked_sub(1)
        .and_then(|p| p.checked_mul(RESULTS_PER_PAGE))
    else {
        return &[];
    };
    if start >= items.len() {
        return &[];
    }
    let end = (start + RESULTS_PER_PAGE).min(items.len());
    &items[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_lengths() {
        for n in [0, 1, 9, 10, 11, 25, 30] {
            let items: Vec<usize> = (0..n).collect();
            let pages = total_pages(n);
            for p in 1..=pages {
                let slice = page_slice(&items, p);
                assert_eq!(slice.len(), RESULTS_PER_PAGE.min(n - (p - 1) * RESULTS_PER_PAGE));
                assert_eq!(slice[0], (p - 1) * RESULTS_PER_PAGE);
            }
            assert!(page_slice(&items, 0).is_empty());
            assert!(page_slice(&items, pages + 1).is_empty());
            assert!(page_slice(&items, usize::MAX).is_empty());
        }
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0), 0);
        assert_eq!(total_pages(10), 1);
        assert_eq!(total_pages(11), 2);
    }

    #[test]
    fn page_param_defaults_to_one() {
        assert_eq!(parse_page(None), 1);
        assert_eq!(parse_page(Some("")), 1);
        assert_eq!(parse_page(Some("abc")), 1);
        assert_eq!(parse_page(Some("0")), 1);
        assert_eq!(parse_page(Some("-3")), 1);
        assert_eq!(parse_page(Some("3")), 3);
    }
}

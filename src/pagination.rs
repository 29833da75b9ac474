use serde::{Deserialize, Serialize};

/// Articles per page on the public listing
pub const PAGE_SIZE: u64 = 6;

/// Skip/limit pair plus the page count for a listing request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: u64,
    pub skip: u64,
    pub limit: u64,
}

impl PageWindow {
    pub fn new(page: u64, page_size: u64) -> Self {
        let page = page.max(1);
        Self {
            page,
            skip: (page - 1).saturating_mul(page_size),
            limit: page_size,
        }
    }

    pub fn total_pages(&self, total_count: u64) -> u64 {
        total_pages(total_count, self.limit)
    }
}

/// `ceil(total_count / page_size)`; zero items means zero pages
pub fn total_pages(total_count: u64, page_size: u64) -> u64 {
    if page_size == 0 {
        return 0;
    }
    total_count.div_ceil(page_size)
}

/// One page of listing results with its position in the whole listing
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(rename = "articles")]
    pub items: Vec<T>,
    pub total_pages: u64,
    pub current_page: u64,
}

/// Attach page metadata to the items fetched for `window`
pub fn paginate<T>(window: PageWindow, items: Vec<T>, total_count: u64) -> Page<T> {
    Page {
        items,
        total_pages: window.total_pages(total_count),
        current_page: window.page,
    }
}

/// Raw `?page=` query value
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

impl PageQuery {
    /// Requested page from the leading digits of the value (`2.5` and `2abc`
    /// are page 2). No digits, or zero, means page 1.
    pub fn page(&self) -> u64 {
        self.page
            .as_deref()
            .and_then(leading_integer)
            .filter(|&p| p >= 1)
            .unwrap_or(1)
    }

    pub fn window(&self) -> PageWindow {
        PageWindow::new(self.page(), PAGE_SIZE)
    }
}

fn leading_integer(raw: &str) -> Option<u64> {
    let raw = raw.trim_start();
    let raw = raw.strip_prefix('+').unwrap_or(raw);
    let end = raw.find(|c: char| !c.is_ascii_digit()).unwrap_or(raw.len());
    raw[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(raw: Option<&str>) -> PageQuery {
        PageQuery { page: raw.map(str::to_string) }
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0, PAGE_SIZE), 0);
        assert_eq!(total_pages(1, PAGE_SIZE), 1);
        assert_eq!(total_pages(6, PAGE_SIZE), 1);
        assert_eq!(total_pages(7, PAGE_SIZE), 2);
        assert_eq!(total_pages(12, PAGE_SIZE), 2);
        assert_eq!(total_pages(13, PAGE_SIZE), 3);
    }

    #[test]
    fn total_pages_matches_ceiling_for_many_counts() {
        for total in 0..200u64 {
            let expected = (total as f64 / PAGE_SIZE as f64).ceil() as u64;
            assert_eq!(total_pages(total, PAGE_SIZE), expected, "total {}", total);
        }
    }

    #[test]
    fn skip_follows_page() {
        for page in 1..50u64 {
            let window = PageWindow::new(page, PAGE_SIZE);
            assert_eq!(window.skip, (page - 1) * 6);
            assert_eq!(window.limit, 6);
        }
    }

    #[test]
    fn bad_page_input_defaults_to_first_page() {
        assert_eq!(query(None).page(), 1);
        assert_eq!(query(Some("")).page(), 1);
        assert_eq!(query(Some("abc")).page(), 1);
        assert_eq!(query(Some("0")).page(), 1);
        assert_eq!(query(Some("-3")).page(), 1);
        assert_eq!(query(Some("+")).page(), 1);
        assert_eq!(query(Some(" 3 ")).page(), 3);
        assert_eq!(query(Some("4")).window().skip, 18);
    }

    #[test]
    fn page_uses_leading_digits() {
        assert_eq!(query(Some("2.5")).page(), 2);
        assert_eq!(query(Some("3abc")).page(), 3);
        assert_eq!(query(Some("+4")).page(), 4);
        assert_eq!(query(Some("007")).page(), 7);
        assert_eq!(query(Some("0.9")).page(), 1);
        assert_eq!(query(Some("99999999999999999999999")).page(), 1);
    }

    #[test]
    fn paginate_attaches_page_metadata() {
        let page = paginate(PageWindow::new(3, PAGE_SIZE), vec!["m"], 13);
        assert_eq!((page.total_pages, page.current_page), (3, 3));
        assert_eq!(page.items, vec!["m"]);

        let empty: Page<&str> = paginate(PageWindow::new(1, PAGE_SIZE), vec![], 0);
        assert_eq!((empty.total_pages, empty.current_page), (0, 1));
    }

    #[test]
    fn page_past_the_end_is_still_a_window() {
        let window = query(Some("99")).window();
        assert_eq!(window.skip, 98 * 6);
        assert_eq!(window.total_pages(7), 2);
    }
}

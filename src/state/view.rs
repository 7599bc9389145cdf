/// The derived table view: keyword filter, sort and pagination.
///
/// `ViewState` owns the full catalog as fetched from the API and the
/// filtered/sorted subsequence shown in the table. Every mutation keeps
/// `current_page` inside `[1, total_pages]`, so rendering never has to
/// deal with an out-of-range page.

use std::cmp::Ordering;
use std::fmt;

use super::data::Product;

/// Page size choices offered in the page-size picker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSize(usize);

impl PageSize {
    pub const ALL: [PageSize; 4] = [PageSize(5), PageSize(10), PageSize(20), PageSize(50)];

    /// Returns the option matching `n`, if `n` is one of the offered sizes
    pub fn from_usize(n: usize) -> Option<Self> {
        Self::ALL.iter().copied().find(|size| size.0 == n)
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for PageSize {
    fn default() -> Self {
        PageSize(10)
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / page", self.0)
    }
}

/// Column the table can be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Title,
    Price,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// What the table needs to draw one page
#[derive(Debug, Clone, PartialEq)]
pub struct PageView<'a> {
    pub rows: &'a [Product],
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

impl PageView<'_> {
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn summary(&self) -> String {
        format!(
            "Page {}/{} - {} items total",
            self.page, self.total_pages, self.total_items
        )
    }
}

#[derive(Debug, Clone)]
pub struct ViewState {
    all_products: Vec<Product>,
    filtered: Vec<Product>,
    /// Trimmed and lowercased search keyword
    keyword: String,
    /// 1-based
    current_page: usize,
    page_size: PageSize,
    sort_field: Option<SortField>,
    sort_dir: SortDirection,
    selected: Option<Product>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(PageSize::default())
    }
}

impl ViewState {
    pub fn new(page_size: PageSize) -> Self {
        Self {
            all_products: Vec::new(),
            filtered: Vec::new(),
            keyword: String::new(),
            current_page: 1,
            page_size,
            sort_field: None,
            sort_dir: SortDirection::Asc,
            selected: None,
        }
    }

    pub fn all_products(&self) -> &[Product] {
        &self.all_products
    }

    pub fn filtered(&self) -> &[Product] {
        &self.filtered
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    pub fn sort(&self) -> (Option<SortField>, SortDirection) {
        (self.sort_field, self.sort_dir)
    }

    pub fn total_pages(&self) -> usize {
        self.filtered.len().div_ceil(self.page_size.get()).max(1)
    }

    /// Replace the whole catalog (after the initial load or a refetch).
    /// Keyword and sort are re-applied; the page is only clamped.
    pub fn replace_all(&mut self, products: Vec<Product>) {
        self.all_products = products;
        self.recompute();
        self.clamp_page();
    }

    pub fn set_keyword(&mut self, keyword: &str) {
        self.keyword = keyword.trim().to_lowercase();
        self.recompute();
        self.current_page = 1;
    }

    /// Same field flips the direction, a new field starts ascending
    pub fn set_sort(&mut self, field: SortField) {
        if self.sort_field == Some(field) {
            self.sort_dir = self.sort_dir.flipped();
        } else {
            self.sort_field = Some(field);
            self.sort_dir = SortDirection::Asc;
        }
        self.apply_sort();
        self.current_page = 1;
    }

    pub fn set_page_size(&mut self, page_size: PageSize) {
        self.page_size = page_size;
        self.current_page = 1;
    }

    pub fn next_page(&mut self) {
        if self.current_page < self.total_pages() {
            self.current_page += 1;
        }
        self.clamp_page();
    }

    pub fn prev_page(&mut self) {
        if self.current_page > 1 {
            self.current_page -= 1;
        }
        self.clamp_page();
    }

    pub fn first_page(&mut self) {
        self.current_page = 1;
    }

    /// Rows of the active page. The page is clamped to `total_pages`
    /// before slicing.
    pub fn current_page_rows(&self) -> &[Product] {
        let size = self.page_size.get();
        let page = self.current_page.clamp(1, self.total_pages());
        let start = ((page - 1) * size).min(self.filtered.len());
        let end = (start + size).min(self.filtered.len());
        &self.filtered[start..end]
    }

    pub fn page(&self) -> PageView<'_> {
        PageView {
            rows: self.current_page_rows(),
            page: self.current_page.clamp(1, self.total_pages()),
            total_pages: self.total_pages(),
            total_items: self.filtered.len(),
        }
    }

    /// Remember the clicked row. Returns the selected product, if the id is
    /// part of the current view.
    pub fn select(&mut self, id: i64) -> Option<&Product> {
        self.selected = self.filtered.iter().find(|p| p.id == id).cloned();
        self.selected.as_ref()
    }

    pub fn selected(&self) -> Option<&Product> {
        self.selected.as_ref()
    }

    fn recompute(&mut self) {
        let keyword = &self.keyword;
        self.filtered = self
            .all_products
            .iter()
            .filter(|p| p.title.to_lowercase().contains(keyword.as_str()))
            .cloned()
            .collect();
        self.apply_sort();
    }

    fn apply_sort(&mut self) {
        let Some(field) = self.sort_field else {
            return;
        };
        let dir = self.sort_dir;
        // slice::sort_by is stable, ties keep their relative order
        self.filtered.sort_by(|a, b| {
            let ord = match field {
                SortField::Price => a.price.total_cmp(&b.price),
                SortField::Title => compare_titles(&a.title, &b.title),
            };
            match dir {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        });
    }

    fn clamp_page(&mut self) {
        self.current_page = self.current_page.clamp(1, self.total_pages());
    }
}

/// Approximates a locale-aware title comparison: case-insensitive first,
/// then case-sensitive so the order is total.
///
/// There is no collation table behind it. Lowercased titles compare by code
/// point, so accented titles sort after plain ASCII ones ("Éclair" lands
/// after "Zebra", not next to "Eclair").
fn compare_titles(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: i64, title: &str, price: f64) -> Product {
        Product {
            id,
            title: title.to_string(),
            price,
            description: format!("{} description", title),
            category: None,
            images: Vec::new(),
        }
    }

    fn catalog(n: i64) -> Vec<Product> {
        (1..=n)
            .map(|i| product(i, &format!("Item {:02}", i), i as f64))
            .collect()
    }

    fn ids(rows: &[Product]) -> Vec<i64> {
        rows.iter().map(|p| p.id).collect()
    }

    #[test]
    fn test_empty_catalog_has_one_page() {
        let view = ViewState::default();

        assert_eq!(view.total_pages(), 1);
        assert_eq!(view.current_page(), 1);
        assert!(view.current_page_rows().is_empty());
        assert_eq!(view.page().summary(), "Page 1/1 - 0 items total");
    }

    #[test]
    fn test_next_page_clamps_at_last_page() {
        let mut view = ViewState::default();
        view.replace_all(catalog(25));

        view.next_page();
        view.next_page();
        assert_eq!(view.current_page(), 3);
        assert_eq!(ids(view.current_page_rows()), vec![21, 22, 23, 24, 25]);

        view.next_page();
        assert_eq!(view.current_page(), 3);
        assert!(!view.page().has_next());
        assert!(view.page().has_prev());
    }

    #[test]
    fn test_prev_page_clamps_at_first_page() {
        let mut view = ViewState::default();
        view.replace_all(catalog(25));

        view.prev_page();
        assert_eq!(view.current_page(), 1);
        assert_eq!(ids(view.current_page_rows()), (1..=10).collect::<Vec<_>>());
    }

    #[test]
    fn test_total_pages_formula() {
        for n in [0i64, 1, 9, 10, 11, 49, 50, 51] {
            for size in PageSize::ALL {
                let mut view = ViewState::new(size);
                view.replace_all(catalog(n));
                let p = size.get();
                let expected = ((n as usize) + p - 1) / p;
                assert_eq!(view.total_pages(), expected.max(1), "n={} p={}", n, p);
                assert!(view.current_page_rows().len() <= p);
                assert_eq!(view.current_page_rows().is_empty(), n == 0);
            }
        }
    }

    #[test]
    fn test_keyword_filters_case_insensitively_and_resets_page() {
        let mut products = catalog(25);
        products[3].title = "Running Shoe".to_string();
        products[11].title = "SHOE rack".to_string();
        products[20].title = "Old shoes".to_string();

        let mut view = ViewState::default();
        view.replace_all(products);
        view.next_page();
        assert_eq!(view.current_page(), 2);

        view.set_keyword("shoe");

        assert_eq!(ids(view.filtered()), vec![4, 12, 21]);
        assert_eq!(view.current_page(), 1);
        assert_eq!(view.page().total_items, 3);
    }

    #[test]
    fn test_keyword_is_trimmed_and_empty_keyword_matches_all() {
        let mut view = ViewState::default();
        view.replace_all(catalog(5));

        view.set_keyword("  ITEM 03 ");
        assert_eq!(ids(view.filtered()), vec![3]);

        view.set_keyword("");
        assert_eq!(ids(view.filtered()), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_sort_toggles_direction_on_same_field() {
        let mut view = ViewState::default();
        view.replace_all(vec![
            product(1, "b", 30.0),
            product(2, "c", 10.0),
            product(3, "a", 20.0),
        ]);

        view.set_sort(SortField::Price);
        assert_eq!(view.sort(), (Some(SortField::Price), SortDirection::Asc));
        assert_eq!(ids(view.filtered()), vec![2, 3, 1]);

        view.set_sort(SortField::Price);
        assert_eq!(view.sort(), (Some(SortField::Price), SortDirection::Desc));
        assert_eq!(ids(view.filtered()), vec![1, 3, 2]);

        view.set_sort(SortField::Price);
        assert_eq!(ids(view.filtered()), vec![2, 3, 1]);

        view.set_sort(SortField::Title);
        assert_eq!(view.sort(), (Some(SortField::Title), SortDirection::Asc));
        assert_eq!(ids(view.filtered()), vec![3, 1, 2]);
    }

    #[test]
    fn test_sort_resets_page() {
        let mut view = ViewState::default();
        view.replace_all(catalog(25));
        view.next_page();

        view.set_sort(SortField::Title);

        assert_eq!(view.current_page(), 1);
    }

    #[test]
    fn test_title_sort_ignores_case_and_is_stable_for_ties() {
        let mut view = ViewState::default();
        view.replace_all(vec![
            product(1, "banana", 1.0),
            product(2, "Apple", 1.0),
            product(3, "cherry", 1.0),
            product(4, "apple", 1.0),
        ]);

        view.set_sort(SortField::Title);
        assert_eq!(ids(view.filtered()), vec![2, 4, 1, 3]);

        // equal prices keep their current order in both directions
        view.set_sort(SortField::Price);
        assert_eq!(ids(view.filtered()), vec![2, 4, 1, 3]);
        view.set_sort(SortField::Price);
        assert_eq!(ids(view.filtered()), vec![2, 4, 1, 3]);
    }

    #[test]
    fn test_unmatched_keyword_empties_page_but_not_catalog() {
        let mut view = ViewState::default();
        view.replace_all(catalog(12));

        view.set_keyword("no such title");

        assert!(view.current_page_rows().is_empty());
        assert_eq!(view.all_products().len(), 12);
        assert_eq!(view.total_pages(), 1);

        view.set_keyword("");
        assert_eq!(view.current_page_rows().len(), 10);
    }

    #[test]
    fn test_accented_titles_sort_after_ascii() {
        let mut view = ViewState::default();
        view.replace_all(vec![
            product(1, "Éclair", 1.0),
            product(2, "Zebra", 2.0),
            product(3, "eclair", 3.0),
        ]);

        view.set_sort(SortField::Title);

        assert_eq!(ids(view.filtered()), vec![3, 2, 1]);
    }

    #[test]
    fn test_page_size_change_resets_page() {
        let mut view = ViewState::default();
        view.replace_all(catalog(25));
        view.next_page();
        view.next_page();

        view.set_page_size(PageSize::from_usize(50).unwrap());

        assert_eq!(view.current_page(), 1);
        assert_eq!(view.total_pages(), 1);
        assert_eq!(view.current_page_rows().len(), 25);
    }

    #[test]
    fn test_replace_all_keeps_filter_and_sort_and_clamps_page() {
        let mut view = ViewState::default();
        view.replace_all(catalog(25));
        view.set_sort(SortField::Price);
        view.set_sort(SortField::Price);
        view.next_page();
        view.next_page();
        assert_eq!(view.current_page(), 3);

        let mut smaller = catalog(12);
        smaller[0].title = "Edited".to_string();
        view.replace_all(smaller);

        assert_eq!(view.current_page(), 2);
        assert_eq!(ids(view.current_page_rows()), vec![2, 1]);
        assert_eq!(view.filtered()[0].id, 12);

        view.set_keyword("item");
        view.replace_all(catalog(3));
        assert_eq!(ids(view.filtered()), vec![3, 2, 1]);
    }

    #[test]
    fn test_select_snapshots_row() {
        let mut view = ViewState::default();
        view.replace_all(catalog(3));

        assert_eq!(view.select(2).map(|p| p.id), Some(2));
        assert_eq!(view.selected().map(|p| p.title.as_str()), Some("Item 02"));

        assert!(view.select(99).is_none());
        assert!(view.selected().is_none());
    }

    #[test]
    fn test_page_size_options() {
        assert_eq!(PageSize::default().get(), 10);
        assert_eq!(PageSize::from_usize(20), Some(PageSize(20)));
        assert_eq!(PageSize::from_usize(7), None);
        assert_eq!(PageSize(20).to_string(), "20 / page");
    }
}

//! Shared filtering and sorting for the table views.
//!
//! Every list screen (inventory, sales, reports) drives the same pipeline:
//! a case-insensitive substring search across a record's searchable text,
//! AND-combined categorical filters, then a stable comparator sort taken
//! from the `sort`/`dir` query parameters.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Per-request sort state, carried in the query string. No key means the
/// backing order (creation descending) is left untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct SortConfig {
    pub key: Option<String>,
    pub direction: SortDirection,
}

impl SortConfig {
    pub fn unsorted() -> Self {
        Self {
            key: None,
            direction: SortDirection::Asc,
        }
    }

    pub fn from_params(sort: Option<&str>, dir: Option<&str>) -> Self {
        let mut config = Self::unsorted();
        config.key = sort
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        if dir == Some("desc") {
            config.direction = SortDirection::Desc;
        }
        config
    }

    /// Sort state after clicking the header for `key`: a second click on an
    /// ascending column flips it to descending, anything else starts
    /// ascending on the new key.
    pub fn toggle(&self, key: &str) -> Self {
        let direction = if self.key.as_deref() == Some(key) && self.direction == SortDirection::Asc
        {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        };
        Self {
            key: Some(key.to_string()),
            direction,
        }
    }

    pub fn dir_param(&self) -> &'static str {
        match self.direction {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// A typed view of one sortable attribute. Comparing values of different
/// shapes yields `Ordering::Equal`, which the stable sort turns into
/// "keep the input order".
#[derive(Debug, Clone, PartialEq)]
pub enum SortValue {
    Text(String),
    Number(f64),
    Date(NaiveDate),
    Stamp(DateTime<Utc>),
}

/// Implemented by every record type that appears in a filterable table.
pub trait Listed {
    /// The attributes the free-text search runs over.
    fn search_text(&self) -> Vec<&str>;

    /// The sortable attribute behind `key`, if the key is recognized.
    fn sort_value(&self, key: &str) -> Option<SortValue>;

    /// The categorical value behind a filter key (category, status, ...).
    fn facet(&self, _key: &str) -> Option<&str> {
        None
    }
}

fn compare_values(a: &SortValue, b: &SortValue) -> Ordering {
    match (a, b) {
        (SortValue::Text(x), SortValue::Text(y)) => x.to_lowercase().cmp(&y.to_lowercase()),
        (SortValue::Number(x), SortValue::Number(y)) => x.partial_cmp(y).unwrap_or(Ordering::Equal),
        (SortValue::Date(x), SortValue::Date(y)) => x.cmp(y),
        (SortValue::Stamp(x), SortValue::Stamp(y)) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

fn matches<T: Listed>(row: &T, search: &str, facets: &[(&str, Option<&str>)]) -> bool {
    let matches_search = search.is_empty()
        || row
            .search_text()
            .iter()
            .any(|text| text.to_lowercase().contains(search));

    // A `None` selection is the "all" sentinel and constrains nothing.
    let matches_facets = facets.iter().all(|(key, selected)| match selected {
        Some(wanted) => row.facet(key) == Some(*wanted),
        None => true,
    });

    matches_search && matches_facets
}

/// Pure filter + stable sort over an in-memory record list. Deterministic:
/// identical inputs always produce the identical output sequence.
pub fn filter_sort<T: Listed + Clone>(
    rows: &[T],
    search: &str,
    facets: &[(&str, Option<&str>)],
    sort: &SortConfig,
) -> Vec<T> {
    let search = search.trim().to_lowercase();

    let mut out: Vec<T> = rows
        .iter()
        .filter(|row| matches(*row, &search, facets))
        .cloned()
        .collect();

    if let Some(key) = sort.key.as_deref() {
        // `sort_by` is stable, so ties and unrecognized keys preserve the
        // relative input order.
        out.sort_by(|a, b| {
            let ordering = match (a.sort_value(key), b.sort_value(key)) {
                (Some(x), Some(y)) => compare_values(&x, &y),
                _ => Ordering::Equal,
            };
            match sort.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });
    }

    out
}

/// A prebuilt sortable column header. The href preserves the active search
/// and filter parameters and encodes the toggled sort state.
#[derive(Debug, Clone)]
pub struct ColumnLink {
    pub label: &'static str,
    pub href: String,
    pub active: bool,
}

/// Builds the header links for a table. `base_query` carries the already
/// urlencoded search/filter parameters ("q=mouse&category=Electronics"),
/// or an empty string.
pub fn column_links(
    base_query: &str,
    columns: &[(&'static str, &'static str)],
    sort: &SortConfig,
) -> Vec<ColumnLink> {
    columns
        .iter()
        .map(|&(key, label)| {
            let next = sort.toggle(key);
            let href = if base_query.is_empty() {
                format!("?sort={}&dir={}", key, next.dir_param())
            } else {
                format!("?{}&sort={}&dir={}", base_query, key, next.dir_param())
            };
            ColumnLink {
                label,
                href,
                active: sort.key.as_deref() == Some(key),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        name: String,
        sku: String,
        category: String,
        stock: i32,
    }

    impl Row {
        fn new(name: &str, sku: &str, category: &str, stock: i32) -> Self {
            Self {
                name: name.to_string(),
                sku: sku.to_string(),
                category: category.to_string(),
                stock,
            }
        }
    }

    impl Listed for Row {
        fn search_text(&self) -> Vec<&str> {
            vec![&self.name, &self.sku]
        }

        fn sort_value(&self, key: &str) -> Option<SortValue> {
            match key {
                "name" => Some(SortValue::Text(self.name.clone())),
                "stock" => Some(SortValue::Number(self.stock as f64)),
                _ => None,
            }
        }

        fn facet(&self, key: &str) -> Option<&str> {
            match key {
                "category" => Some(&self.category),
                _ => None,
            }
        }
    }

    fn sample() -> Vec<Row> {
        vec![
            Row::new("Wireless Earbuds", "ELEC-001", "Electronics", 45),
            Row::new("Smart Watch", "ELEC-002", "Electronics", 12),
            Row::new("Running Shoes", "SHOE-001", "Clothing", 56),
            Row::new("Desk Lamp", "HOME-001", "Home & Living", 78),
            Row::new("Yoga Mat", "HEALTH-002", "Health", 42),
        ]
    }

    #[test]
    fn empty_inputs_return_rows_unchanged() {
        let rows = sample();
        let out = filter_sort(&rows, "", &[("category", None)], &SortConfig::unsorted());
        assert_eq!(out, rows);
    }

    #[test]
    fn search_is_case_insensitive_across_designated_attributes() {
        let rows = sample();
        // Matches the name of one row and the SKU prefix of two others.
        let by_name = filter_sort(&rows, "WATCH", &[], &SortConfig::unsorted());
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].name, "Smart Watch");

        let by_sku = filter_sort(&rows, "elec-", &[], &SortConfig::unsorted());
        assert_eq!(by_sku.len(), 2);
    }

    #[test]
    fn facet_and_search_combine_with_and() {
        let rows = sample();
        let out = filter_sort(
            &rows,
            "s",
            &[("category", Some("Electronics"))],
            &SortConfig::unsorted(),
        );
        // "s" matches several names but only the Electronics rows survive.
        assert!(out.iter().all(|r| r.category == "Electronics"));
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn numeric_sort_desc_is_exact_reverse_of_asc_without_ties() {
        let rows = sample();
        let asc = filter_sort(&rows, "", &[], &SortConfig::from_params(Some("stock"), None));
        let desc = filter_sort(
            &rows,
            "",
            &[],
            &SortConfig::from_params(Some("stock"), Some("desc")),
        );
        let mut reversed = asc.clone();
        reversed.reverse();
        assert_eq!(desc, reversed);
    }

    #[test]
    fn ties_preserve_input_order() {
        let rows = vec![
            Row::new("B", "1", "x", 10),
            Row::new("A", "2", "x", 10),
            Row::new("C", "3", "x", 5),
        ];
        let out = filter_sort(&rows, "", &[], &SortConfig::from_params(Some("stock"), None));
        assert_eq!(out[0].name, "C");
        // The two stock=10 rows keep their relative input order.
        assert_eq!(out[1].name, "B");
        assert_eq!(out[2].name, "A");
    }

    #[test]
    fn unknown_sort_key_leaves_order_untouched() {
        let rows = sample();
        let out = filter_sort(
            &rows,
            "",
            &[],
            &SortConfig::from_params(Some("missing"), None),
        );
        assert_eq!(out, rows);
    }

    #[test]
    fn from_params_without_a_key_is_the_unsorted_default() {
        assert_eq!(SortConfig::from_params(None, None), SortConfig::unsorted());
        assert_eq!(
            SortConfig::from_params(Some("  "), None),
            SortConfig::unsorted()
        );
    }

    #[test]
    fn toggle_cycles_asc_desc_asc_on_the_same_key() {
        let first = SortConfig::unsorted().toggle("name");
        assert_eq!(first.key.as_deref(), Some("name"));
        assert_eq!(first.direction, SortDirection::Asc);

        let second = first.toggle("name");
        assert_eq!(second.direction, SortDirection::Desc);

        let third = second.toggle("name");
        assert_eq!(third.direction, SortDirection::Asc);
    }

    #[test]
    fn toggle_resets_to_asc_on_a_different_key() {
        let on_name_desc = SortConfig {
            key: Some("name".to_string()),
            direction: SortDirection::Desc,
        };
        let switched = on_name_desc.toggle("stock");
        assert_eq!(switched.key.as_deref(), Some("stock"));
        assert_eq!(switched.direction, SortDirection::Asc);
    }

    #[test]
    fn column_links_preserve_base_query_and_mark_active_column() {
        let sort = SortConfig::from_params(Some("name"), None);
        let links = column_links("q=mouse", &[("name", "Name"), ("stock", "Stock")], &sort);
        assert_eq!(links[0].href, "?q=mouse&sort=name&dir=desc");
        assert!(links[0].active);
        assert_eq!(links[1].href, "?q=mouse&sort=stock&dir=asc");
        assert!(!links[1].active);
    }

    fn arb_row() -> impl Strategy<Value = Row> {
        ("[a-zA-Z ]{0,12}", "[A-Z]{2}-[0-9]{3}", 0..3usize, 0..100i32).prop_map(
            |(name, sku, cat, stock)| {
                let category = ["Electronics", "Clothing", "Health"][cat];
                Row::new(&name, &sku, category, stock)
            },
        )
    }

    proptest! {
        #[test]
        fn output_is_always_a_subsequence_of_the_input(
            rows in proptest::collection::vec(arb_row(), 0..24),
            search in "[a-zA-Z]{0,4}",
        ) {
            let out = filter_sort(&rows, &search, &[], &SortConfig::unsorted());
            let mut cursor = rows.iter();
            for row in &out {
                prop_assert!(cursor.any(|r| r == row));
            }
        }

        #[test]
        fn filter_sort_is_idempotent(
            rows in proptest::collection::vec(arb_row(), 0..24),
            dir in prop_oneof![Just(None), Just(Some("desc"))],
        ) {
            let sort = SortConfig::from_params(Some("name"), dir);
            let once = filter_sort(&rows, "", &[], &sort);
            let twice = filter_sort(&once, "", &[], &sort);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn every_match_contains_the_term_somewhere(
            rows in proptest::collection::vec(arb_row(), 0..24),
            search in "[a-zA-Z]{1,4}",
        ) {
            let out = filter_sort(&rows, &search, &[], &SortConfig::unsorted());
            let needle = search.to_lowercase();
            for row in &out {
                prop_assert!(
                    row.search_text().iter().any(|t| t.to_lowercase().contains(&needle))
                );
            }
        }
    }
}

use chrono::NaiveDate;

use crate::listing::{Listed, SortValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Inventory,
    Sales,
    Financial,
    Analytics,
}

impl ReportKind {
    pub const ALL: [ReportKind; 4] = [
        ReportKind::Inventory,
        ReportKind::Sales,
        ReportKind::Financial,
        ReportKind::Analytics,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ReportKind::Inventory => "inventory",
            ReportKind::Sales => "sales",
            ReportKind::Financial => "financial",
            ReportKind::Analytics => "analytics",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ReportKind::Inventory => "Inventory",
            ReportKind::Sales => "Sales",
            ReportKind::Financial => "Financial",
            ReportKind::Analytics => "Analytics",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Pdf,
    Xlsx,
    Csv,
}

impl ReportFormat {
    pub const ALL: [ReportFormat; 3] = [ReportFormat::Pdf, ReportFormat::Xlsx, ReportFormat::Csv];

    pub fn as_str(self) -> &'static str {
        match self {
            ReportFormat::Pdf => "pdf",
            ReportFormat::Xlsx => "xlsx",
            ReportFormat::Csv => "csv",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ReportFormat::Pdf => "PDF",
            ReportFormat::Xlsx => "XLSX",
            ReportFormat::Csv => "CSV",
        }
    }
}

/// Metadata row in the generated-reports catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportEntry {
    pub id: &'static str,
    pub name: &'static str,
    pub kind: ReportKind,
    pub format: ReportFormat,
    pub generated_by: &'static str,
    pub date: NaiveDate,
    pub size: &'static str,
}

fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid catalog date")
}

/// The built-in report catalog. Report generation itself lives outside this
/// system; the view only lists, searches, and filters what was produced.
pub fn report_catalog() -> Vec<ReportEntry> {
    vec![
        ReportEntry {
            id: "REP001",
            name: "Monthly Inventory Report - October 2023",
            kind: ReportKind::Inventory,
            format: ReportFormat::Pdf,
            generated_by: "System",
            date: day(2023, 10, 31),
            size: "1.2 MB",
        },
        ReportEntry {
            id: "REP002",
            name: "Q3 Sales Analysis",
            kind: ReportKind::Sales,
            format: ReportFormat::Xlsx,
            generated_by: "John Smith",
            date: day(2023, 10, 15),
            size: "3.4 MB",
        },
        ReportEntry {
            id: "REP003",
            name: "Financial Statement - September 2023",
            kind: ReportKind::Financial,
            format: ReportFormat::Pdf,
            generated_by: "System",
            date: day(2023, 10, 5),
            size: "2.1 MB",
        },
        ReportEntry {
            id: "REP004",
            name: "Top Selling Products - Q3 2023",
            kind: ReportKind::Analytics,
            format: ReportFormat::Xlsx,
            generated_by: "Sarah Johnson",
            date: day(2023, 10, 12),
            size: "1.8 MB",
        },
        ReportEntry {
            id: "REP005",
            name: "Low Stock Alerts - October 2023",
            kind: ReportKind::Inventory,
            format: ReportFormat::Csv,
            generated_by: "System",
            date: day(2023, 10, 20),
            size: "0.8 MB",
        },
        ReportEntry {
            id: "REP006",
            name: "Sales by Region - September 2023",
            kind: ReportKind::Sales,
            format: ReportFormat::Xlsx,
            generated_by: "David Wilson",
            date: day(2023, 10, 8),
            size: "2.3 MB",
        },
        ReportEntry {
            id: "REP007",
            name: "Customer Purchasing Patterns",
            kind: ReportKind::Analytics,
            format: ReportFormat::Pdf,
            generated_by: "System",
            date: day(2023, 10, 17),
            size: "1.5 MB",
        },
        ReportEntry {
            id: "REP008",
            name: "Monthly Expense Report - October 2023",
            kind: ReportKind::Financial,
            format: ReportFormat::Csv,
            generated_by: "System",
            date: day(2023, 10, 31),
            size: "1.1 MB",
        },
    ]
}

impl Listed for ReportEntry {
    fn search_text(&self) -> Vec<&str> {
        vec![self.name]
    }

    fn sort_value(&self, key: &str) -> Option<SortValue> {
        match key {
            "name" => Some(SortValue::Text(self.name.to_string())),
            "date" => Some(SortValue::Date(self.date)),
            _ => None,
        }
    }

    fn facet(&self, key: &str) -> Option<&str> {
        match key {
            "kind" => Some(self.kind.as_str()),
            "format" => Some(self.format.as_str()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::{filter_sort, SortConfig};

    #[test]
    fn catalog_filters_by_kind_and_format() {
        let catalog = report_catalog();
        let out = filter_sort(
            &catalog,
            "",
            &[("kind", Some("inventory")), ("format", Some("csv"))],
            &SortConfig::unsorted(),
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "REP005");
    }

    #[test]
    fn catalog_search_matches_report_names() {
        let catalog = report_catalog();
        let out = filter_sort(&catalog, "sales", &[], &SortConfig::unsorted());
        assert!(out.iter().any(|r| r.id == "REP002"));
        assert!(out.iter().any(|r| r.id == "REP006"));
    }
}

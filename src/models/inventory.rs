use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::listing::{Listed, SortValue};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct InventoryItem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub sku: String,
    pub category: String,
    pub price: Decimal,
    pub stock: i32,
    pub threshold: i32,
    pub last_updated: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Fields of a freshly submitted item; id and timestamps are assigned on
/// insert.
#[derive(Debug, Clone)]
pub struct NewItem {
    pub name: String,
    pub sku: String,
    pub category: String,
    pub price: Decimal,
    pub stock: i32,
    pub threshold: i32,
}

/// Partial patch for an existing item. `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub sku: Option<String>,
    pub category: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<i32>,
    pub threshold: Option<i32>,
}

/// Stock banding relative to an item's reorder threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockStatus {
    Low,
    Medium,
    High,
}

impl StockStatus {
    pub fn band(stock: i32, threshold: i32) -> Self {
        if stock <= threshold / 2 {
            StockStatus::Low
        } else if stock <= threshold {
            StockStatus::Medium
        } else {
            StockStatus::High
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StockStatus::Low => "Low",
            StockStatus::Medium => "Medium",
            StockStatus::High => "High",
        }
    }
}

impl InventoryItem {
    pub fn stock_status(&self) -> StockStatus {
        StockStatus::band(self.stock, self.threshold)
    }
}

impl Listed for InventoryItem {
    fn search_text(&self) -> Vec<&str> {
        vec![&self.name, &self.sku]
    }

    fn sort_value(&self, key: &str) -> Option<SortValue> {
        match key {
            "name" => Some(SortValue::Text(self.name.clone())),
            "sku" => Some(SortValue::Text(self.sku.clone())),
            "category" => Some(SortValue::Text(self.category.clone())),
            "price" => self.price.to_f64().map(SortValue::Number),
            "stock" => Some(SortValue::Number(self.stock as f64)),
            "last_updated" => Some(SortValue::Date(self.last_updated)),
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_bands_against_the_threshold() {
        assert_eq!(StockStatus::band(5, 20), StockStatus::Low);
        assert_eq!(StockStatus::band(15, 20), StockStatus::Medium);
        assert_eq!(StockStatus::band(25, 20), StockStatus::High);
    }

    #[test]
    fn band_boundaries_are_inclusive() {
        // Exactly half the threshold is still low, exactly the threshold is
        // still medium.
        assert_eq!(StockStatus::band(10, 20), StockStatus::Low);
        assert_eq!(StockStatus::band(20, 20), StockStatus::Medium);
        assert_eq!(StockStatus::band(21, 20), StockStatus::High);
    }

    #[test]
    fn zero_threshold_marks_empty_stock_low() {
        assert_eq!(StockStatus::band(0, 0), StockStatus::Low);
        assert_eq!(StockStatus::band(1, 0), StockStatus::High);
    }
}

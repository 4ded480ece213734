use chrono::{DateTime, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::listing::{Listed, SortValue};

/// Order lifecycle. Stored as snake_case text; anything outside this set is
/// a defect in upstream data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum SaleStatus {
    Pending,
    Processing,
    Completed,
    Cancelled,
}

impl SaleStatus {
    pub const ALL: [SaleStatus; 4] = [
        SaleStatus::Pending,
        SaleStatus::Processing,
        SaleStatus::Completed,
        SaleStatus::Cancelled,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(SaleStatus::Pending),
            "processing" => Some(SaleStatus::Processing),
            "completed" => Some(SaleStatus::Completed),
            "cancelled" => Some(SaleStatus::Cancelled),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SaleStatus::Pending => "pending",
            SaleStatus::Processing => "processing",
            SaleStatus::Completed => "completed",
            SaleStatus::Cancelled => "cancelled",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SaleStatus::Pending => "Pending",
            SaleStatus::Processing => "Processing",
            SaleStatus::Completed => "Completed",
            SaleStatus::Cancelled => "Cancelled",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum PaymentMethod {
    CreditCard,
    Paypal,
    BankTransfer,
    Cash,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::CreditCard,
        PaymentMethod::Paypal,
        PaymentMethod::BankTransfer,
        PaymentMethod::Cash,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "credit_card" => Some(PaymentMethod::CreditCard),
            "paypal" => Some(PaymentMethod::Paypal),
            "bank_transfer" => Some(PaymentMethod::BankTransfer),
            "cash" => Some(PaymentMethod::Cash),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "credit_card",
            PaymentMethod::Paypal => "paypal",
            PaymentMethod::BankTransfer => "bank_transfer",
            PaymentMethod::Cash => "cash",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "Credit Card",
            PaymentMethod::Paypal => "PayPal",
            PaymentMethod::BankTransfer => "Bank Transfer",
            PaymentMethod::Cash => "Cash",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct SaleRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub order_id: String,
    pub customer: String,
    pub items: i32,
    pub total: Decimal,
    pub status: SaleStatus,
    pub payment_method: PaymentMethod,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewSale {
    pub customer: String,
    pub items: i32,
    pub total: Decimal,
    pub payment_method: PaymentMethod,
    pub status: SaleStatus,
}

/// Short display reference stamped on a sale at creation time. Not
/// guaranteed unique; the row id stays the real identity.
pub fn generate_order_ref() -> String {
    let code: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(char::from)
        .collect();
    format!("ORD-{}", code.to_uppercase())
}

impl Listed for SaleRecord {
    fn search_text(&self) -> Vec<&str> {
        vec![&self.order_id, &self.customer]
    }

    fn sort_value(&self, key: &str) -> Option<SortValue> {
        match key {
            "order_id" => Some(SortValue::Text(self.order_id.clone())),
            "customer" => Some(SortValue::Text(self.customer.clone())),
            "date" => Some(SortValue::Stamp(self.created_at)),
            "items" => Some(SortValue::Number(self.items as f64)),
            "total" => self.total.to_f64().map(SortValue::Number),
            _ => None,
        }
    }

    fn facet(&self, key: &str) -> Option<&str> {
        match key {
            "status" => Some(self.status.as_str()),
            "payment" => Some(self.payment_method.as_str()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parse_round_trips_the_closed_set() {
        for status in SaleStatus::ALL {
            assert_eq!(SaleStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(SaleStatus::parse("shipped"), None);
    }

    #[test]
    fn payment_method_parse_round_trips_the_closed_set() {
        for method in PaymentMethod::ALL {
            assert_eq!(PaymentMethod::parse(method.as_str()), Some(method));
        }
        assert_eq!(PaymentMethod::parse(""), None);
    }

    #[test]
    fn order_ref_is_short_uppercase_alphanumeric() {
        let reference = generate_order_ref();
        let code = reference.strip_prefix("ORD-").expect("ORD- prefix");
        assert_eq!(code.len(), 6);
        assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
        assert!(!code.chars().any(|c| c.is_ascii_lowercase()));
    }

    #[test]
    fn consecutive_order_refs_differ() {
        // Collisions are possible in principle but two back-to-back draws
        // matching would indicate a broken RNG.
        assert_ne!(generate_order_ref(), generate_order_ref());
    }
}

pub mod activity;
pub mod inventory;
pub mod report;
pub mod role;
pub mod sales;
pub mod user;

// Re-export only the types we actually use
pub use activity::{Activity, ActivityKind};
pub use inventory::{InventoryItem, ItemPatch, NewItem};
pub use report::{report_catalog, ReportEntry, ReportFormat, ReportKind};
pub use role::Role;
pub use sales::{generate_order_ref, NewSale, PaymentMethod, SaleRecord, SaleStatus};
pub use user::User;

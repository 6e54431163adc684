use chrono::{DateTime, NaiveDate, Utc};
use rand::Rng;
use uuid::Uuid;

use super::status::{DeliveryStatus, OrderStatus};

pub const RECEIPT_PREFIX: &str = "CTR";

const RECEIPT_SUFFIX_LEN: usize = 6;
const RECEIPT_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Build a human-readable receipt number: `CTR-YYMMDD-XXXXXX` where the
/// suffix is 6 random uppercase base-36 characters. Uniqueness is
/// probabilistic; the UNIQUE constraint on `orders.receipt_number` turns a
/// collision into a conflict instead of silently duplicating.
pub fn generate_receipt_number(now: DateTime<Utc>) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..RECEIPT_SUFFIX_LEN)
        .map(|_| RECEIPT_ALPHABET[rng.gen_range(0..RECEIPT_ALPHABET.len())] as char)
        .collect();
    format!("{}-{}-{}", RECEIPT_PREFIX, now.format("%y%m%d"), suffix)
}

/// One cart entry. Unit prices are deliberately absent: the authoritative
/// price is read from the package catalog when the order is persisted, so a
/// client cannot order at a price of its own choosing.
#[derive(Debug, Clone)]
pub struct OrderLineDraft {
    pub package_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Clone)]
pub struct OrderDraft {
    pub customer_id: Uuid,
    pub payment_method_id: Uuid,
    pub delivery_date: NaiveDate,
    pub lines: Vec<OrderLineDraft>,
}

#[derive(Debug, Clone)]
pub struct OrderLineView {
    pub id: Uuid,
    pub package_id: Uuid,
    pub quantity: i32,
    pub unit_price: i64,
    pub subtotal: i64,
}

#[derive(Debug, Clone)]
pub struct OrderView {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub payment_method_id: Uuid,
    pub receipt_number: String,
    pub delivery_date: NaiveDate,
    pub status: OrderStatus,
    pub total_amount: i64,
    pub payment_proof: Option<String>,
    pub created_at: DateTime<Utc>,
    pub lines: Vec<OrderLineView>,
}

#[derive(Debug, Clone)]
pub struct DeliveryView {
    pub id: Uuid,
    pub order_id: Uuid,
    pub courier_id: Uuid,
    pub status: DeliveryStatus,
    pub dispatched_at: DateTime<Utc>,
    pub arrived_at: Option<DateTime<Utc>>,
    pub arrival_photo: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ListResult<T> {
    pub items: Vec<T>,
    pub total: i64,
}

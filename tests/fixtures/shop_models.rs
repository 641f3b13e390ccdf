use serde::{Deserialize, Serialize};

/// A customer order
#[derive(Debug, Serialize, Deserialize)]
pub struct Order {
    /// Order identifier
    pub id: uuid::Uuid,
    /// Ordered lines
    pub items: Vec<LineItem>,
    pub status: Status,
    #[serde(rename = "buyer")]
    pub customer: Customer,
    #[serde(skip)]
    pub cache_key: String,
    #[serde(flatten)]
    pub audit: Audit,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Audit {
    /// Creation time
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LineItem {
    pub sku: String,
    pub quantity: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Customer {
    pub name: String,
    pub orders: Vec<Order>,
}

#[derive(Debug, Serialize, Deserialize)]
pub enum Status {
    Active,
    #[serde(rename = "closed")]
    Closed,
}

impl Order {
    /// Number of order lines.
    ///
    /// # Returns
    ///
    /// the number of lines
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    pub fn new(customer: Customer) -> Self {
        unimplemented!()
    }
}

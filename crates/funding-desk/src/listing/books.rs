//! Row shape, tier buckets, and query rules for the books catalog list,
//! plus validation of new catalog entries.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::{FilterRule, Searchable, SortRule};
use crate::store::BookRecord;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRow {
    pub id: String,
    pub title: String,
    pub author_name: String,
    pub price: f64,
    pub stock: i64,
}

impl BookRow {
    pub fn from_record(record: &BookRecord) -> Self {
        Self {
            id: record.id.clone(),
            title: record.title.clone(),
            author_name: record.author_name.clone(),
            price: record.price,
            stock: record.stock,
        }
    }
}

impl Searchable for BookRow {
    fn search_fields(&self) -> Vec<&str> {
        vec![&self.id, &self.title, &self.author_name]
    }
}

/// Inventory bucket: above 200 is high, 100 to 200 is medium, below 100 low.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockTier {
    High,
    Medium,
    Low,
}

impl StockTier {
    pub fn of(stock: i64) -> Self {
        if stock > 200 {
            StockTier::High
        } else if stock >= 100 {
            StockTier::Medium
        } else {
            StockTier::Low
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            StockTier::High => "High (> 200)",
            StockTier::Medium => "Medium (100 - 200)",
            StockTier::Low => "Low (< 100)",
        }
    }
}

/// Price bucket: under 20 is budget, 20 to 50 midrange, above 50 premium.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceTier {
    Budget,
    Midrange,
    Premium,
}

impl PriceTier {
    pub fn of(price: f64) -> Self {
        if price < 20.0 {
            PriceTier::Budget
        } else if price <= 50.0 {
            PriceTier::Midrange
        } else {
            PriceTier::Premium
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            PriceTier::Budget => "Budget (< 20)",
            PriceTier::Midrange => "Midrange (20 - 50)",
            PriceTier::Premium => "Premium (> 50)",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BookFilter {
    Stock(StockTier),
    Price(PriceTier),
    Author(String),
}

impl FilterRule<BookRow> for BookFilter {
    fn category(&self) -> &'static str {
        match self {
            BookFilter::Stock(_) => "Stock",
            BookFilter::Price(_) => "Price",
            BookFilter::Author(_) => "Author",
        }
    }

    fn matches(&self, row: &BookRow) -> bool {
        match self {
            BookFilter::Stock(tier) => StockTier::of(row.stock) == *tier,
            BookFilter::Price(tier) => PriceTier::of(row.price) == *tier,
            BookFilter::Author(name) => row.author_name == *name,
        }
    }

    fn label(&self) -> String {
        match self {
            BookFilter::Stock(tier) => tier.label().to_string(),
            BookFilter::Price(tier) => tier.label().to_string(),
            BookFilter::Author(name) => name.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookSort {
    TitleAsc,
    TitleDesc,
    AuthorAsc,
    AuthorDesc,
    PriceAsc,
    PriceDesc,
    StockDesc,
}

impl SortRule<BookRow> for BookSort {
    fn compare(&self, a: &BookRow, b: &BookRow) -> Ordering {
        match self {
            BookSort::TitleAsc => a.title.cmp(&b.title),
            BookSort::TitleDesc => b.title.cmp(&a.title),
            BookSort::AuthorAsc => a.author_name.cmp(&b.author_name),
            BookSort::AuthorDesc => b.author_name.cmp(&a.author_name),
            BookSort::PriceAsc => a.price.partial_cmp(&b.price).unwrap_or(Ordering::Equal),
            BookSort::PriceDesc => b.price.partial_cmp(&a.price).unwrap_or(Ordering::Equal),
            BookSort::StockDesc => b.stock.cmp(&a.stock),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            BookSort::TitleAsc => "Title (A-Z)",
            BookSort::TitleDesc => "Title (Z-A)",
            BookSort::AuthorAsc => "Author (A-Z)",
            BookSort::AuthorDesc => "Author (Z-A)",
            BookSort::PriceAsc => "Price (Low to High)",
            BookSort::PriceDesc => "Price (High to Low)",
            BookSort::StockDesc => "Stock (High to Low)",
        }
    }
}

/// A catalog entry as entered in the create dialog, before it gets an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBook {
    pub title: String,
    pub author_id: String,
    pub author_name: String,
    pub price: f64,
    pub stock: i64,
}

impl NewBook {
    /// All failing checks at once, in field order.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        if self.title.trim().is_empty() {
            errors.push("Title is required".to_string());
        }
        if self.author_name.trim().is_empty() {
            errors.push("Author is required".to_string());
        }
        if !(self.price > 0.0) {
            errors.push("Price must be greater than zero".to_string());
        }
        if self.stock < 0 {
            errors.push("Stock cannot be negative".to_string());
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    pub fn into_record(self) -> BookRecord {
        BookRecord {
            id: String::new(),
            title: self.title,
            author_id: self.author_id,
            author_name: self.author_name,
            price: self.price,
            stock: self.stock,
        }
    }
}

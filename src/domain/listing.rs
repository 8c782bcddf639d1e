// src/domain/listing.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::db::store::Document;
use crate::domain::timestamp;
use crate::errors::ServerError;

pub const DEFAULT_CITY: &str = "בית שמש";

/// Whether a listing is offered for sale or for rent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    Sale,
    Rent,
}

impl PropertyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::Sale => "sale",
            PropertyType::Rent => "rent",
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PropertyType {
    type Err = ServerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sale" => Ok(PropertyType::Sale),
            "rent" => Ok(PropertyType::Rent),
            other => Err(ServerError::Validation(format!(
                "property_type must be 'sale' or 'rent', got '{other}'"
            ))),
        }
    }
}

/// Largest price the store holds as an exact integer.
pub const MAX_PRICE: u64 = i64::MAX as u64;

fn check_price(key: &str, price: u64) -> Result<(), ServerError> {
    if price > MAX_PRICE {
        return Err(ServerError::Validation(format!(
            "{key} must be at most {MAX_PRICE}"
        )));
    }
    Ok(())
}

fn default_city() -> String {
    DEFAULT_CITY.to_string()
}

/// Every client-controlled field of a listing. Create and update both take the
/// complete set; `id` and timestamps in a request body are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingFields {
    pub title: String,
    pub description: String,
    pub property_type: PropertyType,
    pub price: u64,
    pub rooms: u32,
    pub size_sqm: u32,
    pub street: String,
    #[serde(default = "default_city")]
    pub city: String,

    // Amenities
    #[serde(default)]
    pub balcony: bool,
    #[serde(default)]
    pub air_conditioning: bool,
    #[serde(default)]
    pub parking: bool,
    #[serde(default)]
    pub elevator: bool,
    #[serde(default)]
    pub renovated: bool,

    /// Free text; matched against agent names but never checked.
    pub agent_name: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub videos: Vec<String>,
}

impl ListingFields {
    /// Parse a request body, reporting shape problems as validation errors.
    pub fn from_json(body: &[u8]) -> Result<Self, ServerError> {
        let fields: ListingFields = serde_json::from_slice(body)
            .map_err(|e| ServerError::Validation(format!("invalid listing body: {e}")))?;
        fields.validate()?;
        Ok(fields)
    }

    pub fn validate(&self) -> Result<(), ServerError> {
        if self.title.trim().is_empty() {
            return Err(ServerError::Validation("title must not be empty".into()));
        }
        if self.agent_name.trim().is_empty() {
            return Err(ServerError::Validation("agent_name must not be empty".into()));
        }
        check_price("price", self.price)
    }
}

/// A stored property listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: String,
    #[serde(flatten)]
    pub fields: ListingFields,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl Document for Listing {
    const COLLECTION: &'static str = "listings";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Optional, independently composable listing filters. All present filters
/// must hold.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingFilter {
    pub property_type: Option<PropertyType>,
    pub min_price: Option<u64>,
    pub max_price: Option<u64>,
    pub rooms: Option<u32>,
    /// Case-insensitive substring of the street.
    pub street: Option<String>,
}

impl ListingFilter {
    pub fn of_type(property_type: PropertyType) -> Self {
        Self {
            property_type: Some(property_type),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ServerError> {
        for (key, bound) in [("min_price", self.min_price), ("max_price", self.max_price)] {
            if let Some(price) = bound {
                check_price(key, price)?;
            }
        }
        Ok(())
    }
}

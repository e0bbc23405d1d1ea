use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use uuid::Uuid;

/// The three areas the site lists properties in.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "location", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Location {
    Lawgate,
    GreenValley,
    HighlandPark,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub location: Location,
    pub address: String,
    pub location_map_url: String,

    // Specifications; bathrooms allows half-steps
    pub bedrooms: i32,
    pub bathrooms: f64,
    pub square_feet: i32,

    pub images: Json<Vec<String>>,
    pub contact_number: String,
    pub featured: bool,

    pub created_at: DateTime<Utc>,
}

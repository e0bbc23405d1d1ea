use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::propertymodel::Location;

fn validate_price(price: f64) -> Result<(), ValidationError> {
    if price > 0.0 {
        return Ok(());
    }
    let mut error = ValidationError::new("positive");
    error.message = Some("Please provide a price greater than zero".into());
    Err(error)
}

fn validate_square_feet(square_feet: i32) -> Result<(), ValidationError> {
    if square_feet > 0 {
        return Ok(());
    }
    let mut error = ValidationError::new("positive");
    error.message = Some("Please provide the square footage".into());
    Err(error)
}

fn validate_images(images: &Vec<String>) -> Result<(), ValidationError> {
    if images.iter().any(|url| !url.trim().is_empty()) {
        return Ok(());
    }
    let mut error = ValidationError::new("required");
    error.message = Some("Please provide at least one image".into());
    Err(error)
}

/// Payload for both create (POST) and full-replace update (PUT).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SavePropertyDto {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Title must be between 1 and 100 characters"
    ))]
    pub title: String,

    #[validate(length(min = 1, message = "Please provide a description for the property"))]
    pub description: String,

    #[validate(custom = "validate_price")]
    pub price: f64,

    pub location: Location,

    #[validate(length(min = 1, message = "Please provide an address for the property"))]
    pub address: String,

    #[serde(default)]
    pub location_map_url: String,

    #[validate(range(min = 1, message = "Property must have at least 1 bedroom"))]
    pub bedrooms: i32,

    #[validate(range(min = 1.0, message = "Property must have at least 1 bathroom"))]
    pub bathrooms: f64,

    #[validate(custom = "validate_square_feet")]
    pub square_feet: i32,

    #[validate(custom = "validate_images")]
    pub images: Vec<String>,

    #[validate(length(min = 1, message = "Please provide a contact number"))]
    pub contact_number: String,

    #[serde(default)]
    pub featured: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListPropertiesQueryDto {
    pub location: Option<Location>,
}

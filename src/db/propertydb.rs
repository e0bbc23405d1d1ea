use async_trait::async_trait;
use sqlx::types::Json;
use uuid::Uuid;

use crate::{
    db::db::DBClient,
    dtos::propertydtos::SavePropertyDto,
    models::propertymodel::{Location, Property},
};

const PROPERTY_COLUMNS: &str = "id, title, description, price, location, address, \
     location_map_url, bedrooms, bathrooms, square_feet, images, contact_number, \
     featured, created_at";

#[async_trait]
pub trait PropertyExt {
    /// All properties, newest-created first, optionally filtered by location.
    async fn list_properties(
        &self,
        location: Option<Location>,
    ) -> Result<Vec<Property>, sqlx::Error>;

    async fn get_property_by_id(
        &self,
        property_id: Uuid,
    ) -> Result<Option<Property>, sqlx::Error>;

    async fn save_property(
        &self,
        property_data: &SavePropertyDto,
    ) -> Result<Property, sqlx::Error>;

    /// Full-document replace. The row's id and created_at are never touched.
    async fn update_property(
        &self,
        property_id: Uuid,
        property_data: &SavePropertyDto,
    ) -> Result<Option<Property>, sqlx::Error>;

    /// Returns the deleted row so the caller can clean up hosted images.
    async fn delete_property(
        &self,
        property_id: Uuid,
    ) -> Result<Option<Property>, sqlx::Error>;
}

#[async_trait]
impl PropertyExt for DBClient {
    async fn list_properties(
        &self,
        location: Option<Location>,
    ) -> Result<Vec<Property>, sqlx::Error> {
        let properties = match location {
            Some(location) => {
                sqlx::query_as::<_, Property>(&format!(
                    "SELECT {PROPERTY_COLUMNS} FROM properties WHERE location = $1 \
                     ORDER BY created_at DESC"
                ))
                .bind(location)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Property>(&format!(
                    "SELECT {PROPERTY_COLUMNS} FROM properties ORDER BY created_at DESC"
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(properties)
    }

    async fn get_property_by_id(
        &self,
        property_id: Uuid,
    ) -> Result<Option<Property>, sqlx::Error> {
        let property = sqlx::query_as::<_, Property>(&format!(
            "SELECT {PROPERTY_COLUMNS} FROM properties WHERE id = $1"
        ))
        .bind(property_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(property)
    }

    async fn save_property(
        &self,
        property_data: &SavePropertyDto,
    ) -> Result<Property, sqlx::Error> {
        let property = sqlx::query_as::<_, Property>(&format!(
            "INSERT INTO properties (
                title, description, price, location, address, location_map_url,
                bedrooms, bathrooms, square_feet, images, contact_number, featured
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {PROPERTY_COLUMNS}"
        ))
        .bind(&property_data.title)
        .bind(&property_data.description)
        .bind(property_data.price)
        .bind(property_data.location)
        .bind(&property_data.address)
        .bind(&property_data.location_map_url)
        .bind(property_data.bedrooms)
        .bind(property_data.bathrooms)
        .bind(property_data.square_feet)
        .bind(Json(property_data.images.clone()))
        .bind(&property_data.contact_number)
        .bind(property_data.featured)
        .fetch_one(&self.pool)
        .await?;

        Ok(property)
    }

    async fn update_property(
        &self,
        property_id: Uuid,
        property_data: &SavePropertyDto,
    ) -> Result<Option<Property>, sqlx::Error> {
        let property = sqlx::query_as::<_, Property>(&format!(
            "UPDATE properties SET
                title = $1, description = $2, price = $3, location = $4,
                address = $5, location_map_url = $6, bedrooms = $7,
                bathrooms = $8, square_feet = $9, images = $10,
                contact_number = $11, featured = $12
            WHERE id = $13
            RETURNING {PROPERTY_COLUMNS}"
        ))
        .bind(&property_data.title)
        .bind(&property_data.description)
        .bind(property_data.price)
        .bind(property_data.location)
        .bind(&property_data.address)
        .bind(&property_data.location_map_url)
        .bind(property_data.bedrooms)
        .bind(property_data.bathrooms)
        .bind(property_data.square_feet)
        .bind(Json(property_data.images.clone()))
        .bind(&property_data.contact_number)
        .bind(property_data.featured)
        .bind(property_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(property)
    }

    async fn delete_property(
        &self,
        property_id: Uuid,
    ) -> Result<Option<Property>, sqlx::Error> {
        let property = sqlx::query_as::<_, Property>(&format!(
            "DELETE FROM properties WHERE id = $1 RETURNING {PROPERTY_COLUMNS}"
        ))
        .bind(property_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(property)
    }
}

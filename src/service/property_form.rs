use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    dtos::propertydtos::SavePropertyDto,
    models::propertymodel::{Location, Property},
    service::cloudinary::{public_id_from_url, CloudinaryClient, CloudinaryError, UploadedImage},
};

/// Seam between the form workflow and the media host, so the workflow can be
/// driven without network access.
#[async_trait]
pub trait ImageStore: Send + Sync + 'static {
    async fn upload(&self, bytes: Vec<u8>, filename: &str)
        -> Result<UploadedImage, CloudinaryError>;

    async fn destroy(&self, public_id: &str) -> Result<(), CloudinaryError>;
}

#[async_trait]
impl ImageStore for CloudinaryClient {
    async fn upload(
        &self,
        bytes: Vec<u8>,
        filename: &str,
    ) -> Result<UploadedImage, CloudinaryError> {
        CloudinaryClient::upload(self, bytes, filename).await
    }

    async fn destroy(&self, public_id: &str) -> Result<(), CloudinaryError> {
        CloudinaryClient::destroy(self, public_id).await
    }
}

pub type UploadAttemptId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Title,
    Description,
    Price,
    Location,
    Address,
    LocationMapUrl,
    Bedrooms,
    Bathrooms,
    SquareFeet,
    ContactNumber,
    Images,
}

impl FormField {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormField::Title => "title",
            FormField::Description => "description",
            FormField::Price => "price",
            FormField::Location => "location",
            FormField::Address => "address",
            FormField::LocationMapUrl => "locationMapUrl",
            FormField::Bedrooms => "bedrooms",
            FormField::Bathrooms => "bathrooms",
            FormField::SquareFeet => "squareFeet",
            FormField::ContactNumber => "contactNumber",
            FormField::Images => "images",
        }
    }
}

/// Controller behind the admin create/edit form: raw field values, a
/// per-field error map, an ordered list of image slots and the set of
/// in-flight upload attempts. Numeric fields stay strings until submit so
/// parsing is part of validation.
pub struct PropertyForm<S> {
    store: Arc<S>,
    property_id: Option<Uuid>,

    pub title: String,
    pub description: String,
    pub price: String,
    pub location: Location,
    pub address: String,
    pub location_map_url: String,
    pub bedrooms: String,
    pub bathrooms: String,
    pub square_feet: String,
    pub contact_number: String,
    pub featured: bool,

    images: Vec<String>,
    errors: HashMap<FormField, String>,
    uploads: HashMap<UploadAttemptId, u8>,
    next_attempt: UploadAttemptId,
}

impl<S: ImageStore> PropertyForm<S> {
    /// Blank form for creating a new property. Starts with a single empty
    /// image slot; the slot list is never allowed to become empty.
    pub fn new(store: Arc<S>) -> Self {
        PropertyForm {
            store,
            property_id: None,
            title: String::new(),
            description: String::new(),
            price: String::new(),
            location: Location::Lawgate,
            address: String::new(),
            location_map_url: String::new(),
            bedrooms: String::new(),
            bathrooms: String::new(),
            square_feet: String::new(),
            contact_number: String::new(),
            featured: false,
            images: vec![String::new()],
            errors: HashMap::new(),
            uploads: HashMap::new(),
            next_attempt: 0,
        }
    }

    /// Form prefilled from an existing property; submit becomes a full
    /// update instead of a create.
    pub fn for_property(store: Arc<S>, property: &Property) -> Self {
        let mut form = PropertyForm::new(store);
        form.property_id = Some(property.id);
        form.title = property.title.clone();
        form.description = property.description.clone();
        form.price = property.price.to_string();
        form.location = property.location;
        form.address = property.address.clone();
        form.location_map_url = property.location_map_url.clone();
        form.bedrooms = property.bedrooms.to_string();
        form.bathrooms = property.bathrooms.to_string();
        form.square_feet = property.square_feet.to_string();
        form.contact_number = property.contact_number.clone();
        form.featured = property.featured;
        if !property.images.0.is_empty() {
            form.images = property.images.0.clone();
        }
        form
    }

    pub fn property_id(&self) -> Option<Uuid> {
        self.property_id
    }

    pub fn is_edit_mode(&self) -> bool {
        self.property_id.is_some()
    }

    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        match field {
            FormField::Title => self.title = value,
            FormField::Description => self.description = value,
            FormField::Price => self.price = value,
            FormField::Address => self.address = value,
            FormField::LocationMapUrl => self.location_map_url = value,
            FormField::Bedrooms => self.bedrooms = value,
            FormField::Bathrooms => self.bathrooms = value,
            FormField::SquareFeet => self.square_feet = value,
            FormField::ContactNumber => self.contact_number = value,
            FormField::Location | FormField::Images => return,
        }
        self.errors.remove(&field);
    }

    pub fn set_location(&mut self, location: Location) {
        self.location = location;
        self.errors.remove(&FormField::Location);
    }

    pub fn set_featured(&mut self, featured: bool) {
        self.featured = featured;
    }

    pub fn images(&self) -> &[String] {
        &self.images
    }

    pub fn errors(&self) -> &HashMap<FormField, String> {
        &self.errors
    }

    pub fn error(&self, field: FormField) -> Option<&str> {
        self.errors.get(&field).map(|message| message.as_str())
    }

    /// Manually typed URL for a slot.
    pub fn set_image_url(&mut self, index: usize, value: impl Into<String>) {
        if let Some(slot) = self.images.get_mut(index) {
            *slot = value.into();
            self.errors.remove(&FormField::Images);
        }
    }

    pub fn add_image_slot(&mut self) {
        self.images.push(String::new());
    }

    /// Removes a slot, first issuing a best-effort delete when the slot
    /// points at a hosted asset. The slot goes away whether or not the
    /// delete succeeded. Refused while only one slot remains.
    pub async fn remove_image_slot(&mut self, index: usize) -> bool {
        if self.images.len() <= 1 || index >= self.images.len() {
            return false;
        }

        if let Some(public_id) = public_id_from_url(&self.images[index]) {
            if let Err(e) = self.store.destroy(&public_id).await {
                tracing::warn!("failed to delete hosted image {}: {}", public_id, e);
            }
        }

        self.images.remove(index);
        true
    }

    pub fn uploads_in_flight(&self) -> usize {
        self.uploads.len()
    }

    pub fn upload_progress(&self, attempt: UploadAttemptId) -> Option<u8> {
        self.uploads.get(&attempt).copied()
    }

    /// Registers a new upload attempt at 0 %.
    pub fn begin_upload(&mut self) -> UploadAttemptId {
        let attempt = self.next_attempt;
        self.next_attempt += 1;
        self.uploads.insert(attempt, 0);
        attempt
    }

    pub fn set_upload_progress(&mut self, attempt: UploadAttemptId, percent: u8) {
        if let Some(progress) = self.uploads.get_mut(&attempt) {
            *progress = percent.min(100);
        }
    }

    /// Finishes a tracked attempt: the slot takes the uploaded URL and the
    /// attempt leaves the in-flight set. Returns the public id of the
    /// hosted asset the slot previously held, which the caller should
    /// delete on a best-effort basis.
    pub fn complete_upload(
        &mut self,
        attempt: UploadAttemptId,
        index: usize,
        url: &str,
    ) -> Option<String> {
        self.uploads.remove(&attempt);

        let slot = self.images.get_mut(index)?;
        let superseded = public_id_from_url(slot);
        *slot = url.to_string();
        superseded
    }

    /// Failed attempt: the slot value stays as it was, the failure lands on
    /// the images field, and the attempt leaves the in-flight set.
    pub fn fail_upload(&mut self, attempt: UploadAttemptId, message: &str) {
        self.uploads.remove(&attempt);
        self.errors.insert(
            FormField::Images,
            format!("Image upload failed: {}", message),
        );
    }

    /// Drives one file through the gateway into a slot, tracking the
    /// attempt from start to finish. A superseded hosted asset is deleted
    /// in the background without blocking the upload result.
    pub async fn upload_into_slot(
        &mut self,
        index: usize,
        bytes: Vec<u8>,
        filename: &str,
    ) -> Result<String, CloudinaryError> {
        while self.images.len() <= index {
            self.images.push(String::new());
        }
        self.errors.remove(&FormField::Images);

        let attempt = self.begin_upload();

        let store = Arc::clone(&self.store);
        let result = store.upload(bytes, filename).await;

        match result {
            Ok(uploaded) => {
                if let Some(superseded) = self.complete_upload(attempt, index, &uploaded.secure_url)
                {
                    let store = Arc::clone(&self.store);
                    tokio::spawn(async move {
                        if let Err(e) = store.destroy(&superseded).await {
                            tracing::warn!(
                                "failed to delete superseded image {}: {}",
                                superseded,
                                e
                            );
                        }
                    });
                }
                Ok(uploaded.secure_url)
            }
            Err(e) => {
                self.fail_upload(attempt, &e.to_string());
                Err(e)
            }
        }
    }

    /// Synchronous submit-time validation. Populates the error map and
    /// returns whether the form may be submitted.
    pub fn validate(&mut self) -> bool {
        let mut errors = HashMap::new();

        if self.title.trim().is_empty() {
            errors.insert(FormField::Title, "Title is required".to_string());
        }
        if self.description.trim().is_empty() {
            errors.insert(FormField::Description, "Description is required".to_string());
        }
        if self.address.trim().is_empty() {
            errors.insert(FormField::Address, "Address is required".to_string());
        }
        if self.contact_number.trim().is_empty() {
            errors.insert(
                FormField::ContactNumber,
                "Contact number is required".to_string(),
            );
        }

        if self.price.trim().is_empty() {
            errors.insert(FormField::Price, "Price is required".to_string());
        } else if !matches!(self.price.trim().parse::<f64>(), Ok(price) if price > 0.0) {
            errors.insert(FormField::Price, "Price must be positive".to_string());
        }

        if self.bedrooms.trim().is_empty() {
            errors.insert(FormField::Bedrooms, "Bedrooms is required".to_string());
        } else if !matches!(self.bedrooms.trim().parse::<i32>(), Ok(bedrooms) if bedrooms > 0) {
            errors.insert(FormField::Bedrooms, "Bedrooms must be positive".to_string());
        }

        if self.bathrooms.trim().is_empty() {
            errors.insert(FormField::Bathrooms, "Bathrooms is required".to_string());
        } else if !matches!(self.bathrooms.trim().parse::<f64>(), Ok(bathrooms) if bathrooms > 0.0)
        {
            errors.insert(FormField::Bathrooms, "Bathrooms must be positive".to_string());
        }

        if self.square_feet.trim().is_empty() {
            errors.insert(FormField::SquareFeet, "Square footage is required".to_string());
        } else if !matches!(self.square_feet.trim().parse::<i32>(), Ok(square_feet) if square_feet > 0)
        {
            errors.insert(
                FormField::SquareFeet,
                "Square footage must be positive".to_string(),
            );
        }

        if self.images.iter().all(|url| url.trim().is_empty()) {
            errors.insert(
                FormField::Images,
                "At least one image is required".to_string(),
            );
        }
        if !self.uploads.is_empty() {
            errors.insert(
                FormField::Images,
                "Please wait for uploads to complete".to_string(),
            );
        }

        self.errors = errors;
        self.errors.is_empty()
    }

    /// Validates and, when the form is submittable, coerces numerics and
    /// drops blank image slots to produce the create/update payload.
    pub fn submit_payload(&mut self) -> Option<SavePropertyDto> {
        if !self.validate() {
            return None;
        }

        let price = self.price.trim().parse::<f64>().ok()?;
        let bedrooms = self.bedrooms.trim().parse::<i32>().ok()?;
        let bathrooms = self.bathrooms.trim().parse::<f64>().ok()?;
        let square_feet = self.square_feet.trim().parse::<i32>().ok()?;

        Some(SavePropertyDto {
            title: self.title.clone(),
            description: self.description.clone(),
            price,
            location: self.location,
            address: self.address.clone(),
            location_map_url: self.location_map_url.clone(),
            bedrooms,
            bathrooms,
            square_feet,
            images: self
                .images
                .iter()
                .filter(|url| !url.trim().is_empty())
                .cloned()
                .collect(),
            contact_number: self.contact_number.clone(),
            featured: self.featured,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct MockImageStore {
        fail_uploads: bool,
        destroyed: Mutex<Vec<String>>,
    }

    impl MockImageStore {
        fn new() -> Arc<Self> {
            Arc::new(MockImageStore {
                fail_uploads: false,
                destroyed: Mutex::new(Vec::new()),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(MockImageStore {
                fail_uploads: true,
                destroyed: Mutex::new(Vec::new()),
            })
        }

        fn destroyed(&self) -> Vec<String> {
            self.destroyed.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ImageStore for MockImageStore {
        async fn upload(
            &self,
            _bytes: Vec<u8>,
            filename: &str,
        ) -> Result<UploadedImage, CloudinaryError> {
            if self.fail_uploads {
                return Err(CloudinaryError::Upload("host rejected payload".to_string()));
            }
            let stem = filename.split('.').next().unwrap_or(filename);
            Ok(UploadedImage {
                secure_url: format!(
                    "https://res.cloudinary.com/demo/image/upload/v1/real_estate/{}.jpg",
                    stem
                ),
                public_id: format!("real_estate/{}", stem),
            })
        }

        async fn destroy(&self, public_id: &str) -> Result<(), CloudinaryError> {
            self.destroyed.lock().unwrap().push(public_id.to_string());
            Ok(())
        }
    }

    fn filled_form(store: Arc<MockImageStore>) -> PropertyForm<MockImageStore> {
        let mut form = PropertyForm::new(store);
        form.set(FormField::Title, "Villa");
        form.set(FormField::Description, "Nice");
        form.set(FormField::Price, "750000");
        form.set_location(Location::Lawgate);
        form.set(FormField::Address, "123 St");
        form.set(FormField::Bedrooms, "4");
        form.set(FormField::Bathrooms, "3");
        form.set(FormField::SquareFeet, "3200");
        form.set(FormField::ContactNumber, "123-456");
        form.set_image_url(0, "http://x/a.jpg");
        form
    }

    #[tokio::test]
    async fn valid_form_produces_a_coerced_payload() {
        let mut form = filled_form(MockImageStore::new());
        form.add_image_slot();

        let payload = form.submit_payload().expect("form should be submittable");
        assert_eq!(payload.price, 750000.0);
        assert_eq!(payload.bedrooms, 4);
        assert_eq!(payload.bathrooms, 3.0);
        assert_eq!(payload.square_feet, 3200);
        // Blank slots are dropped from the payload
        assert_eq!(payload.images, vec!["http://x/a.jpg".to_string()]);
    }

    #[tokio::test]
    async fn half_step_bathrooms_are_accepted() {
        let mut form = filled_form(MockImageStore::new());
        form.set(FormField::Price, "1");
        form.set(FormField::Bedrooms, "1");
        form.set(FormField::Bathrooms, "0.5");
        form.set(FormField::SquareFeet, "100");

        assert!(form.validate());
    }

    #[tokio::test]
    async fn zero_price_and_zero_bedrooms_are_rejected() {
        let mut form = filled_form(MockImageStore::new());
        form.set(FormField::Price, "0");
        form.set(FormField::Bedrooms, "0");

        assert!(!form.validate());
        assert_eq!(form.error(FormField::Price), Some("Price must be positive"));
        assert_eq!(
            form.error(FormField::Bedrooms),
            Some("Bedrooms must be positive")
        );
    }

    #[tokio::test]
    async fn fractional_bedrooms_are_rejected() {
        let mut form = filled_form(MockImageStore::new());
        form.set(FormField::Bedrooms, "2.5");

        assert!(!form.validate());
        assert_eq!(
            form.error(FormField::Bedrooms),
            Some("Bedrooms must be positive")
        );
    }

    #[tokio::test]
    async fn all_blank_image_slots_are_rejected() {
        let mut form = filled_form(MockImageStore::new());
        form.set_image_url(0, "   ");
        form.add_image_slot();

        assert!(!form.validate());
        assert_eq!(
            form.error(FormField::Images),
            Some("At least one image is required")
        );
    }

    #[tokio::test]
    async fn submit_is_blocked_while_an_upload_is_in_flight() {
        let mut form = filled_form(MockImageStore::new());

        let attempt = form.begin_upload();
        assert_eq!(form.uploads_in_flight(), 1);
        assert!(!form.validate());
        assert_eq!(
            form.error(FormField::Images),
            Some("Please wait for uploads to complete")
        );

        form.set_upload_progress(attempt, 100);
        form.complete_upload(
            attempt,
            0,
            "https://res.cloudinary.com/demo/image/upload/v1/real_estate/a.jpg",
        );
        assert_eq!(form.uploads_in_flight(), 0);
        assert!(form.validate());
    }

    #[tokio::test]
    async fn completed_upload_reports_the_superseded_asset() {
        let mut form = filled_form(MockImageStore::new());
        form.set_image_url(
            0,
            "https://res.cloudinary.com/demo/image/upload/v1/real_estate/old.jpg",
        );

        let attempt = form.begin_upload();
        let superseded = form.complete_upload(
            attempt,
            0,
            "https://res.cloudinary.com/demo/image/upload/v1/real_estate/new.jpg",
        );

        assert_eq!(superseded, Some("real_estate/old".to_string()));
        assert_eq!(
            form.images()[0],
            "https://res.cloudinary.com/demo/image/upload/v1/real_estate/new.jpg"
        );
    }

    #[tokio::test]
    async fn failed_upload_keeps_the_slot_and_records_the_error() {
        let store = MockImageStore::failing();
        let mut form = filled_form(Arc::clone(&store));
        form.set_image_url(0, "http://x/keep.jpg");

        let result = form.upload_into_slot(0, vec![1, 2, 3], "villa.jpg").await;
        assert!(result.is_err());
        assert_eq!(form.images()[0], "http://x/keep.jpg");
        assert_eq!(form.uploads_in_flight(), 0);
        assert_eq!(
            form.error(FormField::Images),
            Some("Image upload failed: Upload error: host rejected payload")
        );
    }

    #[tokio::test]
    async fn upload_into_slot_replaces_the_slot_value() {
        let store = MockImageStore::new();
        let mut form = filled_form(Arc::clone(&store));

        let url = form
            .upload_into_slot(0, vec![1, 2, 3], "villa.jpg")
            .await
            .unwrap();
        assert_eq!(
            url,
            "https://res.cloudinary.com/demo/image/upload/v1/real_estate/villa.jpg"
        );
        assert_eq!(form.images()[0], url);
        assert_eq!(form.uploads_in_flight(), 0);
    }

    #[tokio::test]
    async fn last_image_slot_cannot_be_removed() {
        let store = MockImageStore::new();
        let mut form = filled_form(Arc::clone(&store));

        assert!(!form.remove_image_slot(0).await);
        assert_eq!(form.images().len(), 1);
    }

    #[tokio::test]
    async fn removing_a_hosted_slot_deletes_the_asset_first() {
        let store = MockImageStore::new();
        let mut form = filled_form(Arc::clone(&store));
        form.add_image_slot();
        form.set_image_url(
            1,
            "https://res.cloudinary.com/demo/image/upload/v1/real_estate/spare.jpg",
        );

        assert!(form.remove_image_slot(1).await);
        assert_eq!(form.images().len(), 1);
        assert_eq!(store.destroyed(), vec!["real_estate/spare".to_string()]);
    }

    #[tokio::test]
    async fn edit_mode_prefills_from_an_existing_property() {
        use chrono::Utc;
        use sqlx::types::Json;

        let property = Property {
            id: Uuid::new_v4(),
            title: "Villa".to_string(),
            description: "Nice".to_string(),
            price: 750000.0,
            location: Location::GreenValley,
            address: "123 St".to_string(),
            location_map_url: "".to_string(),
            bedrooms: 4,
            bathrooms: 3.5,
            square_feet: 3200,
            images: Json(vec!["http://x/a.jpg".to_string()]),
            contact_number: "123-456".to_string(),
            featured: true,
            created_at: Utc::now(),
        };

        let mut form = PropertyForm::for_property(MockImageStore::new(), &property);
        assert!(form.is_edit_mode());
        assert_eq!(form.property_id(), Some(property.id));
        assert_eq!(form.bathrooms, "3.5");

        let payload = form.submit_payload().expect("prefilled form submits");
        assert_eq!(payload.price, 750000.0);
        assert!(payload.featured);
    }
}

pub mod cloudinary;
pub mod property_form;

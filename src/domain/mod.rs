//! Domain layer: currency display, country display and the generated image gallery.
pub mod countries;
pub mod currency;
pub mod gallery;
pub mod value_objects;

pub mod engagement;
pub mod geolocation;
pub mod image;

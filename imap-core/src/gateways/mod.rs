pub mod geolocation;
pub mod image;
pub mod map;

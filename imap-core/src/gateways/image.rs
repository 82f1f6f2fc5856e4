use crate::entities::ImageRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSize {
    Full,
    Thumbnail,
}

pub trait ImageResolver {
    /// Turn an image reference into something the rendering
    /// side can display directly, e.g. a data URI.
    ///
    /// Returns `None` if the image is missing or unreadable.
    fn resolve(&self, image: &ImageRef, size: ImageSize) -> Option<String>;
}

/// Passes the stored reference through unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassThroughImages;

impl ImageResolver for PassThroughImages {
    fn resolve(&self, image: &ImageRef, _: ImageSize) -> Option<String> {
        let image = image.as_str();
        (!image.trim().is_empty()).then(|| image.to_owned())
    }
}

impl<T: ImageResolver + ?Sized> ImageResolver for &T {
    fn resolve(&self, image: &ImageRef, size: ImageSize) -> Option<String> {
        (**self).resolve(image, size)
    }
}

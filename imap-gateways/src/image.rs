use std::{
    fs,
    path::{Component, Path, PathBuf},
};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use imap_core::{
    entities::ImageRef,
    gateways::image::{ImageResolver, ImageSize},
};

/// Resolves image references relative to an upload directory
/// into inline `data:` URIs.
#[derive(Debug, Clone)]
pub struct FileImageResolver {
    base_dir: PathBuf,
}

impl FileImageResolver {
    pub fn new<P: Into<PathBuf>>(base_dir: P) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    fn file_path(&self, image: &ImageRef) -> Option<PathBuf> {
        let relative = Path::new(image.as_str());
        if image.as_str().trim().is_empty()
            || relative
                .components()
                .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return None;
        }
        Some(self.base_dir.join(relative))
    }
}

fn mime_type(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "image/jpeg",
    }
}

impl ImageResolver for FileImageResolver {
    fn resolve(&self, image: &ImageRef, _: ImageSize) -> Option<String> {
        let Some(path) = self.file_path(image) else {
            log::debug!("Rejecting image reference '{}'", image.as_str());
            return None;
        };
        match fs::read(&path) {
            Ok(bytes) if !bytes.is_empty() => Some(format!(
                "data:{};base64,{}",
                mime_type(&path),
                STANDARD.encode(bytes)
            )),
            Ok(_) => {
                log::debug!("Image file {} is empty", path.display());
                None
            }
            Err(err) => {
                log::debug!("Unable to read image {}: {err}", path.display());
                None
            }
        }
    }
}

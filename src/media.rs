use std::fs;
use std::path::PathBuf;

use uuid::Uuid;

use crate::constants::MEDIA_ROOT_ENV;
use crate::database::error::ApiError;
use crate::database::form::ImageData;

const RECIPE_IMAGE_DIR: &str = "recipes/images";

/// Image store collaborator: accepts a decoded payload, persists it under
/// the media root and returns the reference URL stored on the recipe.
#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn from_env() -> Self {
        let root = std::env::var(MEDIA_ROOT_ENV).unwrap_or_else(|_| String::from("media"));
        Self::new(root)
    }

    pub fn store_recipe_image(&self, image: &ImageData) -> Result<String, ApiError> {
        let dir = self.root.join(RECIPE_IMAGE_DIR);
        fs::create_dir_all(&dir).map_err(|e| ApiError::Media(e.to_string()))?;

        let filename = format!("{}.{}", Uuid::new_v4(), image.extension);
        fs::write(dir.join(&filename), &image.bytes)
            .map_err(|e| ApiError::Media(e.to_string()))?;

        Ok(format!("media/{RECIPE_IMAGE_DIR}/{filename}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stores_payload_and_returns_reference() {
        let root = std::env::temp_dir().join(format!("foodgram-media-{}", Uuid::new_v4()));
        let store = MediaStore::new(&root);
        let image = ImageData {
            bytes: b"png-bytes".to_vec(),
            extension: String::from("png"),
        };

        let url = store.store_recipe_image(&image).unwrap();
        assert!(url.starts_with("media/recipes/images/"));
        assert!(url.ends_with(".png"));

        let stored = root
            .join(RECIPE_IMAGE_DIR)
            .join(url.rsplit('/').next().unwrap());
        assert_eq!(fs::read(stored).unwrap(), b"png-bytes");

        fs::remove_dir_all(root).ok();
    }
}

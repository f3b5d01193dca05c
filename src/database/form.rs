use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Deserialize;

use super::error::TypeError;

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TagForm {
    pub name: String,
    pub slug: String,
    pub color: String,
}

/// One `(ingredient_id, amount)` pair of a submission.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct IngredientAmount {
    pub id: i32,
    pub amount: i32,
}

/// Client payload for recipe create/update. Ingredients and tags are id
/// references; the image travels as a base64 data URL.
#[derive(Debug, Clone, Deserialize)]
pub struct RecipeSubmission {
    pub name: String,
    pub text: String,
    pub cooking_time: i32,
    pub ingredients: Vec<IngredientAmount>,
    pub tags: Vec<i32>,
    #[serde(default)]
    pub image: Option<String>,
}

/// Independently composable recipe listing filters, all off by default.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecipeFilters {
    #[serde(default)]
    pub author: Option<i32>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_favorited: bool,
    #[serde(default)]
    pub is_in_shopping_cart: bool,
}

/// Requested direction of a favorite/cart/follow toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToggleAction {
    Add,
    Remove,
}

/// Decoded `data:image/<ext>;base64,<payload>` image field.
#[derive(Debug, Clone)]
pub struct ImageData {
    pub bytes: Vec<u8>,
    pub extension: String,
}

impl TryFrom<&str> for ImageData {
    type Error = TypeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let value = value.trim();
        let rest = value
            .strip_prefix("data:image/")
            .ok_or_else(|| TypeError::new("Expected a data:image/... URL"))?;

        let (extension, payload) = match rest.split_once(";base64,") {
            Some((extension, payload)) => (extension, payload),
            None => return Err(TypeError::new("Expected a base64 encoded payload")),
        };

        if extension.is_empty() || !extension.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(TypeError::new("Invalid image extension"));
        }

        let bytes = STANDARD
            .decode(payload)
            .map_err(|_e| TypeError::new("Failed to decode base64 payload"))?;

        Ok(Self {
            bytes,
            extension: extension.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_data_url_roundtrip() {
        let image = ImageData::try_from("data:image/png;base64,aGVsbG8=").unwrap();
        assert_eq!(image.extension, "png");
        assert_eq!(image.bytes, b"hello");
    }

    #[test]
    fn image_rejects_missing_scheme() {
        assert!(ImageData::try_from("image/png;base64,aGVsbG8=").is_err());
    }

    #[test]
    fn image_rejects_broken_payload() {
        assert!(ImageData::try_from("data:image/png;base64,???").is_err());
        assert!(ImageData::try_from("data:image/png,aGVsbG8=").is_err());
        assert!(ImageData::try_from("data:image/;base64,aGVsbG8=").is_err());
    }
}

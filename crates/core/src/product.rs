//! Products and their reviews.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Category, Price, ProductId, ReviewId};

/// Highest rating a product or review can carry.
pub const MAX_RATING: f64 = 5.0;

/// A catalog product.
///
/// Owned by the catalog store. Carts hold clones taken at the time of adding,
/// so later admin edits never reach lines already in a cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: Category,
    pub price: Price,
    pub description: String,
    /// Ordered image references; the first one is the card image.
    pub images: Vec<String>,
    /// Average rating, 0–5.
    pub rating: f64,
    pub stock: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviews: Option<Vec<Review>>,
}

/// Reasons an admin-submitted product is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProductError {
    #[error("product name cannot be empty")]
    EmptyName,
    #[error("a product needs at least one image")]
    NoImages,
    #[error("price cannot be negative")]
    NegativePrice,
    #[error("rating must be between 0 and 5")]
    RatingOutOfRange,
}

impl Product {
    /// Check the fields the admin form enforces before a save.
    ///
    /// # Errors
    ///
    /// Returns the first [`ProductError`] found.
    pub fn validate(&self) -> Result<(), ProductError> {
        if self.name.trim().is_empty() {
            return Err(ProductError::EmptyName);
        }
        if self.images.iter().all(|img| img.trim().is_empty()) {
            return Err(ProductError::NoImages);
        }
        if self.price.is_negative() {
            return Err(ProductError::NegativePrice);
        }
        if !(0.0..=MAX_RATING).contains(&self.rating) {
            return Err(ProductError::RatingOutOfRange);
        }
        Ok(())
    }

    /// Card image, if the product has any.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Reviews attached to the product, oldest first.
    #[must_use]
    pub fn reviews(&self) -> &[Review] {
        self.reviews.as_deref().unwrap_or_default()
    }

    /// Append a review. Reviews are never edited or removed.
    pub fn push_review(&mut self, review: Review) {
        self.reviews.get_or_insert_with(Vec::new).push(review);
    }
}

/// Admin form contents for creating or editing a product.
///
/// Missing fields take the form's defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductDraft {
    pub name: String,
    pub category: Category,
    pub price: Price,
    pub description: String,
    pub images: Vec<String>,
    pub rating: f64,
    pub stock: u32,
}

impl Default for ProductDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            category: Category::Accessories,
            price: Price::ZERO,
            description: String::new(),
            images: Vec::new(),
            rating: 4.5,
            stock: 10,
        }
    }
}

impl ProductDraft {
    /// Build a validated product under `id`, carrying over `reviews`.
    ///
    /// # Errors
    ///
    /// Returns the first [`ProductError`] the result fails.
    pub fn into_product(
        self,
        id: ProductId,
        reviews: Option<Vec<Review>>,
    ) -> Result<Product, ProductError> {
        let product = Product {
            id,
            name: self.name,
            category: self.category,
            price: self.price,
            description: self.description,
            images: self.images,
            rating: self.rating,
            stock: self.stock,
            reviews,
        };
        product.validate()?;
        Ok(product)
    }
}

/// A review attached to exactly one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: ReviewId,
    pub user_name: String,
    /// 1–5 stars.
    pub rating: u8,
    pub comment: String,
    pub date: DateTime<Utc>,
    pub is_verified: bool,
}

/// Shopper input for a new review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
    pub user_name: String,
    #[serde(default = "default_review_rating")]
    pub rating: u8,
    pub comment: String,
}

const fn default_review_rating() -> u8 {
    5
}

/// Reasons a shopper review is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReviewError {
    #[error("reviewer name cannot be empty")]
    EmptyUserName,
    #[error("review comment cannot be empty")]
    EmptyComment,
    #[error("review rating must be between 1 and 5 (got {0})")]
    RatingOutOfRange(u8),
}

impl NewReview {
    /// Turn the input into a stored review.
    ///
    /// Shopper reviews are never verified.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError`] if the name or comment is blank or the rating
    /// is outside 1–5.
    pub fn into_review(self, now: DateTime<Utc>) -> Result<Review, ReviewError> {
        if self.user_name.trim().is_empty() {
            return Err(ReviewError::EmptyUserName);
        }
        if self.comment.trim().is_empty() {
            return Err(ReviewError::EmptyComment);
        }
        if !(1..=5).contains(&self.rating) {
            return Err(ReviewError::RatingOutOfRange(self.rating));
        }

        Ok(Review {
            id: ReviewId::generate(now),
            user_name: self.user_name,
            rating: self.rating,
            comment: self.comment,
            date: now,
            is_verified: false,
        })
    }
}

/// Split a pasted block of image references into individual entries.
///
/// Entries are separated by newlines or commas; only `http…` URLs and
/// `data:image…` URIs are kept.
#[must_use]
pub fn parse_image_urls(input: &str) -> Vec<String> {
    input
        .split(['\n', ','])
        .map(str::trim)
        .filter(|u| !u.is_empty() && (u.starts_with("http") || u.starts_with("data:image")))
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample() -> Product {
        Product {
            id: ProductId::new("p1"),
            name: "Prism Table Lamp".to_string(),
            category: Category::HomeDecor,
            price: Price::from_centimes(8_550),
            description: "Geometric lamp".to_string(),
            images: vec!["https://img.example/lamp.jpg".to_string()],
            rating: 4.7,
            stock: 15,
            reviews: None,
        }
    }

    #[test]
    fn test_validate_accepts_sample() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_validate_requires_images() {
        let mut product = sample();
        product.images.clear();
        assert_eq!(product.validate(), Err(ProductError::NoImages));
    }

    #[test]
    fn test_validate_rejects_out_of_range_rating() {
        let mut product = sample();
        product.rating = 5.5;
        assert_eq!(product.validate(), Err(ProductError::RatingOutOfRange));
    }

    #[test]
    fn test_new_review_is_unverified() {
        let now = Utc::now();
        let review = NewReview {
            user_name: "Amel".to_string(),
            rating: 4,
            comment: "Lovely".to_string(),
        }
        .into_review(now)
        .unwrap();

        assert!(!review.is_verified);
        assert_eq!(review.date, now);
        assert_eq!(review.id, ReviewId::generate(now));
    }

    #[test]
    fn test_new_review_rejects_blank_fields() {
        let blank_name = NewReview {
            user_name: "  ".to_string(),
            rating: 5,
            comment: "ok".to_string(),
        };
        assert_eq!(
            blank_name.into_review(Utc::now()),
            Err(ReviewError::EmptyUserName)
        );

        let blank_comment = NewReview {
            user_name: "Amel".to_string(),
            rating: 5,
            comment: String::new(),
        };
        assert_eq!(
            blank_comment.into_review(Utc::now()),
            Err(ReviewError::EmptyComment)
        );
    }

    #[test]
    fn test_push_review_appends() {
        let mut product = sample();
        assert!(product.reviews().is_empty());
        let review = NewReview {
            user_name: "Amel".to_string(),
            rating: 5,
            comment: "Great".to_string(),
        }
        .into_review(Utc::now())
        .unwrap();
        product.push_review(review.clone());
        assert_eq!(product.reviews(), &[review]);
    }

    #[test]
    fn test_draft_defaults_and_validation() {
        let draft: ProductDraft =
            serde_json::from_str(r#"{"name": "Desk Pad", "images": ["https://img.example/pad.jpg"]}"#)
                .unwrap();
        assert_eq!(draft.category, Category::Accessories);
        assert_eq!(draft.stock, 10);

        let product = draft
            .clone()
            .into_product(ProductId::new("prod_1"), None)
            .unwrap();
        assert_eq!(product.name, "Desk Pad");
        assert!((product.rating - 4.5).abs() < f64::EPSILON);

        let no_images = ProductDraft {
            images: Vec::new(),
            ..draft
        };
        assert_eq!(
            no_images.into_product(ProductId::new("prod_2"), None),
            Err(ProductError::NoImages)
        );
    }

    #[test]
    fn test_parse_image_urls() {
        let input = "https://a.example/1.jpg,\n  http://b.example/2.png \n not-a-url, data:image/png;base64,AAA\n\n";
        assert_eq!(
            parse_image_urls(input),
            vec![
                "https://a.example/1.jpg".to_string(),
                "http://b.example/2.png".to_string(),
                "data:image/png;base64".to_string(),
            ]
        );
    }

    #[test]
    fn test_product_json_uses_document_field_names() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["category"], "Home Decor");
        assert!(json.get("reviews").is_none());
        let back: Product = serde_json::from_value(json).unwrap();
        assert_eq!(back, sample());
    }
}

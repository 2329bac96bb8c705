//! Bundled default catalog used for first-run seeding.

use chrono::{DateTime, NaiveDate, Utc};

use crate::product::{Product, Review};
use crate::types::{Category, Price, ProductId, ReviewId};

const UNSPLASH_PARAMS: &str = "?auto=format&fit=crop&q=80&w=800";

fn image(photo: &str) -> String {
    format!("https://images.unsplash.com/{photo}{UNSPLASH_PARAMS}")
}

fn date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .unwrap_or_default()
}

fn review(
    id: &str,
    user_name: &str,
    rating: u8,
    comment: &str,
    date: DateTime<Utc>,
    is_verified: bool,
) -> Review {
    Review {
        id: ReviewId::new(id),
        user_name: user_name.to_owned(),
        rating,
        comment: comment.to_owned(),
        date,
        is_verified,
    }
}

/// The products written to an empty, never-seeded store.
#[must_use]
pub fn default_products() -> Vec<Product> {
    vec![
        Product {
            id: ProductId::new("1"),
            name: "Astral Minimalist Watch".to_owned(),
            category: Category::Accessories,
            price: Price::from_centimes(18_999),
            description: "A timeless timepiece featuring a sapphire crystal face and premium Italian leather strap.".to_owned(),
            images: vec![
                image("photo-1523275335684-37898b6baf30"),
                image("photo-1524592094714-0f0654e20314"),
            ],
            rating: 4.8,
            stock: 12,
            reviews: Some(vec![
                review("r1", "Alex M.", 5, "Absolutely stunning watch. The leather is so soft.", date(2024, 2, 15), true),
                review("r2", "Sarah J.", 4, "Beautiful design, though the strap was a bit stiff at first.", date(2024, 1, 20), true),
            ]),
        },
        Product {
            id: ProductId::new("2"),
            name: "Zenith Noise Cancelling Headphones".to_owned(),
            category: Category::Electronics,
            price: Price::from_dinar(349),
            description: "Immersive sound quality with advanced hybrid active noise cancellation technology.".to_owned(),
            images: vec![
                image("photo-1505740420928-5e560c06d30e"),
                image("photo-1484704849700-f032a568e944"),
            ],
            rating: 4.9,
            stock: 8,
            reviews: Some(vec![review(
                "r3",
                "David K.",
                5,
                "Better than the leading brands. ANC is magic.",
                date(2024, 3, 1),
                true,
            )]),
        },
        Product {
            id: ProductId::new("3"),
            name: "Linen Comfort Set".to_owned(),
            category: Category::Apparel,
            price: Price::from_dinar(120),
            description: "Breathable, sustainable linen blend perfect for lounging or casual outings.".to_owned(),
            images: vec![image("photo-1594932224828-b4b059b6f68d")],
            rating: 4.5,
            stock: 25,
            reviews: Some(Vec::new()),
        },
        Product {
            id: ProductId::new("4"),
            name: "Prism Table Lamp".to_owned(),
            category: Category::HomeDecor,
            price: Price::from_centimes(8_550),
            description: "A geometric masterpiece that casts beautiful patterns across your living space.".to_owned(),
            images: vec![image("photo-1507473885765-e6ed057f782c")],
            rating: 4.7,
            stock: 15,
            reviews: Some(vec![review(
                "r4",
                "Emma W.",
                5,
                "The lighting patterns are mesmerizing.",
                date(2024, 2, 28),
                false,
            )]),
        },
    ]
}

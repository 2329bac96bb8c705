//! Catalog store and the filter/sort pipeline that derives listings from it.

use core::cmp::Ordering;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::product::Product;
use crate::types::{CategoryFilter, ProductId};

/// Ordering applied after filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// Catalog order.
    #[default]
    Default,
    /// Cheapest first.
    PriceLow,
    /// Most expensive first.
    PriceHigh,
    /// Best rated first.
    Rating,
}

/// Error returned for an unrecognized sort key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort key: {0}")]
pub struct UnknownSortKey(pub String);

impl FromStr for SortKey {
    type Err = UnknownSortKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "default" => Ok(Self::Default),
            "price-low" => Ok(Self::PriceLow),
            "price-high" => Ok(Self::PriceHigh),
            "rating" => Ok(Self::Rating),
            other => Err(UnknownSortKey(other.to_owned())),
        }
    }
}

/// Filter state for a catalog listing.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CatalogQuery {
    pub category: CategoryFilter,
    pub min_rating: f64,
    pub search: String,
    pub sort: SortKey,
}

impl CatalogQuery {
    /// Whether `product` passes the category, rating and text predicates.
    fn matches(&self, product: &Product, needle: Option<&str>) -> bool {
        let text_match = needle.is_none_or(|needle| {
            product.name.to_lowercase().contains(needle)
                || product.description.to_lowercase().contains(needle)
        });

        self.category.matches(product.category) && product.rating >= self.min_rating && text_match
    }

    /// Run the pipeline over `products`.
    ///
    /// All predicates are ANDed; sorting is stable so ties keep catalog order.
    #[must_use]
    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        let needle = (!self.search.is_empty()).then(|| self.search.to_lowercase());

        let mut result: Vec<&Product> = products
            .iter()
            .filter(|p| self.matches(p, needle.as_deref()))
            .collect();

        match self.sort {
            SortKey::Default => {}
            SortKey::PriceLow => result.sort_by(|a, b| a.price.cmp(&b.price)),
            SortKey::PriceHigh => result.sort_by(|a, b| b.price.cmp(&a.price)),
            SortKey::Rating => result.sort_by(|a, b| compare_rating(b.rating, a.rating)),
        }

        result
    }
}

fn compare_rating(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Products whose name contains `term` (case-insensitive), in catalog order,
/// for the search box drop-down.
#[must_use]
pub fn search_suggestions<'a>(products: &'a [Product], term: &str, limit: usize) -> Vec<&'a Product> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return Vec::new();
    }

    products
        .iter()
        .filter(|p| p.name.to_lowercase().contains(&term))
        .take(limit)
        .collect()
}

/// In-memory catalog.
///
/// `loading` stays true until the startup bootstrap resolves, so an empty
/// listing can be told apart from one that has not arrived yet.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
    loading: bool,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::loading()
    }
}

impl Catalog {
    /// A catalog whose contents have not been fetched yet.
    #[must_use]
    pub const fn loading() -> Self {
        Self {
            products: Vec::new(),
            loading: true,
        }
    }

    /// A loaded catalog holding `products` in the given order.
    #[must_use]
    pub const fn loaded(products: Vec<Product>) -> Self {
        Self {
            products,
            loading: false,
        }
    }

    /// Replace the contents and mark the catalog loaded.
    pub fn set_loaded(&mut self, products: Vec<Product>) {
        self.products = products;
        self.loading = false;
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    /// Newly created products go to the front of the catalog.
    pub fn insert(&mut self, product: Product) {
        self.products.insert(0, product);
    }

    /// Replace the product with the same id in place.
    ///
    /// Returns `false` if no product has that id.
    pub fn replace(&mut self, product: Product) -> bool {
        match self.products.iter_mut().find(|p| p.id == product.id) {
            Some(slot) => {
                *slot = product;
                true
            }
            None => false,
        }
    }

    /// Remove a product by id, returning it if present.
    pub fn remove(&mut self, id: &ProductId) -> Option<Product> {
        let idx = self.products.iter().position(|p| &p.id == id)?;
        Some(self.products.remove(idx))
    }

    /// Run a listing query.
    #[must_use]
    pub fn query(&self, query: &CatalogQuery) -> Vec<&Product> {
        query.apply(&self.products)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::types::{Category, Price};

    fn product(id: &str, category: Category, price: u32, rating: f64, name: &str) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_string(),
            category,
            price: Price::from_dinar(price),
            description: format!("{name} description"),
            images: vec![format!("https://img.example/{id}.jpg")],
            rating,
            stock: 5,
            reviews: None,
        }
    }

    fn catalog() -> Vec<Product> {
        vec![
            product("1", Category::Accessories, 190, 4.8, "Astral Watch"),
            product("2", Category::Electronics, 349, 4.9, "Zenith Headphones"),
            product("3", Category::Apparel, 120, 4.5, "Linen Set"),
            product("4", Category::HomeDecor, 85, 4.7, "Prism Lamp"),
            product("5", Category::Electronics, 120, 4.5, "Pocket Radio"),
        ]
    }

    fn ids(products: &[&Product]) -> Vec<String> {
        products.iter().map(|p| p.id.to_string()).collect()
    }

    #[test]
    fn test_default_query_keeps_catalog_order() {
        let products = catalog();
        let result = CatalogQuery::default().apply(&products);
        assert_eq!(ids(&result), ["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn test_predicates_are_anded() {
        let products = catalog();
        let query = CatalogQuery {
            category: CategoryFilter::Only(Category::Electronics),
            min_rating: 4.6,
            ..CatalogQuery::default()
        };
        let result = query.apply(&products);
        assert_eq!(ids(&result), ["2"]);
        for p in result {
            assert_eq!(p.category, Category::Electronics);
            assert!(p.rating >= 4.6);
        }
    }

    #[test]
    fn test_search_is_case_insensitive_on_name_or_description() {
        let mut products = catalog();
        products[2].description = "Breathable LINEN blend, also a WATCH strap".to_string();
        let query = CatalogQuery {
            search: "watch".to_string(),
            ..CatalogQuery::default()
        };
        assert_eq!(ids(&query.apply(&products)), ["1", "3"]);
    }

    #[test]
    fn test_empty_result_is_valid() {
        let products = catalog();
        let query = CatalogQuery {
            search: "nothing matches this".to_string(),
            ..CatalogQuery::default()
        };
        assert!(query.apply(&products).is_empty());
    }

    #[test]
    fn test_price_sorts_are_stable_and_reversed() {
        let products = catalog();
        let low = CatalogQuery {
            sort: SortKey::PriceLow,
            ..CatalogQuery::default()
        }
        .apply(&products);
        let high = CatalogQuery {
            sort: SortKey::PriceHigh,
            ..CatalogQuery::default()
        }
        .apply(&products);

        // "3" and "5" share a price and keep catalog order in both directions.
        assert_eq!(ids(&low), ["4", "3", "5", "1", "2"]);
        assert_eq!(ids(&high), ["2", "1", "3", "5", "4"]);
    }

    #[test]
    fn test_rating_sort_descending_with_stable_ties() {
        let products = catalog();
        let result = CatalogQuery {
            sort: SortKey::Rating,
            ..CatalogQuery::default()
        }
        .apply(&products);
        assert_eq!(ids(&result), ["2", "1", "4", "3", "5"]);
    }

    #[test]
    fn test_sort_key_parse() {
        assert_eq!("price-low".parse::<SortKey>().unwrap(), SortKey::PriceLow);
        assert_eq!("".parse::<SortKey>().unwrap(), SortKey::Default);
        assert!("cheapest".parse::<SortKey>().is_err());
    }

    #[test]
    fn test_search_suggestions_limit_and_blank_term() {
        let products = catalog();
        assert!(search_suggestions(&products, "   ", 5).is_empty());
        let result = search_suggestions(&products, "o", 2);
        assert_eq!(ids(&result), ["2", "5"]);
    }

    #[test]
    fn test_catalog_mutations() {
        let mut store = Catalog::loaded(catalog());
        assert!(!store.is_loading());

        store.insert(product("6", Category::Stationery, 10, 4.0, "Notebook"));
        assert_eq!(store.products()[0].id, ProductId::new("6"));

        let mut edited = store.get(&ProductId::new("3")).cloned().unwrap();
        edited.price = Price::from_dinar(99);
        assert!(store.replace(edited));
        assert_eq!(
            store.get(&ProductId::new("3")).unwrap().price,
            Price::from_dinar(99)
        );

        assert!(store.remove(&ProductId::new("1")).is_some());
        assert!(store.remove(&ProductId::new("1")).is_none());
        assert!(!store.replace(product("1", Category::Apparel, 1, 1.0, "Ghost")));
        assert_eq!(store.products().len(), 5);
    }

    #[test]
    fn test_loading_catalog_is_distinguishable_from_empty() {
        let mut store = Catalog::default();
        assert!(store.is_loading());
        store.set_loaded(Vec::new());
        assert!(!store.is_loading());
        assert!(store.products().is_empty());
    }
}

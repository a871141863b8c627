use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A product line in the shopper's cart. Names are unique within a cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub name: String,
    /// Unit price in rupees.
    pub price: f64,
    #[serde(default)]
    pub images: Vec<String>,
    pub qty: u32,
}

impl CartItem {
    pub fn new(name: impl Into<String>, price: f64, images: Vec<String>) -> Self {
        Self {
            name: name.into(),
            price,
            images,
            qty: 1,
        }
    }

    /// Unrounded line amount (price × qty).
    pub fn subtotal(&self) -> f64 {
        self.price * f64::from(self.qty)
    }

    /// First listed image, if it is non-empty.
    pub fn primary_image(&self) -> Option<&str> {
        self.images
            .first()
            .map(String::as_str)
            .filter(|src| !src.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CartError {
    #[error("invalid price for {name}: {price}")]
    InvalidPrice { name: String, price: f64 },
    #[error("item name must not be empty")]
    EmptyName,
}

/// Ordered cart contents, persisted as a bare JSON array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<CartItem> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&CartItem> {
        self.items.iter().find(|item| item.name == name)
    }

    /// Add one unit of `name`. An existing line is bumped by one; otherwise a
    /// new line with qty 1 is appended. Returns the line's new quantity.
    pub fn add(&mut self, name: &str, price: f64, images: Vec<String>) -> Result<u32, CartError> {
        if name.is_empty() {
            return Err(CartError::EmptyName);
        }
        if !price.is_finite() || price < 0.0 {
            return Err(CartError::InvalidPrice {
                name: name.to_string(),
                price,
            });
        }

        match self.items.iter_mut().find(|item| item.name == name) {
            Some(item) => {
                item.qty = item.qty.saturating_add(1);
                Ok(item.qty)
            }
            None => {
                self.items.push(CartItem::new(name, price, images));
                Ok(1)
            }
        }
    }

    /// Remove the line at `index`. Out-of-range indices leave the cart untouched.
    pub fn remove(&mut self, index: usize) -> Option<CartItem> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    /// Sum of all line subtotals, unrounded.
    pub fn total(&self) -> f64 {
        self.items.iter().map(CartItem::subtotal).sum()
    }

    /// First image of every line, in cart order, for preloading.
    pub fn primary_images(&self) -> Vec<String> {
        self.items
            .iter()
            .filter_map(|item| item.primary_image().map(str::to_string))
            .collect()
    }
}

impl From<Vec<CartItem>> for Cart {
    fn from(items: Vec<CartItem>) -> Self {
        Self { items }
    }
}

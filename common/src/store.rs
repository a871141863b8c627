use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::cart::Cart;
use crate::order::Order;

/// Storage key holding the serialized cart.
pub const CART_KEY: &str = "cart";
/// Storage key holding the serialized order history.
pub const ORDERS_KEY: &str = "khozzaOrders";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("storage quota exceeded writing `{key}`")]
    QuotaExceeded { key: String },
    #[error("failed to serialize `{key}`: {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// String-keyed, string-valued persistent storage (browser `localStorage`).
///
/// Methods take `&self`: the backing store is process-wide and shared by
/// every page handler.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove_item(&self, key: &str) -> Result<(), StoreError>;
}

/// Typed access to the cart and order history.
///
/// A missing or unparseable value always reads as an empty collection.
/// Each write replaces the whole collection, so two tabs writing concurrently
/// resolve as last-write-wins.
#[derive(Debug, Clone)]
pub struct ShopStore<S> {
    backend: S,
}

impl<S: KeyValueStore> ShopStore<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn cart(&self) -> Result<Cart, StoreError> {
        self.load(CART_KEY)
    }

    pub fn save_cart(&self, cart: &Cart) -> Result<(), StoreError> {
        self.save(CART_KEY, cart)
    }

    pub fn clear_cart(&self) -> Result<(), StoreError> {
        self.backend.remove_item(CART_KEY)
    }

    pub fn orders(&self) -> Result<Vec<Order>, StoreError> {
        self.load(ORDERS_KEY)
    }

    /// Append to the order history, returning the new number of orders.
    pub fn append_order(&self, order: &Order) -> Result<usize, StoreError> {
        let mut orders = self.orders()?;
        orders.push(order.clone());
        self.save(ORDERS_KEY, &orders)?;
        Ok(orders.len())
    }

    fn load<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T, StoreError> {
        let Some(raw) = self.backend.get_item(key)? else {
            return Ok(T::default());
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(value),
            Err(err) => {
                tracing::warn!(key, error = %err, "discarding unreadable stored value");
                Ok(T::default())
            }
        }
    }

    fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let json = serde_json::to_string(value).map_err(|source| StoreError::Serialize {
            key: key.to_string(),
            source,
        })?;
        self.backend.set_item(key, &json)
    }
}

use serde::{Deserialize, Serialize};

use crate::order::ORDER_ID_PREFIX;

/// Storefront settings. Every field has a default, so a partial JSON object
/// (or none at all) is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShopConfig {
    /// Prefix of generated order IDs.
    pub order_id_prefix: String,
    /// Seconds the simulated payment countdown starts from.
    pub countdown_secs: u8,
    /// Image shown when a cart line has none.
    pub placeholder_image: String,
    /// Page opened by "proceed to checkout".
    pub checkout_page: String,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            order_id_prefix: ORDER_ID_PREFIX.to_string(),
            countdown_secs: 5,
            placeholder_image: "image/default.jpg".to_string(),
            checkout_page: "checkout.html".to_string(),
        }
    }
}

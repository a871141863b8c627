pub mod carousel;
pub mod cart;
pub mod checkout;
pub mod clipboard;
pub mod config;
pub mod memory;
pub mod money;
pub mod order;
pub mod render;
pub mod session;
pub mod shop;
pub mod store;
pub mod surface;

pub use cart::{Cart, CartItem};
pub use config::ShopConfig;
pub use order::{Order, OrderId, UpiRef};
pub use shop::{Shop, ShopError};
pub use store::{KeyValueStore, ShopStore};
pub use surface::{Surface, Target};

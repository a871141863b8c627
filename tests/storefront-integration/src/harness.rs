use khozza_common::checkout::CheckoutForm;
use khozza_common::memory::{MemoryStore, MemorySurface};
use khozza_common::session::CountdownStep;
use khozza_common::{Cart, Order, OrderId, Shop, ShopConfig, ShopError, Target};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

use crate::{order_date, Product, VALID_UPI_REF};

pub type PageShop = Shop<MemoryStore, MemorySurface>;

pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}

/// One shopper with the home, cart and checkout pages open on the same
/// origin storage.
pub struct ShopHarness {
    pub store: MemoryStore,
    pub config: ShopConfig,
    pub home: PageShop,
    pub cart: PageShop,
    pub checkout: PageShop,
    seed: u64,
}

impl ShopHarness {
    pub fn setup() -> Self {
        Self::with_config(ShopConfig::default())
    }

    pub fn with_config(config: ShopConfig) -> Self {
        Self::with_store(MemoryStore::new(), config)
    }

    /// Open all three pages on existing storage.
    pub fn with_store(store: MemoryStore, config: ShopConfig) -> Self {
        init_tracing();
        tracing::info!(prefix = %config.order_id_prefix, "opening storefront pages");
        let seed = 7;
        Self {
            home: open(&store, &config, MemorySurface::home_page(), seed),
            cart: open(&store, &config, MemorySurface::cart_page(), seed + 1),
            checkout: open(&store, &config, MemorySurface::checkout_page(), seed + 2),
            store,
            config,
            seed: seed + 3,
        }
    }

    fn next_seed(&mut self) -> u64 {
        self.seed += 1;
        self.seed
    }

    /// Navigate to the cart page again, rendering it from storage.
    pub fn reload_cart(&mut self) {
        let seed = self.next_seed();
        self.cart = open(&self.store, &self.config, MemorySurface::cart_page(), seed);
        self.cart.load_cart().expect("cart page renders");
    }

    /// Navigate to the checkout page again. The checkout session starts over.
    pub fn reload_checkout(&mut self) {
        let seed = self.next_seed();
        self.checkout = open(&self.store, &self.config, MemorySurface::checkout_page(), seed);
        self.checkout
            .load_product_summary()
            .expect("summary renders");
    }

    /// Click "add to cart" on each product card.
    pub fn add_products(&mut self, products: &[Product]) {
        for product in products {
            self.home
                .add_to_cart(product.name, product.price, product.images())
                .expect("product added");
        }
    }

    pub fn stored_cart(&self) -> Cart {
        self.home.store().cart().expect("cart readable")
    }

    pub fn stored_orders(&self) -> Vec<Order> {
        self.home.store().orders().expect("orders readable")
    }

    /// Type `form` into the checkout page and submit it.
    pub fn submit(&mut self, form: &CheckoutForm) -> Result<u8, ShopError> {
        self.checkout.surface_mut().fill_checkout_form(
            &form.name,
            &form.country_code,
            &form.phone,
            &form.pincode,
            &form.address,
        );
        self.checkout.validate_and_save()
    }

    /// Tick the payment countdown until the UPI section shows. Returns the
    /// number of ticks taken.
    pub fn wait_for_payment(&mut self) -> usize {
        let mut ticks = 0;
        loop {
            ticks += 1;
            match self.checkout.tick_countdown().expect("countdown tick") {
                CountdownStep::Remaining(_) => {}
                CountdownStep::Elapsed => return ticks,
                CountdownStep::Idle => panic!("countdown was not running"),
            }
        }
    }

    pub fn confirm(&mut self, upi_ref: &str) -> Result<OrderId, ShopError> {
        self.checkout.surface_mut().set_value(Target::UpiRef, upi_ref);
        self.checkout.confirm_order_on(order_date())
    }

    /// Full happy path from the current cart to a confirmed order.
    pub fn checkout_cart(&mut self, form: &CheckoutForm) -> OrderId {
        self.reload_checkout();
        self.submit(form).expect("form accepted");
        let ticks = self.wait_for_payment();
        let order_id = self.confirm(VALID_UPI_REF).expect("order confirmed");
        tracing::info!(order_id = %order_id, ticks, "checkout complete");
        order_id
    }
}

fn open(store: &MemoryStore, config: &ShopConfig, page: MemorySurface, seed: u64) -> PageShop {
    Shop::new(store.clone(), page)
        .with_config(config.clone())
        .with_rng(StdRng::seed_from_u64(seed))
}

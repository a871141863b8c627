use serde::{Deserialize, Serialize};

/// Options handed to the page's Swiper carousel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarouselConfig {
    pub r#loop: bool,
    pub autoplay: Autoplay,
    pub pagination: Pagination,
    pub navigation: Navigation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Autoplay {
    /// Milliseconds between slides.
    pub delay: u32,
    pub disable_on_interaction: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pagination {
    pub el: String,
    pub clickable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Navigation {
    pub next_el: String,
    pub prev_el: String,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            r#loop: true,
            autoplay: Autoplay {
                delay: 5000,
                disable_on_interaction: false,
            },
            pagination: Pagination {
                el: ".swiper-pagination".to_string(),
                clickable: true,
            },
            navigation: Navigation {
                next_el: ".swiper-button-next".to_string(),
                prev_el: ".swiper-button-prev".to_string(),
            },
        }
    }
}

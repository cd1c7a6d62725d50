//! HTTP API handlers for sweather

pub mod analyze;
pub mod health;
pub mod recommend;
pub mod ui;
pub mod wardrobe;

pub use analyze::analyze_image;
pub use health::health_routes;
pub use recommend::recommend_outfit;
pub use ui::{serve_app_js, serve_index};
pub use wardrobe::{add_wardrobe_item, delete_wardrobe_item, list_wardrobe};

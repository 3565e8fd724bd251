pub mod catalog;
pub mod filter;
pub mod request;
pub mod store;

pub use catalog::{Category, CategoryRegistry, label_from_key, pick_color, slugify};
pub use filter::EntityFilter;
pub use request::{RequestToken, RequestTokens};
pub use store::LookupStore;

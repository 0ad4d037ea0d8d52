//! Core non-UI logic split into modular submodules.

pub mod category;
pub mod filter;
pub mod group;
pub mod pipeline;
pub mod query;
pub mod route;
pub mod text;

// Re-export public APIs to keep import paths short (crate::logic::...)
pub use category::apply_category_filters;
pub use filter::apply_generic_filters;
pub use group::filter_group_places;
pub use pipeline::refresh_results;
pub use query::send_query;
pub use route::{RouteSequencer, RouteState};
pub use text::apply_text_filter;

pub mod api_types;
pub mod client;
pub mod normalize;
pub mod types;

//! Core identifier types.
//!
//! These types enforce their invariants at construction time, so an invalid
//! collection name, record id or store location cannot reach a store call.

mod collection_name;
mod record_id;
mod store_url;

pub use collection_name::CollectionName;
pub use record_id::RecordId;
pub use store_url::StoreUrl;

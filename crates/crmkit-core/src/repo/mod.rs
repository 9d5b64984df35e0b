//! Collection repositories.
//!
//! [`RepositoryFactory`] binds a collection name and an optional schema to an
//! injected [`RemoteStore`](crate::RemoteStore), producing a
//! [`Repository`] with create/read/update/delete and cursor-paginated
//! listing.

mod collections;
mod pagination;
mod repository;

pub use collections::{
    COLLECTION_NAMES, CUSTOMERS, Collections, Customer, CustomerPatch, EXPENSES, INVENTORY,
    PROJECTS, customer_schema,
};
pub use pagination::{Cursor, DEFAULT_LIMIT, ListOptions, ListingPage};
pub use repository::{Repository, RepositoryFactory};

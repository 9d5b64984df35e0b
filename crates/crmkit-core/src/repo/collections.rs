//! The four business collections.

use serde::{Deserialize, Serialize};

use crate::Result;
use crate::record::Fields;
use crate::schema::{FieldKind, Schema, Validation};
use crate::types::CollectionName;

use super::{Repository, RepositoryFactory};

pub const CUSTOMERS: &str = "customers";
pub const PROJECTS: &str = "projects";
pub const INVENTORY: &str = "inventory";
pub const EXPENSES: &str = "expenses";

/// Names of every active collection.
pub const COLLECTION_NAMES: [&str; 4] = [CUSTOMERS, PROJECTS, INVENTORY, EXPENSES];

/// Shape enforced on `customers`: a non-empty name, a valid email, nothing
/// else.
pub fn customer_schema() -> Schema {
    Schema::new()
        .required("name", FieldKind::Text { min_len: 1 })
        .required("email", FieldKind::Email)
}

/// A customer document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub name: String,
    pub email: String,
}

impl Customer {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// A partial customer for [`Repository::update`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CustomerPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// One repository per active collection, built once at startup.
///
/// Every repository works on [`Fields`]; use
/// [`Repository::typed`] for a typed view such as
/// `collections.customers.typed::<Customer>()`.
#[derive(Debug, Clone)]
pub struct Collections {
    pub customers: Repository<Fields>,
    pub projects: Repository<Fields>,
    pub inventory: Repository<Fields>,
    pub expenses: Repository<Fields>,
}

impl Collections {
    pub fn new(factory: &RepositoryFactory) -> Result<Self> {
        Ok(Self {
            customers: factory
                .make_repository(CollectionName::new(CUSTOMERS)?, customer_schema()),
            projects: factory.make_repository(CollectionName::new(PROJECTS)?, Validation::None),
            inventory: factory
                .make_repository(CollectionName::new(INVENTORY)?, Validation::None),
            expenses: factory.make_repository(CollectionName::new(EXPENSES)?, Validation::None),
        })
    }

    /// Look up a repository by collection name.
    pub fn get(&self, name: &str) -> Option<&Repository<Fields>> {
        match name {
            CUSTOMERS => Some(&self.customers),
            PROJECTS => Some(&self.projects),
            INVENTORY => Some(&self.inventory),
            EXPENSES => Some(&self.expenses),
            _ => None,
        }
    }

    /// All repositories, in [`COLLECTION_NAMES`] order.
    pub fn iter(&self) -> impl Iterator<Item = &Repository<Fields>> {
        [&self.customers, &self.projects, &self.inventory, &self.expenses].into_iter()
    }
}

use serde::{Deserialize, Serialize};

use crate::auth::repo_types::MiniUser;

/// Toy record as stored in the toys file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Toy {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub price: f64,
    #[serde(rename = "inStock", default)]
    pub in_stock: bool,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>, // unix millis
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<MiniUser>, // fixed at creation; ownerless toys are read-only
}

impl Toy {
    pub fn is_owned_by(&self, user: &MiniUser) -> bool {
        self.owner.as_ref().is_some_and(|o| o.id == user.id)
    }
}

/// Editable fields of a toy, plus the id when updating.
#[derive(Debug, Clone, PartialEq)]
pub struct ToyDraft {
    pub id: Option<String>,
    pub name: String,
    pub price: f64,
    pub in_stock: bool,
    pub labels: Vec<String>,
}

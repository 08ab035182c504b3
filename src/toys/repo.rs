use tracing::info;

use super::{
    repo_types::{Toy, ToyDraft},
    services::{now_millis, ToyError, ToyFilter},
};
use crate::{
    auth::repo_types::MiniUser,
    id::unique_id,
    storage::{JsonCollection, StorageClient},
};

/// File-backed toy catalog.
pub struct ToyStore {
    toys: JsonCollection<Toy>,
}

impl ToyStore {
    pub async fn load(storage: impl StorageClient + 'static) -> anyhow::Result<Self> {
        let toys = JsonCollection::load(storage).await?;
        Ok(Self { toys })
    }

    pub async fn query(&self, filter: &ToyFilter) -> Vec<Toy> {
        self.toys.read(|toys| filter.apply(toys)).await
    }

    pub async fn get(&self, id: &str) -> Result<Toy, ToyError> {
        self.toys
            .read(|toys| toys.iter().find(|t| t.id == id).cloned())
            .await
            .ok_or(ToyError::NotFound)
    }

    /// Updates the caller's toy when `draft.id` is set, otherwise creates one.
    pub async fn save(&self, draft: ToyDraft, user: &MiniUser) -> Result<Toy, ToyError> {
        let saved = self
            .toys
            .mutate(|toys| match draft.id {
                Some(ref id) => {
                    let toy = toys
                        .iter_mut()
                        .find(|t| &t.id == id)
                        .ok_or(ToyError::NotFound)?;
                    if !toy.is_owned_by(user) {
                        return Err(ToyError::NotOwner);
                    }
                    toy.name = draft.name;
                    toy.price = draft.price;
                    toy.in_stock = draft.in_stock;
                    toy.labels = draft.labels;
                    Ok(toy.clone())
                }
                None => {
                    let toy = Toy {
                        id: unique_id(|id| toys.iter().any(|t| t.id == id)),
                        name: draft.name,
                        price: draft.price,
                        in_stock: draft.in_stock,
                        labels: draft.labels,
                        created_at: Some(now_millis()),
                        owner: Some(user.clone()),
                    };
                    toys.push(toy.clone());
                    Ok(toy)
                }
            })
            .await?;
        info!(toy_id = %saved.id, user_id = %user.id, "toy saved");
        Ok(saved)
    }

    pub async fn remove(&self, id: &str, user: &MiniUser) -> Result<(), ToyError> {
        self.toys
            .mutate(|toys| {
                let idx = toys
                    .iter()
                    .position(|t| t.id == id)
                    .ok_or(ToyError::NotFound)?;
                if !toys[idx].is_owned_by(user) {
                    return Err(ToyError::NotOwner);
                }
                toys.remove(idx);
                Ok(())
            })
            .await?;
        info!(toy_id = %id, user_id = %user.id, "toy removed");
        Ok(())
    }
}

//! In-memory host model and commit sink.
//!
//! [`MemoryStore`] keeps entities and associations in insertion order, tracks a
//! selection and a default layer, and applies staged changes atomically on
//! flush. It backs the tests, benches and demo binaries.
use std::collections::HashSet;

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::model::batch::{Batch, CommitSink, CommitSummary, StagedChange};
use crate::model::{Association, Entity, EntityId, HostModel, Layer};

pub const DEFAULT_LAYER_ID: &str = "default";

#[derive(Debug, Clone)]
pub struct MemoryStore {
    entities: Vec<Entity>,
    associations: Vec<Association>,
    layers: Vec<Layer>,
    default_layer: EntityId,
    selected: Option<EntityId>,
    pending: Batch,
    fail_next_flush: Option<String>,
    commits: usize,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Empty store with a layer named [`DEFAULT_LAYER_ID`] as the default layer.
    pub fn new() -> Self {
        Self {
            entities: Vec::new(),
            associations: Vec::new(),
            layers: vec![Layer::new(DEFAULT_LAYER_ID, "Default")],
            default_layer: DEFAULT_LAYER_ID.to_owned(),
            selected: None,
            pending: Batch::new(),
            fail_next_flush: None,
            commits: 0,
        }
    }

    /// Register a layer container. Members are derived from entity containers.
    pub fn add_layer(&mut self, id: impl Into<EntityId>, name: impl Into<String>) {
        let id = id.into();
        if !self.layers.iter().any(|l| l.id == id) {
            self.layers.push(Layer::new(id, name));
        }
    }

    /// Insert an entity directly, bypassing the commit boundary.
    pub fn insert(&mut self, entity: Entity) {
        self.entities.retain(|e| e.id != entity.id);
        self.entities.push(entity);
    }

    pub fn select(&mut self, id: Option<&str>) {
        self.selected = id.map(str::to_owned);
    }

    /// Make the next flush fail with `message`, discarding what was staged.
    pub fn fail_next_flush(&mut self, message: impl Into<String>) {
        self.fail_next_flush = Some(message.into());
    }

    pub fn entity(&self, id: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn associations(&self) -> &[Association] {
        &self.associations
    }

    pub fn default_layer_id(&self) -> &str {
        &self.default_layer
    }

    /// Number of successful flushes so far.
    pub fn commit_count(&self) -> usize {
        self.commits
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Snapshot of a layer with its current members.
    pub fn layer(&self, id: &str) -> Option<Layer> {
        let layer = self.layers.iter().find(|l| l.id == id)?;
        Some(Layer {
            id: layer.id.clone(),
            name: layer.name.clone(),
            content: self.members_of(id),
        })
    }

    fn members_of(&self, container: &str) -> Vec<Entity> {
        self.entities
            .iter()
            .filter(|e| e.containers.iter().any(|c| c == container))
            .cloned()
            .collect()
    }

    /// Reject the batch if any change cannot be applied.
    fn validate(&self, batch: &Batch) -> Result<()> {
        let mut known: HashSet<&str> = self.entities.iter().map(|e| e.id.as_str()).collect();
        known.extend(self.layers.iter().map(|l| l.id.as_str()));

        for change in batch.changes() {
            match change {
                StagedChange::CreateEntity { entity, .. } => {
                    if !known.insert(entity.id.as_str()) {
                        return Err(Error::Commit(format!("duplicate entity id '{}'", entity.id)));
                    }
                }
                StagedChange::CreateAssociation(a) => {
                    for id in [&a.from_id, &a.to_id] {
                        if !known.contains(id.as_str()) {
                            return Err(Error::Commit(format!(
                                "association '{}' references unknown entity '{id}'",
                                a.id
                            )));
                        }
                    }
                }
                StagedChange::DeleteEntity(id) => {
                    if !known.remove(id.as_str()) {
                        return Err(Error::Commit(format!("cannot delete unknown entity '{id}'")));
                    }
                }
            }
        }
        Ok(())
    }

    fn apply(&mut self, batch: Batch) {
        for change in batch.into_changes() {
            match change {
                StagedChange::CreateEntity {
                    mut entity,
                    attach_to_default,
                } => {
                    if attach_to_default && !entity.containers.contains(&self.default_layer) {
                        entity.containers.push(self.default_layer.clone());
                    }
                    self.entities.push(entity);
                }
                StagedChange::CreateAssociation(association) => {
                    if let Some(member) = self
                        .entities
                        .iter_mut()
                        .find(|e| e.id == association.to_id)
                    {
                        if !member.containers.contains(&association.from_id) {
                            member.containers.push(association.from_id.clone());
                        }
                    }
                    self.associations.push(association);
                }
                StagedChange::DeleteEntity(id) => {
                    self.entities.retain(|e| e.id != id);
                    self.associations
                        .retain(|a| a.from_id != id && a.to_id != id);
                    for e in &mut self.entities {
                        e.containers.retain(|c| *c != id);
                    }
                }
            }
        }
    }
}

impl CommitSink for MemoryStore {
    fn stage_create_entity(&mut self, entity: Entity, attach_to_default: bool) {
        self.pending.stage_create_entity(entity, attach_to_default);
    }

    fn stage_create_association(&mut self, association: Association) {
        self.pending.stage_create_association(association);
    }

    fn stage_delete_entity(&mut self, id: &EntityId) {
        self.pending.stage_delete_entity(id.clone());
    }

    fn flush(&mut self) -> Result<CommitSummary> {
        let batch = std::mem::take(&mut self.pending);

        if let Some(message) = self.fail_next_flush.take() {
            warn!("Discarding {} staged changes: {message}.", batch.len());
            return Err(Error::Commit(message));
        }
        if let Err(e) = self.validate(&batch) {
            warn!("Discarding {} staged changes: {e}.", batch.len());
            return Err(e);
        }

        let summary = batch.summary();
        self.apply(batch);
        self.commits += 1;
        debug!(
            "Committed {} entities, {} associations, {} deletions.",
            summary.entities_created, summary.associations_created, summary.entities_deleted
        );
        Ok(summary)
    }
}

impl HostModel for MemoryStore {
    fn selected_entity(&self) -> Option<Entity> {
        let id = self.selected.as_deref()?;
        self.entity(id).cloned()
    }

    fn layer_content(&self, layer_id: &str) -> Option<Vec<Entity>> {
        self.layer(layer_id).map(|l| l.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::{GeoPoint, Location};

    fn point_entity(id: &str) -> Entity {
        Entity::new(id, Location::Point(GeoPoint::new(1.0, 2.0)))
    }

    #[test]
    fn staged_changes_are_invisible_until_flush() {
        let mut store = MemoryStore::new();
        store.stage_create_entity(point_entity("a"), true);
        assert!(store.entity("a").is_none());
        assert_eq!(store.pending_len(), 1);

        let summary = store.flush().expect("flush");
        assert_eq!(summary.entities_created, 1);
        assert_eq!(store.pending_len(), 0);
        let a = store.entity("a").expect("committed");
        assert_eq!(a.containers, vec![DEFAULT_LAYER_ID.to_string()]);
        assert_eq!(store.commit_count(), 1);
    }

    #[test]
    fn failed_flush_discards_everything() {
        let mut store = MemoryStore::new();
        store.insert(point_entity("src"));
        store.stage_create_entity(point_entity("a"), true);
        store.stage_delete_entity(&"src".to_string());
        store.fail_next_flush("disk full");

        let err = store.flush().expect_err("flush should fail");
        assert!(matches!(err, Error::Commit(ref m) if m == "disk full"));
        assert!(store.entity("a").is_none());
        assert!(store.entity("src").is_some());
        assert_eq!(store.pending_len(), 0);
        assert_eq!(store.commit_count(), 0);

        // The failure is one-shot.
        store.stage_create_entity(point_entity("b"), false);
        assert!(store.flush().is_ok());
    }

    #[test]
    fn invalid_batch_is_rejected_atomically() {
        let mut store = MemoryStore::new();
        let mut batch = Batch::new();
        batch.stage_create_entity(point_entity("a"), false);
        batch.stage_delete_entity("missing");

        assert!(store.commit(batch).is_err());
        assert!(store.entities().is_empty());
    }

    #[test]
    fn associations_update_membership_and_deletion_cleans_up() {
        let mut store = MemoryStore::new();
        store.add_layer("roads", "Roads");
        store.insert(point_entity("src").with_container("roads"));

        let mut batch = Batch::new();
        batch.stage_create_entity(point_entity("dot"), true);
        batch.stage_create_association(Association::container_includes("as1", "roads", "dot"));
        batch.stage_delete_entity("src");
        let summary = store.commit(batch).expect("commit");
        assert_eq!(summary.entities_deleted, 1);

        let roads = store.layer("roads").expect("layer");
        assert_eq!(roads.content.len(), 1);
        assert_eq!(roads.content[0].id, "dot");
        assert_eq!(store.associations().len(), 1);
        assert!(store.entity("src").is_none());
    }

    #[test]
    fn host_model_reads_selection_and_layers() {
        let mut store = MemoryStore::new();
        store.add_layer("l1", "Layer one");
        store.insert(point_entity("a").with_container("l1"));
        store.insert(point_entity("b"));

        assert!(store.selected_entity().is_none());
        store.select(Some("a"));
        assert_eq!(store.selected_entity().map(|e| e.id), Some("a".to_string()));
        store.select(Some("gone"));
        assert!(store.selected_entity().is_none());

        let content = store.layer_content("l1").expect("known layer");
        assert_eq!(content.len(), 1);
        assert!(store.layer_content("nope").is_none());
    }
}

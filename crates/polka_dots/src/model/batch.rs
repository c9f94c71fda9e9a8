//! Staged changes and the commit boundary.
//!
//! A [`Batch`] accumulates entity creations, associations and deletions.
//! Handing it to a [`CommitSink`] applies every change or none of them.
use crate::error::Result;
use crate::model::{Association, Entity, EntityId};

/// A single pending change.
#[derive(Debug, Clone, PartialEq)]
pub enum StagedChange {
    CreateEntity {
        entity: Entity,
        /// Also place the entity in the host's default layer.
        attach_to_default: bool,
    },
    CreateAssociation(Association),
    DeleteEntity(EntityId),
}

/// Counts of changes applied by one flush.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitSummary {
    pub entities_created: usize,
    pub associations_created: usize,
    pub entities_deleted: usize,
}

impl CommitSummary {
    pub fn is_empty(&self) -> bool {
        self.entities_created == 0 && self.associations_created == 0 && self.entities_deleted == 0
    }
}

/// Ordered list of changes awaiting a single commit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Batch {
    changes: Vec<StagedChange>,
}

impl Batch {
    pub fn new() -> Self {
        Self {
            changes: Vec::new(),
        }
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            changes: Vec::with_capacity(cap),
        }
    }

    pub fn stage_create_entity(&mut self, entity: Entity, attach_to_default: bool) {
        self.changes.push(StagedChange::CreateEntity {
            entity,
            attach_to_default,
        });
    }

    pub fn stage_create_association(&mut self, association: Association) {
        self.changes.push(StagedChange::CreateAssociation(association));
    }

    pub fn stage_delete_entity(&mut self, id: impl Into<EntityId>) {
        self.changes.push(StagedChange::DeleteEntity(id.into()));
    }

    pub fn changes(&self) -> &[StagedChange] {
        &self.changes
    }

    pub fn into_changes(self) -> Vec<StagedChange> {
        self.changes
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn clear(&mut self) {
        self.changes.clear();
    }

    /// What this batch would apply if committed as-is.
    pub fn summary(&self) -> CommitSummary {
        self.changes
            .iter()
            .fold(CommitSummary::default(), |mut acc, change| {
                match change {
                    StagedChange::CreateEntity { .. } => acc.entities_created += 1,
                    StagedChange::CreateAssociation(_) => acc.associations_created += 1,
                    StagedChange::DeleteEntity(_) => acc.entities_deleted += 1,
                }
                acc
            })
    }
}

/// Transactional sink for entity changes.
///
/// Staged changes stay invisible to readers of the sink until [`CommitSink::flush`]
/// succeeds. A failed flush discards everything staged since the last flush.
pub trait CommitSink {
    fn stage_create_entity(&mut self, entity: Entity, attach_to_default: bool);

    fn stage_create_association(&mut self, association: Association);

    fn stage_delete_entity(&mut self, id: &EntityId);

    fn flush(&mut self) -> Result<CommitSummary>;

    /// Stage every change of `batch` in order and flush once.
    fn commit(&mut self, batch: Batch) -> Result<CommitSummary> {
        for change in batch.into_changes() {
            match change {
                StagedChange::CreateEntity {
                    entity,
                    attach_to_default,
                } => self.stage_create_entity(entity, attach_to_default),
                StagedChange::CreateAssociation(association) => {
                    self.stage_create_association(association)
                }
                StagedChange::DeleteEntity(id) => self.stage_delete_entity(&id),
            }
        }
        self.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::{GeoPoint, Location};

    fn point_entity(id: &str) -> Entity {
        Entity::new(id, Location::Point(GeoPoint::new(0.0, 0.0)))
    }

    #[test]
    fn batch_keeps_order_and_summarizes() {
        let mut batch = Batch::with_capacity(3);
        assert!(batch.is_empty());
        batch.stage_create_entity(point_entity("a"), true);
        batch.stage_create_association(Association::container_includes("x", "layer", "a"));
        batch.stage_delete_entity("src");

        assert_eq!(batch.len(), 3);
        assert!(matches!(
            batch.changes()[0],
            StagedChange::CreateEntity {
                attach_to_default: true,
                ..
            }
        ));
        assert_eq!(
            batch.summary(),
            CommitSummary {
                entities_created: 1,
                associations_created: 1,
                entities_deleted: 1,
            }
        );

        batch.clear();
        assert!(batch.summary().is_empty());
    }

    #[derive(Default)]
    struct RecordingSink {
        staged: Vec<&'static str>,
        flushes: usize,
    }

    impl CommitSink for RecordingSink {
        fn stage_create_entity(&mut self, _entity: Entity, _attach_to_default: bool) {
            self.staged.push("entity");
        }

        fn stage_create_association(&mut self, _association: Association) {
            self.staged.push("association");
        }

        fn stage_delete_entity(&mut self, _id: &EntityId) {
            self.staged.push("delete");
        }

        fn flush(&mut self) -> Result<CommitSummary> {
            self.flushes += 1;
            Ok(CommitSummary::default())
        }
    }

    #[test]
    fn commit_stages_in_order_and_flushes_once() {
        let mut batch = Batch::new();
        batch.stage_create_entity(point_entity("a"), false);
        batch.stage_create_association(Association::container_includes("x", "layer", "a"));
        batch.stage_delete_entity("src");

        let mut sink = RecordingSink::default();
        sink.commit(batch).expect("commit");
        assert_eq!(sink.staged, vec!["entity", "association", "delete"]);
        assert_eq!(sink.flushes, 1);
    }
}

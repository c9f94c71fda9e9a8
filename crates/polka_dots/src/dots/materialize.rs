//! Turning generated points into committed map entities.
use rand::Rng;
use tracing::debug;

use crate::dots::config::DotsConfig;
use crate::dots::style::DotStyle;
use crate::error::Result;
use crate::geo::{GeoPoint, Location};
use crate::model::batch::{Batch, CommitSink};
use crate::model::{new_id, Association, Entity, EntityId, VisualAttributes};

/// What a materialization committed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterializeReport {
    /// Ids of the created dots in numbering order.
    pub created: Vec<EntityId>,
    /// Number of container associations created.
    pub associations: usize,
    /// Whether the source entity was deleted.
    pub deleted_source: bool,
    /// Whether point generation hit its cap.
    pub truncated: bool,
}

/// Stage one dot per point, its container links and the optional source deletion.
///
/// Returns the batch together with the new entity ids in numbering order. An
/// empty `points` slice yields an empty batch, so the source is never deleted
/// without replacement dots.
pub fn stage_dots(
    points: &[GeoPoint],
    source: &Entity,
    style: &DotStyle,
    config: &DotsConfig,
    rng: &mut dyn Rng,
) -> (Batch, Vec<EntityId>) {
    if points.is_empty() {
        return (Batch::new(), Vec::new());
    }

    let per_point = 1 + source.containers.len();
    let mut batch = Batch::with_capacity(points.len() * per_point + 1);
    let mut created = Vec::with_capacity(points.len());

    let ordered: Box<dyn Iterator<Item = &GeoPoint>> = if config.reversed_order {
        Box::new(points.iter().rev())
    } else {
        Box::new(points.iter())
    };

    for (index, point) in ordered.enumerate() {
        let dot = Entity::new(new_id(rng), Location::Point(*point))
            .with_name(style.dot_name(config.starting_number, index))
            .with_visual_attributes(VisualAttributes::solid(style.color))
            .with_symbol_key(config.symbol_key);
        let dot_id = dot.id.clone();
        batch.stage_create_entity(dot, true);

        for container in &source.containers {
            batch.stage_create_association(Association::container_includes(
                new_id(rng),
                container.clone(),
                dot_id.clone(),
            ));
        }
        created.push(dot_id);
    }

    if config.delete_source {
        batch.stage_delete_entity(source.id.clone());
    }

    (batch, created)
}

/// Stage and commit dots for `points` in a single flush of `sink`.
pub fn materialize<C: CommitSink + ?Sized>(
    points: &[GeoPoint],
    source: &Entity,
    style: &DotStyle,
    config: &DotsConfig,
    rng: &mut dyn Rng,
    sink: &mut C,
) -> Result<MaterializeReport> {
    let (batch, created) = stage_dots(points, source, style, config, rng);
    if batch.is_empty() {
        return Ok(MaterializeReport::default());
    }

    let summary = sink.commit(batch)?;
    debug!(
        "Materialized {} dots from '{}' ({} associations).",
        summary.entities_created, source.id, summary.associations_created
    );

    Ok(MaterializeReport {
        created,
        associations: summary.associations_created,
        deleted_source: summary.entities_deleted > 0,
        truncated: false,
    })
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::model::batch::StagedChange;
    use crate::model::Color;

    fn source() -> Entity {
        Entity::new("src", Location::Point(GeoPoint::new(0.0, 0.0)))
            .with_container("layer-a")
            .with_container("group-b")
    }

    fn points(n: usize) -> Vec<GeoPoint> {
        (0..n).map(|i| GeoPoint::new(0.0, i as f64)).collect()
    }

    fn created_entities(batch: &Batch) -> Vec<&Entity> {
        batch
            .changes()
            .iter()
            .filter_map(|c| match c {
                StagedChange::CreateEntity { entity, .. } => Some(entity),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn names_follow_starting_number_in_generation_order() {
        let mut rng = StdRng::seed_from_u64(1);
        let config = DotsConfig::new(10.0).with_starting_number(5);
        let style = DotStyle::new("WP", Color::WHITE);
        let (batch, ids) = stage_dots(&points(3), &source(), &style, &config, &mut rng);

        let dots = created_entities(&batch);
        let names: Vec<_> = dots.iter().map(|e| e.name.clone().unwrap_or_default()).collect();
        assert_eq!(names, vec!["WP 6", "WP 7", "WP 8"]);
        let lons: Vec<_> = dots
            .iter()
            .map(|e| match e.location {
                Location::Point(p) => p.lon,
                _ => f64::NAN,
            })
            .collect();
        assert_eq!(lons, vec![0.0, 1.0, 2.0]);
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn reversed_order_assigns_same_names_to_reversed_points() {
        let mut rng = StdRng::seed_from_u64(1);
        let config = DotsConfig::new(10.0).with_reversed_order(true);
        let style = DotStyle::new("P", Color::BLACK);
        let (batch, _) = stage_dots(&points(3), &source(), &style, &config, &mut rng);

        let dots = created_entities(&batch);
        assert_eq!(dots[0].name.as_deref(), Some("P 1"));
        assert_eq!(dots[0].location, Location::Point(GeoPoint::new(0.0, 2.0)));
        assert_eq!(dots[2].name.as_deref(), Some("P 3"));
        assert_eq!(dots[2].location, Location::Point(GeoPoint::new(0.0, 0.0)));
    }

    #[test]
    fn dots_carry_style_symbol_and_container_links() {
        let mut rng = StdRng::seed_from_u64(9);
        let config = DotsConfig::new(10.0).with_delete_source(true);
        let style = DotStyle::new("X", Color(0xFFAB_CDEF));
        let (batch, ids) = stage_dots(&points(2), &source(), &style, &config, &mut rng);

        let summary = batch.summary();
        assert_eq!(summary.entities_created, 2);
        assert_eq!(summary.associations_created, 4);
        assert_eq!(summary.entities_deleted, 1);
        assert!(matches!(
            batch.changes().last(),
            Some(StagedChange::DeleteEntity(id)) if id == "src"
        ));

        for dot in created_entities(&batch) {
            assert_eq!(
                dot.visual_attributes,
                Some(VisualAttributes::solid(Color(0xFFAB_CDEF)))
            );
            assert_eq!(dot.symbol_key, Some(config.symbol_key));
        }

        let links: Vec<(&str, &str)> = batch
            .changes()
            .iter()
            .filter_map(|c| match c {
                StagedChange::CreateAssociation(a) => Some((a.from_id.as_str(), a.to_id.as_str())),
                _ => None,
            })
            .collect();
        assert_eq!(
            links,
            vec![
                ("layer-a", ids[0].as_str()),
                ("group-b", ids[0].as_str()),
                ("layer-a", ids[1].as_str()),
                ("group-b", ids[1].as_str()),
            ]
        );
    }

    #[test]
    fn every_dot_is_attached_to_default_layer() {
        let mut rng = StdRng::seed_from_u64(2);
        let (batch, _) = stage_dots(
            &points(2),
            &source(),
            &DotStyle::new("", Color::BLACK),
            &DotsConfig::default(),
            &mut rng,
        );
        assert!(batch.changes().iter().all(|c| match c {
            StagedChange::CreateEntity {
                attach_to_default, ..
            } => *attach_to_default,
            _ => true,
        }));
    }

    #[test]
    fn no_points_stages_nothing_even_with_delete_flag() {
        let mut rng = StdRng::seed_from_u64(2);
        let config = DotsConfig::new(10.0).with_delete_source(true);
        let (batch, ids) = stage_dots(
            &[],
            &source(),
            &DotStyle::new("", Color::BLACK),
            &config,
            &mut rng,
        );
        assert!(batch.is_empty());
        assert!(ids.is_empty());
    }

    #[test]
    fn ids_are_unique_within_a_batch() {
        let mut rng = StdRng::seed_from_u64(4);
        let (_, ids) = stage_dots(
            &points(50),
            &source(),
            &DotStyle::new("", Color::BLACK),
            &DotsConfig::default(),
            &mut rng,
        );
        let unique: std::collections::HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len());
    }

    #[test]
    fn materialize_commits_once_and_reports() {
        use crate::model::store::MemoryStore;
        use crate::model::HostModel;

        let mut store = MemoryStore::new();
        store.add_layer("layer-a", "A");
        store.add_layer("group-b", "B");
        store.insert(source());
        let config = DotsConfig::new(10.0).with_delete_source(true);
        let mut rng = StdRng::seed_from_u64(3);

        let report = materialize(
            &points(3),
            &source(),
            &DotStyle::new("D", Color::BLACK),
            &config,
            &mut rng,
            &mut store,
        )
        .expect("commit");

        assert_eq!(report.created.len(), 3);
        assert_eq!(report.associations, 6);
        assert!(report.deleted_source);
        assert_eq!(store.commit_count(), 1);
        assert!(store.entity("src").is_none());
        assert_eq!(store.layer_content("layer-a").map(|c| c.len()), Some(3));
    }

    #[test]
    fn failed_commit_leaves_store_untouched() {
        use crate::error::Error;
        use crate::model::store::MemoryStore;

        let mut store = MemoryStore::new();
        store.add_layer("layer-a", "A");
        store.add_layer("group-b", "B");
        store.insert(source());
        store.fail_next_flush("read-only");
        let config = DotsConfig::new(10.0).with_delete_source(true);
        let mut rng = StdRng::seed_from_u64(3);

        let err = materialize(
            &points(3),
            &source(),
            &DotStyle::new("D", Color::BLACK),
            &config,
            &mut rng,
            &mut store,
        )
        .expect_err("flush fails");

        assert!(matches!(err, Error::Commit(_)));
        assert_eq!(store.entities().len(), 1);
        assert!(store.associations().is_empty());
    }
}

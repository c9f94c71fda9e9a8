//! Map entities, associations, and the host-facing boundary.
use rand::Rng;

use crate::geo::Location;

pub mod batch;
pub mod store;

pub type EntityId = String;

/// Create a fresh random 128-bit identifier rendered as lowercase hex.
pub fn new_id(rng: &mut dyn Rng) -> EntityId {
    format!("{:016x}{:016x}", rng.next_u64(), rng.next_u64())
}

/// 32-bit ARGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color(pub u32);

impl Color {
    pub const BLACK: Color = Color(0xFF00_0000);
    pub const WHITE: Color = Color(0xFFFF_FFFF);
    pub const TRANSPARENT: Color = Color(0);

    pub const fn from_argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Color((a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32)
    }

    pub const fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Red, green and blue channels.
    pub const fn rgb(self) -> [u8; 3] {
        [(self.0 >> 16) as u8, (self.0 >> 8) as u8, self.0 as u8]
    }
}

/// Stroke and fill styling of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VisualAttributes {
    pub fill_color: Option<Color>,
    pub line_color: Option<Color>,
}

impl VisualAttributes {
    /// Same colour for fill and line.
    pub fn solid(color: Color) -> Self {
        Self {
            fill_color: Some(color),
            line_color: Some(color),
        }
    }
}

/// A map entity.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Entity {
    pub id: EntityId,
    pub name: Option<String>,
    pub location: Location,
    pub visual_attributes: Option<VisualAttributes>,
    /// Symbol classifier used by the host to pick an icon.
    pub symbol_key: Option<u32>,
    /// Containers (layers, groups) that directly hold this entity.
    pub containers: Vec<EntityId>,
}

impl Entity {
    pub fn new(id: impl Into<EntityId>, location: Location) -> Self {
        Self {
            id: id.into(),
            name: None,
            location,
            visual_attributes: None,
            symbol_key: None,
            containers: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_visual_attributes(mut self, attributes: VisualAttributes) -> Self {
        self.visual_attributes = Some(attributes);
        self
    }

    pub fn with_symbol_key(mut self, symbol_key: u32) -> Self {
        self.symbol_key = Some(symbol_key);
        self
    }

    pub fn with_container(mut self, container: impl Into<EntityId>) -> Self {
        self.containers.push(container.into());
        self
    }

    pub fn line_color(&self) -> Option<Color> {
        self.visual_attributes.and_then(|v| v.line_color)
    }
}

/// Relation carried by an [`Association`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AssociationType {
    /// `from_id` is a container that includes `to_id` as a member.
    ContainerIncludesMember,
}

/// Directed relation between two entities.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Association {
    pub id: EntityId,
    pub from_id: EntityId,
    pub to_id: EntityId,
    pub relation: AssociationType,
}

impl Association {
    pub fn container_includes(
        id: impl Into<EntityId>,
        container: impl Into<EntityId>,
        member: impl Into<EntityId>,
    ) -> Self {
        Self {
            id: id.into(),
            from_id: container.into(),
            to_id: member.into(),
            relation: AssociationType::ContainerIncludesMember,
        }
    }
}

/// A named container with its flattened member list.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Layer {
    pub id: EntityId,
    pub name: String,
    pub content: Vec<Entity>,
}

impl Layer {
    pub fn new(id: impl Into<EntityId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            content: Vec::new(),
        }
    }

    pub fn with_member(mut self, entity: Entity) -> Self {
        self.content.push(entity);
        self
    }
}

/// Read access to the host's entity model.
pub trait HostModel {
    /// The entity currently selected by the user, if any.
    fn selected_entity(&self) -> Option<Entity>;

    /// Flattened members of the layer with `layer_id`, or `None` if unknown.
    fn layer_content(&self, layer_id: &str) -> Option<Vec<Entity>>;
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::geo::GeoPoint;

    #[test]
    fn new_id_is_hex_and_unique() {
        let mut rng = StdRng::seed_from_u64(3);
        let a = new_id(&mut rng);
        let b = new_id(&mut rng);
        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn color_channels() {
        let c = Color::from_argb(0x80, 0x11, 0x22, 0x33);
        assert_eq!(c, Color(0x8011_2233));
        assert_eq!(c.alpha(), 0x80);
        assert_eq!(c.rgb(), [0x11, 0x22, 0x33]);
        assert_eq!(Color::BLACK.rgb(), [0, 0, 0]);
    }

    #[test]
    fn entity_builder_and_line_color() {
        let e = Entity::new("e1", Location::Point(GeoPoint::new(0.0, 0.0)))
            .with_name("alpha")
            .with_container("layer")
            .with_visual_attributes(VisualAttributes {
                fill_color: None,
                line_color: Some(Color(7)),
            });
        assert_eq!(e.name.as_deref(), Some("alpha"));
        assert_eq!(e.containers, vec!["layer".to_string()]);
        assert_eq!(e.line_color(), Some(Color(7)));

        let bare = Entity::new("e2", Location::Point(GeoPoint::new(0.0, 0.0)));
        assert_eq!(bare.line_color(), None);
    }

    #[test]
    fn association_constructor_sets_relation() {
        let a = Association::container_includes("a1", "layer", "member");
        assert_eq!(a.from_id, "layer");
        assert_eq!(a.to_id, "member");
        assert_eq!(a.relation, AssociationType::ContainerIncludesMember);
    }
}

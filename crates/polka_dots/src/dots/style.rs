//! Per-entity resolution of dot names and colours.
use crate::dots::config::{ColorSource, DotsConfig, PrefixSource};
use crate::model::{Color, Entity};

/// Prefix and colour applied to every dot generated from one source entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DotStyle {
    pub prefix: String,
    pub color: Color,
}

impl DotStyle {
    pub fn new(prefix: impl Into<String>, color: Color) -> Self {
        Self {
            prefix: prefix.into(),
            color,
        }
    }

    /// Resolve both sources against `entity`.
    pub fn resolve(config: &DotsConfig, entity: &Entity) -> Self {
        let prefix = match &config.prefix {
            PrefixSource::Fixed(prefix) => prefix.clone(),
            PrefixSource::FromEntity => entity.name.clone().unwrap_or_default(),
        };
        let color = match config.color {
            ColorSource::Fixed(color) => color,
            ColorSource::FromEntity => entity.line_color().unwrap_or(Color::TRANSPARENT),
        };
        Self { prefix, color }
    }

    /// Display name of the dot at `index` in numbering order.
    pub fn dot_name(&self, starting_number: i64, index: usize) -> String {
        let number = i128::from(starting_number) + index as i128 + 1;
        format!("{} {}", self.prefix, number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::{GeoPoint, Location};
    use crate::model::VisualAttributes;

    fn entity() -> Entity {
        Entity::new("e", Location::Point(GeoPoint::new(0.0, 0.0)))
    }

    #[test]
    fn fixed_sources_ignore_entity() {
        let config = DotsConfig::new(10.0)
            .with_prefix(PrefixSource::Fixed("WP".into()))
            .with_color(ColorSource::Fixed(Color::WHITE));
        let style = DotStyle::resolve(&config, &entity().with_name("ignored"));
        assert_eq!(style, DotStyle::new("WP", Color::WHITE));
    }

    #[test]
    fn entity_sources_use_name_and_line_color() {
        let config = DotsConfig::new(10.0)
            .with_prefix(PrefixSource::FromEntity)
            .with_color(ColorSource::FromEntity);
        let e = entity()
            .with_name("Route 9")
            .with_visual_attributes(VisualAttributes {
                fill_color: Some(Color(1)),
                line_color: Some(Color(2)),
            });
        assert_eq!(DotStyle::resolve(&config, &e), DotStyle::new("Route 9", Color(2)));
    }

    #[test]
    fn entity_sources_fall_back_when_unset() {
        let config = DotsConfig::new(10.0)
            .with_prefix(PrefixSource::FromEntity)
            .with_color(ColorSource::FromEntity);
        assert_eq!(
            DotStyle::resolve(&config, &entity()),
            DotStyle::new("", Color::TRANSPARENT)
        );
    }

    #[test]
    fn dot_names_are_one_based_from_starting_number() {
        let style = DotStyle::new("P", Color::BLACK);
        assert_eq!(style.dot_name(0, 0), "P 1");
        assert_eq!(style.dot_name(10, 2), "P 13");
        assert_eq!(style.dot_name(-5, 0), "P -4");
        assert_eq!(DotStyle::new("", Color::BLACK).dot_name(0, 0), " 1");
    }

    #[test]
    fn dot_names_past_i64_max_do_not_wrap() {
        let style = DotStyle::new("P", Color::BLACK);
        assert_eq!(style.dot_name(i64::MAX - 1, 0), "P 9223372036854775807");
        assert_eq!(style.dot_name(i64::MAX, 0), "P 9223372036854775808");
        assert_eq!(style.dot_name(i64::MIN, 0), "P -9223372036854775807");
    }
}

//! Run configuration and parsing of free-form host inputs.
use crate::error::{Error, Result};
use crate::model::Color;
use crate::sampling::{is_valid_step, DEFAULT_MAX_POINTS};

/// Symbol classifier assigned to generated dots.
pub const GENERATED_SYMBOL_KEY: u32 = 2045;

/// Where the name prefix of generated dots comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PrefixSource {
    Fixed(String),
    /// The source entity's name, or an empty prefix when it has none.
    FromEntity,
}

/// Where the colour of generated dots comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ColorSource {
    Fixed(Color),
    /// The source entity's line colour, or [`Color::TRANSPARENT`] when unset.
    FromEntity,
}

/// Validated settings shared by every entity of a run.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DotsConfig {
    /// Spacing between dots in metres.
    pub step_m: f64,
    /// Dots are numbered from `starting_number + 1`.
    pub starting_number: i64,
    pub prefix: PrefixSource,
    pub color: ColorSource,
    /// Number the dots from the end of the generated sequence.
    pub reversed_order: bool,
    /// Delete the source entity in the same commit.
    pub delete_source: bool,
    /// Cap on dots generated per source entity.
    pub max_points: usize,
    pub symbol_key: u32,
}

impl Default for DotsConfig {
    fn default() -> Self {
        Self {
            step_m: 100.0,
            starting_number: 0,
            prefix: PrefixSource::Fixed(String::new()),
            color: ColorSource::Fixed(Color::BLACK),
            reversed_order: false,
            delete_source: false,
            max_points: DEFAULT_MAX_POINTS,
            symbol_key: GENERATED_SYMBOL_KEY,
        }
    }
}

impl DotsConfig {
    /// Creates a new [`DotsConfig`] with the given spacing in metres.
    pub fn new(step_m: f64) -> Self {
        Self {
            step_m,
            ..Default::default()
        }
    }

    pub fn with_starting_number(mut self, starting_number: i64) -> Self {
        self.starting_number = starting_number;
        self
    }

    pub fn with_prefix(mut self, prefix: PrefixSource) -> Self {
        self.prefix = prefix;
        self
    }

    pub fn with_color(mut self, color: ColorSource) -> Self {
        self.color = color;
        self
    }

    pub fn with_reversed_order(mut self, reversed_order: bool) -> Self {
        self.reversed_order = reversed_order;
        self
    }

    pub fn with_delete_source(mut self, delete_source: bool) -> Self {
        self.delete_source = delete_source;
        self
    }

    pub fn with_max_points(mut self, max_points: usize) -> Self {
        self.max_points = max_points;
        self
    }

    pub fn with_symbol_key(mut self, symbol_key: u32) -> Self {
        self.symbol_key = symbol_key;
        self
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if !is_valid_step(self.step_m) {
            return Err(Error::InvalidConfig(format!(
                "step must be a positive finite number of metres, got {}",
                self.step_m
            )));
        }
        if self.max_points == 0 {
            return Err(Error::InvalidConfig("max_points must be > 0".into()));
        }
        // The last dot is numbered `starting_number + max_points`.
        let last = i64::try_from(self.max_points)
            .ok()
            .and_then(|n| self.starting_number.checked_add(n));
        if last.is_none() {
            return Err(Error::InvalidConfig(format!(
                "starting number {} leaves no room for {} dots",
                self.starting_number, self.max_points
            )));
        }
        Ok(())
    }

    /// Parse and validate raw host inputs.
    pub fn from_inputs(inputs: &DotsInputs) -> Result<Self> {
        let step_m: f64 = inputs.distance.trim().parse().map_err(|_| {
            Error::InvalidConfig(format!("step '{}' is not a number", inputs.distance))
        })?;
        let starting_number: i64 = inputs.starting_number.trim().parse().map_err(|_| {
            Error::InvalidConfig(format!(
                "starting number '{}' is not an integer",
                inputs.starting_number
            ))
        })?;

        let prefix = if inputs.prefix_from_entity {
            PrefixSource::FromEntity
        } else {
            PrefixSource::Fixed(inputs.prefix.clone())
        };
        let color = if inputs.color_from_entity {
            ColorSource::FromEntity
        } else {
            ColorSource::Fixed(inputs.color)
        };

        let config = DotsConfig::new(step_m)
            .with_starting_number(starting_number)
            .with_prefix(prefix)
            .with_color(color)
            .with_reversed_order(inputs.reversed_order)
            .with_delete_source(inputs.delete_source);
        config.validate()?;
        Ok(config)
    }
}

/// Raw values as entered in the host's form.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DotsInputs {
    pub prefix: String,
    /// Step in metres as typed.
    pub distance: String,
    pub starting_number: String,
    pub color: Color,
    pub reversed_order: bool,
    pub color_from_entity: bool,
    pub prefix_from_entity: bool,
    pub delete_source: bool,
}

impl Default for DotsInputs {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            distance: "100".into(),
            starting_number: "0".into(),
            color: Color::BLACK,
            reversed_order: false,
            color_from_entity: false,
            prefix_from_entity: false,
            delete_source: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_inputs_parse_to_default_config() {
        let config = DotsConfig::from_inputs(&DotsInputs::default()).expect("valid");
        assert_eq!(config, DotsConfig::default());
    }

    #[test]
    fn inputs_are_trimmed_and_flags_mapped() {
        let inputs = DotsInputs {
            prefix: "WP".into(),
            distance: " 250.5 ".into(),
            starting_number: "-3".into(),
            color: Color(0xFF12_3456),
            reversed_order: true,
            color_from_entity: true,
            prefix_from_entity: false,
            delete_source: true,
        };
        let config = DotsConfig::from_inputs(&inputs).expect("valid");
        assert_eq!(config.step_m, 250.5);
        assert_eq!(config.starting_number, -3);
        assert_eq!(config.prefix, PrefixSource::Fixed("WP".into()));
        assert_eq!(config.color, ColorSource::FromEntity);
        assert!(config.reversed_order);
        assert!(config.delete_source);
    }

    #[test]
    fn bad_numbers_are_rejected() {
        for (distance, start) in [
            ("abc", "0"),
            ("", "0"),
            ("0", "0"),
            ("-10", "0"),
            ("NaN", "0"),
            ("inf", "0"),
            ("100", "1.5"),
            ("100", "x"),
        ] {
            let inputs = DotsInputs {
                distance: distance.into(),
                starting_number: start.into(),
                ..Default::default()
            };
            let err = DotsConfig::from_inputs(&inputs).expect_err(distance);
            assert!(matches!(err, Error::InvalidConfig(_)));
        }
    }

    #[test]
    fn validate_rejects_zero_point_cap() {
        assert!(DotsConfig::new(10.0).with_max_points(0).validate().is_err());
        assert!(DotsConfig::new(10.0).validate().is_ok());
    }

    #[test]
    fn starting_number_near_i64_max_is_rejected() {
        let inputs = DotsInputs {
            starting_number: "9223372036854775807".into(),
            ..Default::default()
        };
        let err = DotsConfig::from_inputs(&inputs).expect_err("overflows");
        assert!(matches!(err, Error::InvalidConfig(_)));

        let config = DotsConfig::new(10.0).with_max_points(10);
        assert!(config.clone().with_starting_number(i64::MAX - 10).validate().is_ok());
        assert!(config.clone().with_starting_number(i64::MAX - 9).validate().is_err());
        assert!(config.with_starting_number(i64::MIN).validate().is_ok());
    }
}

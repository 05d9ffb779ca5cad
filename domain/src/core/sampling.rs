//! Sampling configuration value object

use super::error::DomainError;
use super::model::Model;
use serde::{Deserialize, Serialize};

pub const TEMPERATURE_RANGE: (f32, f32) = (0.0, 1.0);
pub const TOP_P_RANGE: (f32, f32) = (0.0, 1.0);
pub const MAX_TOKENS_RANGE: (u32, u32) = (100, 2048);

/// Generation-control parameters sent with one completion request.
///
/// Read at submission time; a request never observes a later edit.
/// Construct through [`SamplingConfig::new`] or the `with_*` setters,
/// which reject out-of-range values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplingConfig {
    pub model: Model,
    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: u32,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            model: Model::default(),
            temperature: 0.3,
            top_p: 0.95,
            max_tokens: 1024,
        }
    }
}

impl SamplingConfig {
    pub fn new(
        model: Model,
        temperature: f32,
        top_p: f32,
        max_tokens: u32,
    ) -> Result<Self, DomainError> {
        let config = Self {
            model,
            temperature,
            top_p,
            max_tokens,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check every parameter against its allowed range.
    pub fn validate(&self) -> Result<(), DomainError> {
        check_range("temperature", self.temperature as f64, TEMPERATURE_RANGE)?;
        check_range("top_p", self.top_p as f64, TOP_P_RANGE)?;
        let (min, max) = MAX_TOKENS_RANGE;
        if !(min..=max).contains(&self.max_tokens) {
            return Err(DomainError::InvalidSampling {
                name: "max_tokens",
                value: self.max_tokens as f64,
                min: min as f64,
                max: max as f64,
            });
        }
        Ok(())
    }

    pub fn with_model(mut self, model: Model) -> Self {
        self.model = model;
        self
    }

    pub fn with_temperature(self, temperature: f32) -> Result<Self, DomainError> {
        Self::new(self.model, temperature, self.top_p, self.max_tokens)
    }

    pub fn with_top_p(self, top_p: f32) -> Result<Self, DomainError> {
        Self::new(self.model, self.temperature, top_p, self.max_tokens)
    }

    pub fn with_max_tokens(self, max_tokens: u32) -> Result<Self, DomainError> {
        Self::new(self.model, self.temperature, self.top_p, max_tokens)
    }
}

fn check_range(name: &'static str, value: f64, range: (f32, f32)) -> Result<(), DomainError> {
    let (min, max) = (range.0 as f64, range.1 as f64);
    // NaN fails both comparisons
    if value >= min && value <= max {
        Ok(())
    } else {
        Err(DomainError::InvalidSampling {
            name,
            value,
            min,
            max,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = SamplingConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_tokens, 1024);
        assert_eq!(config.model, Model::Nemotron70b);
    }

    #[test]
    fn test_bounds_are_inclusive() {
        assert!(SamplingConfig::new(Model::YiLarge, 0.0, 1.0, 100).is_ok());
        assert!(SamplingConfig::new(Model::YiLarge, 1.0, 0.0, 2048).is_ok());
    }

    #[test]
    fn test_out_of_range_rejected() {
        let err = SamplingConfig::default().with_temperature(1.2).unwrap_err();
        assert!(matches!(
            err,
            DomainError::InvalidSampling {
                name: "temperature",
                ..
            }
        ));

        assert!(SamplingConfig::default().with_top_p(-0.1).is_err());
        assert!(SamplingConfig::default().with_max_tokens(99).is_err());
        assert!(SamplingConfig::default().with_max_tokens(4096).is_err());
        assert!(SamplingConfig::default().with_temperature(f32::NAN).is_err());
    }

    #[test]
    fn test_setter_keeps_other_fields() {
        let config = SamplingConfig::default()
            .with_model(Model::Codellama70b)
            .with_top_p(0.5)
            .unwrap();
        assert_eq!(config.model, Model::Codellama70b);
        assert_eq!(config.top_p, 0.5);
        assert_eq!(config.temperature, 0.3);
    }
}

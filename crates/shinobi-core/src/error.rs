/// Setup-time configuration errors.
///
/// These are raised before the first frame runs; a controller that was built
/// successfully never hits a missing reference point mid-frame.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("missing reference point: {0}")]
    MissingReference(&'static str),

    #[error("invalid value for {field}: {value} ({reason})")]
    InvalidValue {
        field: &'static str,
        value: f32,
        reason: &'static str,
    },
}

impl ConfigError {
    /// Require `value` to be finite and strictly positive.
    pub fn check_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
        if !value.is_finite() {
            return Err(ConfigError::InvalidValue {
                field,
                value,
                reason: "must be finite",
            });
        }
        if value <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field,
                value,
                reason: "must be greater than zero",
            });
        }
        Ok(())
    }

    /// Require `value` to be finite and not negative.
    pub fn check_non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
        if !value.is_finite() || value < 0.0 {
            return Err(ConfigError::InvalidValue {
                field,
                value,
                reason: "must be finite and not negative",
            });
        }
        Ok(())
    }
}

//! Errors raised at the configuration boundary of the particle field
//!
//! Stepping is total; only configuration changes and indexed writes can fail.
//! Every failing call leaves the field exactly as it was.

/// Errors that can occur when configuring or editing a particle field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldError {
    /// Particle count must be at least 1
    InvalidParticleCount(usize),
    /// Fire intensity must be finite and non-negative
    InvalidFireIntensity(f32),
    /// Wind speed must be finite and non-negative
    InvalidWindSpeed(f32),
    /// Horizontal limit must be finite and positive
    InvalidHorizontalLimit(f32),
    /// Particle index past the end of the field
    IndexOutOfBounds { index: usize, len: usize },
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldError::InvalidParticleCount(count) => {
                write!(f, "Particle count must be at least 1, got {count}")
            }
            FieldError::InvalidFireIntensity(value) => {
                write!(f, "Fire intensity must be finite and >= 0, got {value}")
            }
            FieldError::InvalidWindSpeed(value) => {
                write!(f, "Wind speed must be finite and >= 0, got {value}")
            }
            FieldError::InvalidHorizontalLimit(value) => {
                write!(f, "Horizontal limit must be finite and > 0, got {value}")
            }
            FieldError::IndexOutOfBounds { index, len } => {
                write!(f, "Particle index {index} out of bounds for field of {len}")
            }
        }
    }
}

impl std::error::Error for FieldError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            FieldError::InvalidParticleCount(0).to_string(),
            "Particle count must be at least 1, got 0"
        );
        assert_eq!(
            FieldError::IndexOutOfBounds { index: 5, len: 3 }.to_string(),
            "Particle index 5 out of bounds for field of 3"
        );
        assert!(FieldError::InvalidWindSpeed(-1.0)
            .to_string()
            .contains("-1"));
    }
}

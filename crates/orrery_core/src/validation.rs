//! Descriptor validation
//!
//! Malformed configuration is rejected before any node is built. The
//! validator collects every problem instead of stopping at the first one so a
//! hand-edited system file can be fixed in one go.

use std::collections::HashSet;

use crate::descriptor::{BodyDescriptor, SystemDescriptor};

/// Deepest allowed hierarchy: sun, planet, moon
pub const MAX_DEPTH: usize = 3;

/// Validation error found in a system description
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Body has an empty name")]
    EmptyName,
    #[error("Duplicate body name: '{0}'")]
    DuplicateName(String),
    #[error("Body '{name}' has invalid radius {radius} (must be finite and > 0)")]
    InvalidRadius { name: String, radius: f32 },
    #[error("Body '{name}' has invalid orbital distance {distance} (must be finite and >= 0)")]
    InvalidOrbitalDistance { name: String, distance: f32 },
    #[error("Body '{name}' has non-finite angular speed {speed}")]
    InvalidAngularSpeed { name: String, speed: f32 },
    #[error("Body '{name}' is nested too deeply (depth {depth}, max {})", MAX_DEPTH)]
    TooDeep { name: String, depth: usize },
}

/// Validator for [`SystemDescriptor`] tables
pub struct SystemValidator;

impl SystemValidator {
    /// Validate a system, returning all errors found
    ///
    /// Returns an empty vector if the system is well formed.
    pub fn validate(system: &SystemDescriptor) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        let mut seen = HashSet::new();

        let sun = &system.sun;
        Self::check_name(&sun.name, &mut seen, &mut errors);
        if !(sun.radius.is_finite() && sun.radius > 0.0) {
            errors.push(ValidationError::InvalidRadius {
                name: sun.name.clone(),
                radius: sun.radius,
            });
        }

        for planet in &system.planets {
            Self::check_body(planet, 2, &mut seen, &mut errors);
        }

        errors
    }

    fn check_body<'a>(
        body: &'a BodyDescriptor,
        depth: usize,
        seen: &mut HashSet<&'a str>,
        errors: &mut Vec<ValidationError>,
    ) {
        Self::check_name(&body.name, seen, errors);

        if depth > MAX_DEPTH {
            errors.push(ValidationError::TooDeep {
                name: body.name.clone(),
                depth,
            });
        }
        if !(body.radius.is_finite() && body.radius > 0.0) {
            errors.push(ValidationError::InvalidRadius {
                name: body.name.clone(),
                radius: body.radius,
            });
        }
        if !(body.orbital_distance.is_finite() && body.orbital_distance >= 0.0) {
            errors.push(ValidationError::InvalidOrbitalDistance {
                name: body.name.clone(),
                distance: body.orbital_distance,
            });
        }
        if !body.angular_speed.is_finite() {
            errors.push(ValidationError::InvalidAngularSpeed {
                name: body.name.clone(),
                speed: body.angular_speed,
            });
        }

        for child in &body.children {
            Self::check_body(child, depth + 1, seen, errors);
        }
    }

    fn check_name<'a>(name: &'a str, seen: &mut HashSet<&'a str>, errors: &mut Vec<ValidationError>) {
        if name.trim().is_empty() {
            errors.push(ValidationError::EmptyName);
        } else if !seen.insert(name) {
            errors.push(ValidationError::DuplicateName(name.to_string()));
        }
    }

    /// Check whether a system is valid
    pub fn is_valid(system: &SystemDescriptor) -> bool {
        Self::validate(system).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_system_is_valid() {
        let errors = SystemValidator::validate(&SystemDescriptor::default());
        assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
    }

    #[test]
    fn test_negative_radius() {
        let mut system = SystemDescriptor::default();
        system.planets[0].radius = -1.0;

        let errors = SystemValidator::validate(&system);
        assert_eq!(
            errors,
            vec![ValidationError::InvalidRadius { name: "Mercury".to_string(), radius: -1.0 }]
        );
    }

    #[test]
    fn test_zero_radius_sun() {
        let mut system = SystemDescriptor::default();
        system.sun.radius = 0.0;
        assert!(!SystemValidator::is_valid(&system));
    }

    #[test]
    fn test_negative_moon_distance() {
        let mut system = SystemDescriptor::default();
        system.planets[2].children[0].orbital_distance = -2.0;

        let errors = SystemValidator::validate(&system);
        assert!(matches!(
            &errors[..],
            [ValidationError::InvalidOrbitalDistance { name, .. }] if name == "Moon"
        ));
    }

    #[test]
    fn test_zero_distance_allowed() {
        let mut system = SystemDescriptor::default();
        system.planets[0].orbital_distance = 0.0;
        assert!(SystemValidator::is_valid(&system));
    }

    #[test]
    fn test_nan_speed() {
        let mut system = SystemDescriptor::default();
        system.planets[1].angular_speed = f32::NAN;

        let errors = SystemValidator::validate(&system);
        assert!(matches!(&errors[..], [ValidationError::InvalidAngularSpeed { .. }]));
    }

    #[test]
    fn test_moon_of_moon_rejected() {
        let mut system = SystemDescriptor::default();
        system.planets[2].children[0]
            .children
            .push(BodyDescriptor::new("Moonmoon", 0.05, 0.5, 0.1));

        let errors = SystemValidator::validate(&system);
        assert_eq!(
            errors,
            vec![ValidationError::TooDeep { name: "Moonmoon".to_string(), depth: 4 }]
        );
    }

    #[test]
    fn test_duplicate_names() {
        let mut system = SystemDescriptor::default();
        system.planets[3].children[1].name = "Phobos".to_string();

        let errors = SystemValidator::validate(&system);
        assert_eq!(errors, vec![ValidationError::DuplicateName("Phobos".to_string())]);
    }

    #[test]
    fn test_collects_multiple_errors() {
        let mut system = SystemDescriptor::default();
        system.planets[0].radius = 0.0;
        system.planets[1].orbital_distance = -1.0;
        system.planets[2].name = String::new();

        assert_eq!(SystemValidator::validate(&system).len(), 3);
    }

    #[test]
    fn test_error_display() {
        let err = ValidationError::InvalidRadius { name: "X".to_string(), radius: -1.0 };
        let msg = err.to_string();
        assert!(msg.contains("'X'"));
        assert!(msg.contains("-1"));
    }
}

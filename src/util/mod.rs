pub mod lenient;
pub mod logging;
pub mod persistence;
pub mod version;

use uuid::Uuid;

/// Generates a unique, prefixed identifier such as `section-3f2a...`.
pub fn generate_id(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4().simple())
}

/// Replaces NaN and infinities with zero so they never reach a displayed figure.
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_prefixed_and_unique() {
        let a = generate_id("section");
        let b = generate_id("section");
        assert!(a.starts_with("section-"));
        assert_ne!(a, b);
    }

    #[test]
    fn non_finite_values_collapse_to_zero() {
        assert_eq!(finite_or_zero(f64::NAN), 0.0);
        assert_eq!(finite_or_zero(f64::INFINITY), 0.0);
        assert_eq!(finite_or_zero(-12.5), -12.5);
    }
}

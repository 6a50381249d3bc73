//! Common validation utilities.

use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    /// Ear-tag identifiers: uppercase alphanumerics with optional dashes.
    static ref TAG_ID_RE: Regex = Regex::new(r"^[A-Z0-9][A-Z0-9-]{0,49}$").unwrap();
}

/// Validates an animal ear-tag identifier.
pub fn validate_tag_id(tag_id: &str) -> Result<(), ValidationError> {
    if TAG_ID_RE.is_match(tag_id) {
        Ok(())
    } else {
        let mut err = ValidationError::new("tag_id_format");
        err.message =
            Some("Tag ID must be 1-50 uppercase alphanumeric characters or dashes".into());
        Err(err)
    }
}

/// Validates that a latitude value is within valid range (-90 to 90).
pub fn validate_latitude(lat: f64) -> Result<(), ValidationError> {
    if (-90.0..=90.0).contains(&lat) {
        Ok(())
    } else {
        let mut err = ValidationError::new("latitude_range");
        err.message = Some("Latitude must be between -90 and 90".into());
        Err(err)
    }
}

/// Validates that a longitude value is within valid range (-180 to 180).
pub fn validate_longitude(lon: f64) -> Result<(), ValidationError> {
    if (-180.0..=180.0).contains(&lon) {
        Ok(())
    } else {
        let mut err = ValidationError::new("longitude_range");
        err.message = Some("Longitude must be between -180 and 180".into());
        Err(err)
    }
}

/// Validates that a farm area is positive.
pub fn validate_area_hectares(area: f64) -> Result<(), ValidationError> {
    if area > 0.0 {
        Ok(())
    } else {
        let mut err = ValidationError::new("area_range");
        err.message = Some("Area must be positive".into());
        Err(err)
    }
}

/// Validates that a quantity in kilograms is positive.
pub fn validate_quantity_kg(quantity: f64) -> Result<(), ValidationError> {
    if quantity > 0.0 {
        Ok(())
    } else {
        let mut err = ValidationError::new("quantity_range");
        err.message = Some("Quantity must be positive".into());
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_tag_id() {
        assert!(validate_tag_id("BR-2024-001").is_ok());
        assert!(validate_tag_id("A").is_ok());
        assert!(validate_tag_id("").is_err());
        assert!(validate_tag_id("lowercase").is_err());
        assert!(validate_tag_id("-leading-dash").is_err());
        assert!(validate_tag_id(&"X".repeat(51)).is_err());
    }

    #[test]
    fn test_validate_latitude() {
        assert!(validate_latitude(0.0).is_ok());
        assert!(validate_latitude(-90.0).is_ok());
        assert!(validate_latitude(90.0).is_ok());
        assert!(validate_latitude(90.1).is_err());
        assert!(validate_latitude(-90.1).is_err());
    }

    #[test]
    fn test_validate_longitude() {
        assert!(validate_longitude(-180.0).is_ok());
        assert!(validate_longitude(180.0).is_ok());
        assert!(validate_longitude(180.5).is_err());
    }

    #[test]
    fn test_validate_area_hectares() {
        assert!(validate_area_hectares(12.5).is_ok());
        assert!(validate_area_hectares(0.0).is_err());
        assert!(validate_area_hectares(-1.0).is_err());
    }

    #[test]
    fn test_validate_quantity_kg() {
        assert!(validate_quantity_kg(3.2).is_ok());
        assert!(validate_quantity_kg(0.0).is_err());
    }
}

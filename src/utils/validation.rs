//! Utilidades de validación
//!
//! Este módulo contiene funciones helper de validación que no caben en los
//! atributos derive de `validator`.

use validator::ValidationError;

/// Validar que un string no esté vacío (espacios no cuentan)
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_not_empty_rejects_whitespace() {
        assert!(validate_not_empty("   ").is_err());
        assert!(validate_not_empty("").is_err());
        assert!(validate_not_empty("ok").is_ok());
    }
}

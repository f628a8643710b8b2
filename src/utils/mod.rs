//! Utilidades del sistema
//!
//! Este módulo contiene utilidades para manejo de errores, validación,
//! fechas, JWT y otras funcionalidades comunes.

pub mod dates;
pub mod errors;
pub mod jwt;
pub mod validation;

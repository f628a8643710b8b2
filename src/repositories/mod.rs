//! Repositorios
//!
//! Todo el SQL vive aquí. Los repositorios devuelven modelos planos; la
//! lógica de negocio (disponibilidad, gating) se decide en los services y
//! controllers sobre los snapshots que estos métodos traen a memoria.

pub mod booking_repository;
pub mod inspection_repository;
pub mod user_repository;
pub mod vehicle_repository;

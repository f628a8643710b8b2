//! Controllers
//!
//! Orquestación por recurso: validar entrada, traer el snapshot necesario,
//! decidir con el núcleo puro (disponibilidad / gating) y recién entonces
//! mutar. Ningún controller toca SQL directamente.

pub mod auth_controller;
pub mod booking_controller;
pub mod inspection_controller;
pub mod vehicle_controller;

use crate::models::user::{AuthUser, UserRole};
use crate::utils::errors::AppError;

/// Verificar que el usuario autenticado tiene el rol requerido
pub fn require_role(user: &AuthUser, role: UserRole) -> Result<(), AppError> {
    if user.role == role {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "Esta acción requiere rol {}",
            role.as_str()
        )))
    }
}

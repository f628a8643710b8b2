//! Services module
//!
//! Este módulo contiene la lógica de negocio de la aplicación. El núcleo
//! (disponibilidad y ciclo de vida) son funciones puras sobre snapshots en
//! memoria; storage y report hablan con los colaboradores externos.

pub mod availability;
pub mod lifecycle;
pub mod report;
pub mod storage;

//! Fleet Booking - backend de reservas e inspecciones de vehículos
//!
//! La librería expone los módulos de la aplicación; el binario (`main.rs`)
//! solo arma el estado y sirve el router. Los tests de integración montan
//! el mismo router contra un `AppState` de prueba.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

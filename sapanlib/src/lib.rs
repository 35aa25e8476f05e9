//! sapanlib — синтетические проводки в стиле SAP: генерация, чтение/запись CSV/JSON,
//! описательная статистика, ABC-классификация, графики и сессия просмотрщика.

pub mod analysis;
pub mod charts;
pub mod config;
pub mod error;
pub mod files;
pub mod generator;
pub mod model;
pub mod session;
pub mod summary;
pub mod table;
pub mod telemetry;
pub mod traits;

pub mod formats {
    pub mod csv;
    pub mod json;
}

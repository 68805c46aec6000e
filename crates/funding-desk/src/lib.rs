//! Core library for the bank funding application intake platform.
//!
//! The wizard module carries the multi-step intake flow (program selection,
//! applicant, project, review) with config-driven validation; the listing
//! module implements the composable filter/sort queries behind the
//! applications and books catalog views; the store module defines the
//! contracts the external CRUD service fulfills.

pub mod config;
pub mod error;
pub mod export;
pub mod listing;
pub mod programs;
pub mod store;
pub mod telemetry;
pub mod wizard;

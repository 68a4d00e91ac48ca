//! # Curve Core (L1: Foundation)
//!
//! Core types and numerical routines for the multicurve workspace.
//!
//! This crate provides:
//! - Date handling with serial-day arithmetic and day count conventions
//! - Yield curve traits and pillar-based curve implementations
//! - Root-finding solvers (Brent, Broyden, Levenberg-Marquardt)
//!
//! All value-carrying types are generic over `T: num_traits::Float` so the
//! same code paths serve standard floating-point types and automatic
//! differentiation types.
//!
//! ## Feature Flags
//!
//! - `serde`: Serde derives on plain-data types (dates, enums)

#![warn(missing_docs)]

pub mod market_data;
pub mod math;
pub mod types;

//! # caselog-core
//!
//! Core types and the pure half of the audit trail engine for caselog.
//!
//! This crate provides the types shared across all caselog crates:
//! - Entity structs (cases, comments, connectors, user actions)
//! - Status, connector and user action enums
//! - Patch structs and their builders
//! - Request validation
//! - The audit engine: field diffing, value capture and action classification
//! - Cross-cutting error types

pub mod audit;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod identity;
pub mod ids;
pub mod requests;
pub mod updates;
pub mod validation;

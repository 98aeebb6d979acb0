//! # lin-core
//!
//! Core types for Lineage, the audit-history engine for hierarchically owned
//! entities.
//!
//! This crate provides the foundational types shared across all Lineage crates:
//! - The history record and its association chain
//! - Per-field changesets and the original/modified projection
//! - Actor identity resolution
//! - Entity snapshots and mutation events handed over by the host
//! - Trail envelope for JSONL persistence
//! - Cross-cutting error types

pub mod changeset;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
pub mod trail;

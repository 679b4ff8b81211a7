//! Taskforge: project and task management core.
//!
//! This crate provides the core functionality for organising work into
//! projects, tracking tasks against deadlines, and cancelling overdue
//! tasks from a scheduled background sweep.
//!
//! # Architecture
//!
//! Taskforge follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (in-memory, PostgreSQL)
//!
//! # Modules
//!
//! - [`domain`]: Aggregates, identifiers, and validated values
//! - [`ports`]: Repository contracts and query filters
//! - [`adapters`]: In-memory and PostgreSQL persistence
//! - [`services`]: Project, task, and auto-close orchestration
//! - [`config`]: Environment-driven settings and limits
//! - [`error`]: Repository and service error taxonomy

pub mod adapters;
pub mod config;
pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

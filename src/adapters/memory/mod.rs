//! In-memory storage adapter.
//!
//! A single store implements both repository ports behind one lock, so the
//! project-delete cascade observes the same atomicity as the transactional
//! `PostgreSQL` adapter. Storage constraints (unique project names, task
//! foreign keys) are mirrored here too, which keeps the service layer's
//! conflict handling exercisable without a database.

mod store;

pub use store::InMemoryStore;

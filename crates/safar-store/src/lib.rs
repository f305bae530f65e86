//! # safar-store: Persistence & Catalog Boundary
//!
//! The engine consumes the persistence/catalog collaborator purely through
//! the trait operation shapes in this crate — it never needs to know how
//! they are implemented (document database, REST API, or flat files).
//!
//! ## Modules
//!
//! - [`catalog`] - [`CatalogStore`]: read-only product/property/experience lookup
//! - [`orders`] - [`OrderStore`]: create, lookup, and status-advance records
//! - [`memory`] - [`MemoryStore`]: in-process implementation for demo and tests
//! - [`error`] - [`StoreError`] / [`StoreResult`]
//!
//! ## Guarantees Required of Any Implementation
//!
//! 1. A create operation returns a unique identifier or fails atomically —
//!    no partial record.
//! 2. Human numbers are unique forever; a collision is `DuplicateNumber`.
//! 3. `update_status` respects the monotonic lifecycle rule even when the
//!    caller already checked it.
//! 4. Records are never deleted; cancellation is a status.

pub mod catalog;
pub mod error;
pub mod memory;
pub mod orders;

pub use catalog::CatalogStore;
pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use orders::OrderStore;

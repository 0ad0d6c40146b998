//! forge
//!
//! Abstraction for the remote hosting service.
//!
//! # Architecture
//!
//! The `Forge` trait defines the single remote operation the policy needs:
//! deleting a ref. The orchestrator only sees `&dyn Forge`, so the
//! hosting API stays an external collaborator that tests replace with
//! [`mock::MockForge`].
//!
//! # Modules
//!
//! - `traits`: Core `Forge` trait and `ForgeError`
//! - [`github`]: GitHub implementation using the REST API
//! - [`mock`]: Mock implementation for deterministic testing

pub mod github;
pub mod mock;
mod traits;

pub use traits::*;

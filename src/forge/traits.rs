//! forge::traits
//!
//! Forge trait definition for interacting with remote hosting services.
//!
//! # Design
//!
//! The `Forge` trait is async because forge operations involve network I/O.
//! All methods return `Result` to handle API errors gracefully. Failures are
//! never retried here; the caller decides what a failure means for the run.
//!
//! # Example
//!
//! ```ignore
//! use branchpolicy::forge::{Forge, ForgeError};
//!
//! async fn remove(forge: &dyn Forge) -> Result<(), ForgeError> {
//!     forge.delete_ref("octocat", "hello-world", "heads/bad-branch").await
//! }
//! ```

use async_trait::async_trait;
use thiserror::Error;

/// Errors from forge operations.
///
/// These error types map to common failure modes when interacting
/// with remote hosting services like GitHub.
#[derive(Debug, Clone, Error)]
pub enum ForgeError {
    /// Authentication is required but not available.
    #[error("authentication required")]
    AuthRequired,

    /// Authentication failed (invalid token, expired, insufficient permissions).
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// The requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Rate limit exceeded.
    #[error("rate limited")]
    RateLimited,

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// Network or connection error.
    #[error("network error: {0}")]
    NetworkError(String),
}

/// The Forge trait for interacting with remote hosting services.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow use across async tasks.
///
/// # Error Handling
///
/// All methods return `Result<T, ForgeError>`:
/// - `AuthRequired` / `AuthFailed`: token missing or lacking permissions
/// - `NotFound`: repository or ref doesn't exist
/// - `RateLimited`: API quota exhausted
/// - `ApiError`: any other API rejection
/// - `NetworkError`: the request never got a response
#[async_trait]
pub trait Forge: Send + Sync {
    /// Get the forge name (e.g., "github").
    fn name(&self) -> &'static str;

    /// Delete a git reference.
    ///
    /// # Arguments
    ///
    /// * `owner` - Repository owner
    /// * `repo` - Repository name
    /// * `ref_path` - Ref without the leading `refs/` (e.g., `heads/feature`)
    ///
    /// # Errors
    ///
    /// - `NotFound` if the repository or ref doesn't exist
    /// - `AuthFailed` if the token may not delete refs
    /// - `ApiError` with status 422 if the ref cannot be deleted
    async fn delete_ref(&self, owner: &str, repo: &str, ref_path: &str) -> Result<(), ForgeError>;
}

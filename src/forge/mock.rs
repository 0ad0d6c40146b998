//! forge::mock
//!
//! Mock forge implementation for deterministic testing.
//!
//! # Design
//!
//! The mock forge provides a deterministic implementation of the `Forge` trait
//! for use in tests. It records every request and allows configuring failure
//! scenarios.
//!
//! # Example
//!
//! ```
//! use branchpolicy::forge::mock::{MockForge, MockOperation};
//! use branchpolicy::forge::Forge;
//!
//! # tokio_test::block_on(async {
//! let forge = MockForge::new();
//! forge.delete_ref("octocat", "hello-world", "heads/bad").await.unwrap();
//!
//! assert_eq!(
//!     forge.operations(),
//!     vec![MockOperation::DeleteRef {
//!         owner: "octocat".into(),
//!         repo: "hello-world".into(),
//!         ref_path: "heads/bad".into(),
//!     }]
//! );
//! # });
//! ```

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use super::traits::{Forge, ForgeError};

/// Mock forge for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping.
#[derive(Debug, Clone, Default)]
pub struct MockForge {
    /// Internal state shared across clones.
    inner: Arc<Mutex<MockForgeInner>>,
}

/// Internal mutable state.
#[derive(Debug, Default)]
struct MockForgeInner {
    /// Method to fail on (for testing error paths).
    fail_on: Option<FailOn>,
    /// Recorded operations for verification.
    operations: Vec<MockOperation>,
}

/// Configuration for which operation should fail.
#[derive(Debug, Clone)]
pub enum FailOn {
    /// Fail delete_ref with the given error.
    DeleteRef(ForgeError),
}

/// Recorded operation for test verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockOperation {
    DeleteRef {
        owner: String,
        repo: String,
        ref_path: String,
    },
}

impl MockForge {
    /// Create a new mock forge that accepts every request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the mock to fail on a specific operation.
    ///
    /// # Example
    ///
    /// ```
    /// use branchpolicy::forge::mock::{MockForge, FailOn};
    /// use branchpolicy::forge::ForgeError;
    ///
    /// let forge = MockForge::new()
    ///     .fail_on(FailOn::DeleteRef(ForgeError::RateLimited));
    /// ```
    pub fn fail_on(self, fail_on: FailOn) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.fail_on = Some(fail_on);
        }
        self
    }

    /// Clear the failure configuration.
    pub fn clear_fail_on(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_on = None;
    }

    /// Get all recorded operations.
    ///
    /// Useful for verifying the mock was called correctly.
    pub fn operations(&self) -> Vec<MockOperation> {
        self.inner.lock().unwrap().operations.clone()
    }

    /// Clear recorded operations.
    pub fn clear_operations(&self) {
        self.inner.lock().unwrap().operations.clear();
    }
}

#[async_trait]
impl Forge for MockForge {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn delete_ref(&self, owner: &str, repo: &str, ref_path: &str) -> Result<(), ForgeError> {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.push(MockOperation::DeleteRef {
            owner: owner.to_string(),
            repo: repo.to_string(),
            ref_path: ref_path.to_string(),
        });

        match &inner.fail_on {
            Some(FailOn::DeleteRef(err)) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

//! The analyzer trait.

use crate::core::ClientResult;

use async_trait::async_trait;
use std::fmt::Debug;

/// A hybrid analyzer that returns the raw scan response for a file.
///
/// The response body is returned undecoded; interpreting it is the job of
/// [`Processor`](crate::report::Processor). Implementations do not retry.
///
/// # Example Implementation
///
/// ```rust,ignore
/// use varist_ha::analyzer::Analyzer;
/// use varist_ha::core::ClientResult;
/// use async_trait::async_trait;
///
/// #[derive(Debug)]
/// struct CannedAnalyzer;
///
/// #[async_trait]
/// impl Analyzer for CannedAnalyzer {
///     fn name(&self) -> &str {
///         "canned"
///     }
///
///     async fn analyze(&self, _scan_file: &str) -> ClientResult<Vec<u8>> {
///         Ok(b"{}".to_vec())
///     }
/// }
/// ```
#[async_trait]
pub trait Analyzer: Send + Sync + Debug {
    /// Returns a short name for logging.
    fn name(&self) -> &str;

    /// Requests analysis of `scan_file` and returns the response body.
    ///
    /// # Errors
    ///
    /// - `ConnectionFailed` - The request could not be sent or timed out.
    /// - `HttpStatus` - The analyzer answered with a non-200 status.
    /// - `ReadFailed` - The response body could not be read.
    async fn analyze(&self, scan_file: &str) -> ClientResult<Vec<u8>>;
}

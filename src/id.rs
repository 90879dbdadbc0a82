//! Primary-key identifier generation.
//!
//! Identifiers are generated once per record at creation time and never
//! change afterwards. The generator is injectable; the default produces a
//! uuid v4 string: 36 characters, fixed-width, globally unique with
//! overwhelming probability. Any fixed-width globally-unique scheme
//! satisfies the contract.

use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

/// Pluggable identifier generator.
///
/// Wraps a zero-argument function producing unique primary-key values.
///
/// # Example
///
/// ```
/// use rdbms_helper::id::IdGenerator;
///
/// let generator = IdGenerator::default();
/// let id = generator.generate();
/// assert_eq!(id.len(), 36);
///
/// let fixed = IdGenerator::new(|| "fixed-id".to_string());
/// assert_eq!(fixed.generate(), "fixed-id");
/// ```
#[derive(Clone)]
pub struct IdGenerator(Arc<dyn Fn() -> String + Send + Sync>);

impl IdGenerator {
    /// Wrap a custom generator function.
    pub fn new(generator: impl Fn() -> String + Send + Sync + 'static) -> Self {
        Self(Arc::new(generator))
    }

    /// Produce a fresh identifier.
    #[must_use]
    pub fn generate(&self) -> String {
        (self.0)()
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new(|| Uuid::new_v4().to_string())
    }
}

impl fmt::Debug for IdGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("IdGenerator(..)")
    }
}

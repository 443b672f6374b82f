//! Pure text extractors for README and CODEOWNERS content.
//!
//! # Responsibility
//! - Pull structured facts out of raw text without interpreting ownership.
//!
//! # Invariants
//! - Every function is total: malformed input yields empty results, never
//!   errors or panics.
//! - Matching is textual, not an AST parse; pathological documents get
//!   best-effort results.

pub mod codeowners;
pub mod handles;
pub mod markdown;

/*!
 * Scope patterns and scope-based response filtering
 *
 * Responsibility:
 * - dotted scope pattern の parse と segment 単位の match
 * - visible fields に基づくレスポンスの redaction
 *
 * Public API:
 * - ScopePattern / any_matches
 * - filter
 */

mod filter;
mod pattern;

pub use filter::filter;
pub use pattern::{ScopePattern, any_matches};

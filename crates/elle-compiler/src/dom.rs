//! Re-exports the static element tree built by the `dom_builder` pass.
//!
//! `Dom`/`Element` are defined in `elle_passes::dom` (the dom builder pass
//! needs them too, and `elle-compiler` depends on `elle-passes` rather than
//! the reverse), so this module is just the public-facing door to them.

pub use elle_passes::dom::{Dom, Element};

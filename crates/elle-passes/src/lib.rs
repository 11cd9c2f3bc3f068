//! The Typhon-L pass pipeline: a linear sequence of AST-to-AST
//! transformations that lower a parsed translation unit down to the form
//! the IR emitter expects.
//!
//! ## Architecture
//!
//! - **Pass manager** ([`manager`]): the linear orchestrator (`initialize`
//!   then `performVisit` per pass, halting on a terminal error).
//! - **Passes** ([`passes`]): the 23 passes themselves, run in the fixed
//!   order documented on [`passes`].
//! - **DOM** ([`dom`]): the static element tree the DOM builder pass
//!   constructs from `#new` rules.
//! - **Errors** ([`error`]): the `PassError`/`FailureCategory` taxonomy
//!   every pass reports against.
//!
//! ## Example
//!
//! ```rust,ignore
//! use elle_passes::manager::PassManager;
//! use elle_passes::passes::{AstValidator, ColorMaker, ConstantFolder};
//!
//! let passes: Vec<Box<dyn elle_passes::manager::Pass>> = vec![
//!     Box::new(ColorMaker::new()),
//!     Box::new(AstValidator::new()),
//!     Box::new(ConstantFolder::new()),
//! ];
//! let mut manager = PassManager::new(passes, root, source);
//! manager.run(&mut ast)?;
//! ```

pub mod dom;
pub mod error;
pub mod manager;
pub mod passes;
pub mod util;

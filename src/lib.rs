//! # Macro Lens workspace
//!
//! Umbrella package re-exporting the [`macro_lens`] facade and its component
//! crates, so demos can depend on a single package.
//!
//! ## Example
//!
//! ```
//! use macro_lens_workspace::{Timeframe, Workspace};
//!
//! let workspace = Workspace::default();
//! assert_eq!(workspace.timeframe(), Timeframe::Daily);
//! assert!(workspace.list().is_empty());
//! ```

pub use macro_lens::*;

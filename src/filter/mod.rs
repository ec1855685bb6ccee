// src/filter/mod.rs

//! Action filtering.
//!
//! - [`patterns`] compiles include/exclude globs at config load time.
//! - [`matcher`] evaluates a change event against a watch's ordered action
//!   list (event kind, globs, size/age bounds, file/dir, hidden paths).

pub mod matcher;
pub mod patterns;

pub use matcher::Matcher;
pub use patterns::PatternSet;

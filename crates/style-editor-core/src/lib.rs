//! # Style Editor Core
//!
//! Pure, I/O-free logic for Style Editor: paragraph splitting, sequence
//! alignment, edit-record extraction, keyword similarity, and merging of
//! classified patterns into a persistent style profile.
//!
//! This crate has no filesystem, network, or async runtime dependencies.
//! Loading documents, calling a classifier, and persisting the profile
//! all happen in the `style-editor` application crate.
//!
//! ```text
//!  original ─┐                                   ┌──────────┐
//!            ├─▶ align() ─▶ EditRecord[] ─▶ (classifier) ─▶ │ Pattern[]│
//!  edited ───┘                                   └────┬─────┘
//!                                                     ▼
//!                                  merge_patterns(&mut Profile, ...)
//! ```

pub mod align;
pub mod keywords;
pub mod merge;
pub mod models;
pub mod paragraph;
pub mod sequence;

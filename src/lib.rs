//! # Style Editor
//!
//! Learns an author's editing style from before/after pairs of their own
//! chapters and accumulates it into a persistent style profile.
//!
//! The pure algorithms (paragraph alignment, keyword similarity, profile
//! merging) live in the `style-editor-core` crate. This crate adds the
//! collaborators around them: configuration, profile persistence, the
//! classifier that turns raw edits into categorized rules, and the `sted`
//! command-line interface.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌─────────┐   ┌────────────┐   ┌────────┐   ┌──────────────┐
//! │ original.md  │──▶│  align  │──▶│ classifier │──▶│ merge  │──▶│ profile JSON │
//! │ edited.md    │   │ (core)  │   │ (LLM API)  │   │ (core) │   │   (store)    │
//! └──────────────┘   └─────────┘   └────────────┘   └────────┘   └──────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! export ANTHROPIC_API_KEY=...
//! sted learn ch3.md ch3_edited.md --archive
//! sted profile
//! sted diff ch4.md ch4_edited.md
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`store`] | Profile load, atomic save and reset |
//! | [`classifier`] | Classifier trait and providers |
//! | [`learn`] | Align → classify → merge pipeline |
//! | [`report`] | Profile and diff rendering |
//! | [`history`] | Archived learn sessions |

pub mod classifier;
pub mod config;
pub mod history;
pub mod learn;
pub mod report;
pub mod store;

//! # Memento Core Library
//!
//! This library provides the core logic for Memento, a personal countdown
//! and time-awareness tool. Given a handful of user-configured temporal
//! anchors (birthday, life expectancy, bedtime, workday composition, an
//! optional goal date) it computes the time remaining within a selected
//! scope and decides which milestone notifications to surface.
//!
//! ## Architecture
//!
//! - **Countdown**: Pure window arithmetic. Every function takes `now`
//!   explicitly (local wall-clock) and holds no state, so it is safe to
//!   call at redraw frequency.
//! - **Milestones**: A date-bucketed notification-dedup state machine
//!   persisted through a small key-value store contract.
//! - **Storage**: TOML-based settings and a file-backed key-value store
//!   under `~/.config/memento/`.
//!
//! ## Key Components
//!
//! - [`calculate`]: Scope window computation
//! - [`MilestoneTracker`]: Threshold-crossing detection with at-most-once
//!   delivery
//! - [`Settings`]: User configuration with per-field defaults

pub mod countdown;
pub mod error;
pub mod milestones;
pub mod storage;

pub use countdown::color::{color_for_ratio, Accent, ColorPalette};
pub use countdown::message::message_for_ratio;
pub use countdown::units::{convert_to_unit, decompose, Breakdown, Unit};
pub use countdown::{calculate, CountdownResult, Scope};
pub use error::{ConfigError, CoreError, StoreError};
pub use milestones::{MilestoneNotification, MilestoneTracker};
pub use storage::kv::{FileKvStore, KvStore, MemoryKvStore};
pub use storage::{data_dir, Settings};

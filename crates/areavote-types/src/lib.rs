//! Shared type definitions for the Areavote allocation simulator.
//!
//! This crate is the single source of truth for the data model shared by
//! the rule engine, the simulator, and the command-line front end.
//!
//! # Modules
//!
//! - [`enums`] -- Rule kinds and report modes
//! - [`structs`] -- Projects, pools, snapshots, and report records
//!
//! # Constants
//!
//! The engine is parameterized by a handful of named constants. They are
//! the defaults of `RuleParams` in the rules crate and can be overridden
//! through configuration without changing behavior elsewhere.

pub mod enums;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{ReportMode, RuleKind};
pub use structs::{Pool, PoolSnapshot, Project, ProjectStats, RuleReport};

/// Number of project slots in every pool.
pub const SLOT_COUNT: usize = 10;

/// Area above which the damped-leader rule starts suppressing growth.
pub const DOMINANCE_THRESHOLD: f64 = 5000.0;

/// Initial value of the damped-leader rule's running maximum ("top").
pub const INITIAL_LEADER_AREA: f64 = 1.0;

/// Scaling applied to `area / total_area` when reporting shares.
pub const SHARE_SCALE: f64 = 10000.0;

/// Lower bound used for the pool total when it appears as a divisor.
pub const MIN_TOTAL_AREA_DIVISOR: f64 = 1.0;

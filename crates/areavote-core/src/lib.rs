//! Vote sampling, simulation driver, and configuration for the Areavote
//! simulator.
//!
//! This crate feeds randomized vote streams through one or more allocation
//! rules so that their outcomes can be compared on an identical schedule.
//!
//! # Modules
//!
//! - [`tables`] -- Validated probability tables and the named presets.
//! - [`sampler`] -- Biased linear-scan index sampling.
//! - [`simulator`] -- [`Simulator`]: batch dispatch, snapshots, reports.
//! - [`config`] -- Configuration loading from `areavote-config.yaml`.
//! - [`runner`] -- Config-driven run orchestration and logging.
//!
//! # Randomness
//!
//! The simulator never touches an ambient generator. Callers pass any
//! [`rand::Rng`] at construction; seeding it makes a run reproducible.
//!
//! [`Simulator`]: simulator::Simulator

pub mod config;
pub mod runner;
pub mod sampler;
pub mod simulator;
pub mod tables;

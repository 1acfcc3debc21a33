//! Breadthlab Core: panel alignment, cross-sectional analytics, simulation.
//!
//! This crate contains the in-memory heart of the backtester:
//! - Domain types (series, signals, positions, portfolio, equity points)
//! - CSV ingestion and the Panel Builder (common or union date axis)
//! - Column indicators (rolling mean, percent change, RSI)
//! - Breadth and Ranking engines over an immutable panel
//! - The sequential Simulation Engine
//! - A reference signal source (SMA crossover)
//! - BLAKE3 fingerprints for datasets and runs

pub mod analytics;
pub mod data;
pub mod domain;
pub mod engine;
pub mod fingerprint;
pub mod indicators;
pub mod signals;

//! FlowSense - dashboard client for an adaptive traffic-signal controller
//!
//! This library provides the state synchronization layer for the dashboard:
//! polling the remote controller, reconciling responses into a single view
//! model, classifying failures, and deriving presentation metrics.

pub mod cli;
pub mod client;
pub mod config;
pub mod metrics;
pub mod model;
pub mod store;
pub mod sync;

//! CLI infrastructure for the flappy_td agent
//!
//! This module provides the command-line interface for training the agent,
//! exporting learned utility tables and inspecting saved snapshots.

pub mod commands;
pub mod config;
pub mod output;

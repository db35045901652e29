//! # Captioner Library
//!
//! Image captioning through OpenAI-compatible vision APIs.
//! Provides model discovery, single-image captions and batch captioning
//! of whole directories with optional sequential renaming.

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod processing;
pub mod ui;

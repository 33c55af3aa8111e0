//! # Prompt Template Modules
//!
//! This module organizes the prompt templates used by the `funr` library.

pub mod tasks;

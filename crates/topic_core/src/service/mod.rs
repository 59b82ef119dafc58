//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store calls into the topic log operations.
//! - Keep the CLI decoupled from storage details.

pub mod topic_service;

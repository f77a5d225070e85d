//! Integration tests for Layer 2: Engine
//!
//! Tests for record-level merging, materialization, registries, and the
//! multi-namespace facade.

mod materialize;
mod merging;
mod templates;

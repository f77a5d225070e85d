//! Integration tests for Layer 1: Storage
//!
//! Tests for identity resolution, record stores, and inheritance chains.

mod identity;

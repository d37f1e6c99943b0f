//! Integration tests for Layer 3: Search
//!
//! Tests template resolution against real sources, result merging, and
//! background finds.

mod background;
mod strategy;

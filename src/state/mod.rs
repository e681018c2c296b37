//! State module for tracking crawl progress
//!
//! This module provides the durable visited-URL set that lets an interrupted
//! crawl resume without refetching finished work.

mod visited;

// Re-export main types
pub use visited::VisitedSet;

//! Carton - The artist's toolbox for Vize.
//!
//! This crate provides the foundational utilities and data structures shared by the
//! Vize scoped style crates, much like a carton (artist's portfolio case) holds all
//! the essential tools and materials an artist needs for their work.
//!
//! # Modules
//!
//! - **dom_tag_config**: Known HTML / SVG / MathML tag tables
//! - **general**: Case conversion helpers for attribute and prop names
//!
//! # Example
//!
//! ```
//! use vize_carton::{camelize, hyphenate, is_native_tag};
//!
//! assert_eq!(camelize("enter-active-class"), "enterActiveClass");
//! assert_eq!(hyphenate("enterActiveClass"), "enter-active-class");
//! assert!(is_native_tag("div"));
//! assert!(!is_native_tag("MyButton"));
//! ```

// Shared modules
pub mod dom_tag_config;
pub mod general;

// Re-export compact_str::CompactString for convenience
pub use compact_str::CompactString;
pub use compact_str::CompactString as String;
pub use compact_str::ToCompactString;

// Re-export smallvec for stack-optimized collections
pub use smallvec::{smallvec, SmallVec};

// Re-export rustc-hash for fast hash maps/sets
pub use rustc_hash::{FxHashMap, FxHashSet};

// Re-export phf for compile-time perfect hash functions
pub use phf::{phf_map, phf_set, Map as PhfMap, Set as PhfSet};

// Re-export shared utilities
pub use dom_tag_config::*;
pub use general::*;

//! Lint rules for Vue.js SFC style blocks.

pub mod scoped_css;

//! Rendering of analysis results

pub mod formatter;

pub use formatter::render;

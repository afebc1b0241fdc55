//! Snippet generation.
//!
//! Renders a composed request as a shell command, a Python script or a
//! browser `fetch` call.

mod generator;

pub use generator::{CodeGenerator, generate_snippet, python_literal};

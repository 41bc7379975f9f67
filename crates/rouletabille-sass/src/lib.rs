//! Incremental SCSS compilation for the rouletabille site builder.
//!
//! Copyright (c) 2025 The rouletabille.fr authors
//!
//! This crate provides:
//! - Style source classification (partials vs compilation units)
//! - Load path resolution for a compilation unit
//! - SCSS compilation through grass, reporting every file the compiler read
//!   so the caller can register them as build dependencies

mod compile;
mod error;
mod fs;
mod resolve;
mod types;

pub use compile::{StyleCompiler, compile_scss};
pub use error::SassError;
pub use fs::{RecordingFs, normalize_path};
pub use resolve::{PARTIAL_MARKER, StyleSourceKind, classify, is_style_source, source_dir};
pub use types::{CompiledStyle, LoadPathSet};

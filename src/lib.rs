//! # Huffman Codec Library
//!
//! Compress or expand files using classical (static, per-file) Huffman
//! coding.
//! * `bit_vector` is an addressable, growable bit store with binary I/O.
//! * `element` defines the shared node record and its arena.
//! * `frequency_list` keeps nodes sorted by ascending frequency.
//! * `huffman_tree` folds a frequency list into a tree, and serializes it.
//! * `pipeline` composes the above into whole-file encode/decode.
//!
//! The pipeline functions are generics that operate on trait objects with
//! bounds `Read + Seek` or `Write + Seek`, so a caller can drive them with
//! files, in-memory cursors, or anything else that implements those traits.
//!
//! ## File Example
//!
//! ```rs
//! use huffman_codec::*;
//! let mut in_file = std::fs::File::open("some_input_path").expect("open failed");
//! let mut out_file = std::fs::File::create("some_output_path").expect("create failed");
//! let report = pipeline::encode(&mut in_file, &mut out_file, &pipeline::STD_CONFIG)
//!     .expect("encode failed");
//! eprintln!("encoded {} into {}", report.in_bytes, report.out_bytes);
//! ```
//!
//! ## Buffer Example
//!
//! ```rs
//! use huffman_codec::*;
//! use std::io::Cursor;
//! let test_data = b"ABRACADABRA".to_vec();
//! let mut src = Cursor::new(test_data);
//! let mut dst = Cursor::new(Vec::new());
//! pipeline::encode(&mut src, &mut dst, &pipeline::STD_CONFIG).expect("encode failed");
//! ```

pub mod bit_vector;
pub mod element;
pub mod frequency_list;
pub mod huffman_tree;
pub mod pipeline;

/// Crate-wide error type, covering every failure kind the core and the CLI
/// can raise.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("memory allocation failed")]
    AllocationFailure,
    #[error("short read: expected {expected} bytes, got {actual}")]
    IoShort { expected: usize, actual: usize },
    #[error("failed to open file: {0}")]
    IoOpen(std::io::Error),
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    #[error("invalid state: {0}")]
    InvalidState(&'static str),
    #[error("usage error: {0}")]
    UsageError(String),
    #[error("input has a single distinct byte; refusing to encode")]
    SingleSymbolInput,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Codec error types.

/// Errors that can occur while encoding or decoding keys and rows.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// A value does not fit the fixed width or length field of its encoding.
    #[error("encoding overflow: {context}")]
    EncodingOverflow { context: String },

    /// A value's runtime variant disagrees with its column descriptor.
    #[error("type mismatch: expected {expected}, got {got}")]
    TypeMismatch {
        expected: &'static str,
        got: &'static str,
    },

    /// Stored bytes cannot be decoded back into the declared shape.
    #[error("corrupt encoding: {0}")]
    Corruption(String),
}

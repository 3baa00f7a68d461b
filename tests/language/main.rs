//! Integration tests for Layer 1: Language
//!
//! Tests for the statement tokenizer, signature format parser, and matcher.

mod matcher;

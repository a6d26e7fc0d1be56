//! Property-based tests for the ingestion pipeline
//!
//! ## Test Modules
//!
//! - `parser_props`: combinator engine
//!   - Failed literals and sequences leave the cursor where it started
//!   - Successful parses advance by exactly what they consumed
//!   - Integers and dice expressions read back what was written
//!
//! - `content_props`: content tree
//!   - Appending never leaves two adjacent strings in a compound
//!   - Appending preserves all text in order
//!
//! - `reader_props`: format readers
//!   - A document of k valid and m invalid records yields k items and
//!     m invalid items, in document order
//!
//! By default, proptest runs 256 cases per property. Override with
//! `PROPTEST_CASES`.

mod content_props;
mod parser_props;
mod reader_props;

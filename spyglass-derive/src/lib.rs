//! Derive macros for the spyglass spying-fixture library
//!
//! This crate provides `#[derive(FromRecord)]`, which rebuilds a struct from
//! the dynamic records produced by composed fixtures.

use proc_macro::TokenStream;

mod from_record;

/// Derive macro implementing `spyglass::FromRecord`
///
/// Each named field is taken from the record entry with the same key.
///
/// ```rust
/// use spyglass::{FromRecord, Record};
///
/// #[derive(FromRecord)]
/// struct Client {
///     retries: u32,
///     #[record(rename = "fetchUser")]
///     fetch_user: String,
/// }
/// ```
///
/// # Supported Attributes
///
/// - `rename = "key"`: Read the field from `key` instead of the field name
///
/// Only structs with named fields are supported.
#[proc_macro_derive(FromRecord, attributes(record))]
pub fn derive_from_record(input: TokenStream) -> TokenStream {
    from_record::derive_from_record_impl(input)
}

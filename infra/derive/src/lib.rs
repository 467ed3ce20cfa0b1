#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros for the infrastructure.
//! Every crate in the workspace declares its error enum through [`macro@sponge_error`],
//! so errors share one shape: named fields, an optional `context`, and a `...Ext`
//! trait to attach that context at the call site.
//!
//! ## Usage
//! ```toml
//! [dependencies]
//! sponge-derive.workspace = true
//! thiserror.workspace = true
//! ```

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// A high-level attribute macro for defining domain-specific error enums.
///
/// # Features
///
/// * **Automatic Derives**: Injects `#[derive(Debug, thiserror::Error)]`.
/// * **Type Aliasing**: Creates a `Result<T, E = ErrorName>` alias next to the enum.
/// * **Context Support**: Generates a companion `...Ext` trait that adds `.context()` and
///   the lazy `.with_context()` to any `Result` that can be converted into this error type.
/// * **Standard Conversions**: Implements `From<T>` for variants containing a source field,
///   enabling the use of the `?` operator for upstream errors.
/// * **Internal Fallback**: Provides `From<&'static str>` and `From<String>` when an
///   `Internal` variant is present.
///
/// # Requirements
///
/// 1. The macro must be applied to an **enum**.
/// 2. Variants that support context must include a `context: Option<Cow<'static, str>>` field.
/// 3. Variants wrapping external errors must include a `source: T` field or a field marked
///    with `#[source]`/`#[from]` (compatible with `thiserror`), and a context field.
/// 4. Tuple or unit variants are rejected.
///
/// # Example
///
/// ```rust,ignore
/// use sponge_derive::sponge_error;
/// use std::borrow::Cow;
///
/// #[sponge_error]
/// pub enum RegistryError {
///     #[error("Duplicate registration{}: {message}", format_context(.context))]
///     Duplicate { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
///
///     #[error("Internal fault{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// fn check(taken: bool) -> Result<()> {
///     if taken {
///         return Err("already registered".into()); // Internal via From<&str>
///     }
///     Ok(())
/// }
/// ```
#[proc_macro_attribute]
pub fn sponge_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_derive(input).into()
}

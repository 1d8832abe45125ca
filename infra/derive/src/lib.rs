#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros for the client shell infrastructure.
//! This crate provides attribute macros that remove the boilerplate around
//! error enums, the event-loop runtime entry point, and registry singletons.
//!
//! ## Usage
//! Consumers inside the workspace depend on it through the workspace table:
//! ```toml
//! [dependencies]
//! aegis-derive.workspace = true
//! ```
//!
//! See each macro’s docstring for examples; they are `ignore`d to avoid compiling in this crate,
//! but should be copied into consuming crates’ tests as needed.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemFn, ItemStruct, parse_macro_input};

/// Attribute macro to bootstrap the event-loop runtime.
///
/// Transforms an `async fn main` into a standard `fn main` that builds the
/// runtime described by the selected profile and blocks on the body.
///
/// # Arguments
///
/// * `event_loop` - Single cooperative event loop on the calling thread (desktop shell).
/// * `default` - Same as `event_loop`.
///
/// # Examples
///
/// ```rust,ignore
/// #[aegis_runtime::main(event_loop)]
/// async fn main() -> anyhow::Result<()> {
/// # Ok(())
/// }
/// ```
#[proc_macro_attribute]
pub fn main(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::runtime::expand_main(args.into(), input).into()
}

/// A high-level attribute macro for defining domain-specific error enums.
///
/// # Features
///
/// * **Automatic Derives**: Injects `#[derive(Debug, thiserror::Error)]`.
/// * **Context Support**: Generates a companion `...Ext` trait that adds `.context()`
///   to any `Result` that can be converted into this error type.
/// * **Standard Conversions**: Implements `From<T>` for variants containing a source field,
///   enabling the `?` operator for upstream errors.
/// * **Internal Fallback**: Provides `From<&'static str>` and `From<String>` when an
///   `Internal` variant is present.
/// * **Introspection**: Generates `kind()` (variant name) and `context_message()`
///   accessors, used by structured log fields.
///
/// # Requirements
///
/// 1. The macro must be applied to an **enum** with named-field variants.
/// 2. `context` fields must be `Option<Cow<'static, str>>`.
/// 3. Variants with a `source` (or `#[source]`/`#[from]`) field must also carry `context`.
///
/// # Example
///
/// ```rust,ignore
/// use aegis_derive::aegis_error;
/// use std::borrow::Cow;
///
/// #[aegis_error]
/// pub enum SettingsError {
///     #[error("IO error{}: {source}", format_context(.context))]
///     Io { source: std::io::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal fault{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// fn read() -> Result<String, SettingsError> {
///     std::fs::read_to_string("aegis.conf").context("Reading settings")
/// }
/// ```
#[proc_macro_attribute]
pub fn aegis_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_derive(input).into()
}

/// Attribute macro to define a registry singleton service handle.
///
/// 1. Moves the fields into a generated `<Name>Inner` struct.
/// 2. Generates a cheaply cloneable `Arc` wrapper with `Deref` to the inner state.
/// 3. Implements `Singleton` so the handle can be owned by the type registry and
///    resolved by name from the presentation layer.
///
/// The registry name defaults to the struct name; override it with `name = "..."`.
///
/// # Example
/// ```rust,ignore
/// #[aegis_derive::service(name = "ContainerProps")]
/// pub struct ContainerProps {
///     pub default_container: DockerContainer,
/// }
///
/// let props = ContainerProps::new(ContainerPropsInner { default_container: DockerContainer::OpenVpn });
/// assert_eq!(ContainerProps::REGISTRY_NAME, "ContainerProps");
/// ```
#[proc_macro_attribute]
pub fn service(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemStruct);
    macros::service::expand_service(args.into(), input).into()
}

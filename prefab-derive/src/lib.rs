//! Derive macros for the Prefab value synthesis library
//!
//! This crate provides procedural macros for automatically implementing traits
//! in the Prefab library.

use proc_macro::TokenStream;

mod derive;

/// Derive macro for automatically implementing the Described trait
///
/// The generated `layout()` registers the type's identity, its type
/// parameters and every field with its declared type, so the fallback factory
/// can build values for it without calling a constructor.
///
/// # Basic Usage
///
/// ```rust,ignore
/// use prefab::{ClassCatalog, Layout};
///
/// #[derive(Layout)]
/// struct User {
///     id: i64,
///     name: String,
///     tags: Vec<String>,
/// }
///
/// let mut catalog = ClassCatalog::new();
/// catalog.register_described::<User>()?;
/// ```
///
/// # Attributes
///
/// - `#[prefab(identity = "Name")]` on the type: register under another identity
/// - `#[prefab(extends = "Base")]` on a struct: inherit the fields of `Base`
/// - `#[prefab(skip)]` on a field: declare it static, so synthesis leaves it alone
///
/// Tuple struct fields are named `"0"`, `"1"`, and so on. Enums must consist of
/// unit variants only; each variant becomes a constant, in declaration order.
#[proc_macro_derive(Layout, attributes(prefab))]
pub fn derive_layout(input: TokenStream) -> TokenStream {
    derive::derive_layout_impl(input)
}

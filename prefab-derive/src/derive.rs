//! Derive macro implementation for automatic Described trait derivation
//!
//! The generated `layout()` is a `prefab::ClassLayout` builder chain. Field
//! types are rendered to descriptor strings at expansion time, so the runtime
//! never inspects Rust types.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{
    Attribute, Data, DataEnum, DeriveInput, Error, Fields, GenericArgument, GenericParam, LitStr,
    PathArguments, Result, Type, parse_macro_input,
};

/// Main entry point for the Layout derive macro
pub fn derive_layout_impl(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match generate_layout_impl(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// Options accepted on the type itself
#[derive(Default)]
struct ContainerOptions {
    identity: Option<String>,
    extends: Option<String>,
}

/// Generate the Described implementation for the given input
fn generate_layout_impl(input: &DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let options = parse_container_attributes(&input.attrs)?;
    let identity = options.identity.unwrap_or_else(|| name.to_string());

    let body = match &input.data {
        Data::Struct(data_struct) => {
            generate_struct_body(&identity, input, &data_struct.fields, options.extends)?
        }
        Data::Enum(data_enum) => {
            if options.extends.is_some() {
                return Err(Error::new_spanned(
                    name,
                    "`extends` is not supported on enums",
                ));
            }
            generate_enum_body(&identity, data_enum)?
        }
        Data::Union(_) => {
            return Err(Error::new_spanned(
                input,
                "Layout derive is not supported for unions",
            ));
        }
    };

    Ok(quote! {
        impl #impl_generics prefab::Described for #name #ty_generics #where_clause {
            fn layout() -> prefab::ClassLayout {
                #body
            }
        }
    })
}

fn generate_struct_body(
    identity: &str,
    input: &DeriveInput,
    fields: &Fields,
    extends: Option<String>,
) -> Result<TokenStream> {
    let parameters: Vec<String> = input
        .generics
        .params
        .iter()
        .filter_map(|param| match param {
            GenericParam::Type(type_param) => Some(type_param.ident.to_string()),
            _ => None,
        })
        .collect();

    let mut chain = quote! { prefab::ClassLayout::class(#identity) };
    if !parameters.is_empty() {
        chain = quote! { #chain.type_parameters([#(#parameters),*]) };
    }
    if let Some(superclass) = extends {
        chain = quote! { #chain.extends(#superclass) };
    }

    for (index, field) in fields.iter().enumerate() {
        let field_name = field
            .ident
            .as_ref()
            .map(|ident| ident.to_string())
            .unwrap_or_else(|| index.to_string());
        chain = if is_skipped(&field.attrs)? {
            // Static fields are never synthesized, so any type will do
            let ty = type_identity(&field.ty).unwrap_or_else(|_| "Object".to_string());
            quote! { #chain.static_field(#field_name, #ty) }
        } else {
            let ty = type_identity(&field.ty)?;
            quote! { #chain.field(#field_name, #ty) }
        };
    }

    Ok(chain)
}

fn generate_enum_body(identity: &str, data_enum: &DataEnum) -> Result<TokenStream> {
    let mut constants = Vec::new();
    for variant in &data_enum.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(Error::new_spanned(
                variant,
                "Layout derive only supports enums whose variants are all unit variants",
            ));
        }
        constants.push(variant.ident.to_string());
    }

    Ok(quote! {
        prefab::ClassLayout::enumeration(#identity, [#(#constants),*])
    })
}

/// Render a field type as a descriptor string, e.g. `HashMap<String, Vec<T>>`
fn type_identity(ty: &Type) -> Result<String> {
    match ty {
        Type::Path(type_path) => {
            let segment = type_path.path.segments.last().ok_or_else(|| {
                Error::new_spanned(ty, "Field type must name a type")
            })?;
            let mut arguments = Vec::new();
            if let PathArguments::AngleBracketed(angle) = &segment.arguments {
                for argument in &angle.args {
                    if let GenericArgument::Type(inner) = argument {
                        arguments.push(type_identity(inner)?);
                    }
                }
            }
            if arguments.is_empty() {
                Ok(segment.ident.to_string())
            } else {
                Ok(format!("{}<{}>", segment.ident, arguments.join(", ")))
            }
        }
        Type::Reference(reference) => type_identity(&reference.elem),
        Type::Paren(paren) => type_identity(&paren.elem),
        Type::Group(group) => type_identity(&group.elem),
        Type::Array(array) => Ok(format!("Vec<{}>", type_identity(&array.elem)?)),
        Type::Slice(slice) => Ok(format!("Vec<{}>", type_identity(&slice.elem)?)),
        _ => Err(Error::new_spanned(
            ty,
            "Layout derive cannot describe this field type; mark it #[prefab(skip)]",
        )),
    }
}

/// Parse `#[prefab(identity = "...", extends = "...")]` on the type
fn parse_container_attributes(attrs: &[Attribute]) -> Result<ContainerOptions> {
    let mut options = ContainerOptions::default();
    for attr in attrs {
        if !attr.path().is_ident("prefab") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("identity") {
                let value: LitStr = meta.value()?.parse()?;
                options.identity = Some(value.value());
                Ok(())
            } else if meta.path.is_ident("extends") {
                let value: LitStr = meta.value()?.parse()?;
                options.extends = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("unknown prefab attribute; expected `identity` or `extends`"))
            }
        })?;
    }
    Ok(options)
}

/// Whether a field carries `#[prefab(skip)]`
fn is_skipped(attrs: &[Attribute]) -> Result<bool> {
    let mut skip = false;
    for attr in attrs {
        if !attr.path().is_ident("prefab") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                skip = true;
                Ok(())
            } else {
                Err(meta.error("unknown prefab field attribute; expected `skip`"))
            }
        })?;
    }
    Ok(skip)
}

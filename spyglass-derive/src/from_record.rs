//! Implementation of `#[derive(FromRecord)]`

use proc_macro2::TokenStream;
use quote::quote;
use syn::parse::Parser;
use syn::{
    Attribute, Data, DeriveInput, Error, Expr, ExprLit, Field, Fields, Lit, Meta, MetaNameValue,
    Result, parse_macro_input,
};

/// Main entry point for the FromRecord derive macro
pub fn derive_from_record_impl(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match generate_from_record_impl(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn generate_from_record_impl(input: &DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data_struct) => match &data_struct.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(Error::new_spanned(
                    &data_struct.fields,
                    "FromRecord derive requires a struct with named fields",
                ));
            }
        },
        Data::Enum(_) | Data::Union(_) => {
            return Err(Error::new_spanned(
                input,
                "FromRecord derive is only supported for structs",
            ));
        }
    };

    let takes = fields
        .iter()
        .map(field_take)
        .collect::<Result<Vec<_>>>()?;

    Ok(quote! {
        impl #impl_generics ::spyglass::FromRecord for #name #ty_generics #where_clause {
            fn from_record(
                mut record: ::spyglass::Record,
            ) -> ::std::result::Result<Self, ::spyglass::RecordError> {
                ::std::result::Result::Ok(Self {
                    #(#takes,)*
                })
            }
        }
    })
}

/// `field: record.take::<Type>("key")?`
fn field_take(field: &Field) -> Result<TokenStream> {
    let ident = field
        .ident
        .as_ref()
        .ok_or_else(|| Error::new_spanned(field, "expected a named field"))?;
    let ty = &field.ty;
    let key = match record_key(&field.attrs)? {
        Some(key) => key,
        None => ident.to_string().trim_start_matches("r#").to_string(),
    };
    Ok(quote! {
        #ident: record.take::<#ty>(#key)?
    })
}

/// The key given by `#[record(rename = "...")]`, if any
fn record_key(attrs: &[Attribute]) -> Result<Option<String>> {
    let mut key = None;
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("record")) {
        let list = attr.meta.require_list()?;
        let parser = syn::punctuated::Punctuated::<Meta, syn::Token![,]>::parse_terminated;
        for meta in parser.parse2(list.tokens.clone())? {
            match meta {
                Meta::NameValue(MetaNameValue { path, value, .. }) if path.is_ident("rename") => {
                    if key.is_some() {
                        return Err(Error::new_spanned(path, "duplicate `rename` attribute"));
                    }
                    key = Some(string_literal(&value)?);
                }
                other => {
                    return Err(Error::new_spanned(
                        other,
                        "unsupported record attribute, expected `rename = \"key\"`",
                    ));
                }
            }
        }
    }
    Ok(key)
}

fn string_literal(value: &Expr) -> Result<String> {
    match value {
        Expr::Lit(ExprLit {
            lit: Lit::Str(lit_str),
            ..
        }) => Ok(lit_str.value()),
        _ => Err(Error::new_spanned(value, "rename expects a string literal")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn test_record_key_from_rename() {
        let field: Field = parse_quote! {
            #[record(rename = "fooInputs")]
            foo_inputs: Vec<i64>
        };
        assert_eq!(record_key(&field.attrs).unwrap(), Some("fooInputs".to_string()));
    }

    #[test]
    fn test_record_key_defaults_to_none() {
        let field: Field = parse_quote! {
            #[doc = "plain"]
            foo: u8
        };
        assert_eq!(record_key(&field.attrs).unwrap(), None);
    }

    #[test]
    fn test_unknown_attribute_rejected() {
        let field: Field = parse_quote! {
            #[record(skip)]
            foo: u8
        };
        assert!(record_key(&field.attrs).is_err());
    }

    #[test]
    fn test_tuple_struct_rejected() {
        let input: DeriveInput = parse_quote! {
            struct Pair(u8, u8);
        };
        let err = generate_from_record_impl(&input).unwrap_err();
        assert!(err.to_string().contains("named fields"));
    }

    #[test]
    fn test_enum_rejected() {
        let input: DeriveInput = parse_quote! {
            enum Choice { A, B }
        };
        assert!(generate_from_record_impl(&input).is_err());
    }

    #[test]
    fn test_generated_impl_takes_each_field() {
        let input: DeriveInput = parse_quote! {
            struct Log {
                foo: u8,
                #[record(rename = "bazz")]
                baz: String,
            }
        };
        let tokens = generate_from_record_impl(&input).unwrap().to_string();
        assert!(tokens.contains("\"foo\""));
        assert!(tokens.contains("\"bazz\""));
        assert!(!tokens.contains("\"baz\""));
    }
}

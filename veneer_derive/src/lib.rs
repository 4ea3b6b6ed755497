use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Attribute, Data, DeriveInput, Fields, Ident, LitStr, Type, parse_macro_input, spanned::Spanned};

/// Generates `veneer::Attributes` for a struct with named fields.
///
/// Field options, written as `#[veneer(...)]`:
/// - `skip`: not an attribute (connections, error collections, ...)
/// - `rename = "name"`: expose the field under another name
/// - `readonly`: readable, but writes fail with `ReadOnlyAttribute`
#[proc_macro_derive(Attributes, attributes(veneer))]
pub fn derive_attributes(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand_attributes(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// Generates `veneer::Model` naming the struct after itself, or after
/// `#[veneer(model_name = "...")]` when given.
#[proc_macro_derive(Model, attributes(veneer))]
pub fn derive_model(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand_model(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

struct AttributeField {
    ident: Ident,
    ty: Type,
    name: String,
    readonly: bool,
}

#[derive(Default)]
struct FieldOptions {
    skip: bool,
    readonly: bool,
    rename: Option<String>,
}

fn expand_attributes(input: DeriveInput) -> syn::Result<TokenStream2> {
    let struct_name = &input.ident;
    let model_label = struct_name.to_string();
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let data_struct = match &input.data {
        Data::Struct(data) => data,
        _ => {
            return Err(syn::Error::new(
                struct_name.span(),
                "Attributes can only be derived for structs",
            ));
        }
    };

    let named_fields = match &data_struct.fields {
        Fields::Named(fields) => fields,
        _ => {
            return Err(syn::Error::new(
                struct_name.span(),
                "Attributes requires named fields",
            ));
        }
    };

    let mut fields = Vec::<AttributeField>::new();
    for field in &named_fields.named {
        let ident = field.ident.clone().ok_or_else(|| {
            syn::Error::new(field.span(), "Attributes requires named fields")
        })?;
        let options = parse_field_options(&field.attrs)?;
        if options.skip {
            continue;
        }
        let name = options.rename.unwrap_or_else(|| {
            ident
                .to_string()
                .trim_start_matches("r#")
                .to_string()
        });
        if fields.iter().any(|existing| existing.name == name) {
            return Err(syn::Error::new(
                field.span(),
                format!("duplicate attribute name '{}'", name),
            ));
        }
        fields.push(AttributeField {
            ident,
            ty: field.ty.clone(),
            name,
            readonly: options.readonly,
        });
    }

    let names = fields.iter().map(|field| &field.name).collect::<Vec<_>>();

    let read_arms = fields.iter().map(|field| {
        let ident = &field.ident;
        let name = &field.name;
        quote! {
            #name => ::veneer::ToValue::to_value(&self.#ident),
        }
    });

    let write_arms = fields.iter().map(|field| {
        let ident = &field.ident;
        let ty = &field.ty;
        let name = &field.name;
        if field.readonly {
            quote! {
                #name => ::core::result::Result::Err(
                    ::veneer::VeneerError::read_only_attribute(#name, #model_label),
                ),
            }
        } else {
            quote! {
                #name => {
                    self.#ident = <#ty as ::veneer::FromValue>::from_value(value)?;
                    ::core::result::Result::Ok(())
                }
            }
        }
    });

    Ok(quote! {
        impl #impl_generics ::veneer::Attributes for #struct_name #ty_generics #where_clause {
            fn attribute_names(&self) -> ::std::vec::Vec<::std::string::String> {
                ::std::vec![#(::std::string::String::from(#names)),*]
            }

            fn read_attribute(&self, name: &str) -> ::veneer::Result<::veneer::Value> {
                match name {
                    #(#read_arms)*
                    _ => ::core::result::Result::Err(
                        ::veneer::VeneerError::unknown_attribute(name, #model_label),
                    ),
                }
            }

            #[allow(unused_variables)]
            fn write_attribute(
                &mut self,
                name: &str,
                value: ::veneer::Value,
            ) -> ::veneer::Result<()> {
                match name {
                    #(#write_arms)*
                    _ => ::core::result::Result::Err(
                        ::veneer::VeneerError::unknown_attribute(name, #model_label),
                    ),
                }
            }
        }
    })
}

fn expand_model(input: DeriveInput) -> syn::Result<TokenStream2> {
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let model_name = parse_model_name(&input.attrs)?.unwrap_or_else(|| struct_name.to_string());

    Ok(quote! {
        impl #impl_generics ::veneer::Model for #struct_name #ty_generics #where_clause {
            fn model_name() -> ::veneer::ModelName {
                ::veneer::ModelName::new(#model_name)
            }
        }
    })
}

fn parse_field_options(attrs: &[Attribute]) -> syn::Result<FieldOptions> {
    let mut options = FieldOptions::default();
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("veneer")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                options.skip = true;
                Ok(())
            } else if meta.path.is_ident("readonly") {
                options.readonly = true;
                Ok(())
            } else if meta.path.is_ident("rename") {
                let value: LitStr = meta.value()?.parse()?;
                options.rename = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("unsupported #[veneer] field option; expected skip, readonly or rename"))
            }
        })?;
    }
    if options.skip && (options.readonly || options.rename.is_some()) {
        return Err(syn::Error::new(
            proc_macro2::Span::call_site(),
            "#[veneer(skip)] cannot be combined with other options",
        ));
    }
    Ok(options)
}

fn parse_model_name(attrs: &[Attribute]) -> syn::Result<Option<String>> {
    let mut model_name = None;
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("veneer")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("model_name") {
                let value: LitStr = meta.value()?.parse()?;
                model_name = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("unsupported #[veneer] struct option; expected model_name"))
            }
        })?;
    }
    Ok(model_name)
}

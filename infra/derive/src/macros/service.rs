use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{Error, ItemStruct, LitStr};

pub fn expand_service(args: TokenStream, input: ItemStruct) -> TokenStream {
    let registry_name = match parse_name(args, &input) {
        Ok(name) => name,
        Err(err) => return err.to_compile_error(),
    };

    let wrapper_ident = &input.ident;
    let vis = &input.vis;
    let fields = &input.fields;
    let attrs = &input.attrs;
    let inner_ident = format_ident!("{wrapper_ident}Inner");
    let semicolon = matches!(fields, syn::Fields::Unnamed(_) | syn::Fields::Unit).then(|| quote!(;));

    quote! {
        #(#attrs)*
        #[derive(Debug)]
        #vis struct #inner_ident #fields #semicolon

        #[derive(Debug, Clone)]
        #vis struct #wrapper_ident {
            inner: std::sync::Arc<#inner_ident>,
        }

        impl #wrapper_ident {
            /// Name under which the presentation layer resolves this service.
            pub const REGISTRY_NAME: &'static str = #registry_name;

            #[must_use]
            pub fn new(inner: #inner_ident) -> Self {
                Self { inner: std::sync::Arc::new(inner) }
            }
        }

        impl std::ops::Deref for #wrapper_ident {
            type Target = #inner_ident;
            fn deref(&self) -> &Self::Target {
                &self.inner
            }
        }

        impl ::aegis_kernel::domain::registry::Singleton for #wrapper_ident {
            fn registry_name(&self) -> &'static str {
                Self::REGISTRY_NAME
            }

            fn as_any(&self) -> &dyn std::any::Any {
                self
            }
        }
    }
}

fn parse_name(args: TokenStream, input: &ItemStruct) -> syn::Result<String> {
    if args.is_empty() {
        return Ok(input.ident.to_string());
    }

    let mut name = None;
    let parser = syn::meta::parser(|meta| {
        if meta.path.is_ident("name") {
            let value: LitStr = meta.value()?.parse()?;
            if value.value().trim().is_empty() {
                return Err(Error::new_spanned(value, "service name cannot be empty"));
            }
            name = Some(value.value());
            Ok(())
        } else {
            Err(meta.error("unsupported service argument, expected `name = \"...\"`"))
        }
    });
    syn::parse::Parser::parse2(parser, args)?;

    Ok(name.unwrap_or_else(|| input.ident.to_string()))
}

use fxhash::FxHashSet;
use proc_macro2::TokenStream;
use quote::{ToTokens, format_ident, quote};
use syn::{Attribute, Data, DeriveInput, Field, Fields, Ident, Type, Variant};

/// Name of the fallback variant that receives `From<&str>` / `From<String>`.
const INTERNAL: &str = "Internal";

/// One parsed variant of an error enum.
struct ErrorVariant<'a> {
    ident: &'a Ident,
    /// Upstream error field, if the variant wraps one.
    source: Option<(&'a Ident, &'a Type)>,
    has_context: bool,
    cfg_attrs: Vec<&'a Attribute>,
}

impl ErrorVariant<'_> {
    fn is_internal(&self) -> bool {
        self.ident == INTERNAL
    }

    fn kind(&self) -> String {
        snake_case(&self.ident.to_string())
    }
}

/// An error enum together with the names of the items generated for it.
struct ErrorEnum<'a> {
    input: &'a DeriveInput,
    ext_trait: Ident,
    variants: Vec<ErrorVariant<'a>>,
}

impl<'a> ErrorEnum<'a> {
    fn parse(input: &'a DeriveInput) -> syn::Result<Self> {
        let Data::Enum(data) = &input.data else {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "candor_error can only be applied to enums",
            ));
        };

        let variants = data.variants.iter().map(parse_variant).collect::<syn::Result<Vec<_>>>()?;
        check_sources(&variants)?;

        Ok(Self { input, ext_trait: format_ident!("{}Ext", input.ident), variants })
    }

    fn name(&self) -> &Ident {
        &self.input.ident
    }

    /// `Debug` and `thiserror::Error`, unless the user already derives them.
    fn missing_derives(&self) -> TokenStream {
        let present = derived_traits(&self.input.attrs);
        let mut derives = Vec::new();
        if !present.contains("Debug") {
            derives.push(quote! { Debug });
        }
        if !present.contains("Error") {
            derives.push(quote! { ::thiserror::Error });
        }

        if derives.is_empty() { quote! {} } else { quote! { #[derive(#(#derives),*)] } }
    }

    fn ext_trait(&self) -> TokenStream {
        let name = self.name();
        let ext = &self.ext_trait;
        let arms = self.variants.iter().filter(|v| v.has_context).map(|v| {
            let (cfg, ident) = (&v.cfg_attrs, v.ident);
            quote! { #(#cfg)* #name::#ident { context: slot, .. } => *slot = Some(context.into()), }
        });

        quote! {
            pub trait #ext<T> {
                fn context(self, context: impl Into<std::borrow::Cow<'static, str>>) -> Result<T, #name>;
            }

            #[automatically_derived]
            impl<T> #ext<T> for Result<T, #name> {
                #[inline]
                fn context(self, context: impl Into<std::borrow::Cow<'static, str>>) -> Self {
                    self.map_err(|mut err| {
                        match &mut err {
                            #( #arms )*
                            #[allow(unreachable_patterns)]
                            _ => {}
                        }
                        err
                    })
                }
            }
        }
    }

    /// `From<Source>` plus `.context()` on `Result<T, Source>` for each wrapping variant.
    fn source_conversions(&self) -> TokenStream {
        let name = self.name();
        let ext = &self.ext_trait;

        let impls = self.variants.iter().filter(|v| !v.is_internal()).filter_map(|v| {
            let (field, ty) = v.source?;
            let (cfg, ident) = (&v.cfg_attrs, v.ident);
            Some(quote! {
                #(#cfg)*
                #[automatically_derived]
                impl From<#ty> for #name {
                    #[inline]
                    fn from(#field: #ty) -> Self { Self::#ident { #field, context: None } }
                }

                #(#cfg)*
                impl<T> #ext<T> for std::result::Result<T, #ty> {
                    #[inline]
                    fn context(self, context: impl Into<std::borrow::Cow<'static, str>>) -> std::result::Result<T, #name> {
                        self.map_err(|#field| #name::#ident { #field, context: Some(context.into()) })
                    }
                }
            })
        });

        quote! { #(#impls)* }
    }

    fn internal_conversions(&self) -> TokenStream {
        let Some(internal) = self.variants.iter().find(|v| v.is_internal()) else {
            return quote! {};
        };
        let name = self.name();
        let cfg = &internal.cfg_attrs;

        quote! {
            #(#cfg)*
            impl From<&'static str> for #name {
                #[inline]
                fn from(s: &'static str) -> Self { Self::Internal { message: std::borrow::Cow::Borrowed(s), context: None } }
            }
            #(#cfg)*
            impl From<String> for #name {
                #[inline]
                fn from(s: String) -> Self { Self::Internal { message: std::borrow::Cow::Owned(s), context: None } }
            }
        }
    }

    fn kind_fn(&self) -> TokenStream {
        let name = self.name();
        let arms = self.variants.iter().map(|v| {
            let (cfg, ident, kind) = (&v.cfg_attrs, v.ident, v.kind());
            quote! { #(#cfg)* Self::#ident { .. } => #kind, }
        });

        quote! {
            #[automatically_derived]
            impl #name {
                /// Stable `snake_case` name of the variant, for structured log fields.
                #[must_use]
                pub const fn kind(&self) -> &'static str {
                    match self {
                        #( #arms )*
                    }
                }
            }
        }
    }

    fn expand(&self) -> TokenStream {
        let input = self.input;
        let derives = self.missing_derives();
        let ext_trait = self.ext_trait();
        let sources = self.source_conversions();
        let internal = self.internal_conversions();
        let kind = self.kind_fn();

        quote! {
            #[allow(non_shorthand_field_patterns)]
            #derives
            #input

            #ext_trait
            #sources
            #internal
            #kind

            #[allow(dead_code)]
            fn format_context(context: &Option<std::borrow::Cow<'static, str>>) -> std::borrow::Cow<'static, str> {
                context.as_ref().map_or(std::borrow::Cow::Borrowed(""), |c| std::borrow::Cow::Owned(format!(" ({c})")))
            }
        }
    }
}

pub fn expand_derive(input: DeriveInput) -> TokenStream {
    ErrorEnum::parse(&input).map_or_else(syn::Error::into_compile_error, |model| model.expand())
}

fn parse_variant(variant: &Variant) -> syn::Result<ErrorVariant<'_>> {
    let Fields::Named(fields) = &variant.fields else {
        return Err(syn::Error::new_spanned(
            variant,
            "candor_error requires named fields for source/context handling",
        ));
    };

    let mut has_context = false;
    let mut source = None;
    for field in &fields.named {
        let Some(ident) = &field.ident else { continue };

        if ident == "context" {
            if !is_context_type(&field.ty) {
                return Err(syn::Error::new_spanned(
                    &field.ty,
                    "context field must be Option<Cow<'static, str>>",
                ));
            }
            has_context = true;
        } else if source.is_none() && is_source_field(ident, field) {
            source = Some((ident, &field.ty));
        }
    }

    if source.is_some() && !has_context {
        return Err(syn::Error::new_spanned(
            &variant.ident,
            "candor_error requires `context: Option<Cow<'static, str>>` for variants with a source",
        ));
    }

    let cfg_attrs = variant.attrs.iter().filter(|attr| attr.path().is_ident("cfg")).collect();
    Ok(ErrorVariant { ident: &variant.ident, source, has_context, cfg_attrs })
}

fn is_source_field(ident: &Ident, field: &Field) -> bool {
    ident == "source" || field.attrs.iter().any(|a| a.path().is_ident("source") || a.path().is_ident("from"))
}

/// Two variants wrapping the same type would produce conflicting `From` impls.
fn check_sources(variants: &[ErrorVariant<'_>]) -> syn::Result<()> {
    let mut seen = FxHashSet::default();
    for variant in variants.iter().filter(|v| !v.is_internal()) {
        let Some((_, ty)) = variant.source else { continue };
        if !seen.insert(compact(ty)) {
            return Err(syn::Error::new_spanned(
                ty,
                "candor_error: this source type is already wrapped by another variant",
            ));
        }
    }
    Ok(())
}

fn derived_traits(attrs: &[Attribute]) -> FxHashSet<String> {
    let mut traits = FxHashSet::default();

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("derive")) {
        let _ = attr.parse_nested_meta(|meta| {
            if let Some(last) = meta.path.segments.last() {
                traits.insert(last.ident.to_string());
            }
            Ok(())
        });
    }

    traits
}

/// Accepts `Option<Cow<'static, str>>` with any path prefix on `Option` and `Cow`.
fn is_context_type(ty: &Type) -> bool {
    let text = compact(ty);
    let Some(inner) = text.strip_suffix('>') else {
        return false;
    };
    let inner = ["std::option::Option<", "core::option::Option<", "Option<"]
        .iter()
        .find_map(|prefix| inner.strip_prefix(prefix));

    inner.is_some_and(|cow| {
        ["std::borrow::Cow", "alloc::borrow::Cow", "Cow"]
            .iter()
            .any(|path| cow.strip_prefix(path) == Some("<'static,str>"))
    })
}

/// Token text of `ty` without whitespace, e.g. `Option<Cow<'static,str>>`.
fn compact(ty: &Type) -> String {
    ty.to_token_stream().to_string().split_whitespace().collect()
}

fn snake_case(ident: &str) -> String {
    let mut out = String::with_capacity(ident.len() + 4);
    for (i, ch) in ident.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

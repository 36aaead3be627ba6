use itertools::Itertools;
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{quote, ToTokens};
use syn::spanned::Spanned;
use syn::visit::{self, Visit};
use syn::{
    parse_macro_input, parse_quote, FnArg, Ident, ItemFn, Lifetime, Pat, ReturnType, Signature,
    Type, TypeBareFn, TypeReference,
};

/// Turns an `fn` into a constructor of an `arity_curry::Curried`, with the
/// arity read from the signature. Every argument must have the same type.
///
/// `#[curried(truncate)]` drops surplus arguments instead of failing on them.
/// Supports generics, named lifetimes, `self` and `&self`.
#[proc_macro_attribute]
pub fn curried(attr: TokenStream, item: TokenStream) -> TokenStream {
    let parsed = parse_macro_input!(item as ItemFn);
    match generate_curry(attr.into(), parsed) {
        Ok(gen) => gen,
        Err(err) => err.to_compile_error(),
    }
    .into()
}

fn generate_curry(attr: TokenStream2, parsed: ItemFn) -> syn::Result<TokenStream2> {
    let excess = parse_excess(attr)?;

    let ItemFn {
        attrs,
        vis: visibility,
        sig,
        block,
    } = parsed;

    if let Some(variadic) = &sig.variadic {
        return Err(syn::Error::new_spanned(variadic, VARIADIC));
    }
    if let Some(asyncness) = &sig.asyncness {
        return Err(syn::Error::new_spanned(asyncness, NOT_ASYNC));
    }
    if let Some(constness) = &sig.constness {
        return Err(syn::Error::new_spanned(constness, NOT_CONST));
    }
    if let Some(unsafety) = &sig.unsafety {
        return Err(syn::Error::new_spanned(unsafety, NOT_UNSAFE));
    }

    let Signature {
        mut generics,
        output,
        ident: fn_name,
        inputs,
        ..
    } = sig;

    let mut receiver = None;
    let mut parameters = Vec::new();
    for argument in inputs {
        match argument {
            FnArg::Receiver(self_receiver) => {
                if self_receiver.mutability.is_some() {
                    return Err(syn::Error::new_spanned(self_receiver, IMMUTABLE_RECEIVER));
                }
                receiver = Some(self_receiver);
            }
            FnArg::Typed(typed_argument) => {
                if matches!(&*typed_argument.pat, Pat::Ident(pat) if pat.ident == "self") {
                    return Err(syn::Error::new_spanned(typed_argument, TYPED_RECEIVER));
                }
                parameters.push(typed_argument)
            }
        }
    }

    let output_type = match &output {
        ReturnType::Default => None,
        ReturnType::Type(_, output_type) => Some(&**output_type),
    };
    let elided = parameters
        .iter()
        .map(|parameter| &*parameter.ty)
        .chain(output_type)
        .find_map(elided_lifetime);
    if let Some(span) = elided {
        return Err(syn::Error::new(span, NEEDS_LIFETIME));
    }

    if !parameters
        .iter()
        .map(|parameter| parameter.ty.to_token_stream().to_string())
        .all_equal()
    {
        return Err(syn::Error::new_spanned(&parameters[1].ty, SINGLE_ARGUMENT_TYPE));
    }
    let argument_type = match parameters.first() {
        Some(parameter) => parameter.ty.to_token_stream(),
        None => quote!(()),
    };

    // The closure outlives the call that builds it, so everything it captures
    // must too.
    for type_param in generics.type_params_mut() {
        type_param.bounds.push(parse_quote!('static));
    }
    let lifetime = match &receiver {
        Some(self_receiver) if self_receiver.reference.is_some() => quote!('_),
        Some(_) => {
            generics
                .make_where_clause()
                .predicates
                .push(parse_quote!(Self: 'static));
            quote!('static)
        }
        None => quote!('static),
    };
    let where_clause = &generics.where_clause;

    let (output_type, closure_output) = match output {
        ReturnType::Default => (quote!(()), quote!()),
        ReturnType::Type(arrow, output_type) => {
            (output_type.to_token_stream(), quote!(#arrow #output_type))
        }
    };

    let with_excess = excess.map(|excess| quote!(.with_excess(::arity_curry::Excess::#excess)));

    Ok(quote! {
        #(#attrs)*
        #visibility fn #fn_name #generics (#receiver) -> ::arity_curry::Curried<#lifetime, #argument_type, #output_type> #where_clause {
            ::arity_curry::Curried::fixed(move |#(#parameters),*| #closure_output #block)
                #with_excess
        }
    })
}

/// Span of the first reference or `'_` in `ty` whose lifetime the generated
/// constructor would have nothing to tie to.
fn elided_lifetime(ty: &Type) -> Option<proc_macro2::Span> {
    struct Elided(Option<proc_macro2::Span>);

    impl<'ast> Visit<'ast> for Elided {
        fn visit_type_reference(&mut self, reference: &'ast TypeReference) {
            if reference.lifetime.is_none() && self.0.is_none() {
                self.0 = Some(reference.span());
            }
            visit::visit_type_reference(self, reference);
        }

        fn visit_lifetime(&mut self, lifetime: &'ast Lifetime) {
            if lifetime.ident == "_" && self.0.is_none() {
                self.0 = Some(lifetime.span());
            }
        }

        // Elision inside `fn(&T)` is higher-ranked and fine.
        fn visit_type_bare_fn(&mut self, _: &'ast TypeBareFn) {}

        fn visit_parenthesized_generic_arguments(
            &mut self,
            _: &'ast syn::ParenthesizedGenericArguments,
        ) {
        }
    }

    let mut elided = Elided(None);
    elided.visit_type(ty);
    elided.0
}

fn parse_excess(attr: TokenStream2) -> syn::Result<Option<Ident>> {
    if attr.is_empty() {
        return Ok(None);
    }
    let policy: Ident = syn::parse2(attr)?;
    if policy != "truncate" {
        return Err(syn::Error::new_spanned(policy, UNKNOWN_OPTION));
    }
    Ok(Some(Ident::new("Truncate", policy.span())))
}

const VARIADIC: &str = "Cannot curry a variadic function: its arity is not fixed";
const NOT_ASYNC: &str = "Cannot curry an `async` function";
const NOT_CONST: &str = "Cannot curry a `const` function";
const NOT_UNSAFE: &str = "Cannot curry an `unsafe` function";
const TYPED_RECEIVER: &str = "Curried methods take `self` or `&self`, not a typed `self` receiver";
const NEEDS_LIFETIME: &str = "Curried functions need explicit lifetimes on references";
const IMMUTABLE_RECEIVER: &str = "Curried methods take `self` or `&self`, not a mutable receiver";
const SINGLE_ARGUMENT_TYPE: &str = "All arguments of a curried function must have the same type";
const UNKNOWN_OPTION: &str = "Expected `truncate` or no option";

#[cfg(test)]
mod tests {
    use super::*;

    fn test_curry_with(attr: &str, input: &str, output: &str) {
        let parsed: ItemFn = syn::parse_str(input).unwrap();
        let generated = generate_curry(attr.parse().unwrap(), parsed).unwrap();
        // Compared as syntax trees, so token spacing does not matter.
        let generated: ItemFn = syn::parse2(generated).unwrap();
        let expected: ItemFn = syn::parse_str(output).unwrap();
        assert_eq!(generated, expected)
    }

    fn test_curry(input: &str, output: &str) {
        test_curry_with("", input, output)
    }

    fn curry_error(attr: &str, input: &str) -> String {
        let parsed: ItemFn = syn::parse_str(input).unwrap();
        generate_curry(attr.parse().unwrap(), parsed)
            .unwrap_err()
            .to_string()
    }

    #[test]
    fn long_add() {
        test_curry(
            "
                pub fn add(a: i32, b: i32, c: i32, d: i32, e: i32) -> i32 {
                    a + b + c + d + e
                }
            ",
            "
                pub fn add() -> ::arity_curry::Curried<'static, i32, i32> {
                    ::arity_curry::Curried::fixed(move |a: i32, b: i32, c: i32, d: i32, e: i32| -> i32 {
                        a + b + c + d + e
                    })
                }
            ",
        )
    }

    #[test]
    fn with_generics() {
        test_curry(
            r#"
                fn generic<T: std::fmt::Display>(x: T, y: T, z: T) {
                    println!("{x}");
                    println!("{y}");
                    println!("{z}");
                }
            "#,
            r#"
                fn generic<T: std::fmt::Display + 'static>() -> ::arity_curry::Curried<'static, T, ()> {
                    ::arity_curry::Curried::fixed(move |x: T, y: T, z: T| {
                        println!("{x}");
                        println!("{y}");
                        println!("{z}");
                    })
                }
            "#,
        )
    }

    #[test]
    fn by_reference_receiver() {
        test_curry(
            "
                fn add_with(&self, d: i32, e: i32) -> i32 {
                    self.a + d + e
                }
            ",
            "
                fn add_with(&self) -> ::arity_curry::Curried<'_, i32, i32> {
                    ::arity_curry::Curried::fixed(move |d: i32, e: i32| -> i32 {
                        self.a + d + e
                    })
                }
            ",
        )
    }

    #[test]
    fn by_value_receiver() {
        test_curry(
            "
                fn add_with(self, d: i32) -> i32 {
                    self.a + d
                }
            ",
            "
                fn add_with(self) -> ::arity_curry::Curried<'static, i32, i32> where Self: 'static {
                    ::arity_curry::Curried::fixed(move |d: i32| -> i32 {
                        self.a + d
                    })
                }
            ",
        )
    }

    #[test]
    fn without_arguments() {
        test_curry(
            "
                fn answer() -> u8 { 42 }
            ",
            "
                fn answer() -> ::arity_curry::Curried<'static, (), u8> {
                    ::arity_curry::Curried::fixed(move || -> u8 { 42 })
                }
            ",
        )
    }

    #[test]
    fn truncating() {
        test_curry_with(
            "truncate",
            "
                fn add(a: u8, b: u8) -> u8 { a + b }
            ",
            "
                fn add() -> ::arity_curry::Curried<'static, u8, u8> {
                    ::arity_curry::Curried::fixed(move |a: u8, b: u8| -> u8 { a + b })
                        .with_excess(::arity_curry::Excess::Truncate)
                }
            ",
        )
    }

    #[test]
    fn rejected_signatures() {
        assert_eq!(
            curry_error("", "fn mixed(a: i32, b: u8) -> i32 { a }"),
            SINGLE_ARGUMENT_TYPE
        );
        assert_eq!(
            curry_error("", "fn bump(&mut self, a: i32) { self.a += a }"),
            IMMUTABLE_RECEIVER
        );
        assert_eq!(
            curry_error("", "async fn later(a: i32) -> i32 { a }"),
            NOT_ASYNC
        );
        assert_eq!(
            curry_error("", "const fn early(a: i32) -> i32 { a }"),
            NOT_CONST
        );
        assert_eq!(
            curry_error("loose", "fn add(a: i32) -> i32 { a }"),
            UNKNOWN_OPTION
        );
        assert_eq!(
            curry_error("", "unsafe fn raw(a: i32) -> i32 { a }"),
            NOT_UNSAFE
        );
        assert_eq!(
            curry_error("", "fn boxed(self: Box<Self>, a: i32) -> i32 { a }"),
            TYPED_RECEIVER
        );
    }

    #[test]
    fn elided_lifetimes_are_rejected() {
        assert_eq!(
            curry_error("", "fn count(a: &str, b: &str) -> usize { a.len() + b.len() }"),
            NEEDS_LIFETIME
        );
        assert_eq!(
            curry_error("", "fn first(a: Cow<'_, str>, b: Cow<'_, str>) -> usize { a.len() }"),
            NEEDS_LIFETIME
        );
        assert_eq!(
            curry_error("", "fn first<'a>(a: &'a str, b: &'a str) -> &str { a }"),
            NEEDS_LIFETIME
        );
        assert_eq!(
            curry_error("", "fn first(a: Vec<&u8>) -> u8 { *a[0] }"),
            NEEDS_LIFETIME
        );
    }

    #[test]
    fn named_lifetimes() {
        test_curry(
            "
                fn longest<'a>(a: &'a str, b: &'a str) -> &'a str {
                    if a.len() >= b.len() { a } else { b }
                }
            ",
            "
                fn longest<'a>() -> ::arity_curry::Curried<'static, &'a str, &'a str> {
                    ::arity_curry::Curried::fixed(move |a: &'a str, b: &'a str| -> &'a str {
                        if a.len() >= b.len() { a } else { b }
                    })
                }
            ",
        )
    }

    #[test]
    fn higher_ranked_elision_is_accepted() {
        test_curry(
            "
                fn apply(f: fn(&str) -> usize, g: fn(&str) -> usize) -> usize { f(\"a\") + g(\"b\") }
            ",
            "
                fn apply() -> ::arity_curry::Curried<'static, fn(&str) -> usize, usize> {
                    ::arity_curry::Curried::fixed(move |f: fn(&str) -> usize, g: fn(&str) -> usize| -> usize {
                        f(\"a\") + g(\"b\")
                    })
                }
            ",
        )
    }

    #[test]
    fn variadic_is_rejected() {
        let parsed: ItemFn = parse_quote! {
            unsafe extern "C" fn printf(format: i32, ...) -> i32 { 0 }
        };
        assert_eq!(
            generate_curry(TokenStream2::new(), parsed)
                .unwrap_err()
                .to_string(),
            VARIADIC
        );
    }
}

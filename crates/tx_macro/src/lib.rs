extern crate proc_macro;

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, FnArg, ItemFn, PatType, Receiver};

/// Wraps an async service method in a MongoDB transaction over its `session`
/// argument: the body runs between `start_transaction` and
/// `commit_transaction`, and any error aborts the whole batch.
#[proc_macro_attribute]
pub fn tx(_args: TokenStream, input: TokenStream) -> TokenStream {
    let input_fn = parse_macro_input!(input as ItemFn);
    let vis = &input_fn.vis;
    let body = &input_fn.block;
    let fn_name = &input_fn.sig.ident;
    let fn_args = &input_fn.sig.inputs;
    let fn_return = &input_fn.sig.output;

    let forwarded: Vec<_> = fn_args
        .iter()
        .map(|arg| match arg {
            FnArg::Typed(PatType { pat, .. }) => quote! { #pat },
            // `self` is already the right reference for the inner call
            FnArg::Receiver(Receiver { .. }) => quote!(self),
        })
        .collect();

    let body_fn_name = quote::format_ident!("{}_inner", fn_name);
    let gen = quote! {
        #vis async fn #body_fn_name(#fn_args) #fn_return {
            #body
        }

        #vis async fn #fn_name(#fn_args) #fn_return {
            session.start_transaction().await?;
            match Self::#body_fn_name(#(#forwarded),*).await {
                Ok(result) => {
                    session.commit_transaction().await?;
                    Ok(result)
                }
                Err(err) => {
                    session.abort_transaction().await?;
                    Err(err)
                }
            }
        }
    };

    TokenStream::from(gen)
}

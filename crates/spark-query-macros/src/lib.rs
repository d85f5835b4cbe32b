//! spark-query 过程宏入口。
//!
//! # 设计意图（Why）
//! - 记录类型只需在字段上声明一次 `#[query("key,opt")]`，绑定表即在编译期生成，解码引擎无需运行时反射；
//! - 注解字符串原样下发，由 `spark_query::binding` 在解码前统一校验，保证“配置错误”与“取值错误”分层上报。
//!
//! # 集成方式（How）
//! - 依赖 `spark-query` 后直接使用 `#[derive(spark_query::QueryRecord)]`；
//! - 生成代码通过绝对路径 `::spark_query` 引用运行时类型，调用方无需额外重命名。

use proc_macro::TokenStream;
use quote::quote;
use syn::{
    Attribute, Data, DeriveInput, Error, Expr, ExprLit, Fields, Index, Lit, LitStr, Meta,
    parse_macro_input, spanned::Spanned,
};

const ATTR_NAME: &str = "query";

/// 为结构体派生 `spark_query::QueryTarget`，生成字段绑定表。
///
/// # 语义说明（What）
/// - `#[query("key")]` / `#[query("key,opt1,opt2")]` / `#[query = "key"]`：声明绑定注解；
/// - `#[query(skip)]`：字段不可设置，解码时整体跳过；
/// - 未声明注解的字段绑定到空键，解码时按“未提供取值”处理；
/// - 仅支持具名或元组结构体，枚举与联合体直接产生编译期诊断。
#[proc_macro_derive(QueryRecord, attributes(query))]
pub fn derive_query_record(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    expand_record(input)
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}

/// 字段上解析出的注解形态。
enum FieldAttr {
    Tagged(LitStr),
    Skip,
    Absent,
}

fn expand_record(input: DeriveInput) -> Result<proc_macro2::TokenStream, Error> {
    let fields = match &input.data {
        Data::Struct(data) => &data.fields,
        Data::Enum(data) => {
            return Err(Error::new(
                data.enum_token.span(),
                "#[derive(QueryRecord)] 仅支持结构体，枚举无法作为解码目标",
            ));
        }
        Data::Union(data) => {
            return Err(Error::new(
                data.union_token.span(),
                "#[derive(QueryRecord)] 仅支持结构体，联合体无法作为解码目标",
            ));
        }
    };

    let ident = &input.ident;
    let record_name = ident.to_string();
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let mut slots = Vec::new();
    match fields {
        Fields::Named(named) => {
            for field in &named.named {
                let Some(field_ident) = field.ident.as_ref() else {
                    continue;
                };
                let name = field_ident.to_string();
                let access = quote!(self.#field_ident);
                slots.push(slot_tokens(&name, &field.attrs, access)?);
            }
        }
        Fields::Unnamed(unnamed) => {
            for (position, field) in unnamed.unnamed.iter().enumerate() {
                let index = Index::from(position);
                let name = position.to_string();
                let access = quote!(self.#index);
                slots.push(slot_tokens(&name, &field.attrs, access)?);
            }
        }
        Fields::Unit => {}
    }

    Ok(quote! {
        impl #impl_generics ::spark_query::QueryTarget for #ident #ty_generics #where_clause {
            fn shape(&mut self) -> ::spark_query::Shape<'_> {
                ::spark_query::Shape::Record(::spark_query::RecordFields::new(
                    #record_name,
                    ::std::vec![#(#slots),*],
                ))
            }
        }
    })
}

fn slot_tokens(
    name: &str,
    attrs: &[Attribute],
    access: proc_macro2::TokenStream,
) -> Result<proc_macro2::TokenStream, Error> {
    Ok(match field_attr(attrs)? {
        FieldAttr::Tagged(annotation) => quote! {
            ::spark_query::FieldSlot::tagged(#name, #annotation, &mut #access)
        },
        FieldAttr::Absent => quote! {
            ::spark_query::FieldSlot::untagged(#name, &mut #access)
        },
        FieldAttr::Skip => quote! {
            ::spark_query::FieldSlot::skipped(#name)
        },
    })
}

/// 提取字段上的 `#[query]` 注解；同一字段出现多次视为编译期错误。
fn field_attr(attrs: &[Attribute]) -> Result<FieldAttr, Error> {
    let mut found = FieldAttr::Absent;
    let mut seen = false;

    for attr in attrs.iter().filter(|attr| attr.path().is_ident(ATTR_NAME)) {
        if seen {
            return Err(Error::new(attr.span(), "同一字段只能声明一个 #[query] 注解"));
        }
        seen = true;

        found = match &attr.meta {
            Meta::NameValue(pair) => match &pair.value {
                Expr::Lit(ExprLit {
                    lit: Lit::Str(annotation),
                    ..
                }) => FieldAttr::Tagged(annotation.clone()),
                other => {
                    return Err(Error::new(other.span(), "#[query = ...] 需要字符串字面量"));
                }
            },
            Meta::List(list) => {
                if let Ok(annotation) = list.parse_args::<LitStr>() {
                    FieldAttr::Tagged(annotation)
                } else {
                    let flag: syn::Ident = list.parse_args().map_err(|_| {
                        Error::new(
                            list.span(),
                            "#[query(...)] 仅接受字符串注解或 skip 标记",
                        )
                    })?;
                    if flag != "skip" {
                        return Err(Error::new(flag.span(), "未知的 #[query] 标记，仅支持 skip"));
                    }
                    FieldAttr::Skip
                }
            }
            Meta::Path(path) => {
                return Err(Error::new(
                    path.span(),
                    "#[query] 需要提供注解，例如 #[query(\"key\")]",
                ));
            }
        };
    }

    Ok(found)
}

//! `spark-query`：将多值查询参数映射解码为强类型记录。
//!
//! # 定位（Why）
//! - 查询串或表单解析后的 `键 → 多个取值` 映射，按字段上的绑定注解写入业务记录；
//! - 一次解码报告全部字段错误，而不是在第一个错误处停止；
//! - 绑定表由 `#[derive(QueryRecord)]` 在编译期生成，解码器不做运行时反射。
//!
//! # 使用概览（How）
//! ```
//! use spark_query::{QueryMap, QueryRecord};
//!
//! #[derive(Default, QueryRecord)]
//! struct Search {
//!     #[query("q")]
//!     text: String,
//!     #[query("page")]
//!     page: u32,
//!     #[query("tag,repeated")]
//!     tags: Vec<String>,
//! }
//!
//! let input: QueryMap = [("q", "spark"), ("page", "2"), ("tag", "rust"), ("tag", "codec")]
//!     .into_iter()
//!     .collect();
//! let mut search = Search::default();
//! spark_query::decode(&input, &mut search)?;
//! assert_eq!(search.page, 2);
//! assert_eq!(search.tags, ["rust", "codec"]);
//! # Ok::<(), spark_query::DecodeError>(())
//! ```
//!
//! # 契约说明（What）
//! - 支持的字段类型：`i8`..`i64`/`isize`、`u8`..`u64`/`usize`、`f32`/`f64`、`String`，以及它们的 `Vec`；
//! - 致命错误（目标不是记录、注解格式错误）在写入任何字段前返回；
//! - 字段级错误聚合为 [`AggregateError`]，此时记录处于部分填充状态，成功字段保留新值。
//!
//! # 未纳入范围（Trade-offs）
//! - 查询串解析、嵌套记录、嵌套序列均不在本 crate 范围内。

pub mod binding;
mod decoder;
pub mod error;
mod field;
mod kind;
pub mod options;
mod record;
mod scalar;
mod sequence;
mod source;

pub use crate::binding::{BindingError, FieldBinding, FieldDescriptor};
pub use crate::decoder::Decoder;
pub use crate::error::{AggregateError, DecodeError, FieldError, FieldErrorKind, ParseFailure};
pub use crate::field::{FieldTarget, Scalar};
pub use crate::kind::{Decoded, FieldKind, ScalarClass, ScalarKind, ScalarValue};
pub use crate::options::{ConfigError, DecodeOptions, UnannotatedPolicy};
pub use crate::record::{FieldSlot, QueryTarget, RecordFields, Shape};
pub use crate::source::{QueryMap, QuerySource};
pub use spark_query_macros::QueryRecord;

/// 使用默认配置将 `input` 解码进 `target`。
///
/// 等价于 `Decoder::default().decode(input, target)`。
pub fn decode<S, T>(input: &S, target: &mut T) -> Result<(), DecodeError>
where
    S: QuerySource + ?Sized,
    T: QueryTarget + ?Sized,
{
    Decoder::default().decode(input, target)
}

/// 使用默认配置解析 `target` 的字段绑定。
pub fn describe<T>(target: &mut T) -> Result<Vec<FieldDescriptor>, DecodeError>
where
    T: QueryTarget + ?Sized,
{
    Decoder::default().describe(target)
}

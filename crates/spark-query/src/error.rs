//! # error 模块说明
//!
//! ## 角色定位（Why）
//! - 解码错误分两层：致命错误（目标形态不符、注解格式错误）在任何字段写入前直接返回；
//!   字段级错误逐条累积，解码结束后合并为一个 [`AggregateError`]；
//! - 字段级错误保持结构化（键名、元素位置、失败类别），调用方可按 [`FieldErrorKind`] 分支，
//!   同时 `Display` 渲染保留 `overflow` / `underflow` 等可检索词汇。
//!
//! ## 设计要求（What）
//! - 所有错误类型派生 `thiserror::Error`；
//! - 聚合错误的消息按字段处理顺序拼接，分隔符为 `; `。

use core::fmt;
use core::num::{ParseFloatError, ParseIntError};

use thiserror::Error;

use crate::binding::BindingError;
use crate::kind::ScalarKind;

/// 解码调用的最终错误。
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// 目标外层不是记录类型，未访问任何字段。
    #[error("decode target must be a record; {kind} was given")]
    NotARecord { kind: &'static str },

    /// 某字段的绑定注解格式错误，未写入任何字段。
    #[error("malformed binding annotation {annotation:?} on field `{record}.{field}`: {source}")]
    MalformedBinding {
        record: &'static str,
        field: &'static str,
        annotation: &'static str,
        #[source]
        source: BindingError,
    },

    /// 一个或多个字段解码失败；其余字段已按成功结果写入。
    #[error(transparent)]
    Fields(#[from] AggregateError),
}

impl DecodeError {
    /// 字段级错误列表；致命错误返回空切片。
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            DecodeError::Fields(aggregate) => aggregate.errors(),
            _ => &[],
        }
    }

    pub fn is_fatal(&self) -> bool {
        !matches!(self, DecodeError::Fields(_))
    }
}

/// 数值解析失败的底层原因。
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ParseFailure {
    #[error(transparent)]
    Int(#[from] ParseIntError),
    #[error(transparent)]
    Float(#[from] ParseFloatError),
}

/// 字段级失败类别。
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FieldErrorKind {
    /// 单值字段收到多个取值。
    #[error("multiple values provided for a single-valued field ({count} given)")]
    MultipleValues { count: usize },

    /// 单值字段没有收到任何取值。
    #[error("required value missing")]
    Missing,

    /// 取值无法解析为目标类型。
    #[error("value {value:?} is not a valid {kind}: {source}")]
    Invalid {
        kind: ScalarKind,
        value: String,
        #[source]
        source: ParseFailure,
    },

    /// 取值超出目标类型的上界（或有符号类型的下界）。
    #[error("value {value:?} overflows type {kind}")]
    Overflow { kind: ScalarKind, value: String },

    /// 负数写入无符号类型。
    #[error("value {value:?} underflows type {kind}")]
    Underflow { kind: ScalarKind, value: String },

    /// 字段类型不在解码器支持范围内。
    #[error("kind {kind} is not supported")]
    Unsupported { kind: &'static str },
}

/// 单条字段级错误。
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub struct FieldError {
    key: String,
    field: &'static str,
    element: Option<usize>,
    #[source]
    kind: FieldErrorKind,
}

impl FieldError {
    pub(crate) fn new(
        key: impl Into<String>,
        field: &'static str,
        element: Option<usize>,
        kind: FieldErrorKind,
    ) -> Self {
        Self {
            key: key.into(),
            field,
            element,
            kind,
        }
    }

    /// 字段绑定的查询键。
    pub fn key(&self) -> &str {
        &self.key
    }

    /// 记录中的字段名（元组结构体为位置序号）。
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// 序列字段中失败元素的输入位置。
    pub fn element(&self) -> Option<usize> {
        self.element
    }

    pub fn kind(&self) -> &FieldErrorKind {
        &self.kind
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.element {
            Some(index) => write!(
                f,
                "query key {:?} (field `{}`, element {}): {}",
                self.key, self.field, index, self.kind
            ),
            None => write!(
                f,
                "query key {:?} (field `{}`): {}",
                self.key, self.field, self.kind
            ),
        }
    }
}

/// 一次解码调用中全部字段级错误的聚合。
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub struct AggregateError {
    errors: Vec<FieldError>,
    suppressed: usize,
}

impl AggregateError {
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn iter(&self) -> core::slice::Iter<'_, FieldError> {
        self.errors.iter()
    }

    /// 已记录的错误条数。
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// 因 `max_errors` 上限而未记录的错误条数。
    pub fn suppressed(&self) -> usize {
        self.suppressed
    }
}

impl fmt::Display for AggregateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, error) in self.errors.iter().enumerate() {
            if index > 0 {
                f.write_str("; ")?;
            }
            fmt::Display::fmt(error, f)?;
        }
        if self.suppressed > 0 {
            write!(f, "; and {} more error(s) suppressed", self.suppressed)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a AggregateError {
    type Item = &'a FieldError;
    type IntoIter = core::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

/// 解码过程中的错误累加器，只追加不删除。
#[derive(Debug)]
pub(crate) struct ErrorCollector {
    errors: Vec<FieldError>,
    suppressed: usize,
    limit: Option<usize>,
}

impl ErrorCollector {
    pub(crate) fn new(limit: Option<usize>) -> Self {
        Self {
            errors: Vec::new(),
            suppressed: 0,
            limit,
        }
    }

    pub(crate) fn push(&mut self, error: FieldError) {
        match self.limit {
            Some(limit) if self.errors.len() >= limit => self.suppressed += 1,
            _ => self.errors.push(error),
        }
    }

    pub(crate) fn total(&self) -> usize {
        self.errors.len() + self.suppressed
    }

    pub(crate) fn finish(self) -> Result<(), AggregateError> {
        if self.errors.is_empty() && self.suppressed == 0 {
            return Ok(());
        }
        Err(AggregateError {
            errors: self.errors,
            suppressed: self.suppressed,
        })
    }
}

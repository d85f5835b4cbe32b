//! 字段形态与标量取值模型。
//!
//! # 设计意图（Why）
//! - 以封闭枚举描述解码器可识别的全部字段形态，替代运行时类型反射；
//! - 位宽信息随 [`ScalarKind`] 一同携带，边界检查不再依赖具体 Rust 类型。

use core::fmt;

/// 解码器支持的标量类型。
///
/// 名称与 Rust 原生类型保持一致，错误信息直接引用 [`ScalarKind::name`]。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
    F32,
    F64,
    String,
}

/// 标量类型所属的解析族。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScalarClass {
    Signed,
    Unsigned,
    Float,
    Text,
}

impl ScalarKind {
    /// 返回与 Rust 类型一致的名称，例如 `i8`、`u64`、`String`。
    pub const fn name(self) -> &'static str {
        match self {
            ScalarKind::I8 => "i8",
            ScalarKind::I16 => "i16",
            ScalarKind::I32 => "i32",
            ScalarKind::I64 => "i64",
            ScalarKind::Isize => "isize",
            ScalarKind::U8 => "u8",
            ScalarKind::U16 => "u16",
            ScalarKind::U32 => "u32",
            ScalarKind::U64 => "u64",
            ScalarKind::Usize => "usize",
            ScalarKind::F32 => "f32",
            ScalarKind::F64 => "f64",
            ScalarKind::String => "String",
        }
    }

    /// 以该类型为元素的序列名称，用于错误信息。
    pub const fn sequence_name(self) -> &'static str {
        match self {
            ScalarKind::I8 => "Vec<i8>",
            ScalarKind::I16 => "Vec<i16>",
            ScalarKind::I32 => "Vec<i32>",
            ScalarKind::I64 => "Vec<i64>",
            ScalarKind::Isize => "Vec<isize>",
            ScalarKind::U8 => "Vec<u8>",
            ScalarKind::U16 => "Vec<u16>",
            ScalarKind::U32 => "Vec<u32>",
            ScalarKind::U64 => "Vec<u64>",
            ScalarKind::Usize => "Vec<usize>",
            ScalarKind::F32 => "Vec<f32>",
            ScalarKind::F64 => "Vec<f64>",
            ScalarKind::String => "Vec<String>",
        }
    }

    pub const fn class(self) -> ScalarClass {
        match self {
            ScalarKind::I8
            | ScalarKind::I16
            | ScalarKind::I32
            | ScalarKind::I64
            | ScalarKind::Isize => ScalarClass::Signed,
            ScalarKind::U8
            | ScalarKind::U16
            | ScalarKind::U32
            | ScalarKind::U64
            | ScalarKind::Usize => ScalarClass::Unsigned,
            ScalarKind::F32 | ScalarKind::F64 => ScalarClass::Float,
            ScalarKind::String => ScalarClass::Text,
        }
    }

    /// 有符号整数的闭区间边界；仅在 [`ScalarClass::Signed`] 分派后调用，其余类型返回空区间。
    pub(crate) const fn signed_bounds(self) -> (i64, i64) {
        match self {
            ScalarKind::I8 => (i8::MIN as i64, i8::MAX as i64),
            ScalarKind::I16 => (i16::MIN as i64, i16::MAX as i64),
            ScalarKind::I32 => (i32::MIN as i64, i32::MAX as i64),
            ScalarKind::I64 => (i64::MIN, i64::MAX),
            ScalarKind::Isize => (isize::MIN as i64, isize::MAX as i64),
            _ => (0, -1),
        }
    }

    /// 无符号整数的上界；仅在 [`ScalarClass::Unsigned`] 分派后调用，其余类型返回 0。
    pub(crate) const fn unsigned_max(self) -> u64 {
        match self {
            ScalarKind::U8 => u8::MAX as u64,
            ScalarKind::U16 => u16::MAX as u64,
            ScalarKind::U32 => u32::MAX as u64,
            ScalarKind::U64 => u64::MAX,
            ScalarKind::Usize => usize::MAX as u64,
            _ => 0,
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 字段在解码器视角下的形态。
///
/// - `Scalar`：单值字段，走基数检查 + 解析 + 边界检查；
/// - `Sequence`：元素逐个按单值规则解码，失败元素被剔除；
/// - `Unsupported`：解码器无法处理的类型，携带类型名用于报错。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Scalar(ScalarKind),
    Sequence(ScalarKind),
    Unsupported(&'static str),
}

impl FieldKind {
    pub const fn name(self) -> &'static str {
        match self {
            FieldKind::Scalar(kind) => kind.name(),
            FieldKind::Sequence(kind) => kind.sequence_name(),
            FieldKind::Unsupported(name) => name,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 通过边界检查后的标量取值。
///
/// 整数统一以 64 位承载，写入字段时再收窄到声明位宽；`f32` 字段同理由 `f64` 收窄。
#[derive(Clone, Debug, PartialEq)]
pub enum ScalarValue {
    Signed(i64),
    Unsigned(u64),
    Float(f64),
    Text(String),
}

/// 写入字段的最终取值。
#[derive(Clone, Debug, PartialEq)]
pub enum Decoded {
    Scalar(ScalarValue),
    Sequence(Vec<ScalarValue>),
}

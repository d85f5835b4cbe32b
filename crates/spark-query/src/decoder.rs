//! 解码编排。
//!
//! # 状态流转（How）
//! `Start → 校验外层形态 → 解析全部绑定 → 逐字段分派 → 记录结果 → 下一字段 | 结束`
//! - 外层形态不符或注解格式错误：直接返回，不写入任何字段；
//! - 字段级失败只进入错误累加器，不打断遍历；
//! - 遍历结束后累加器非空则返回聚合错误。此时已成功解码的字段保留新值，
//!   调用方拿到的是部分填充的记录。

use tracing::{debug, trace};

use crate::binding::{self, FieldDescriptor, ResolvedField};
use crate::error::{DecodeError, ErrorCollector, FieldError, FieldErrorKind};
use crate::kind::{Decoded, FieldKind};
use crate::options::DecodeOptions;
use crate::record::{QueryTarget, RecordFields, Shape};
use crate::scalar;
use crate::sequence;
use crate::source::QuerySource;

/// 带配置的解码器。
///
/// 不持有任何跨调用状态，可自由克隆并在线程间共享；
/// 同一记录的并发解码由 `&mut` 借用规则在编译期排除。
#[derive(Clone, Debug, Default)]
pub struct Decoder {
    options: DecodeOptions,
}

impl Decoder {
    pub fn new(options: DecodeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    /// 将 `input` 解码进 `target`。
    ///
    /// # 契约说明（What）
    /// - **前置条件**：`target` 为记录类型，且所有绑定注解格式正确；否则返回致命错误且不写入任何字段；
    /// - **后置条件**：每个可设置且参与绑定的字段恰好被访问一次；
    ///   返回 [`DecodeError::Fields`] 时，成功字段已写入，失败字段保持原值。
    pub fn decode<S, T>(&self, input: &S, target: &mut T) -> Result<(), DecodeError>
    where
        S: QuerySource + ?Sized,
        T: QueryTarget + ?Sized,
    {
        let record = record_of(target)?;
        let record_name = record.name();
        let fields = binding::resolve(record, self.options.unannotated)?;
        debug!(
            record = record_name,
            fields = fields.len(),
            "decoding query map into record"
        );

        let mut collector = ErrorCollector::new(self.options.max_errors);
        for field in fields {
            self.decode_field(input, field, &mut collector);
        }

        let failures = collector.total();
        match collector.finish() {
            Ok(()) => {
                debug!(record = record_name, "query map decoded");
                Ok(())
            }
            Err(aggregate) => {
                debug!(
                    record = record_name,
                    failures,
                    "query map decoded with field errors"
                );
                Err(DecodeError::Fields(aggregate))
            }
        }
    }

    /// 只运行元数据解析，返回参与解码的字段描述（按声明顺序）。
    pub fn describe<T>(&self, target: &mut T) -> Result<Vec<FieldDescriptor>, DecodeError>
    where
        T: QueryTarget + ?Sized,
    {
        let record = record_of(target)?;
        let fields = binding::resolve(record, self.options.unannotated)?;
        Ok(fields.iter().map(ResolvedField::descriptor).collect())
    }

    fn decode_field<S>(
        &self,
        input: &S,
        field: ResolvedField<'_>,
        collector: &mut ErrorCollector,
    ) where
        S: QuerySource + ?Sized,
    {
        let ResolvedField {
            field: name,
            binding,
            target,
        } = field;
        let key = binding.key();
        // 空键永远不命中。
        let values: &[String] = if binding.is_unbound() {
            &[]
        } else {
            input.values_of(key)
        };
        let kind = target.kind();
        let trim = self.options.trim_whitespace;
        trace!(field = name, key, %kind, values = values.len(), "dispatching field");

        let decoded = match kind {
            FieldKind::Scalar(scalar_kind) => match scalar::coerce(scalar_kind, values, trim) {
                Ok(value) => Decoded::Scalar(value),
                Err(error) => {
                    collector.push(FieldError::new(key, name, None, error));
                    return;
                }
            },
            FieldKind::Sequence(element) => {
                let items = sequence::decode_sequence(element, values, trim, |index, error| {
                    collector.push(FieldError::new(key, name, Some(index), error));
                });
                Decoded::Sequence(items)
            }
            FieldKind::Unsupported(unsupported) => {
                collector.push(FieldError::new(
                    key,
                    name,
                    None,
                    FieldErrorKind::Unsupported { kind: unsupported },
                ));
                return;
            }
        };

        if target.store(decoded).is_err() {
            collector.push(FieldError::new(
                key,
                name,
                None,
                FieldErrorKind::Unsupported { kind: kind.name() },
            ));
        }
    }
}

fn record_of<T>(target: &mut T) -> Result<RecordFields<'_>, DecodeError>
where
    T: QueryTarget + ?Sized,
{
    match target.shape() {
        Shape::Record(record) => Ok(record),
        Shape::Other(kind) => {
            debug!(kind, "rejecting non-record decode target");
            Err(DecodeError::NotARecord { kind })
        }
    }
}

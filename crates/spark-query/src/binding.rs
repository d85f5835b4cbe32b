//! 绑定注解解析与元数据解析器。
//!
//! # 设计意图（Why）
//! - 注解格式为 `key[,opt1,opt2,...]`：首个片段是查询键，后续片段作为保留选项解析并保存，
//!   当前任何编码规则都不读取它们；
//! - 所有字段的注解在解码前一次性校验完毕，格式错误属于配置错误，整次调用在写入任何字段前失败。
//!
//! # 契约说明（What）
//! - 空注解解析为空键，空键永远不会命中输入映射；
//! - 选项片段为空（`"key,"`、`"key,,opt"`）或任一片段含空白/控制字符视为格式错误；
//! - [`resolve`] 按声明顺序输出字段描述，不可设置的字段被直接剔除。

use thiserror::Error;

use crate::error::DecodeError;
use crate::field::FieldTarget;
use crate::kind::FieldKind;
use crate::options::UnannotatedPolicy;
use crate::record::RecordFields;

const SEPARATOR: char = ',';

/// 注解格式错误。
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum BindingError {
    #[error("option {position} is empty")]
    EmptyOption { position: usize },

    #[error("token {position} contains illegal character {character:?}")]
    IllegalCharacter { position: usize, character: char },
}

/// 单个字段的绑定描述：查询键与保留选项。
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FieldBinding<'a> {
    key: &'a str,
    options: Vec<&'a str>,
}

impl<'a> FieldBinding<'a> {
    /// 解析 `key[,opt...]` 形式的注解。
    pub fn parse(annotation: &'a str) -> Result<Self, BindingError> {
        let mut tokens = annotation.split(SEPARATOR);
        // `split` 至少产出一个片段，空注解得到空键。
        let key = tokens.next().unwrap_or_default();
        check_token(0, key)?;

        let mut options = Vec::new();
        for (offset, option) in tokens.enumerate() {
            let position = offset + 1;
            if option.is_empty() {
                return Err(BindingError::EmptyOption { position });
            }
            check_token(position, option)?;
            options.push(option);
        }

        Ok(Self { key, options })
    }

    /// 未声明注解的字段所使用的空绑定。
    pub fn unbound() -> Self {
        Self {
            key: "",
            options: Vec::new(),
        }
    }

    pub fn key(&self) -> &'a str {
        self.key
    }

    pub fn options(&self) -> &[&'a str] {
        &self.options
    }

    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|candidate| *candidate == option)
    }

    /// 空键永远不会命中输入映射。
    pub fn is_unbound(&self) -> bool {
        self.key.is_empty()
    }
}

fn check_token(position: usize, token: &str) -> Result<(), BindingError> {
    match token
        .chars()
        .find(|character| character.is_whitespace() || character.is_control())
    {
        Some(character) => Err(BindingError::IllegalCharacter {
            position,
            character,
        }),
        None => Ok(()),
    }
}

/// 字段元数据描述，不持有字段本身。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub field: &'static str,
    pub binding: FieldBinding<'static>,
    pub kind: FieldKind,
}

/// 通过校验、可参与解码的字段。
pub(crate) struct ResolvedField<'a> {
    pub(crate) field: &'static str,
    pub(crate) binding: FieldBinding<'static>,
    pub(crate) target: &'a mut dyn FieldTarget,
}

impl ResolvedField<'_> {
    pub(crate) fn descriptor(&self) -> FieldDescriptor {
        FieldDescriptor {
            field: self.field,
            binding: self.binding.clone(),
            kind: self.target.kind(),
        }
    }
}

/// 按声明顺序解析记录的全部字段绑定。
///
/// 任一注解格式错误即返回 [`DecodeError::MalformedBinding`]；此时没有字段被写入。
pub(crate) fn resolve<'a>(
    record: RecordFields<'a>,
    unannotated: UnannotatedPolicy,
) -> Result<Vec<ResolvedField<'a>>, DecodeError> {
    let record_name = record.name();
    let mut resolved = Vec::with_capacity(record.len());

    for slot in record.into_slots() {
        let (field, annotation, target) = slot.into_parts();
        let Some(target) = target else {
            continue;
        };

        let binding = match annotation {
            Some(annotation) => FieldBinding::parse(annotation).map_err(|source| {
                DecodeError::MalformedBinding {
                    record: record_name,
                    field,
                    annotation,
                    source,
                }
            })?,
            None => match unannotated {
                UnannotatedPolicy::BindEmptyKey => FieldBinding::unbound(),
                UnannotatedPolicy::Skip => continue,
            },
        };

        resolved.push(ResolvedField {
            field,
            binding,
            target,
        });
    }

    Ok(resolved)
}

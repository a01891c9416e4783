//! 按类型自动装配
//!
//! 为未被显式声明值覆盖的必需参数挑选候选 bean。候选集按
//! 注册顺序遍历保证确定性；多候选时唯一的 primary 定义胜出，
//! 否则报歧义错误。

use beans_abstractions::ClassResolver;
use beans_common::{BeansError, BeansResult, MergedBeanDefinition};
use std::sync::Arc;
use tracing::debug;

/// 为指定类型需求挑选唯一候选
///
/// 排除请求方自身、抽象定义、autowire_candidate=false 的定义
/// 和没有类名的纯工厂定义。无候选返回 `None`，由调用方按
/// 参数必需性决定是报错还是传缺省值。
pub fn resolve_candidate<F>(
    requesting: &str,
    requirement: &str,
    names: &[String],
    classes: &dyn ClassResolver,
    mut merged_of: F,
) -> BeansResult<Option<String>>
where
    F: FnMut(&str) -> BeansResult<Arc<MergedBeanDefinition>>,
{
    let mut candidates: Vec<(String, bool)> = Vec::new();
    for name in names {
        if name == requesting {
            continue;
        }
        let merged = match merged_of(name) {
            Ok(merged) => merged,
            Err(err) => {
                // 无关定义的合并失败不应拖垮本次装配
                debug!("跳过无法合并的候选 {}: {}", name, err);
                continue;
            }
        };
        if merged.is_abstract() || !merged.is_autowire_candidate() {
            continue;
        }
        let Some(class_name) = merged.bean_class_name() else {
            continue;
        };
        let Ok(class) = classes.resolve_class(class_name) else {
            continue;
        };
        if class.is_assignable_to(requirement) {
            candidates.push((name.clone(), merged.is_primary()));
        }
    }

    match candidates.len() {
        0 => Ok(None),
        1 => Ok(Some(candidates.remove(0).0)),
        _ => {
            let primaries: Vec<&String> = candidates
                .iter()
                .filter(|(_, primary)| *primary)
                .map(|(name, _)| name)
                .collect();
            if primaries.len() == 1 {
                Ok(Some(primaries[0].clone()))
            } else {
                Err(BeansError::AmbiguousAutowire {
                    requirement: requirement.to_string(),
                    candidates: candidates.iter().map(|(name, _)| name.clone()).collect(),
                })
            }
        }
    }
}

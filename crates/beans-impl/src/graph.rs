//! 依赖图排序
//!
//! 预实例化前对种子集合做深度优先后序遍历，产出依赖在前的
//! 实例化顺序。边来自 dependsOn 声明和值中的 bean 引用。

use beans_common::{BeansError, BeansResult, MergedBeanDefinition};
use std::collections::HashSet;
use std::sync::Arc;

/// 计算实例化顺序
///
/// 返回的顺序保证每个名称出现在其全部依赖之后。发现环时
/// 报告从首次进入到重入点的完整环切片。
pub fn instantiation_order<F>(seeds: &[String], mut lookup: F) -> BeansResult<Vec<String>>
where
    F: FnMut(&str) -> BeansResult<Arc<MergedBeanDefinition>>,
{
    let mut order = Vec::new();
    let mut visited = HashSet::new();
    let mut visiting = Vec::new();
    for seed in seeds {
        visit(seed, &mut lookup, &mut order, &mut visited, &mut visiting)?;
    }
    Ok(order)
}

fn visit<F>(
    name: &str,
    lookup: &mut F,
    order: &mut Vec<String>,
    visited: &mut HashSet<String>,
    visiting: &mut Vec<String>,
) -> BeansResult<()>
where
    F: FnMut(&str) -> BeansResult<Arc<MergedBeanDefinition>>,
{
    if visited.contains(name) {
        return Ok(());
    }
    if let Some(pos) = visiting.iter().position(|n| n == name) {
        let mut cycle: Vec<String> = visiting[pos..].to_vec();
        cycle.push(name.to_string());
        return Err(BeansError::CircularDependency { cycle });
    }
    visiting.push(name.to_string());
    let merged = lookup(name)?;
    let mut edges: Vec<String> = merged.depends_on().to_vec();
    edges.extend(merged.reference_names());
    for edge in edges {
        visit(&edge, lookup, order, visited, visiting)?;
    }
    visiting.pop();
    visited.insert(name.to_string());
    order.push(name.to_string());
    Ok(())
}

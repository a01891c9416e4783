//! 定义合并器
//!
//! 沿 parent 链把定义叠加为合并定义：从根祖先开始逐级覆盖，
//! 子定义显式设置的字段优先。合并结果按名称缓存，任何链上
//! 成员的定义变更都会使包含它的缓存条目失效。

use crate::registry::DefinitionStore;
use beans_common::{BeanDefinition, BeansError, BeansResult, MergedBeanDefinition};
use dashmap::DashMap;
use std::sync::Arc;
use tracing::trace;

#[derive(Clone)]
struct CacheEntry {
    merged: Arc<MergedBeanDefinition>,
    /// 从本定义到根祖先的名称链，用于失效判定
    chain: Vec<String>,
}

/// 定义合并器
#[derive(Default)]
pub struct DefinitionMerger {
    cache: DashMap<String, CacheEntry>,
}

impl DefinitionMerger {
    /// 创建合并器
    pub fn new() -> Self {
        Self::default()
    }

    /// 解析合并定义
    pub fn resolve(
        &self,
        store: &DefinitionStore,
        name: &str,
    ) -> BeansResult<Arc<MergedBeanDefinition>> {
        self.resolve_with_chain(store, name).map(|(merged, _)| merged)
    }

    /// 解析合并定义并返回其 parent 链
    ///
    /// 链以本定义开头、根祖先结尾，供注册表冻结整条链。
    pub fn resolve_with_chain(
        &self,
        store: &DefinitionStore,
        name: &str,
    ) -> BeansResult<(Arc<MergedBeanDefinition>, Vec<String>)> {
        if let Some(entry) = self.cache.get(name) {
            return Ok((entry.merged.clone(), entry.chain.clone()));
        }

        // 自下而上收集 parent 链
        let mut chain = vec![name.to_string()];
        let mut definitions = vec![store.get(name)?];
        let mut parent = definitions[0].parent_name.clone();
        while let Some(parent_name) = parent {
            if chain.contains(&parent_name) {
                chain.push(parent_name);
                return Err(BeansError::CircularParentage {
                    chain: chain.join(" -> "),
                });
            }
            let definition = store.get(&parent_name)?;
            parent = definition.parent_name.clone();
            chain.push(parent_name);
            definitions.push(definition);
        }

        // 从根祖先开始逐级叠加
        let mut effective = definitions.pop().unwrap_or_default();
        while let Some(child) = definitions.pop() {
            overlay(&mut effective, child);
        }
        effective.parent_name = None;

        trace!("合并 bean 定义: {} (链长 {})", name, chain.len());
        let merged = Arc::new(MergedBeanDefinition::from_effective(name, effective));
        self.cache.insert(
            name.to_string(),
            CacheEntry {
                merged: merged.clone(),
                chain: chain.clone(),
            },
        );
        Ok((merged, chain))
    }

    /// 使链上包含指定名称的所有缓存条目失效
    pub fn invalidate(&self, name: &str) {
        self.cache
            .retain(|_, entry| !entry.chain.iter().any(|n| n == name));
    }

    /// 清空缓存
    pub fn clear(&self) {
        self.cache.clear();
    }
}

/// 把子定义叠加到当前有效定义上
///
/// Option 字段子级显式设置即覆盖；dependsOn 父级在前拼接去重；
/// 工厂方法与工厂 bean 作为整体覆盖；索引构造参数按索引覆盖，
/// 未索引参数追加；属性按名覆盖；抽象标志取子级自身。
fn overlay(effective: &mut BeanDefinition, child: BeanDefinition) {
    if child.bean_class_name.is_some() {
        effective.bean_class_name = child.bean_class_name;
    }
    if child.scope.is_some() {
        effective.scope = child.scope;
    }
    if child.lazy_init.is_some() {
        effective.lazy_init = child.lazy_init;
    }
    if child.autowire_candidate.is_some() {
        effective.autowire_candidate = child.autowire_candidate;
    }
    if child.primary.is_some() {
        effective.primary = child.primary;
    }
    if child.role.is_some() {
        effective.role = child.role;
    }
    if child.description.is_some() {
        effective.description = child.description;
    }
    if child.resource_description.is_some() {
        effective.resource_description = child.resource_description;
    }
    for dep in child.depends_on {
        if !effective.depends_on.contains(&dep) {
            effective.depends_on.push(dep);
        }
    }
    if child.factory_method_name.is_some() {
        // 子级声明工厂方法时连同工厂 bean 一起覆盖，
        // 避免父级遗留的工厂 bean 与新方法错配
        effective.factory_method_name = child.factory_method_name;
        effective.factory_bean_name = child.factory_bean_name;
    } else if child.factory_bean_name.is_some() {
        effective.factory_bean_name = child.factory_bean_name;
    }
    for (index, holder) in child.constructor_argument_values.indexed() {
        effective
            .constructor_argument_values
            .add_indexed(*index, holder.clone());
    }
    for holder in child.constructor_argument_values.generic() {
        effective
            .constructor_argument_values
            .add_generic(holder.clone());
    }
    for pv in child.property_values.iter() {
        effective.property_values.add(pv.name.clone(), pv.value.clone());
    }
    effective.abstract_def = child.abstract_def;
    if child.originating.is_some() {
        effective.originating = child.originating;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beans_common::{BeanValue, ValueHolder, SCOPE_PROTOTYPE};

    fn store_with(defs: Vec<(&str, BeanDefinition)>) -> DefinitionStore {
        let store = DefinitionStore::new(true);
        for (name, def) in defs {
            store.register(name, def).unwrap();
        }
        store
    }

    #[test]
    fn child_inherits_unset_fields() {
        let store = store_with(vec![
            (
                "base",
                BeanDefinition::for_class("demo::User")
                    .with_abstract(true)
                    .with_property("age", 30i64),
            ),
            ("jack", BeanDefinition::child_of("base").with_property("name", "jack")),
        ]);
        let merger = DefinitionMerger::new();
        let merged = merger.resolve(&store, "jack").unwrap();
        assert_eq!(merged.bean_class_name(), Some("demo::User"));
        assert!(!merged.is_abstract());
        assert!(matches!(
            merged.property_values().get("age"),
            Some(BeanValue::Int(30))
        ));
        assert!(matches!(
            merged.property_values().get("name"),
            Some(BeanValue::Str(s)) if s == "jack"
        ));
    }

    #[test]
    fn child_overrides_scope_and_properties() {
        let store = store_with(vec![
            (
                "base",
                BeanDefinition::for_class("demo::User").with_property("name", "default"),
            ),
            (
                "proto",
                BeanDefinition::child_of("base")
                    .with_scope(SCOPE_PROTOTYPE)
                    .with_property("name", "override"),
            ),
        ]);
        let merger = DefinitionMerger::new();
        let merged = merger.resolve(&store, "proto").unwrap();
        assert!(merged.is_prototype());
        assert!(matches!(
            merged.property_values().get("name"),
            Some(BeanValue::Str(s)) if s == "override"
        ));
        // 覆盖不产生重复条目
        assert_eq!(merged.property_values().len(), 1);
    }

    #[test]
    fn grandparent_chain_merges_front_to_back() {
        // 三级链上的合并与两两逐级合并结果一致
        let store = store_with(vec![
            (
                "root",
                BeanDefinition::for_class("demo::User")
                    .with_lazy_init(true)
                    .with_depends_on(["init"]),
            ),
            ("mid", BeanDefinition::child_of("root").with_depends_on(["mid-dep", "init"])),
            ("leaf", BeanDefinition::child_of("mid").with_lazy_init(false)),
        ]);
        let merger = DefinitionMerger::new();
        let merged = merger.resolve(&store, "leaf").unwrap();
        assert!(!merged.is_lazy_init());
        // 父级在前，首次出现去重
        assert_eq!(merged.depends_on(), ["init", "mid-dep"]);
    }

    #[test]
    fn indexed_args_override_generic_args_append() {
        let mut base = BeanDefinition::for_class("demo::User");
        base.constructor_argument_values
            .add_indexed(0, ValueHolder::new("parent-arg"));
        base.constructor_argument_values
            .add_generic(ValueHolder::new(1i64));
        let mut child = BeanDefinition::child_of("base");
        child
            .constructor_argument_values
            .add_indexed(0, ValueHolder::new("child-arg"));
        let store = store_with(vec![("base", base), ("child", child)]);
        let merger = DefinitionMerger::new();
        let merged = merger.resolve(&store, "child").unwrap();
        let args = merged.constructor_argument_values();
        assert!(matches!(
            args.get_indexed(0).map(|h| &h.value),
            Some(BeanValue::Str(s)) if s == "child-arg"
        ));
        assert_eq!(args.generic().len(), 1);
    }

    #[test]
    fn chain_merge_equals_merging_flattened_parent() {
        // A <- B <- C 逐级合并与先展平 A+B 再叠加 C 结果一致
        let a = BeanDefinition::for_class("demo::User")
            .with_lazy_init(true)
            .with_property("age", 30i64)
            .with_depends_on(["init"]);
        let b = BeanDefinition::child_of("a")
            .with_property("name", "from-b")
            .with_depends_on(["extra"]);
        let c = BeanDefinition::child_of("b").with_property("name", "from-c");

        let chained = {
            let store = store_with(vec![("a", a.clone()), ("b", b.clone()), ("c", c.clone())]);
            DefinitionMerger::new().resolve(&store, "c").unwrap()
        };
        let flattened = {
            let mut ab = a;
            overlay(&mut ab, b);
            ab.parent_name = None;
            let mut c = c;
            c.parent_name = Some("ab".to_string());
            let store = store_with(vec![("ab", ab), ("c", c)]);
            DefinitionMerger::new().resolve(&store, "c").unwrap()
        };

        assert_eq!(chained.bean_class_name(), flattened.bean_class_name());
        assert_eq!(chained.is_lazy_init(), flattened.is_lazy_init());
        assert_eq!(chained.depends_on(), flattened.depends_on());
        assert!(matches!(
            (
                chained.property_values().get("name"),
                flattened.property_values().get("name"),
            ),
            (Some(BeanValue::Str(left)), Some(BeanValue::Str(right))) if left == right
        ));
        assert!(matches!(
            (
                chained.property_values().get("age"),
                flattened.property_values().get("age"),
            ),
            (Some(BeanValue::Int(left)), Some(BeanValue::Int(right))) if left == right
        ));
    }

    #[test]
    fn parent_cycle_is_reported() {
        let store = store_with(vec![
            ("a", BeanDefinition::child_of("b")),
            ("b", BeanDefinition::child_of("a")),
        ]);
        let merger = DefinitionMerger::new();
        let err = merger.resolve(&store, "a").unwrap_err();
        match err {
            BeansError::CircularParentage { chain } => {
                assert_eq!(chain, "a -> b -> a");
            }
            other => panic!("意外错误: {other}"),
        }
    }

    #[test]
    fn missing_parent_surfaces_no_such_definition() {
        let store = store_with(vec![("orphan", BeanDefinition::child_of("ghost"))]);
        let merger = DefinitionMerger::new();
        let err = merger.resolve(&store, "orphan").unwrap_err();
        assert!(matches!(err, BeansError::NoSuchDefinition { name } if name == "ghost"));
    }

    #[test]
    fn invalidation_covers_descendants() {
        let store = store_with(vec![
            ("base", BeanDefinition::for_class("demo::User").with_property("age", 30i64)),
            ("child", BeanDefinition::child_of("base")),
        ]);
        let merger = DefinitionMerger::new();
        let before = merger.resolve(&store, "child").unwrap();
        assert!(matches!(
            before.property_values().get("age"),
            Some(BeanValue::Int(30))
        ));

        // 修改父定义后，后代的缓存必须失效
        store
            .register(
                "base",
                BeanDefinition::for_class("demo::User").with_property("age", 40i64),
            )
            .unwrap();
        merger.invalidate("base");
        let after = merger.resolve(&store, "child").unwrap();
        assert!(matches!(
            after.property_values().get("age"),
            Some(BeanValue::Int(40))
        ));
    }
}

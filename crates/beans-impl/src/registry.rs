//! bean 定义存储
//!
//! 注册表的内部存储：名称到定义的映射加注册顺序。
//! 写操作与并发读通过读写锁串行化，读取返回一致快照。

use beans_common::{BeanDefinition, BeansError, BeansResult};
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

#[derive(Default)]
struct StoreInner {
    definitions: HashMap<String, BeanDefinition>,
    /// 注册顺序，决定 names() 快照和预实例化的遍历顺序
    order: Vec<String>,
    /// 已冻结的名称：自身或后代已进入实例化
    frozen: HashSet<String>,
}

/// 定义存储
pub struct DefinitionStore {
    inner: RwLock<StoreInner>,
    allow_overriding: bool,
}

impl DefinitionStore {
    /// 创建存储
    pub fn new(allow_overriding: bool) -> Self {
        Self {
            inner: RwLock::new(StoreInner::default()),
            allow_overriding,
        }
    }

    /// 注册定义
    ///
    /// 已冻结的名称拒绝修改；已存在且禁止覆盖时报重复错误。
    pub fn register(&self, name: &str, definition: BeanDefinition) -> BeansResult<()> {
        let mut inner = self.inner.write();
        if inner.frozen.contains(name) {
            warn!("bean 定义 {} 已冻结，忽略修改请求", name);
            return Err(BeansError::DefinitionFrozen {
                name: name.to_string(),
            });
        }
        if inner.definitions.contains_key(name) {
            if !self.allow_overriding {
                return Err(BeansError::DuplicateDefinition {
                    name: name.to_string(),
                });
            }
            debug!("覆盖注册 bean 定义: {}", name);
            inner.definitions.insert(name.to_string(), definition);
        } else {
            inner.order.push(name.to_string());
            inner.definitions.insert(name.to_string(), definition);
        }
        Ok(())
    }

    /// 移除定义并返回
    pub fn remove(&self, name: &str) -> BeansResult<BeanDefinition> {
        let mut inner = self.inner.write();
        match inner.definitions.remove(name) {
            Some(definition) => {
                inner.order.retain(|n| n != name);
                inner.frozen.remove(name);
                Ok(definition)
            }
            None => Err(BeansError::NoSuchDefinition {
                name: name.to_string(),
            }),
        }
    }

    /// 获取定义的快照副本
    pub fn get(&self, name: &str) -> BeansResult<BeanDefinition> {
        self.inner
            .read()
            .definitions
            .get(name)
            .cloned()
            .ok_or_else(|| BeansError::NoSuchDefinition {
                name: name.to_string(),
            })
    }

    /// 是否包含指定名称
    pub fn contains(&self, name: &str) -> bool {
        self.inner.read().definitions.contains_key(name)
    }

    /// 所有名称的快照，按注册顺序
    pub fn names(&self) -> Vec<String> {
        self.inner.read().order.clone()
    }

    /// 定义数量
    pub fn len(&self) -> usize {
        self.inner.read().definitions.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.inner.read().definitions.is_empty()
    }

    /// 冻结一组名称
    ///
    /// 首次实例化请求到达时对定义链整体调用。
    pub fn freeze(&self, names: &[String]) {
        let mut inner = self.inner.write();
        for name in names {
            inner.frozen.insert(name.clone());
        }
    }

    /// 名称是否已冻结
    pub fn is_frozen(&self, name: &str) -> bool {
        self.inner.read().frozen.contains(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_and_get_roundtrip() {
        let store = DefinitionStore::new(true);
        store
            .register("user", BeanDefinition::for_class("demo::User"))
            .unwrap();
        assert!(store.contains("user"));
        let def = store.get("user").unwrap();
        assert_eq!(def.bean_class_name.as_deref(), Some("demo::User"));
    }

    #[test]
    fn duplicate_rejected_when_overriding_disallowed() {
        let store = DefinitionStore::new(false);
        store.register("a", BeanDefinition::new()).unwrap();
        let err = store.register("a", BeanDefinition::new()).unwrap_err();
        assert!(matches!(err, BeansError::DuplicateDefinition { .. }));
    }

    #[test]
    fn frozen_name_rejects_reregistration() {
        let store = DefinitionStore::new(true);
        store.register("a", BeanDefinition::new()).unwrap();
        store.freeze(&["a".to_string()]);
        let err = store.register("a", BeanDefinition::new()).unwrap_err();
        assert!(matches!(err, BeansError::DefinitionFrozen { .. }));
        // 移除后名称重新可用
        store.remove("a").unwrap();
        store.register("a", BeanDefinition::new()).unwrap();
    }

    #[test]
    fn names_snapshot_preserves_registration_order() {
        let store = DefinitionStore::new(true);
        for name in ["c", "a", "b"] {
            store.register(name, BeanDefinition::new()).unwrap();
        }
        assert_eq!(store.names(), vec!["c", "a", "b"]);
    }
}

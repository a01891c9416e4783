//! 静态类描述符注册表
//!
//! 启动前把所有可构造类型的描述符登记进来，容器在实例化时
//! 按类名查找。

use beans_abstractions::{BeanClass, ClassResolver};
use beans_common::{BeansError, BeansResult};
use dashmap::DashMap;
use std::sync::Arc;
use tracing::warn;

/// 类描述符注册表
#[derive(Default)]
pub struct StaticClassRegistry {
    classes: DashMap<String, Arc<BeanClass>>,
}

impl StaticClassRegistry {
    /// 创建空注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册类描述符，同名覆盖
    pub fn register(&self, class: BeanClass) {
        let name = class.name.clone();
        if self.classes.insert(name.clone(), Arc::new(class)).is_some() {
            warn!("类描述符覆盖注册: {}", name);
        }
    }

    /// 已注册的类数量
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl ClassResolver for StaticClassRegistry {
    fn resolve_class(&self, class_name: &str) -> BeansResult<Arc<BeanClass>> {
        self.classes
            .get(class_name)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| BeansError::NoSuchClass {
                class_name: class_name.to_string(),
            })
    }

    fn contains_class(&self, class_name: &str) -> bool {
        self.classes.contains_key(class_name)
    }
}

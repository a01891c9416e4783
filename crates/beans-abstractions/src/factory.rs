//! bean 工厂抽象接口
//!
//! 容器对调用方暴露的解析入口。

use crate::class::BeanInstance;
use async_trait::async_trait;
use beans_common::{BeansError, BeansResult};
use std::any::Any;
use std::sync::{Arc, Weak};

/// bean 工厂 trait
///
/// 按名称解析实例的核心入口。实现负责合并定义、依赖排序、
/// 作用域缓存和生命周期回调的完整管线。
#[async_trait]
pub trait BeanFactory: Send + Sync {
    /// 按名称解析 bean 实例
    async fn get_bean(&self, name: &str) -> BeansResult<BeanInstance>;

    /// 是否存在指定名称的定义
    fn contains_bean(&self, name: &str) -> bool;

    /// 指定名称的合并定义是否为单例
    fn is_singleton(&self, name: &str) -> BeansResult<bool>;

    /// 指定名称的合并定义是否为原型
    fn is_prototype(&self, name: &str) -> BeansResult<bool>;
}

/// 带类型下转的工厂扩展 trait
#[async_trait]
pub trait TypedBeanFactory: BeanFactory {
    /// 按名称解析并下转到期望类型
    ///
    /// 实例不可赋值到 `T` 时报 `TypeMismatch`。
    async fn get_bean_as<T: Any + Send + Sync>(&self, name: &str) -> BeansResult<Arc<T>> {
        let instance = self.get_bean(name).await?;
        instance
            .downcast::<T>()
            .map_err(|_| BeansError::TypeMismatch {
                name: name.to_string(),
                expected: std::any::type_name::<T>().to_string(),
            })
    }
}

#[async_trait]
impl<F: BeanFactory + ?Sized> TypedBeanFactory for F {}

/// 容器句柄
///
/// 交给容器感知 bean 的弱引用句柄，避免单例缓存持有容器
/// 自身形成引用环。
#[derive(Clone)]
pub struct ContainerHandle {
    inner: Weak<dyn BeanFactory>,
}

impl ContainerHandle {
    /// 从弱引用创建句柄
    pub fn new(inner: Weak<dyn BeanFactory>) -> Self {
        Self { inner }
    }

    /// 升级为工厂引用，容器已销毁时返回 `None`
    pub fn factory(&self) -> Option<Arc<dyn BeanFactory>> {
        self.inner.upgrade()
    }
}

impl std::fmt::Debug for ContainerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContainerHandle")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}

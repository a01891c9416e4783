//! 内置作用域实现
//!
//! 单例作用域缓存首个创建结果并对并发未命中做每名称互斥；
//! 原型作用域不缓存，每次请求都走创建闭包。

use async_trait::async_trait;
use beans_abstractions::{BeanCreator, BeanInstance, BeanScope};
use beans_common::{BeansResult, SCOPE_PROTOTYPE, SCOPE_SINGLETON};
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// 单例作用域
///
/// 快路径直接命中缓存；未命中时按名称加锁，获锁后二次检查，
/// 保证成功路径上创建闭包恰好执行一次。失败不缓存，后续
/// 请求可以重试创建。
#[derive(Default)]
pub struct SingletonScope {
    instances: DashMap<String, BeanInstance>,
    creation_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl SingletonScope {
    /// 创建空的单例作用域
    pub fn new() -> Self {
        Self::default()
    }

    /// 缓存的单例数量
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// 是否没有缓存任何单例
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// 清空全部缓存实例
    pub fn clear(&self) {
        let count = self.instances.len();
        self.instances.clear();
        self.creation_locks.clear();
        debug!("清空单例缓存，共 {} 个实例", count);
    }
}

#[async_trait]
impl BeanScope for SingletonScope {
    fn name(&self) -> &str {
        SCOPE_SINGLETON
    }

    async fn get<'a>(
        &self,
        bean_name: &str,
        creator: BeanCreator<'a>,
    ) -> BeansResult<BeanInstance> {
        if let Some(instance) = self.instances.get(bean_name) {
            return Ok(instance.value().clone());
        }
        let lock = self
            .creation_locks
            .entry(bean_name.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let _guard = lock.lock().await;
        // 获锁期间可能有竞争者已完成创建
        if let Some(instance) = self.instances.get(bean_name) {
            return Ok(instance.value().clone());
        }
        let instance = creator().await?;
        self.instances
            .insert(bean_name.to_string(), instance.clone());
        debug!("单例实例已缓存: {}", bean_name);
        Ok(instance)
    }

    fn remove(&self, bean_name: &str) -> Option<BeanInstance> {
        self.creation_locks.remove(bean_name);
        self.instances.remove(bean_name).map(|(_, instance)| instance)
    }

    fn contains(&self, bean_name: &str) -> bool {
        self.instances.contains_key(bean_name)
    }
}

/// 原型作用域
#[derive(Default)]
pub struct PrototypeScope;

impl PrototypeScope {
    /// 创建原型作用域
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl BeanScope for PrototypeScope {
    fn name(&self) -> &str {
        SCOPE_PROTOTYPE
    }

    async fn get<'a>(
        &self,
        _bean_name: &str,
        creator: BeanCreator<'a>,
    ) -> BeansResult<BeanInstance> {
        creator().await
    }

    fn remove(&self, _bean_name: &str) -> Option<BeanInstance> {
        None
    }

    fn contains(&self, _bean_name: &str) -> bool {
        false
    }
}

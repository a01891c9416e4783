//! 作用域抽象接口
//!
//! 作用域决定一个定义产出多少实例以及实例由谁持有。
//! 扩展作用域通过同一 get-or-create 契约接入容器的策略表。

use crate::class::BeanInstance;
use async_trait::async_trait;
use beans_common::BeansResult;
use futures::future::BoxFuture;

/// 实例创建闭包
///
/// 作用域在缓存未命中时调用，内部递归走完整解析管线。
pub type BeanCreator<'a> = Box<dyn FnOnce() -> BoxFuture<'a, BeansResult<BeanInstance>> + Send + 'a>;

/// 作用域 trait
///
/// `get` 是原子契约：同一名称的并发未命中请求，成功路径上
/// 创建闭包恰好执行一次，所有调用方观察到同一实例。
/// 创建失败不得在缓存中留下半构造的实例。
#[async_trait]
pub trait BeanScope: Send + Sync {
    /// 作用域名称
    fn name(&self) -> &str;

    /// 获取或创建实例
    async fn get<'a>(&self, bean_name: &str, creator: BeanCreator<'a>)
        -> BeansResult<BeanInstance>;

    /// 移除并返回缓存的实例（如果有）
    fn remove(&self, bean_name: &str) -> Option<BeanInstance>;

    /// 是否缓存了指定名称的实例
    fn contains(&self, bean_name: &str) -> bool;
}

//! bean 定义注册表抽象接口

use beans_common::{BeanDefinition, BeansResult};

/// bean 定义注册表 trait
///
/// 以唯一名称为键的可变定义存储。读写遵循读写锁约束：
/// 读取观察到一致快照即可，不要求跨名称线性化。
pub trait BeanDefinitionRegistry: Send + Sync {
    /// 注册定义
    ///
    /// 名称已存在且配置禁止覆盖时报 `DuplicateDefinition`；
    /// 名称已冻结（自身或后代已实例化）时报 `DefinitionFrozen`。
    fn register_definition(&self, name: &str, definition: BeanDefinition) -> BeansResult<()>;

    /// 移除定义，返回被移除的定义
    ///
    /// 名称不存在时报 `NoSuchDefinition`。
    fn remove_definition(&self, name: &str) -> BeansResult<BeanDefinition>;

    /// 获取定义的快照副本
    ///
    /// 名称不存在时报 `NoSuchDefinition`。
    fn get_definition(&self, name: &str) -> BeansResult<BeanDefinition>;

    /// 是否包含指定名称的定义
    fn contains_definition(&self, name: &str) -> bool;

    /// 所有已注册名称的快照，按注册顺序
    fn definition_names(&self) -> Vec<String>;

    /// 已注册定义数量
    fn definition_count(&self) -> usize;
}

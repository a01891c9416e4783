//! bean 容器默认实现
//!
//! 提供定义存储、parent 链合并、依赖图排序、内置作用域和
//! 完整解析管线的默认容器 [`DefaultBeanContainer`]，以及
//! 静态类描述符注册表 [`StaticClassRegistry`]。

pub mod autowire;
pub mod aware;
pub mod classes;
pub mod container;
pub mod context;
pub mod graph;
pub mod instantiate;
pub mod merge;
pub mod registry;
pub mod scopes;

pub use classes::StaticClassRegistry;
pub use container::DefaultBeanContainer;
pub use context::ResolveContext;
pub use merge::DefinitionMerger;
pub use registry::DefinitionStore;
pub use scopes::{PrototypeScope, SingletonScope};

//! # Beans Common
//!
//! 这个 crate 提供了 Lorn Beans 容器的公共数据模型和错误类型。
//!
//! ## 核心组件
//!
//! - [`BeanDefinition`] - bean 定义描述符
//! - [`MergedBeanDefinition`] - parent 链合并后的有效定义
//! - [`BeanValue`] - 定义中的值或 bean 引用
//! - [`BeansError`] - 容器错误分类
//!
//! ## 设计原则
//!
//! - 定义在首次实例化前可变，之后冻结
//! - 合并结果按值快照，不回写共享定义
//! - 名称是注册表的键，不存储在描述符上

pub mod definition;
pub mod errors;
pub mod merged;

pub use definition::*;
pub use errors::*;
pub use merged::*;

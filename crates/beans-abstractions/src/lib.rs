//! # Beans Abstractions
//!
//! 容器抽象层，定义 bean 注册、解析和作用域管理的核心接口。
//!
//! ## 核心接口
//!
//! - [`BeanDefinitionRegistry`] - 定义注册表接口
//! - [`BeanFactory`] - 按名称解析的工厂接口
//! - [`BeanScope`] - 作用域 get-or-create 契约
//! - [`ClassResolver`] - 类型解析协作方接口
//! - [`BeanClass`] - 类元数据描述符

pub mod class;
pub mod container;
pub mod factory;
pub mod registry;
pub mod scope;

pub use class::*;
pub use container::*;
pub use factory::*;
pub use registry::*;
pub use scope::*;

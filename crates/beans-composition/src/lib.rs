//! # Beans Composition
//!
//! 容器组合层，把定义、类描述符和配置组装成可运行的容器。
//!
//! ## 使用方式
//!
//! ```ignore
//! let container = ContainerBootstrapper::new(
//!     ContainerBuilder::new()
//!         .register_class(user_class())
//!         .register_definition("user", BeanDefinition::for_class("demo::User")),
//! )
//! .bootstrap()
//! .await?;
//! ```

pub mod bootstrapper;
pub mod builder;

pub use bootstrapper::ContainerBootstrapper;
pub use builder::ContainerBuilder;

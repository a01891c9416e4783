//! 容器启动器
//!
//! 协调容器的启动流程：组装、可选的预实例化和关闭。

use crate::builder::ContainerBuilder;
use beans_common::BeansResult;
use beans_impl::DefaultBeanContainer;
use std::sync::Arc;
use tracing::info;

/// 容器启动器
pub struct ContainerBootstrapper {
    builder: ContainerBuilder,
    eager_init: Option<bool>,
}

impl ContainerBootstrapper {
    /// 从构建器创建启动器
    pub fn new(builder: ContainerBuilder) -> Self {
        Self {
            builder,
            eager_init: None,
        }
    }

    /// 覆盖配置中的预实例化开关
    pub fn with_eager_init(mut self, enabled: bool) -> Self {
        self.eager_init = Some(enabled);
        self
    }

    /// 启动容器
    ///
    /// 组装容器后按配置预实例化非延迟单例。预实例化失败时
    /// 启动中止，错误指明失败的 bean。
    pub async fn bootstrap(self) -> BeansResult<Arc<DefaultBeanContainer>> {
        info!("开始启动容器");
        let eager_override = self.eager_init;
        let container = self.builder.build()?;
        let eager = eager_override.unwrap_or(container.config().eager_init);
        if eager {
            container.preinstantiate_singletons().await?;
        }
        info!("容器启动完成");
        Ok(container)
    }

    /// 关闭容器，丢弃全部单例实例
    pub fn shutdown(container: &DefaultBeanContainer) {
        info!("开始关闭容器");
        container.close();
        info!("容器关闭完成");
    }
}

//! 容器配置

use serde::Deserialize;

/// 容器配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// 是否允许同名定义覆盖注册
    pub allow_definition_overriding: bool,
    /// 最大解析深度，防止失控递归
    pub max_resolution_depth: usize,
    /// 启动时是否预实例化非延迟单例
    pub eager_init: bool,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            allow_definition_overriding: true,
            max_resolution_depth: 100,
            eager_init: true,
        }
    }
}

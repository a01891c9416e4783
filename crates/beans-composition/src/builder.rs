//! 容器构建器
//!
//! 使用建造者模式收集定义、类描述符、扩展作用域和配置，
//! 一次性组装出容器实例。

use beans_abstractions::{
    BeanClass, BeanDefinitionRegistry, BeanScope, ClassResolver, ContainerConfig,
};
use beans_common::{BeanDefinition, BeansError, BeansResult};
use beans_impl::{DefaultBeanContainer, StaticClassRegistry};
use std::sync::Arc;
use tracing::{debug, info};

/// 容器构建器
pub struct ContainerBuilder {
    config: ContainerConfig,
    classes: StaticClassRegistry,
    definitions: Vec<(String, BeanDefinition)>,
    scopes: Vec<(String, Arc<dyn BeanScope>)>,
}

impl ContainerBuilder {
    /// 创建新的构建器
    pub fn new() -> Self {
        Self {
            config: ContainerConfig::default(),
            classes: StaticClassRegistry::new(),
            definitions: Vec::new(),
            scopes: Vec::new(),
        }
    }

    /// 设置容器配置
    pub fn with_config(mut self, config: ContainerConfig) -> Self {
        self.config = config;
        self
    }

    /// 从 TOML 文本加载容器配置
    pub fn with_config_toml(mut self, content: &str) -> BeansResult<Self> {
        self.config = toml::from_str(content).map_err(|e| {
            BeansError::invalid_definition("<container config>", e.to_string())
        })?;
        info!("从 TOML 加载容器配置");
        Ok(self)
    }

    /// 注册类描述符
    pub fn register_class(self, class: BeanClass) -> Self {
        debug!("注册类描述符: {}", class.name);
        self.classes.register(class);
        self
    }

    /// 注册 bean 定义
    pub fn register_definition(
        mut self,
        name: impl Into<String>,
        definition: BeanDefinition,
    ) -> Self {
        self.definitions.push((name.into(), definition));
        self
    }

    /// 注册扩展作用域
    pub fn register_scope(mut self, name: impl Into<String>, scope: Arc<dyn BeanScope>) -> Self {
        self.scopes.push((name.into(), scope));
        self
    }

    /// 组装容器
    ///
    /// 定义按收集顺序注册，重复名称遵循配置的覆盖策略。
    pub fn build(self) -> BeansResult<Arc<DefaultBeanContainer>> {
        let classes: Arc<dyn ClassResolver> = Arc::new(self.classes);
        let container = DefaultBeanContainer::new(self.config, classes);
        for (name, scope) in self.scopes {
            container.register_scope(name, scope);
        }
        for (name, definition) in self.definitions {
            container.register_definition(&name, definition)?;
        }
        info!("容器组装完成，共 {} 个定义", container.definition_count());
        Ok(container)
    }
}

impl Default for ContainerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

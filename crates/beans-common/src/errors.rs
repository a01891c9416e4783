//! 错误类型定义

use thiserror::Error;

/// 容器错误类型
///
/// 覆盖定义注册、合并、图解析、实例化和作用域管理的全部失败模式。
#[derive(Error, Debug)]
pub enum BeansError {
    #[error("bean 定义不存在: {name}")]
    NoSuchDefinition { name: String },

    #[error("bean 定义已存在且禁止覆盖: {name}")]
    DuplicateDefinition { name: String },

    #[error("bean 定义已冻结，拒绝修改: {name}")]
    DefinitionFrozen { name: String },

    #[error("抽象 bean 定义不可实例化: {name}")]
    AbstractDefinition { name: String },

    #[error("parent 链中检测到循环: {chain}")]
    CircularParentage { chain: String },

    #[error("检测到循环依赖: {}", cycle.join(" -> "))]
    CircularDependency { cycle: Vec<String> },

    #[error("依赖无法满足: bean {name} 需要 {requirement}")]
    UnsatisfiedDependency { name: String, requirement: String },

    #[error("自动装配歧义: {requirement} 有多个候选 [{}]", candidates.join(", "))]
    AmbiguousAutowire {
        requirement: String,
        candidates: Vec<String>,
    },

    #[error("没有匹配的工厂方法: bean {name}, 方法 {method}")]
    NoMatchingFactoryMethod { name: String, method: String },

    #[error("工厂方法歧义: bean {name}, 方法 {method} 有 {matches} 个匹配")]
    AmbiguousFactoryMethod {
        name: String,
        method: String,
        matches: usize,
    },

    #[error("类未注册: {class_name}")]
    NoSuchClass { class_name: String },

    #[error("bean 定义无效: {name}, 原因: {message}")]
    InvalidDefinition { name: String, message: String },

    #[error("类型不匹配: bean {name}, 期望 {expected}")]
    TypeMismatch { name: String, expected: String },

    #[error("作用域未注册: {scope}")]
    UnknownScope { scope: String },

    #[error("解析深度超限: bean {name}, 深度 {depth}")]
    ResolutionDepthExceeded { name: String, depth: usize },

    #[error("bean 创建失败: {name}, 原因: {source}")]
    BeanCreation {
        name: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("容器启动失败: bean {name}, 原因: {source}")]
    BootstrapFailed {
        name: String,
        #[source]
        source: Box<BeansError>,
    },
}

impl BeansError {
    /// 创建定义无效错误
    pub fn invalid_definition(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidDefinition {
            name: name.into(),
            message: message.into(),
        }
    }

    /// 包装应用侧构造失败
    pub fn creation(
        name: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::BeanCreation {
            name: name.into(),
            source: source.into(),
        }
    }

    /// 包装启动阶段失败，保留起因 bean 名称
    pub fn bootstrap(name: impl Into<String>, source: BeansError) -> Self {
        Self::BootstrapFailed {
            name: name.into(),
            source: Box::new(source),
        }
    }
}

/// 结果类型别名
pub type BeansResult<T> = Result<T, BeansError>;

//! 合并后的 bean 定义
//!
//! parent 链解析完成后的有效描述符，创建后不可变。

use crate::definition::{
    BeanDefinition, BeanRole, ConstructorArgumentValues, MutablePropertyValues, SCOPE_PROTOTYPE,
    SCOPE_SINGLETON,
};
use crate::errors::{BeansError, BeansResult};

/// 合并定义
///
/// 由合并器从展平后的有效定义构造，所有可选标志已落到具体值。
/// 通过 `Arc` 缓存共享，使用方只读。
#[derive(Debug, Clone)]
pub struct MergedBeanDefinition {
    name: String,
    bean_class_name: Option<String>,
    scope: String,
    lazy_init: bool,
    depends_on: Vec<String>,
    autowire_candidate: bool,
    primary: bool,
    factory_bean_name: Option<String>,
    factory_method_name: Option<String>,
    constructor_argument_values: ConstructorArgumentValues,
    property_values: MutablePropertyValues,
    abstract_def: bool,
    role: BeanRole,
    resource_description: Option<String>,
}

impl MergedBeanDefinition {
    /// 从展平后的有效定义构造合并定义
    pub fn from_effective(name: impl Into<String>, effective: BeanDefinition) -> Self {
        Self {
            name: name.into(),
            bean_class_name: effective.bean_class_name,
            scope: effective
                .scope
                .unwrap_or_else(|| SCOPE_SINGLETON.to_string()),
            lazy_init: effective.lazy_init.unwrap_or(false),
            depends_on: effective.depends_on,
            autowire_candidate: effective.autowire_candidate.unwrap_or(true),
            primary: effective.primary.unwrap_or(false),
            factory_bean_name: effective.factory_bean_name,
            factory_method_name: effective.factory_method_name,
            constructor_argument_values: effective.constructor_argument_values,
            property_values: effective.property_values,
            abstract_def: effective.abstract_def,
            role: effective.role.unwrap_or_default(),
            resource_description: effective.resource_description,
        }
    }

    /// bean 名称
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 类名（如果有）
    pub fn bean_class_name(&self) -> Option<&str> {
        self.bean_class_name.as_deref()
    }

    /// 作用域名称
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// 是否为共享单例
    pub fn is_singleton(&self) -> bool {
        self.scope == SCOPE_SINGLETON
    }

    /// 是否为独立原型
    pub fn is_prototype(&self) -> bool {
        self.scope == SCOPE_PROTOTYPE
    }

    /// 是否延迟初始化
    pub fn is_lazy_init(&self) -> bool {
        self.lazy_init
    }

    /// 初始化顺序依赖
    pub fn depends_on(&self) -> &[String] {
        &self.depends_on
    }

    /// 是否参与类型自动装配
    pub fn is_autowire_candidate(&self) -> bool {
        self.autowire_candidate
    }

    /// 是否为优先候选
    pub fn is_primary(&self) -> bool {
        self.primary
    }

    /// 工厂 bean 名称
    pub fn factory_bean_name(&self) -> Option<&str> {
        self.factory_bean_name.as_deref()
    }

    /// 工厂方法名称
    pub fn factory_method_name(&self) -> Option<&str> {
        self.factory_method_name.as_deref()
    }

    /// 构造参数值
    pub fn constructor_argument_values(&self) -> &ConstructorArgumentValues {
        &self.constructor_argument_values
    }

    /// 属性值
    pub fn property_values(&self) -> &MutablePropertyValues {
        &self.property_values
    }

    /// 是否为抽象定义
    pub fn is_abstract(&self) -> bool {
        self.abstract_def
    }

    /// 角色分类
    pub fn role(&self) -> BeanRole {
        self.role
    }

    /// 来源资源描述
    pub fn resource_description(&self) -> Option<&str> {
        self.resource_description.as_deref()
    }

    /// 校验合并定义可实例化
    ///
    /// 合并形式必须恰好落在两种策略之一：具体类名，或工厂方法。
    /// 两者皆无在实例化时报错。
    pub fn validate(&self) -> BeansResult<()> {
        if self.bean_class_name.is_none() && self.factory_method_name.is_none() {
            return Err(BeansError::invalid_definition(
                &self.name,
                "既未指定类名也未指定工厂方法",
            ));
        }
        if self.factory_bean_name.is_some() && self.factory_method_name.is_none() {
            return Err(BeansError::invalid_definition(
                &self.name,
                "指定了工厂 bean 但缺少工厂方法名",
            ));
        }
        Ok(())
    }

    /// 构造参数和属性值中引用的所有 bean 名称
    ///
    /// 构成依赖图的隐式边，与 depends_on 的显式边共同决定实例化顺序。
    pub fn reference_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        for holder in self.constructor_argument_values.iter() {
            if let Some(name) = holder.value.ref_name() {
                names.push(name.to_string());
            }
        }
        for pv in self.property_values.iter() {
            if let Some(name) = pv.value.ref_name() {
                names.push(name.to_string());
            }
        }
        names
    }
}

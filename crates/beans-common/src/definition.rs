//! bean 定义数据模型
//!
//! [`BeanDefinition`] 描述一个命名组件如何被构造和配置：
//! 类名或工厂方法、构造参数、属性值、作用域和生命周期标志。
//! 定义通过 parent 链继承未显式设置的属性，由合并器解析为
//! 不可变的合并定义。

use serde::{Deserialize, Serialize};
use std::any::Any;
use std::collections::BTreeMap;
use std::sync::Arc;

/// 标准单例作用域标识
pub const SCOPE_SINGLETON: &str = "singleton";

/// 标准原型作用域标识
pub const SCOPE_PROTOTYPE: &str = "prototype";

/// bean 定义角色分类
///
/// 仅作为诊断元数据，对解析行为无影响。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BeanRole {
    /// 应用主要组成部分
    Application,
    /// 配置支撑部分
    Support,
    /// 框架内部基础设施
    Infrastructure,
}

impl BeanRole {
    /// 角色的整数编码
    pub fn as_i32(self) -> i32 {
        match self {
            Self::Application => 0,
            Self::Support => 1,
            Self::Infrastructure => 2,
        }
    }
}

impl Default for BeanRole {
    fn default() -> Self {
        Self::Application
    }
}

/// 定义中的值或引用
#[derive(Clone)]
pub enum BeanValue {
    /// 字符串值
    Str(String),
    /// 整数值
    Int(i64),
    /// 浮点值
    Float(f64),
    /// 布尔值
    Bool(bool),
    /// 对另一个命名 bean 的引用，实例化时递归解析
    Ref(String),
    /// 不透明负载，原样传递给构造函数或属性设置器
    Any(Arc<dyn Any + Send + Sync>),
}

impl BeanValue {
    /// 创建 bean 引用
    pub fn reference(name: impl Into<String>) -> Self {
        Self::Ref(name.into())
    }

    /// 是否为 bean 引用
    pub fn is_reference(&self) -> bool {
        matches!(self, Self::Ref(_))
    }

    /// 引用的 bean 名称（如果是引用）
    pub fn ref_name(&self) -> Option<&str> {
        match self {
            Self::Ref(name) => Some(name),
            _ => None,
        }
    }
}

impl std::fmt::Debug for BeanValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Str(v) => f.debug_tuple("Str").field(v).finish(),
            Self::Int(v) => f.debug_tuple("Int").field(v).finish(),
            Self::Float(v) => f.debug_tuple("Float").field(v).finish(),
            Self::Bool(v) => f.debug_tuple("Bool").field(v).finish(),
            Self::Ref(name) => f.debug_tuple("Ref").field(name).finish(),
            Self::Any(_) => f.write_str("Any(<opaque>)"),
        }
    }
}

impl From<&str> for BeanValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for BeanValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<i64> for BeanValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for BeanValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for BeanValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

/// 构造参数持有者
#[derive(Debug, Clone)]
pub struct ValueHolder {
    /// 参数值或引用
    pub value: BeanValue,
    /// 可选的类型提示，用于参数匹配消歧
    pub type_hint: Option<String>,
}

impl ValueHolder {
    /// 创建无类型提示的持有者
    pub fn new(value: impl Into<BeanValue>) -> Self {
        Self {
            value: value.into(),
            type_hint: None,
        }
    }

    /// 创建带类型提示的持有者
    pub fn typed(value: impl Into<BeanValue>, type_hint: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            type_hint: Some(type_hint.into()),
        }
    }
}

/// 构造参数值集合
///
/// 显式索引条目优先匹配，未索引条目按声明顺序和类型提示匹配。
/// 首次实例化前可变。
#[derive(Debug, Clone, Default)]
pub struct ConstructorArgumentValues {
    indexed: BTreeMap<usize, ValueHolder>,
    generic: Vec<ValueHolder>,
}

impl ConstructorArgumentValues {
    /// 创建空集合
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加显式索引参数，同索引覆盖旧值
    pub fn add_indexed(&mut self, index: usize, holder: ValueHolder) {
        self.indexed.insert(index, holder);
    }

    /// 添加未索引参数
    pub fn add_generic(&mut self, holder: ValueHolder) {
        self.generic.push(holder);
    }

    /// 指定索引的参数
    pub fn get_indexed(&self, index: usize) -> Option<&ValueHolder> {
        self.indexed.get(&index)
    }

    /// 索引参数表，按索引升序
    pub fn indexed(&self) -> &BTreeMap<usize, ValueHolder> {
        &self.indexed
    }

    /// 未索引参数，按声明顺序
    pub fn generic(&self) -> &[ValueHolder] {
        &self.generic
    }

    /// 声明的参数总数
    pub fn len(&self) -> usize {
        self.indexed.len() + self.generic.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.indexed.is_empty() && self.generic.is_empty()
    }

    /// 所有持有者的迭代器，索引条目在前
    pub fn iter(&self) -> impl Iterator<Item = &ValueHolder> {
        self.indexed.values().chain(self.generic.iter())
    }
}

/// 单个属性值
#[derive(Debug, Clone)]
pub struct PropertyValue {
    /// 属性名
    pub name: String,
    /// 属性值或引用
    pub value: BeanValue,
}

/// 属性值集合
///
/// 保留插入顺序以保证错误信息确定性；同名属性覆盖时保留原位置。
#[derive(Debug, Clone, Default)]
pub struct MutablePropertyValues {
    values: Vec<PropertyValue>,
}

impl MutablePropertyValues {
    /// 创建空集合
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加或覆盖属性值
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<BeanValue>) {
        let name = name.into();
        let value = value.into();
        if let Some(existing) = self.values.iter_mut().find(|pv| pv.name == name) {
            existing.value = value;
        } else {
            self.values.push(PropertyValue { name, value });
        }
    }

    /// 指定名称的属性值
    pub fn get(&self, name: &str) -> Option<&BeanValue> {
        self.values
            .iter()
            .find(|pv| pv.name == name)
            .map(|pv| &pv.value)
    }

    /// 是否包含指定属性
    pub fn contains(&self, name: &str) -> bool {
        self.values.iter().any(|pv| pv.name == name)
    }

    /// 属性条目，按插入顺序
    pub fn iter(&self) -> impl Iterator<Item = &PropertyValue> {
        self.values.iter()
    }

    /// 属性数量
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// bean 定义描述符
///
/// 未显式设置的字段用 `None` 编码，合并时继承最近显式设置的
/// 祖先的值。名称不存储在描述符上，而是注册表的键。
#[derive(Debug, Clone, Default)]
pub struct BeanDefinition {
    /// 父定义名称，未设置属性从父链继承
    pub parent_name: Option<String>,
    /// 完全限定类名；使用工厂方法时可缺省
    pub bean_class_name: Option<String>,
    /// 作用域名称，默认 singleton
    pub scope: Option<String>,
    /// 是否延迟初始化
    pub lazy_init: Option<bool>,
    /// 必须先于本 bean 完成实例化的名称列表，仅用于排序
    pub depends_on: Vec<String>,
    /// 是否参与类型自动装配候选
    pub autowire_candidate: Option<bool>,
    /// 多候选时的优先标志
    pub primary: Option<bool>,
    /// 工厂 bean 名称；缺省时工厂方法按本类静态方法调用
    pub factory_bean_name: Option<String>,
    /// 工厂方法名称
    pub factory_method_name: Option<String>,
    /// 构造参数值
    pub constructor_argument_values: ConstructorArgumentValues,
    /// 属性值
    pub property_values: MutablePropertyValues,
    /// 抽象定义仅供继承，不可实例化
    pub abstract_def: bool,
    /// 角色分类，仅诊断用途
    pub role: Option<BeanRole>,
    /// 人类可读描述
    pub description: Option<String>,
    /// 来源资源描述，用于错误上下文
    pub resource_description: Option<String>,
    /// 派生来源定义的回溯引用，仅用于诊断链
    pub originating: Option<Arc<BeanDefinition>>,
}

impl BeanDefinition {
    /// 创建空定义
    pub fn new() -> Self {
        Self::default()
    }

    /// 创建指定类名的定义
    pub fn for_class(bean_class_name: impl Into<String>) -> Self {
        Self {
            bean_class_name: Some(bean_class_name.into()),
            ..Self::default()
        }
    }

    /// 创建指定父定义的子定义
    pub fn child_of(parent_name: impl Into<String>) -> Self {
        Self {
            parent_name: Some(parent_name.into()),
            ..Self::default()
        }
    }

    /// 设置作用域
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// 设置延迟初始化
    pub fn with_lazy_init(mut self, lazy_init: bool) -> Self {
        self.lazy_init = Some(lazy_init);
        self
    }

    /// 设置初始化顺序依赖
    pub fn with_depends_on(mut self, names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.depends_on = names.into_iter().map(Into::into).collect();
        self
    }

    /// 设置自动装配候选标志
    pub fn with_autowire_candidate(mut self, candidate: bool) -> Self {
        self.autowire_candidate = Some(candidate);
        self
    }

    /// 设置优先标志
    pub fn with_primary(mut self, primary: bool) -> Self {
        self.primary = Some(primary);
        self
    }

    /// 设置工厂方法，可选工厂 bean
    pub fn with_factory_method(
        mut self,
        factory_bean_name: Option<String>,
        factory_method_name: impl Into<String>,
    ) -> Self {
        self.factory_bean_name = factory_bean_name;
        self.factory_method_name = Some(factory_method_name.into());
        self
    }

    /// 添加构造参数
    pub fn with_constructor_arg(mut self, holder: ValueHolder) -> Self {
        self.constructor_argument_values.add_generic(holder);
        self
    }

    /// 添加显式索引构造参数
    pub fn with_indexed_constructor_arg(mut self, index: usize, holder: ValueHolder) -> Self {
        self.constructor_argument_values.add_indexed(index, holder);
        self
    }

    /// 添加属性值
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<BeanValue>) -> Self {
        self.property_values.add(name, value);
        self
    }

    /// 设置为抽象定义
    pub fn with_abstract(mut self, abstract_def: bool) -> Self {
        self.abstract_def = abstract_def;
        self
    }

    /// 设置角色
    pub fn with_role(mut self, role: BeanRole) -> Self {
        self.role = Some(role);
        self
    }

    /// 设置描述
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// 设置来源资源描述
    pub fn with_resource_description(mut self, resource: impl Into<String>) -> Self {
        self.resource_description = Some(resource.into());
        self
    }

    /// 设置派生来源定义
    pub fn with_originating(mut self, origin: Arc<BeanDefinition>) -> Self {
        self.originating = Some(origin);
        self
    }

    /// 派生链上所有来源的资源描述，最近的在前
    ///
    /// 仅用于错误报告，合并和实例化逻辑不读取此链。
    pub fn origin_chain(&self) -> Vec<String> {
        let mut chain = Vec::new();
        let mut current = self.originating.as_deref();
        while let Some(def) = current {
            chain.push(
                def.resource_description
                    .clone()
                    .unwrap_or_else(|| "<unknown origin>".to_string()),
            );
            current = def.originating.as_deref();
        }
        chain
    }
}

//! 类元数据模型
//!
//! 容器本身不做反射。类型解析协作方以 [`BeanClass`] 描述符的形式
//! 提供可构造类型的信息：构造函数签名、属性设置器、工厂方法和
//! 感知回调槽位。容器按类名查找描述符并通过闭包完成调用。

use crate::factory::ContainerHandle;
use beans_common::{BeansError, BeansResult};
use std::any::{Any, TypeId};
use std::sync::Arc;

/// 容器产出的实例
pub type BeanInstance = Arc<dyn Any + Send + Sync>;

/// 属性填充和回调阶段的原始实例
pub type RawInstance = Box<dyn Any + Send + Sync>;

/// 运行时解析后的参数或属性值
///
/// 定义中的引用在这一步已经解析为实例。
#[derive(Clone)]
pub enum ResolvedValue {
    /// 字符串值
    Str(String),
    /// 整数值
    Int(i64),
    /// 浮点值
    Float(f64),
    /// 布尔值
    Bool(bool),
    /// 已解析的 bean 实例或不透明负载
    Object(BeanInstance),
    /// 未设置；可选参数自动装配无候选时传入
    None,
}

impl std::fmt::Debug for ResolvedValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Str(v) => f.debug_tuple("Str").field(v).finish(),
            Self::Int(v) => f.debug_tuple("Int").field(v).finish(),
            Self::Float(v) => f.debug_tuple("Float").field(v).finish(),
            Self::Bool(v) => f.debug_tuple("Bool").field(v).finish(),
            Self::Object(_) => f.write_str("Object(<instance>)"),
            Self::None => f.write_str("None"),
        }
    }
}

impl ResolvedValue {
    /// 值的粗粒度类型名，用于参数匹配和错误信息
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Str(_) => "String",
            Self::Int(_) => "i64",
            Self::Float(_) => "f64",
            Self::Bool(_) => "bool",
            Self::Object(_) => "Object",
            Self::None => "None",
        }
    }
}

/// 从解析值到具体参数类型的转换
pub trait FromResolvedValue: Sized {
    /// 执行转换，类型不符时报 `TypeMismatch`
    fn from_resolved(value: ResolvedValue) -> BeansResult<Self>;
}

fn mismatch<T>() -> BeansError {
    BeansError::TypeMismatch {
        name: "<value>".to_string(),
        expected: std::any::type_name::<T>().to_string(),
    }
}

impl FromResolvedValue for String {
    fn from_resolved(value: ResolvedValue) -> BeansResult<Self> {
        match value {
            ResolvedValue::Str(v) => Ok(v),
            _ => Err(mismatch::<Self>()),
        }
    }
}

impl FromResolvedValue for i64 {
    fn from_resolved(value: ResolvedValue) -> BeansResult<Self> {
        match value {
            ResolvedValue::Int(v) => Ok(v),
            _ => Err(mismatch::<Self>()),
        }
    }
}

impl FromResolvedValue for i32 {
    fn from_resolved(value: ResolvedValue) -> BeansResult<Self> {
        match value {
            ResolvedValue::Int(v) => i32::try_from(v).map_err(|_| mismatch::<Self>()),
            _ => Err(mismatch::<Self>()),
        }
    }
}

impl FromResolvedValue for f64 {
    fn from_resolved(value: ResolvedValue) -> BeansResult<Self> {
        match value {
            ResolvedValue::Float(v) => Ok(v),
            ResolvedValue::Int(v) => Ok(v as f64),
            _ => Err(mismatch::<Self>()),
        }
    }
}

impl FromResolvedValue for bool {
    fn from_resolved(value: ResolvedValue) -> BeansResult<Self> {
        match value {
            ResolvedValue::Bool(v) => Ok(v),
            _ => Err(mismatch::<Self>()),
        }
    }
}

impl<V: FromResolvedValue> FromResolvedValue for Option<V> {
    fn from_resolved(value: ResolvedValue) -> BeansResult<Self> {
        match value {
            ResolvedValue::None => Ok(None),
            other => V::from_resolved(other).map(Some),
        }
    }
}

impl<T: Any + Send + Sync> FromResolvedValue for Arc<T> {
    fn from_resolved(value: ResolvedValue) -> BeansResult<Self> {
        match value {
            ResolvedValue::Object(instance) => {
                instance.downcast::<T>().map_err(|_| mismatch::<Self>())
            }
            _ => Err(mismatch::<Self>()),
        }
    }
}

/// 构造函数或工厂方法的参数描述
#[derive(Debug, Clone)]
pub struct ParameterDescriptor {
    /// 参数名
    pub name: String,
    /// 声明类型名，用于类型提示匹配和自动装配
    pub type_name: String,
    /// 是否必需；可选参数未匹配时保持缺省
    pub required: bool,
}

impl ParameterDescriptor {
    /// 创建必需参数
    pub fn required(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            required: true,
        }
    }

    /// 创建可选参数
    pub fn optional(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            required: false,
        }
    }
}

/// 构造函数调用闭包
pub type ConstructorFn = Arc<dyn Fn(Vec<ResolvedValue>) -> BeansResult<RawInstance> + Send + Sync>;

/// 工厂方法调用闭包
///
/// 静态方法忽略目标实例；实例方法在工厂 bean 上调用。
pub type FactoryMethodFn = Arc<
    dyn Fn(Option<&(dyn Any + Send + Sync)>, Vec<ResolvedValue>) -> BeansResult<RawInstance>
        + Send
        + Sync,
>;

/// 属性设置闭包
pub type SetterFn =
    Arc<dyn Fn(&mut (dyn Any + Send + Sync), ResolvedValue) -> BeansResult<()> + Send + Sync>;

/// 构造函数描述符
#[derive(Clone)]
pub struct ConstructorDescriptor {
    /// 参数列表，按声明顺序
    pub parameters: Vec<ParameterDescriptor>,
    /// 调用闭包
    pub invoke: ConstructorFn,
}

impl std::fmt::Debug for ConstructorDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConstructorDescriptor")
            .field("parameters", &self.parameters)
            .field("invoke", &"<function>")
            .finish()
    }
}

/// 工厂方法描述符
#[derive(Clone)]
pub struct FactoryMethodDescriptor {
    /// 方法名
    pub name: String,
    /// 参数列表
    pub parameters: Vec<ParameterDescriptor>,
    /// 是否为静态方法
    pub is_static: bool,
    /// 调用闭包
    pub invoke: FactoryMethodFn,
}

impl std::fmt::Debug for FactoryMethodDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FactoryMethodDescriptor")
            .field("name", &self.name)
            .field("parameters", &self.parameters)
            .field("is_static", &self.is_static)
            .field("invoke", &"<function>")
            .finish()
    }
}

/// 属性描述符
#[derive(Clone)]
pub struct PropertyDescriptor {
    /// 属性名
    pub name: String,
    /// 声明类型名
    pub type_name: String,
    /// 设置闭包
    pub set: SetterFn,
}

impl std::fmt::Debug for PropertyDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropertyDescriptor")
            .field("name", &self.name)
            .field("type_name", &self.type_name)
            .field("set", &"<function>")
            .finish()
    }
}

/// bean 名称感知回调
pub type BeanNameAwareFn = Arc<dyn Fn(&mut (dyn Any + Send + Sync), &str) + Send + Sync>;

/// 容器感知回调
pub type ContainerAwareFn = Arc<dyn Fn(&mut (dyn Any + Send + Sync), ContainerHandle) + Send + Sync>;

/// 感知回调槽位
///
/// 能力以显式槽位声明：只有设置了对应槽位的类型才会收到回调。
/// 仅声明能力不带任何默认行为，调用完全由分发器驱动。
#[derive(Clone, Default)]
pub struct AwareCallbacks {
    /// 名称感知：实例化后收到自身的 bean 名称
    pub bean_name: Option<BeanNameAwareFn>,
    /// 容器感知：实例化后收到容器句柄
    pub container: Option<ContainerAwareFn>,
}

impl std::fmt::Debug for AwareCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwareCallbacks")
            .field("bean_name", &self.bean_name.is_some())
            .field("container", &self.container.is_some())
            .finish()
    }
}

/// 类描述符
///
/// 一个完全限定类名对应的可构造类型信息。
#[derive(Debug, Clone)]
pub struct BeanClass {
    /// 完全限定类名
    pub name: String,
    /// 具体 Rust 类型的 TypeId
    pub type_id: TypeId,
    /// 除自身类名外可赋值到的能力/接口名
    pub implements: Vec<String>,
    /// 构造函数列表
    pub constructors: Vec<ConstructorDescriptor>,
    /// 属性设置器列表
    pub properties: Vec<PropertyDescriptor>,
    /// 工厂方法列表
    pub factory_methods: Vec<FactoryMethodDescriptor>,
    /// 感知回调槽位
    pub aware: AwareCallbacks,
}

impl BeanClass {
    /// 创建指定类型的构建器
    pub fn builder<T: Any + Send + Sync>(name: impl Into<String>) -> BeanClassBuilder<T> {
        BeanClassBuilder::new(name)
    }

    /// 指定名称的属性描述符
    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// 指定名称的工厂方法候选
    pub fn factory_methods_named(&self, name: &str) -> Vec<&FactoryMethodDescriptor> {
        self.factory_methods
            .iter()
            .filter(|m| m.name == name)
            .collect()
    }

    /// 类是否可赋值到指定类型名
    pub fn is_assignable_to(&self, type_name: &str) -> bool {
        self.name == type_name || self.implements.iter().any(|i| i == type_name)
    }
}

/// 类描述符构建器
///
/// 以具体类型 `T` 为锚点，把强类型闭包包装成描述符需要的
/// 类型擦除形式。
pub struct BeanClassBuilder<T> {
    name: String,
    implements: Vec<String>,
    constructors: Vec<ConstructorDescriptor>,
    properties: Vec<PropertyDescriptor>,
    factory_methods: Vec<FactoryMethodDescriptor>,
    aware: AwareCallbacks,
    _marker: std::marker::PhantomData<fn() -> T>,
}

impl<T: Any + Send + Sync> BeanClassBuilder<T> {
    /// 创建构建器
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            implements: Vec::new(),
            constructors: Vec::new(),
            properties: Vec::new(),
            factory_methods: Vec::new(),
            aware: AwareCallbacks::default(),
            _marker: std::marker::PhantomData,
        }
    }

    /// 声明可赋值的能力名
    pub fn implements(mut self, capability: impl Into<String>) -> Self {
        self.implements.push(capability.into());
        self
    }

    /// 添加构造函数
    pub fn constructor<F>(mut self, parameters: Vec<ParameterDescriptor>, ctor: F) -> Self
    where
        F: Fn(Vec<ResolvedValue>) -> BeansResult<T> + Send + Sync + 'static,
    {
        self.constructors.push(ConstructorDescriptor {
            parameters,
            invoke: Arc::new(move |args| ctor(args).map(|t| Box::new(t) as RawInstance)),
        });
        self
    }

    /// 添加无参构造函数
    pub fn default_constructor<F>(self, ctor: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.constructor(Vec::new(), move |_| Ok(ctor()))
    }

    /// 添加属性设置器
    pub fn property<V, F>(mut self, name: impl Into<String>, setter: F) -> Self
    where
        V: FromResolvedValue + 'static,
        F: Fn(&mut T, V) + Send + Sync + 'static,
    {
        let name = name.into();
        self.properties.push(PropertyDescriptor {
            name,
            type_name: std::any::type_name::<V>().to_string(),
            set: Arc::new(move |target, value| {
                let target = target
                    .downcast_mut::<T>()
                    .ok_or_else(|| BeansError::TypeMismatch {
                        name: "<target>".to_string(),
                        expected: std::any::type_name::<T>().to_string(),
                    })?;
                setter(target, V::from_resolved(value)?);
                Ok(())
            }),
        });
        self
    }

    /// 添加静态工厂方法
    ///
    /// 产出类型可以与类自身不同。
    pub fn static_factory_method<R, F>(
        mut self,
        name: impl Into<String>,
        parameters: Vec<ParameterDescriptor>,
        method: F,
    ) -> Self
    where
        R: Any + Send + Sync,
        F: Fn(Vec<ResolvedValue>) -> BeansResult<R> + Send + Sync + 'static,
    {
        self.factory_methods.push(FactoryMethodDescriptor {
            name: name.into(),
            parameters,
            is_static: true,
            invoke: Arc::new(move |_target, args| {
                method(args).map(|r| Box::new(r) as RawInstance)
            }),
        });
        self
    }

    /// 添加实例工厂方法，在工厂 bean 上调用
    pub fn factory_method<R, F>(
        mut self,
        name: impl Into<String>,
        parameters: Vec<ParameterDescriptor>,
        method: F,
    ) -> Self
    where
        R: Any + Send + Sync,
        F: Fn(&T, Vec<ResolvedValue>) -> BeansResult<R> + Send + Sync + 'static,
    {
        self.factory_methods.push(FactoryMethodDescriptor {
            name: name.into(),
            parameters,
            is_static: false,
            invoke: Arc::new(move |target, args| {
                let target = target
                    .and_then(|t| t.downcast_ref::<T>())
                    .ok_or_else(|| BeansError::TypeMismatch {
                        name: "<factory bean>".to_string(),
                        expected: std::any::type_name::<T>().to_string(),
                    })?;
                method(target, args).map(|r| Box::new(r) as RawInstance)
            }),
        });
        self
    }

    /// 设置名称感知回调
    pub fn bean_name_aware<F>(mut self, callback: F) -> Self
    where
        F: Fn(&mut T, &str) + Send + Sync + 'static,
    {
        self.aware.bean_name = Some(Arc::new(move |target, name| {
            if let Some(target) = target.downcast_mut::<T>() {
                callback(target, name);
            }
        }));
        self
    }

    /// 设置容器感知回调
    pub fn container_aware<F>(mut self, callback: F) -> Self
    where
        F: Fn(&mut T, ContainerHandle) + Send + Sync + 'static,
    {
        self.aware.container = Some(Arc::new(move |target, handle| {
            if let Some(target) = target.downcast_mut::<T>() {
                callback(target, handle);
            }
        }));
        self
    }

    /// 完成构建
    pub fn build(self) -> BeanClass {
        BeanClass {
            name: self.name,
            type_id: TypeId::of::<T>(),
            implements: self.implements,
            constructors: self.constructors,
            properties: self.properties,
            factory_methods: self.factory_methods,
            aware: self.aware,
        }
    }
}

/// 类型解析协作方接口
///
/// 给定类名字符串返回可构造的类描述符。
pub trait ClassResolver: Send + Sync {
    /// 按类名解析描述符，未注册时报 `NoSuchClass`
    fn resolve_class(&self, class_name: &str) -> BeansResult<Arc<BeanClass>>;

    /// 是否注册了指定类名
    fn contains_class(&self, class_name: &str) -> bool;
}

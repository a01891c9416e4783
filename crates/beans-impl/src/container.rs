//! 默认 bean 容器
//!
//! 把定义存储、合并器、作用域表和类型解析协作方组装成完整的
//! 解析管线：合并定义、冻结定义链、排序依赖、选择实例化策略、
//! 填充属性、分发感知回调，最后交给作用域缓存。

use crate::autowire;
use crate::aware;
use crate::context::ResolveContext;
use crate::graph;
use crate::instantiate::{self, ParamBinding};
use crate::merge::DefinitionMerger;
use crate::registry::DefinitionStore;
use crate::scopes::{PrototypeScope, SingletonScope};
use async_trait::async_trait;
use beans_abstractions::{
    BeanClass, BeanCreator, BeanDefinitionRegistry, BeanFactory, BeanInstance, BeanScope,
    ClassResolver, ContainerConfig, ContainerHandle, RawInstance, ResolvedValue,
};
use beans_common::{
    BeanDefinition, BeansError, BeansResult, BeanValue, MergedBeanDefinition, SCOPE_PROTOTYPE,
    SCOPE_SINGLETON,
};
use dashmap::DashMap;
use futures::future::BoxFuture;
use once_cell::sync::OnceCell;
use std::any::Any;
use std::sync::{Arc, Weak};
use tracing::{debug, error, info, warn};

/// 默认容器
///
/// 通过 [`DefaultBeanContainer::new`] 创建，始终以 `Arc` 持有，
/// 内部保存自身的弱引用供容器感知回调使用。
pub struct DefaultBeanContainer {
    config: ContainerConfig,
    store: DefinitionStore,
    merger: DefinitionMerger,
    classes: Arc<dyn ClassResolver>,
    scopes: DashMap<String, Arc<dyn BeanScope>>,
    singletons: Arc<SingletonScope>,
    self_handle: OnceCell<Weak<DefaultBeanContainer>>,
}

impl DefaultBeanContainer {
    /// 创建容器
    ///
    /// 内置 singleton 和 prototype 两个作用域，扩展作用域通过
    /// [`DefaultBeanContainer::register_scope`] 接入。
    pub fn new(config: ContainerConfig, classes: Arc<dyn ClassResolver>) -> Arc<Self> {
        let singletons = Arc::new(SingletonScope::new());
        let container = Arc::new(Self {
            store: DefinitionStore::new(config.allow_definition_overriding),
            merger: DefinitionMerger::new(),
            classes,
            scopes: DashMap::new(),
            singletons: singletons.clone(),
            self_handle: OnceCell::new(),
            config,
        });
        container
            .scopes
            .insert(SCOPE_SINGLETON.to_string(), singletons as Arc<dyn BeanScope>);
        container.scopes.insert(
            SCOPE_PROTOTYPE.to_string(),
            Arc::new(PrototypeScope::new()) as Arc<dyn BeanScope>,
        );
        let _ = container.self_handle.set(Arc::downgrade(&container));
        container
    }

    /// 容器配置
    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    /// 注册扩展作用域，同名覆盖
    pub fn register_scope(&self, name: impl Into<String>, scope: Arc<dyn BeanScope>) {
        let name = name.into();
        info!("注册作用域: {}", name);
        self.scopes.insert(name, scope);
    }

    /// 获取合并定义
    pub fn merged_definition(&self, name: &str) -> BeansResult<Arc<MergedBeanDefinition>> {
        self.merger.resolve(&self.store, name)
    }

    /// 是否已缓存指定名称的单例
    pub fn contains_singleton(&self, name: &str) -> bool {
        self.singletons.contains(name)
    }

    /// 按名称解析 bean 实例
    ///
    /// 每次调用持有独立的解析链，循环依赖和深度超限在链上
    /// 检测并报错。
    pub async fn get_bean(&self, name: &str) -> BeansResult<BeanInstance> {
        let mut ctx = ResolveContext::new(self.config.max_resolution_depth);
        self.resolve_named(name.to_string(), &mut ctx).await
    }

    /// 预实例化所有非延迟单例
    ///
    /// 先对种子集合做整体拓扑排序，让循环配置在创建任何实例
    /// 之前失败，再按依赖顺序逐个创建。任何失败都会中止启动。
    pub async fn preinstantiate_singletons(&self) -> BeansResult<()> {
        let names = self.store.names();
        let mut seeds = Vec::new();
        for name in &names {
            let merged = self
                .merger
                .resolve(&self.store, name)
                .map_err(|e| BeansError::bootstrap(name.clone(), e))?;
            if merged.is_singleton() && !merged.is_lazy_init() && !merged.is_abstract() {
                seeds.push(name.clone());
            }
        }
        info!("开始预实例化非延迟单例，共 {} 个", seeds.len());

        let order = graph::instantiation_order(&seeds, |n| self.merger.resolve(&self.store, n))
            .map_err(|e| {
                let name = match &e {
                    BeansError::CircularDependency { cycle } => {
                        cycle.first().cloned().unwrap_or_default()
                    }
                    _ => String::new(),
                };
                BeansError::bootstrap(name, e)
            })?;

        let mut created = 0usize;
        for name in &order {
            let merged = self
                .merger
                .resolve(&self.store, name)
                .map_err(|e| BeansError::bootstrap(name.clone(), e))?;
            // 排序结果里可能混有原型或延迟依赖，留给按需创建
            if !merged.is_singleton() || merged.is_lazy_init() || merged.is_abstract() {
                continue;
            }
            if let Err(e) = self.get_bean(name).await {
                error!("预实例化 bean {} 失败: {}", name, e);
                return Err(BeansError::bootstrap(name.clone(), e));
            }
            created += 1;
        }
        info!("预实例化完成，共创建 {} 个单例", created);
        Ok(())
    }

    /// 关闭容器，清空单例缓存
    pub fn close(&self) {
        info!("关闭容器，丢弃 {} 个单例实例", self.singletons.len());
        self.singletons.clear();
        self.merger.clear();
    }

    fn handle(&self) -> ContainerHandle {
        let weak: Weak<DefaultBeanContainer> =
            self.self_handle.get().cloned().unwrap_or_else(Weak::new);
        ContainerHandle::new(weak)
    }

    fn resolve_named<'s>(
        &'s self,
        name: String,
        ctx: &'s mut ResolveContext,
    ) -> BoxFuture<'s, BeansResult<BeanInstance>> {
        Box::pin(async move {
            let (merged, chain) = self.merger.resolve_with_chain(&self.store, &name)?;
            if merged.is_abstract() {
                return Err(BeansError::AbstractDefinition { name });
            }
            merged.validate()?;
            // 首次实例化请求冻结整条定义链
            self.store.freeze(&chain);
            ctx.push(&name)?;
            let result = self.resolve_in_scope(&name, &merged, ctx).await;
            ctx.pop();
            result
        })
    }

    async fn resolve_in_scope(
        &self,
        name: &str,
        merged: &Arc<MergedBeanDefinition>,
        ctx: &mut ResolveContext,
    ) -> BeansResult<BeanInstance> {
        // dependsOn 仅用于排序，先于本 bean 完成实例化
        for dep in merged.depends_on() {
            self.resolve_named(dep.clone(), ctx).await?;
        }
        let scope = self
            .scopes
            .get(merged.scope())
            .map(|entry| entry.value().clone())
            .ok_or_else(|| BeansError::UnknownScope {
                scope: merged.scope().to_string(),
            })?;
        let bean_name = name.to_string();
        let definition = merged.clone();
        let creator: BeanCreator<'_> = Box::new(move || {
            Box::pin(async move { self.create_bean(&bean_name, &definition, ctx).await })
        });
        scope.get(name, creator).await
    }

    async fn create_bean(
        &self,
        name: &str,
        merged: &MergedBeanDefinition,
        ctx: &mut ResolveContext,
    ) -> BeansResult<BeanInstance> {
        debug!("创建 bean 实例: {}", name);
        let (mut raw, instance_class) = if merged.factory_method_name().is_some() {
            self.instantiate_by_factory_method(name, merged, ctx).await?
        } else {
            self.instantiate_by_constructor(name, merged, ctx).await?
        };
        self.apply_property_values(name, merged, instance_class.as_deref(), raw.as_mut(), ctx)
            .await?;
        if let Some(class) = &instance_class {
            aware::dispatch(class, name, raw.as_mut(), self.handle());
        }
        Ok(Arc::from(raw))
    }

    async fn instantiate_by_constructor(
        &self,
        name: &str,
        merged: &MergedBeanDefinition,
        ctx: &mut ResolveContext,
    ) -> BeansResult<(RawInstance, Option<Arc<BeanClass>>)> {
        let class_name = merged.bean_class_name().ok_or_else(|| {
            BeansError::invalid_definition(name, "构造函数策略需要类名")
        })?;
        let class = self.classes.resolve_class(class_name)?;
        let (ctor, bindings) = instantiate::select_constructor(
            name,
            &class.constructors,
            merged.constructor_argument_values(),
        )?;
        let invoke = ctor.invoke.clone();
        let args = self.resolve_bindings(name, bindings, ctx).await?;
        let raw = invoke(args).map_err(|e| match e {
            err @ BeansError::TypeMismatch { .. } => err,
            err => BeansError::creation(name, err),
        })?;
        Ok((raw, Some(class)))
    }

    async fn instantiate_by_factory_method(
        &self,
        name: &str,
        merged: &MergedBeanDefinition,
        ctx: &mut ResolveContext,
    ) -> BeansResult<(RawInstance, Option<Arc<BeanClass>>)> {
        let method_name = merged
            .factory_method_name()
            .ok_or_else(|| BeansError::invalid_definition(name, "缺少工厂方法名"))?
            .to_string();

        // 实例工厂方法在工厂 bean 上调用，静态方法在本类上调用
        let (target_class, target_instance, want_static) = match merged.factory_bean_name() {
            Some(factory_bean) => {
                let instance = self.resolve_named(factory_bean.to_string(), ctx).await?;
                let factory_merged = self.merger.resolve(&self.store, factory_bean)?;
                let class_name = factory_merged.bean_class_name().ok_or_else(|| {
                    BeansError::invalid_definition(
                        name,
                        format!("工厂 bean {factory_bean} 缺少类名"),
                    )
                })?;
                (self.classes.resolve_class(class_name)?, Some(instance), false)
            }
            None => {
                let class_name = merged.bean_class_name().ok_or_else(|| {
                    BeansError::invalid_definition(name, "静态工厂方法需要本地类名")
                })?;
                (self.classes.resolve_class(class_name)?, None, true)
            }
        };

        let candidates: Vec<_> = target_class
            .factory_methods_named(&method_name)
            .into_iter()
            .filter(|m| m.is_static == want_static)
            .collect();
        let (method, bindings) = instantiate::select_factory_method(
            name,
            &method_name,
            candidates,
            merged.constructor_argument_values(),
        )?;
        let invoke = method.invoke.clone();
        let args = self.resolve_bindings(name, bindings, ctx).await?;
        let raw = invoke(target_instance.as_deref(), args).map_err(|e| match e {
            err @ BeansError::TypeMismatch { .. } => err,
            err => BeansError::creation(name, err),
        })?;

        // 产物类型可能不同于工厂类，按本定义的类名匹配产物描述符
        let instance_class = self.class_for_product(merged, raw.as_ref());
        Ok((raw, instance_class))
    }

    fn class_for_product(
        &self,
        merged: &MergedBeanDefinition,
        raw: &(dyn Any + Send + Sync),
    ) -> Option<Arc<BeanClass>> {
        let class_name = merged.bean_class_name()?;
        let class = self.classes.resolve_class(class_name).ok()?;
        (class.type_id == raw.type_id()).then_some(class)
    }

    async fn apply_property_values(
        &self,
        name: &str,
        merged: &MergedBeanDefinition,
        class: Option<&BeanClass>,
        raw: &mut (dyn Any + Send + Sync),
        ctx: &mut ResolveContext,
    ) -> BeansResult<()> {
        if merged.property_values().is_empty() {
            return Ok(());
        }
        let class = class.ok_or_else(|| {
            BeansError::invalid_definition(name, "无法确定实例类型，不能应用属性值")
        })?;
        for pv in merged.property_values().iter() {
            let descriptor = class.property(&pv.name).ok_or_else(|| {
                BeansError::invalid_definition(
                    name,
                    format!("类 {} 没有属性 {}", class.name, pv.name),
                )
            })?;
            let resolved = self.resolve_value(&pv.value, ctx).await?;
            (descriptor.set)(&mut *raw, resolved).map_err(|e| match e {
                err @ BeansError::TypeMismatch { .. } => err,
                err => BeansError::creation(name, err),
            })?;
        }
        Ok(())
    }

    async fn resolve_value(
        &self,
        value: &BeanValue,
        ctx: &mut ResolveContext,
    ) -> BeansResult<ResolvedValue> {
        Ok(match value {
            BeanValue::Str(v) => ResolvedValue::Str(v.clone()),
            BeanValue::Int(v) => ResolvedValue::Int(*v),
            BeanValue::Float(v) => ResolvedValue::Float(*v),
            BeanValue::Bool(v) => ResolvedValue::Bool(*v),
            BeanValue::Any(v) => ResolvedValue::Object(v.clone()),
            BeanValue::Ref(target) => {
                ResolvedValue::Object(self.resolve_named(target.clone(), ctx).await?)
            }
        })
    }

    async fn resolve_bindings(
        &self,
        name: &str,
        bindings: Vec<ParamBinding>,
        ctx: &mut ResolveContext,
    ) -> BeansResult<Vec<ResolvedValue>> {
        let mut args = Vec::with_capacity(bindings.len());
        for binding in bindings {
            match binding {
                ParamBinding::Declared(holder) => {
                    args.push(self.resolve_value(&holder.value, ctx).await?);
                }
                ParamBinding::Autowire {
                    type_name,
                    required,
                } => match self.autowire_by_type(name, &type_name)? {
                    Some(candidate) => {
                        debug!("自动装配: {} 的 {} 由 {} 满足", name, type_name, candidate);
                        args.push(ResolvedValue::Object(
                            self.resolve_named(candidate, ctx).await?,
                        ));
                    }
                    None if required => {
                        return Err(BeansError::UnsatisfiedDependency {
                            name: name.to_string(),
                            requirement: type_name,
                        });
                    }
                    None => args.push(ResolvedValue::None),
                },
            }
        }
        Ok(args)
    }

    fn autowire_by_type(&self, requesting: &str, requirement: &str) -> BeansResult<Option<String>> {
        let names = self.store.names();
        autowire::resolve_candidate(requesting, requirement, &names, self.classes.as_ref(), |n| {
            self.merger.resolve(&self.store, n)
        })
    }
}

#[async_trait]
impl BeanFactory for DefaultBeanContainer {
    async fn get_bean(&self, name: &str) -> BeansResult<BeanInstance> {
        DefaultBeanContainer::get_bean(self, name).await
    }

    fn contains_bean(&self, name: &str) -> bool {
        self.store.contains(name)
    }

    fn is_singleton(&self, name: &str) -> BeansResult<bool> {
        Ok(self.merged_definition(name)?.is_singleton())
    }

    fn is_prototype(&self, name: &str) -> BeansResult<bool> {
        Ok(self.merged_definition(name)?.is_prototype())
    }
}

impl BeanDefinitionRegistry for DefaultBeanContainer {
    fn register_definition(&self, name: &str, definition: BeanDefinition) -> BeansResult<()> {
        self.store.register(name, definition)?;
        // 名称可能出现在已缓存合并定义的 parent 链上
        self.merger.invalidate(name);
        debug!("注册 bean 定义: {}", name);
        Ok(())
    }

    fn remove_definition(&self, name: &str) -> BeansResult<BeanDefinition> {
        let definition = self.store.remove(name)?;
        self.merger.invalidate(name);
        // 定义移除连带丢弃已缓存的单例实例
        if self.singletons.remove(name).is_some() {
            warn!("移除定义 {} 时丢弃了已缓存的单例实例", name);
        }
        Ok(definition)
    }

    fn get_definition(&self, name: &str) -> BeansResult<BeanDefinition> {
        self.store.get(name)
    }

    fn contains_definition(&self, name: &str) -> bool {
        self.store.contains(name)
    }

    fn definition_names(&self) -> Vec<String> {
        self.store.names()
    }

    fn definition_count(&self) -> usize {
        self.store.len()
    }
}

impl std::fmt::Debug for DefaultBeanContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultBeanContainer")
            .field("definitions", &self.store.len())
            .field("singletons", &self.singletons.len())
            .finish()
    }
}

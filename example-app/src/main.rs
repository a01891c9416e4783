//! # 示例应用程序
//!
//! 演示 Lorn Beans 容器的核心用法：parent/child 定义继承、
//! 构造参数自动装配、工厂方法和感知回调。

use beans_abstractions::{
    BeanClass, ContainerHandle, FromResolvedValue, ParameterDescriptor, TypedBeanFactory,
};
use beans_common::{BeanDefinition, ValueHolder, SCOPE_PROTOTYPE};
use beans_composition::{ContainerBootstrapper, ContainerBuilder};
use clap::Parser;
use std::sync::Arc;
use tracing::info;

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "example-app")]
#[command(about = "Lorn Beans 示例应用")]
struct Args {
    /// 日志级别
    #[arg(long, default_value = "info")]
    log_level: String,

    /// 是否预实例化非延迟单例
    #[arg(long, default_value_t = true)]
    eager_init: bool,
}

/// 用户实体
#[derive(Debug, Default)]
struct User {
    name: String,
    age: i64,
    /// 由名称感知回调填入
    bean_name: String,
}

/// 问候服务，通过构造参数自动装配拿到用户
struct GreetingService {
    user: Arc<User>,
    container: Option<ContainerHandle>,
}

impl GreetingService {
    fn greet(&self) -> String {
        format!("你好, {} ({} 岁)", self.user.name, self.user.age)
    }
}

/// 连接描述，演示静态工厂方法产出
#[derive(Debug)]
struct Connection {
    url: String,
}

impl Connection {
    fn open(url: String) -> Self {
        Self { url }
    }
}

fn user_class() -> BeanClass {
    BeanClass::builder::<User>("demo::User")
        .default_constructor(User::default)
        .property("name", |user: &mut User, value: String| user.name = value)
        .property("age", |user: &mut User, value: i64| user.age = value)
        .bean_name_aware(|user: &mut User, name| user.bean_name = name.to_string())
        .build()
}

fn greeting_service_class() -> BeanClass {
    BeanClass::builder::<GreetingService>("demo::GreetingService")
        .constructor(
            vec![ParameterDescriptor::required("user", "demo::User")],
            |mut args| {
                let user: Arc<User> = FromResolvedValue::from_resolved(args.remove(0))?;
                Ok(GreetingService {
                    user,
                    container: None,
                })
            },
        )
        .container_aware(|service: &mut GreetingService, handle| {
            service.container = Some(handle);
        })
        .build()
}

fn connection_class() -> BeanClass {
    BeanClass::builder::<Connection>("demo::Connection")
        .static_factory_method(
            "open",
            vec![ParameterDescriptor::required("url", "String")],
            |mut args| {
                let url: String = FromResolvedValue::from_resolved(args.remove(0))?;
                Ok(Connection::open(url))
            },
        )
        .build()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 初始化日志
    tracing_subscriber::fmt()
        .with_max_level(parse_log_level(&args.log_level))
        .init();

    info!("启动 Lorn Beans 示例应用");

    // 抽象的 parent 定义提供共享属性，child 定义继承并补全
    let builder = ContainerBuilder::new()
        .register_class(user_class())
        .register_class(greeting_service_class())
        .register_class(connection_class())
        .register_definition(
            "parent",
            BeanDefinition::for_class("demo::User")
                .with_abstract(true)
                .with_property("age", 30i64),
        )
        .register_definition(
            "user",
            BeanDefinition::child_of("parent")
                .with_property("name", "jack"),
        )
        .register_definition(
            "greeter",
            BeanDefinition::for_class("demo::GreetingService"),
        )
        .register_definition(
            "connection",
            BeanDefinition::for_class("demo::Connection")
                .with_factory_method(None, "open")
                .with_constructor_arg(ValueHolder::new("postgres://localhost/demo"))
                .with_scope(SCOPE_PROTOTYPE),
        );

    let container = ContainerBootstrapper::new(builder)
        .with_eager_init(args.eager_init)
        .bootstrap()
        .await?;

    // 继承的属性和名称感知回调都已生效
    let user: Arc<User> = container.get_bean_as("user").await?;
    info!(
        "user bean: name={}, age={}, bean_name={}",
        user.name, user.age, user.bean_name
    );

    // greeter 的 User 参数由类型自动装配满足
    let greeter: Arc<GreetingService> = container.get_bean_as("greeter").await?;
    info!("{}", greeter.greet());
    info!(
        "greeter 持有容器句柄: {}",
        greeter.container.as_ref().and_then(|h| h.factory()).is_some()
    );

    // 原型作用域的工厂方法产物，每次请求都是新实例
    let first: Arc<Connection> = container.get_bean_as("connection").await?;
    let second: Arc<Connection> = container.get_bean_as("connection").await?;
    info!(
        "connection url={}, 两次请求同实例: {}",
        first.url,
        Arc::ptr_eq(&first, &second)
    );

    ContainerBootstrapper::shutdown(&container);
    info!("示例应用结束");
    Ok(())
}

fn parse_log_level(level: &str) -> tracing::Level {
    match level.to_lowercase().as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "warn" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::INFO,
    }
}

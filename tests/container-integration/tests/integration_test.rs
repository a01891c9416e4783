//! 容器端到端集成测试

use beans_abstractions::{
    BeanClass, BeanDefinitionRegistry, FromResolvedValue, ParameterDescriptor, TypedBeanFactory,
};
use beans_common::{BeanDefinition, BeansError, ValueHolder, SCOPE_PROTOTYPE};
use beans_composition::{ContainerBootstrapper, ContainerBuilder};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// 用户实体
#[derive(Debug, Default)]
struct User {
    name: String,
    age: i64,
    bean_name: String,
}

fn user_class() -> BeanClass {
    BeanClass::builder::<User>("demo::User")
        .default_constructor(User::default)
        .property("name", |user: &mut User, value: String| user.name = value)
        .property("age", |user: &mut User, value: i64| user.age = value)
        .bean_name_aware(|user: &mut User, name| user.bean_name = name.to_string())
        .build()
}

/// 记录构造次数的组件
struct Counted;

fn counted_class(name: &str, counter: Arc<AtomicUsize>) -> BeanClass {
    BeanClass::builder::<Counted>(name)
        .default_constructor(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Counted
        })
        .build()
}

/// 记录构造顺序的组件
struct Ordered;

fn ordered_class(name: &str, log: Arc<Mutex<Vec<String>>>) -> BeanClass {
    let tag = name.to_string();
    BeanClass::builder::<Ordered>(name)
        .default_constructor(move || {
            log.lock().unwrap().push(tag.clone());
            Ordered
        })
        .build()
}

#[tokio::test]
async fn parent_child_definition_inheritance_end_to_end() {
    let container = ContainerBuilder::new()
        .register_class(user_class())
        .register_definition(
            "parent",
            BeanDefinition::for_class("demo::User")
                .with_abstract(true)
                .with_property("age", 30i64),
        )
        .register_definition(
            "user",
            BeanDefinition::child_of("parent").with_property("name", "jack"),
        )
        .build()
        .unwrap();

    let user: Arc<User> = container.get_bean_as("user").await.unwrap();
    assert_eq!(user.name, "jack");
    assert_eq!(user.age, 30);
    // 名称感知回调收到的是自身名称，而不是 parent 名称
    assert_eq!(user.bean_name, "user");

    // 抽象定义自身不可实例化
    let err = container.get_bean("parent").await.unwrap_err();
    assert!(matches!(err, BeansError::AbstractDefinition { name } if name == "parent"));
}

#[tokio::test]
async fn concurrent_singleton_requests_create_exactly_once() {
    let counter = Arc::new(AtomicUsize::new(0));
    let container = ContainerBuilder::new()
        .register_class(counted_class("demo::Counted", counter.clone()))
        .register_definition("shared", BeanDefinition::for_class("demo::Counted"))
        .build()
        .unwrap();

    let tasks: Vec<_> = (0..16)
        .map(|_| {
            let container = container.clone();
            tokio::spawn(async move { container.get_bean("shared").await })
        })
        .collect();
    let mut instances = Vec::new();
    for task in tasks {
        instances.push(task.await.unwrap().unwrap());
    }

    assert_eq!(counter.load(Ordering::SeqCst), 1);
    for instance in &instances[1..] {
        assert!(Arc::ptr_eq(&instances[0], instance));
    }
}

#[tokio::test]
async fn prototype_scope_creates_fresh_instances() {
    let counter = Arc::new(AtomicUsize::new(0));
    let container = ContainerBuilder::new()
        .register_class(counted_class("demo::Counted", counter.clone()))
        .register_definition(
            "proto",
            BeanDefinition::for_class("demo::Counted").with_scope(SCOPE_PROTOTYPE),
        )
        .build()
        .unwrap();

    let first = container.get_bean("proto").await.unwrap();
    let second = container.get_bean("proto").await.unwrap();
    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(counter.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn depends_on_orders_instantiation() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let container = ContainerBuilder::new()
        .register_class(ordered_class("demo::First", log.clone()))
        .register_class(ordered_class("demo::Second", log.clone()))
        .register_definition(
            "second",
            BeanDefinition::for_class("demo::Second").with_depends_on(["first"]),
        )
        .register_definition("first", BeanDefinition::for_class("demo::First"))
        .build()
        .unwrap();

    container.get_bean("second").await.unwrap();
    assert_eq!(*log.lock().unwrap(), ["demo::First", "demo::Second"]);
}

#[tokio::test]
async fn reference_cycle_is_fatal_and_names_all_members() {
    struct Node;
    let node_class = BeanClass::builder::<Node>("demo::Node")
        .default_constructor(|| Node)
        .property("next", |_node: &mut Node, _value: Option<Arc<Node>>| {})
        .build();
    let container = ContainerBuilder::new()
        .register_class(node_class)
        .register_definition(
            "a",
            BeanDefinition::for_class("demo::Node")
                .with_property("next", beans_common::BeanValue::reference("b")),
        )
        .register_definition(
            "b",
            BeanDefinition::for_class("demo::Node")
                .with_property("next", beans_common::BeanValue::reference("c")),
        )
        .register_definition(
            "c",
            BeanDefinition::for_class("demo::Node")
                .with_property("next", beans_common::BeanValue::reference("a")),
        )
        .build()
        .unwrap();

    let err = container.get_bean("a").await.unwrap_err();
    match err {
        BeansError::CircularDependency { cycle } => {
            assert_eq!(cycle, ["a", "b", "c", "a"]);
        }
        other => panic!("意外错误: {other}"),
    }
}

/// 服务通过构造参数按类型装配仓储
struct Service {
    repo: Arc<Repo>,
}

#[derive(Debug)]
struct Repo {
    tag: &'static str,
}

fn repo_class(class_name: &str, tag: &'static str) -> BeanClass {
    BeanClass::builder::<Repo>(class_name)
        .implements("demo::Repository")
        .default_constructor(move || Repo { tag })
        .build()
}

fn service_class() -> BeanClass {
    BeanClass::builder::<Service>("demo::Service")
        .constructor(
            vec![ParameterDescriptor::required("repo", "demo::Repository")],
            |mut args| {
                let repo: Arc<Repo> = FromResolvedValue::from_resolved(args.remove(0))?;
                Ok(Service { repo })
            },
        )
        .build()
}

#[tokio::test]
async fn autowire_candidate_false_is_excluded_but_name_resolvable() {
    let container = ContainerBuilder::new()
        .register_class(repo_class("demo::Repo", "only"))
        .register_class(service_class())
        .register_definition(
            "repo",
            BeanDefinition::for_class("demo::Repo").with_autowire_candidate(false),
        )
        .register_definition("service", BeanDefinition::for_class("demo::Service"))
        .build()
        .unwrap();

    // 唯一候选被排除，必需参数无法满足
    let err = container.get_bean("service").await.unwrap_err();
    assert!(matches!(
        err,
        BeansError::UnsatisfiedDependency { requirement, .. } if requirement == "demo::Repository"
    ));

    // 按名称仍然可以解析
    let repo: Arc<Repo> = container.get_bean_as("repo").await.unwrap();
    assert_eq!(repo.tag, "only");
}

#[tokio::test]
async fn primary_breaks_autowire_tie() {
    let container = ContainerBuilder::new()
        .register_class(repo_class("demo::Repo", "plain"))
        .register_class(repo_class("demo::PrimaryRepo", "primary"))
        .register_class(service_class())
        .register_definition("plainRepo", BeanDefinition::for_class("demo::Repo"))
        .register_definition(
            "primaryRepo",
            BeanDefinition::for_class("demo::PrimaryRepo").with_primary(true),
        )
        .register_definition("service", BeanDefinition::for_class("demo::Service"))
        .build()
        .unwrap();

    let service: Arc<Service> = container.get_bean_as("service").await.unwrap();
    assert_eq!(service.repo.tag, "primary");
}

#[tokio::test]
async fn competing_primaries_are_ambiguous() {
    let container = ContainerBuilder::new()
        .register_class(repo_class("demo::Repo", "a"))
        .register_class(repo_class("demo::PrimaryRepo", "b"))
        .register_class(service_class())
        .register_definition(
            "repoA",
            BeanDefinition::for_class("demo::Repo").with_primary(true),
        )
        .register_definition(
            "repoB",
            BeanDefinition::for_class("demo::PrimaryRepo").with_primary(true),
        )
        .register_definition("service", BeanDefinition::for_class("demo::Service"))
        .build()
        .unwrap();

    let err = container.get_bean("service").await.unwrap_err();
    assert!(matches!(err, BeansError::AmbiguousAutowire { .. }));
}

#[tokio::test]
async fn instance_factory_method_uses_factory_bean() {
    struct ConnectionFactory {
        base_url: String,
    }
    struct Connection {
        url: String,
    }

    let factory_class = BeanClass::builder::<ConnectionFactory>("demo::ConnectionFactory")
        .default_constructor(|| ConnectionFactory {
            base_url: "postgres://localhost".to_string(),
        })
        .factory_method(
            "connect",
            vec![ParameterDescriptor::required("database", "String")],
            |factory: &ConnectionFactory, mut args| {
                let database: String = FromResolvedValue::from_resolved(args.remove(0))?;
                Ok(Connection {
                    url: format!("{}/{}", factory.base_url, database),
                })
            },
        )
        .build();

    let container = ContainerBuilder::new()
        .register_class(factory_class)
        .register_definition(
            "connectionFactory",
            BeanDefinition::for_class("demo::ConnectionFactory"),
        )
        .register_definition(
            "connection",
            BeanDefinition::new()
                .with_factory_method(Some("connectionFactory".to_string()), "connect")
                .with_constructor_arg(ValueHolder::new("orders")),
        )
        .build()
        .unwrap();

    let connection: Arc<Connection> = container.get_bean_as("connection").await.unwrap();
    assert_eq!(connection.url, "postgres://localhost/orders");
}

#[tokio::test]
async fn definitions_freeze_on_first_instantiation() {
    let container = ContainerBuilder::new()
        .register_class(user_class())
        .register_definition("user", BeanDefinition::for_class("demo::User"))
        .build()
        .unwrap();

    container.get_bean("user").await.unwrap();
    let err = container
        .register_definition("user", BeanDefinition::for_class("demo::User"))
        .unwrap_err();
    assert!(matches!(err, BeansError::DefinitionFrozen { name } if name == "user"));

    // 移除定义释放名称并丢弃单例
    container.remove_definition("user").unwrap();
    assert!(!container.contains_singleton("user"));
    container
        .register_definition("user", BeanDefinition::for_class("demo::User"))
        .unwrap();
}

#[tokio::test]
async fn bootstrapper_preinstantiates_non_lazy_singletons() {
    let eager_counter = Arc::new(AtomicUsize::new(0));
    let lazy_counter = Arc::new(AtomicUsize::new(0));
    let builder = ContainerBuilder::new()
        .register_class(counted_class("demo::Eager", eager_counter.clone()))
        .register_class(counted_class("demo::Lazy", lazy_counter.clone()))
        .register_definition("eager", BeanDefinition::for_class("demo::Eager"))
        .register_definition(
            "lazy",
            BeanDefinition::for_class("demo::Lazy").with_lazy_init(true),
        );

    let container = ContainerBootstrapper::new(builder).bootstrap().await.unwrap();
    assert_eq!(eager_counter.load(Ordering::SeqCst), 1);
    assert_eq!(lazy_counter.load(Ordering::SeqCst), 0);

    // 延迟单例按需创建
    container.get_bean("lazy").await.unwrap();
    assert_eq!(lazy_counter.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn bootstrapper_orders_eager_singletons_by_depends_on() {
    let log = Arc::new(Mutex::new(Vec::new()));
    // 注册顺序故意与依赖顺序相反
    let builder = ContainerBuilder::new()
        .register_class(ordered_class("demo::A", log.clone()))
        .register_class(ordered_class("demo::B", log.clone()))
        .register_definition(
            "a",
            BeanDefinition::for_class("demo::A").with_depends_on(["b"]),
        )
        .register_definition("b", BeanDefinition::for_class("demo::B"));

    ContainerBootstrapper::new(builder).bootstrap().await.unwrap();
    assert_eq!(*log.lock().unwrap(), ["demo::B", "demo::A"]);
}

#[tokio::test]
async fn bootstrapper_fails_fast_on_cyclic_configuration() {
    let builder = ContainerBuilder::new()
        .register_class(user_class())
        .register_definition(
            "a",
            BeanDefinition::for_class("demo::User").with_depends_on(["b"]),
        )
        .register_definition(
            "b",
            BeanDefinition::for_class("demo::User").with_depends_on(["a"]),
        );

    let err = ContainerBootstrapper::new(builder).bootstrap().await.unwrap_err();
    assert!(matches!(err, BeansError::BootstrapFailed { .. }));
}

#[tokio::test]
async fn toml_config_controls_definition_overriding() {
    let builder = ContainerBuilder::new()
        .with_config_toml("allow_definition_overriding = false\neager_init = false\n")
        .unwrap()
        .register_class(user_class())
        .register_definition("user", BeanDefinition::for_class("demo::User"))
        .register_definition("user", BeanDefinition::for_class("demo::User"));

    let err = builder.build().unwrap_err();
    assert!(matches!(err, BeansError::DuplicateDefinition { name } if name == "user"));
}

#[tokio::test]
async fn unknown_scope_is_reported() {
    let container = ContainerBuilder::new()
        .register_class(user_class())
        .register_definition(
            "user",
            BeanDefinition::for_class("demo::User").with_scope("request"),
        )
        .build()
        .unwrap();

    let err = container.get_bean("user").await.unwrap_err();
    assert!(matches!(err, BeansError::UnknownScope { scope } if scope == "request"));
}

#[tokio::test]
async fn typed_resolution_rejects_wrong_type() {
    let container = ContainerBuilder::new()
        .register_class(user_class())
        .register_definition("user", BeanDefinition::for_class("demo::User"))
        .build()
        .unwrap();

    let err = container.get_bean_as::<Repo>("user").await.unwrap_err();
    assert!(matches!(err, BeansError::TypeMismatch { name, .. } if name == "user"));
}

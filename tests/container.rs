use autowire::{
    Catalog, Class, ClassDescriptor, Config, Container, Definition, Introspector as _, Param, ReflectionPool,
    ResolveErrorKind, TypeName,
};
use std::sync::Arc;

trait Logger: Send + Sync {
    fn name(&self) -> &'static str;
}

struct FileLogger;

impl Logger for FileLogger {
    fn name(&self) -> &'static str {
        "file"
    }
}

struct Greeter {
    message: String,
}

struct Service {
    logger: Arc<dyn Logger>,
}

fn catalog() -> Catalog {
    Catalog::new()
        .class(ClassDescriptor::interface("Logger"))
        .class(ClassDescriptor::abstract_class("BaseLogger").extends("Logger"))
        .class(
            Class::<FileLogger>::new("FileLogger")
                .implements("BaseLogger")
                .implements_as::<dyn Logger>("Logger", |logger| logger as Arc<dyn Logger>)
                .construct(|_| Ok(FileLogger)),
        )
        .class(
            Class::<Greeter>::new("Greeter")
                .param(Param::untyped("message").default("hi"))
                .construct(|args| {
                    Ok(Greeter {
                        message: args.str(0)?.into(),
                    })
                }),
        )
        .class(
            Class::<Service>::new("Service")
                .param(Param::typed("logger", "Logger"))
                .construct(|args| {
                    Ok(Service {
                        logger: args.interface::<dyn Logger>(0)?,
                    })
                }),
        )
}

#[test]
fn test_greeter_default_and_raw_override() {
    let container = Container::new(ReflectionPool::new(catalog()));

    assert_eq!(container.make_as::<Greeter>("Greeter").unwrap().message, "hi");

    let greeter = container
        .make_with("greeter", &Definition::new().raw("message", "yo"))
        .unwrap();
    assert_eq!(greeter.downcast::<Greeter>().unwrap().message, "yo");
    assert!(!container.is_defined("Greeter"));
}

#[test]
fn test_service_without_logger_binding() {
    let container = Container::new(ReflectionPool::new(catalog()));

    let err = container.make("Service").unwrap_err();

    let ResolveErrorKind::UnresolvableParameter {
        class,
        param,
        ty,
        position,
    } = &err
    else {
        panic!("unexpected error: {err}");
    };
    assert_eq!(class, "Service");
    assert_eq!(param, "logger");
    assert_eq!(ty, "Logger");
    assert_eq!(*position, 1);

    let message = err.to_string();
    assert!(message.contains("`logger`"));
    assert!(message.contains("`Logger`"));
    assert!(message.contains("argument 1"));
}

#[test]
fn test_service_with_logger_binding() {
    let container = Container::new(ReflectionPool::new(catalog()));
    container.implement("Logger", "FileLogger");
    container.share("FileLogger");

    let service = container.make_as::<Service>("Service").unwrap();
    let logger = container.make("Logger").unwrap();

    assert_eq!(service.logger.name(), "file");
    assert!(Arc::ptr_eq(&service.logger, &logger.cast::<dyn Logger>().unwrap()));
}

#[test]
fn test_binding_through_abstract_class() {
    let container = Container::new(ReflectionPool::new(catalog()));
    container.implement("BaseLogger", "FileLogger");

    let logger = container.make("BaseLogger").unwrap();

    assert_eq!(logger.class(), "FileLogger");
    assert!(container
        .introspector()
        .is_subclass_of(logger.class(), &TypeName::new("Logger"))
        .unwrap());
}

#[test]
fn test_strict_untyped_parameters() {
    let catalog = catalog().class(
        Class::<Greeter>::new("Shouter")
            .param(Param::untyped("message"))
            .construct(|args| {
                Ok(Greeter {
                    message: args.str(0)?.to_uppercase(),
                })
            }),
    );
    let pool = Arc::new(ReflectionPool::new(catalog));

    let permissive = Container::new(pool.clone());
    assert!(matches!(
        permissive.make("Shouter"),
        Err(ResolveErrorKind::Instantiate { .. })
    ));

    let strict = Container::with_config(pool, Config::strict());
    assert!(matches!(
        strict.make("Shouter"),
        Err(ResolveErrorKind::UnprovidedParameter { position: 1, .. })
    ));

    strict.define("Shouter", Definition::new().raw("message", "hey")).unwrap();
    assert_eq!(strict.make_as::<Greeter>("Shouter").unwrap().message, "HEY");
}

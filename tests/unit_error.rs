/// Unit tests for DiError and DiResult types

use ferrous_registry::{BoxError, DiError, DiResult, ServiceOptions, ServiceRegistry, Token};
use std::error::Error;

#[test]
fn test_error_display_not_found() {
    let error = DiError::NotFound("TestService");
    assert_eq!(error.to_string(), "Service not registered: TestService");
}

#[test]
fn test_error_display_type_mismatch() {
    let error = DiError::TypeMismatch("alloc::string::String");
    assert_eq!(error.to_string(), "Type mismatch for: alloc::string::String");
}

#[test]
fn test_error_display_circular() {
    let error = DiError::Circular(vec!["ServiceA", "ServiceB", "ServiceA"]);
    assert_eq!(error.to_string(), "Circular dependency: ServiceA -> ServiceB -> ServiceA");
    assert_eq!(error.cycle(), Some(&["ServiceA", "ServiceB", "ServiceA"][..]));
}

#[test]
fn test_error_display_self_cycle() {
    let error = DiError::Circular(vec!["Loop", "Loop"]);
    assert_eq!(error.to_string(), "Circular dependency: Loop -> Loop");
}

#[test]
fn test_error_display_dependency_index() {
    let error = DiError::DependencyIndex { service: "Api", index: 2, len: 1 };
    assert_eq!(error.to_string(), "Dependency index 2 out of range for Api (1 declared)");
    assert!(error.cycle().is_none());
}

#[test]
fn test_construction_error_exposes_source() {
    let token: Token<u8> = Token::new("Broken");
    let registry = ServiceRegistry::new();
    registry.register(&token, |_| Err(BoxError::from("disk full")), ServiceOptions::new());

    let error = registry.resolve(&token).unwrap_err();
    assert_eq!(error.to_string(), "Failed to construct Broken: disk full");

    let source = error.source().expect("construction errors carry a source");
    assert_eq!(source.to_string(), "disk full");

    // Not a registry error underneath, so root() stops at the wrapper
    assert!(matches!(error.root(), DiError::Construction { service: "Broken", .. }));
}

#[test]
fn test_root_unwraps_nested_registry_errors() {
    let inner = DiError::TypeMismatch("u32");
    let middle: BoxError = Box::new(inner);
    let outer_source: BoxError = Box::new(DiError::Construction {
        service: "Middle",
        source: middle.into(),
    });
    let outer = DiError::Construction {
        service: "Outer",
        source: outer_source.into(),
    };

    assert!(matches!(outer.root(), DiError::TypeMismatch("u32")));
}

#[test]
fn test_error_clone_preserves_message() {
    let token: Token<u8> = Token::new("Broken");
    let registry = ServiceRegistry::new();
    registry.register(&token, |_| Err("boom".into()), ServiceOptions::new());

    let error = registry.resolve(&token).unwrap_err();
    let cloned = error.clone();
    assert_eq!(error.to_string(), cloned.to_string());
}

#[test]
fn test_di_result_with_question_mark() {
    fn lookup(registry: &ServiceRegistry, token: &Token<u32>) -> DiResult<u32> {
        let value = registry.resolve(token)?;
        Ok(*value + 1)
    }

    let present: Token<u32> = Token::new("Present");
    let absent: Token<u32> = Token::new("Absent");
    let registry = ServiceRegistry::new();
    registry.register_instance(&present, 41u32);

    assert_eq!(lookup(&registry, &present).unwrap(), 42);
    assert!(matches!(lookup(&registry, &absent), Err(DiError::NotFound("Absent"))));
}

#[test]
fn test_di_error_is_boxable() {
    fn factory_style() -> Result<(), BoxError> {
        Err::<(), _>(DiError::NotFound("Inner"))?;
        Ok(())
    }

    let boxed = factory_style().unwrap_err();
    assert_eq!(boxed.downcast_ref::<DiError>().unwrap().to_string(), "Service not registered: Inner");
}

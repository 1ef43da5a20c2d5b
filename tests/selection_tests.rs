//! Selection algorithm integration tests: determinism, media-type
//! specificity, quality factors, and type specificity across the public
//! entry points.

mod common;

use common::*;
use provider_core::config::EngineConfig;
use provider_core::extension::ServiceFault;
use provider_core::media_type::MediaType;
use provider_core::registry::ExtensionRegistry;
use provider_core::typing::{HandledType, TypeTag};
use serde_json::Value;
use std::sync::Arc;

fn bare_registry() -> ExtensionRegistry {
    ExtensionRegistry::root_with_config(EngineConfig {
        install_default_converters: false,
        ..EngineConfig::default()
    })
}

fn json() -> MediaType {
    MediaType::new("application", "json")
}

#[test]
fn selection_is_deterministic_for_fixed_registration_order() {
    let registry = bare_registry();
    registry.register(Arc::new(TestWriter::new(
        "first",
        HandledType::Concrete(TypeTag::new("Invoice")),
    )));
    registry.register(Arc::new(TestWriter::new(
        "second",
        HandledType::Concrete(TypeTag::new("Invoice")),
    )));

    for _ in 0..5 {
        let writer = registry
            .select_writer(&TypeTag::new("Invoice"), None, &[], &json(), None)
            .expect("a writer is registered");
        assert_eq!(writer_label(&writer), "first");
    }
}

#[test]
fn concrete_media_declaration_outranks_wildcards() {
    let registry = bare_registry();
    let invoice = HandledType::Concrete(TypeTag::new("Invoice"));
    // register broadest first so sorting, not registration order, decides
    registry.register(Arc::new(
        TestWriter::new("any", invoice.clone()).producing(vec![MediaType::wildcard()]),
    ));
    registry.register(Arc::new(
        TestWriter::new("app-any", invoice.clone()).producing(vec![MediaType::new("application", "*")]),
    ));
    registry.register(Arc::new(
        TestWriter::new("app-json", invoice.clone()).producing(vec![json()]),
    ));

    let writer = registry
        .select_writer(&TypeTag::new("Invoice"), None, &[], &json(), None)
        .unwrap();
    assert_eq!(writer_label(&writer), "app-json");

    // for a type only the wildcard declarations can serve, the subtype
    // wildcard outranks the full wildcard
    let writer = registry
        .select_writer(
            &TypeTag::new("Invoice"),
            None,
            &[],
            &MediaType::new("application", "xml"),
            None,
        )
        .unwrap();
    assert_eq!(writer_label(&writer), "app-any");
}

#[test]
fn accept_negotiation_prefers_higher_quality_entries() {
    let registry = bare_registry();
    let report = HandledType::Concrete(TypeTag::new("Report"));
    registry.register(Arc::new(
        TestWriter::new("json-writer", report.clone()).producing(vec![json()]),
    ));
    registry.register(Arc::new(
        TestWriter::new("text-writer", report.clone()).producing(vec![MediaType::new("text", "plain")]),
    ));

    let accept = vec![
        json().with_parameter("q", "0.5"),
        MediaType::new("text", "plain").with_parameter("q", "1.0"),
    ];
    let (writer, matched) = registry
        .select_writer_for_accept(&TypeTag::new("Report"), None, &[], &accept, None)
        .unwrap();
    assert_eq!(writer_label(&writer), "text-writer");
    assert_eq!(matched.primary(), "text");
    assert_eq!(matched.sub(), "plain");
}

#[test]
fn subclass_declaration_wins_over_base_declaration() {
    let registry = bare_registry();
    registry.register(Arc::new(TestWriter::new(
        "animal-writer",
        HandledType::Concrete(TypeTag::new("Animal")),
    )));
    registry.register(Arc::new(TestWriter::new(
        "dog-writer",
        HandledType::Concrete(TypeTag::derived_from("Dog", &["Animal"])),
    )));

    let dog = TypeTag::derived_from("Dog", &["Animal"]);
    let writer = registry
        .select_writer(&dog, None, &[], &json(), None)
        .unwrap();
    assert_eq!(writer_label(&writer), "dog-writer");

    // a plain Animal request must not be served by the Dog declaration
    let writer = registry
        .select_writer(&TypeTag::new("Animal"), None, &[], &json(), None)
        .unwrap();
    assert_eq!(writer_label(&writer), "animal-writer");
}

#[test]
fn typed_declaration_outranks_catch_all() {
    let registry = bare_registry();
    registry.register(Arc::new(TestReader::new("raw-reader", HandledType::CatchAll)));
    registry.register(Arc::new(TestReader::new(
        "typed-reader",
        HandledType::Concrete(TypeTag::new("Invoice")),
    )));

    let reader = registry
        .select_reader(&TypeTag::new("Invoice"), None, &[], &json(), None)
        .unwrap();
    assert_eq!(reader_label(&reader), "typed-reader");

    // the catch-all still serves types nobody else claims
    let reader = registry
        .select_reader(&TypeTag::new("Mystery"), None, &[], &json(), None)
        .unwrap();
    assert_eq!(reader_label(&reader), "raw-reader");
}

#[test]
fn bounded_declaration_requires_every_bound() {
    let registry = bare_registry();
    registry.register(Arc::new(TestWriter::new(
        "bounded-writer",
        HandledType::Bounded(vec![TypeTag::new("Serializable"), TypeTag::new("Auditable")]),
    )));

    let qualified = TypeTag::derived_from("Invoice", &["Serializable", "Auditable"]);
    assert!(registry
        .select_writer(&qualified, None, &[], &json(), None)
        .is_some());

    let unqualified = TypeTag::derived_from("Note", &["Serializable"]);
    assert!(registry
        .select_writer(&unqualified, None, &[], &json(), None)
        .is_none());
}

#[test]
fn exception_mapper_prefers_most_derived_declaration() {
    let registry = bare_registry();
    registry.register(Arc::new(TestMapper::new(
        "base-mapper",
        HandledType::Concrete(TypeTag::new("ServiceError")),
    )));
    registry.register(Arc::new(TestMapper::new(
        "auth-mapper",
        HandledType::Concrete(TypeTag::derived_from("AuthError", &["ServiceError"])),
    )));

    let auth_fault = ServiceFault::new(TypeTag::derived_from("AuthError", &["ServiceError"]), "denied");
    let mapper = registry
        .select_exception_mapper(auth_fault.kind(), None)
        .unwrap();
    assert_eq!(mapper_label(&mapper, &auth_fault), "auth-mapper");

    let base_fault = ServiceFault::new(TypeTag::new("ServiceError"), "boom");
    let mapper = registry
        .select_exception_mapper(base_fault.kind(), None)
        .unwrap();
    assert_eq!(mapper_label(&mapper, &base_fault), "base-mapper");
}

#[test]
fn multiple_context_resolvers_fold_into_a_composite() {
    let registry = bare_registry();
    let config_type = HandledType::Concrete(TypeTag::new("CodecSettings"));
    // the more specific resolver yields nothing, the composite must fall
    // through to the next one
    registry.register(Arc::new(TestResolver::new(
        HandledType::Concrete(TypeTag::derived_from("JsonCodecSettings", &["CodecSettings"])),
        None,
    )));
    registry.register(Arc::new(TestResolver::new(
        config_type,
        Some(Value::String("fallback-settings".to_string())),
    )));

    let resolver = registry
        .select_context_resolver(
            &TypeTag::derived_from("JsonCodecSettings", &["CodecSettings"]),
            None,
            None,
        )
        .unwrap();
    assert_eq!(
        resolver.resolve(&TypeTag::new("JsonCodecSettings")),
        Some(Value::String("fallback-settings".to_string()))
    );
}

#[test]
fn parameter_handler_selection_prefers_the_most_derived_declaration() {
    let registry = bare_registry();
    registry.register(Arc::new(TestParamHandler::new(
        "id-handler",
        HandledType::Concrete(TypeTag::new("Identifier")),
    )));
    registry.register(Arc::new(TestParamHandler::new(
        "order-id-handler",
        HandledType::Concrete(TypeTag::derived_from("OrderId", &["Identifier"])),
    )));

    let handler = registry
        .select_parameter_handler(&TypeTag::derived_from("OrderId", &["Identifier"]))
        .unwrap();
    assert_eq!(
        handler.parse_parameter("42").unwrap(),
        Value::String("order-id-handler:42".to_string())
    );

    assert!(registry
        .select_parameter_handler(&TypeTag::new("Unhandled"))
        .is_none());
}

#[test]
fn context_provider_builds_values_from_request_metadata() {
    let registry = bare_registry();
    registry.register(Arc::new(TestContextProvider::new(
        HandledType::Concrete(TypeTag::new("SecurityContext")),
        "security.principal",
    )));

    let provider = registry
        .select_context_provider(&TypeTag::new("SecurityContext"), None)
        .unwrap();
    let ctx = provider_core::RequestContext::new().with_property("security.principal", "alice");
    assert_eq!(provider.create_context(&ctx), Some(Value::String("alice".to_string())));
}

#[test]
fn response_exception_mapper_recovers_typed_faults() {
    let registry = bare_registry();
    registry.register(Arc::new(TestResponseMapper::new(
        "remote-error",
        HandledType::Concrete(TypeTag::new("RemoteError")),
    )));

    let mapper = registry
        .select_response_exception_mapper(&TypeTag::new("RemoteError"))
        .unwrap();
    let fault = mapper
        .from_response(&provider_core::Response::new(502))
        .unwrap();
    assert_eq!(fault.status_hint(), Some(502));
}

#[test]
fn media_type_mismatch_yields_not_found_not_error() {
    let registry = bare_registry();
    registry.register(Arc::new(
        TestWriter::new("json-only", HandledType::CatchAll).producing(vec![json()]),
    ));

    assert!(registry
        .select_writer(
            &TypeTag::new("Invoice"),
            None,
            &[],
            &MediaType::new("video", "mp4"),
            None,
        )
        .is_none());
}

//! Integration tests against an excerpt of the real GDExtension interface header
//!
//! The excerpt keeps the parts of the header that exercise the grammar:
//! include guard, C++ linkage block, deprecated section, enums with trailing
//! comments, a duplicated function typedef and the big interface struct.

use gdext_header::*;

const HEADER: &str = include_str!("gdextension_interface.h");

fn parse_default() -> HeaderFile {
    let mut config = PreprocessorConfig::new();
    config.preserve_lines(true);
    parse_header(HEADER, &config).expect("parse failed")
}

fn names<'a>(items: impl IntoIterator<Item = &'a FunctionDecl>) -> Vec<&'a str> {
    items.into_iter().map(|f| f.name.as_str()).collect()
}

#[test]
fn test_header_collections() {
    let header = parse_default();

    let enums: Vec<_> = header
        .collect_enums()
        .iter()
        .filter_map(|e| e.name.clone())
        .collect();
    assert_eq!(
        enums,
        vec![
            "GDExtensionVariantType",
            "GDExtensionVariantOperator",
            "GDExtensionCallErrorType",
            "GDExtensionInitializationLevel",
        ]
    );

    assert_eq!(header.collect_aliases().len(), 14);
    assert_eq!(header.collect_structs().len(), 4);
    assert_eq!(header.collect_functions().len(), 10);
}

#[test]
fn test_cplusplus_section_dropped_and_char_aliases_kept() {
    let header = parse_default();

    let char32 = header.find_alias("char32_t").expect("char32_t alias");
    assert_eq!(char32.ty, PrimitiveType::new("uint32_t"));
    assert_eq!(header.collect_aliases()[0].name, "char32_t");
}

#[test]
fn test_duplicate_function_first_wins() {
    let header = parse_default();

    let functions = header.collect_functions();
    let set: Vec<_> = functions
        .iter()
        .filter(|f| f.name == "GDExtensionClassSet")
        .collect();
    assert_eq!(set.len(), 1);
    assert_eq!(set[0].return_type.name, "GDExtensionBool");
    assert_eq!(set[0].arguments.len(), 3);

    assert_eq!(names(header.duplicate_functions()), vec!["GDExtensionClassSet"]);
}

#[test]
fn test_function_order_preserved() {
    let header = parse_default();

    assert_eq!(
        names(header.collect_functions()),
        vec![
            "GDExtensionVariantFromTypeConstructorFunc",
            "GDExtensionTypeFromVariantConstructorFunc",
            "GDExtensionPtrOperatorEvaluator",
            "GDExtensionClassSet",
            "GDExtensionClassGet",
            "GDExtensionInstanceBindingCreateCallback",
            "GDExtensionInstanceBindingFreeCallback",
            "GDExtensionInterfaceGetGodotVersion",
            "GDExtensionInterfaceFunctionPtr",
            "GDExtensionInterfaceGetProcAddress",
        ]
    );
}

#[test]
fn test_enum_values_and_comments() {
    let header = parse_default();

    let operators = header.find_enum("GDExtensionVariantOperator").unwrap();
    let max = &operators.values[3];
    assert_eq!(max.name, "GDEXTENSION_VARIANT_OP_MAX");
    assert_eq!(max.value, Some(EnumInitializer::Int(25)));
    assert_eq!(
        operators.values[4].value,
        Some(EnumInitializer::ConstRef("GDEXTENSION_VARIANT_OP_MAX".to_string()))
    );

    let errors = header.find_enum("GDExtensionCallErrorType").unwrap();
    assert_eq!(errors.values.len(), 7);
    assert_eq!(errors.values[0].comment, None);
    assert_eq!(
        errors.values[2].comment.as_deref(),
        Some("// Expected a different variable type.")
    );
    assert_eq!(errors.values[6].comment.as_deref(), Some("// Used for const call."));

    let variants = header.find_enum("GDExtensionVariantType").unwrap();
    assert!(variants.values.iter().all(|v| v.comment.is_none()));
    assert_eq!(
        variants.values.last().map(|v| v.name.as_str()),
        Some("GDEXTENSION_VARIANT_TYPE_VARIANT_MAX")
    );
}

#[test]
fn test_interface_struct() {
    let header = parse_default();
    let interface = header.find_struct("GDExtensionInterface").unwrap();

    let variables: Vec<&str> = interface
        .collect_variables()
        .iter()
        .map(|v| v.name.as_str())
        .collect();
    assert_eq!(
        variables,
        vec!["version_major", "version_minor", "version_patch", "version_string"]
    );

    let methods = interface.collect_functions();
    assert_eq!(methods.len(), 8);

    let alloc = &methods[0];
    assert_eq!(alloc.function.name, "mem_alloc");
    assert_eq!(alloc.function.return_type, PrimitiveType::new("void").pointer());
    assert_eq!(alloc.comment.as_deref(), Some("// Allocate memory."));
    assert_eq!(methods[1].comment, None);

    let call = methods
        .iter()
        .find(|m| m.function.name == "variant_call")
        .unwrap();
    assert_eq!(
        call.function.to_string(),
        "void (*variant_call)(GDExtensionVariantPtr, GDExtensionConstStringNamePtr, \
         const GDExtensionConstVariantPtr *, GDExtensionInt, GDExtensionVariantPtr, \
         GDExtensionCallError *)"
    );

    let register = methods.last().unwrap();
    assert_eq!(
        register.function.declaration(),
        "void (*classdb_register_extension_class_method)(GDExtensionClassLibraryPtr p_library, \
         void (*p_callback)(void *), void *p_userdata)"
    );
}

#[test]
fn test_render_top_level_functions() {
    let header = parse_default();

    let proc_address = header
        .find_function("GDExtensionInterfaceGetProcAddress")
        .unwrap();
    assert_eq!(
        proc_address.to_string(),
        "GDExtensionInterfaceFunctionPtr (*GDExtensionInterfaceGetProcAddress)(const char *)"
    );

    let create = header
        .find_function("GDExtensionInstanceBindingCreateCallback")
        .unwrap();
    assert_eq!(
        create.to_string(),
        "void * (*GDExtensionInstanceBindingCreateCallback)(void *, void *)"
    );

    let unnamed = header
        .find_function("GDExtensionVariantFromTypeConstructorFunc")
        .unwrap();
    assert!(unnamed.arguments.iter().all(|a| a.name.is_none()));
}

#[test]
fn test_disable_deprecated_drops_section() {
    let mut config = PreprocessorConfig::new();
    config.define("DISABLE_DEPRECATED", true);
    let header = parse_header(HEADER, &config).unwrap();

    assert_eq!(header.collect_functions().len(), 9);
    assert!(header.find_function("GDExtensionInterfaceGetGodotVersion").is_none());
}

#[test]
fn test_cplusplus_exposes_linkage_block() {
    let mut config = PreprocessorConfig::new();
    config.define("__cplusplus", true).preserve_lines(true);

    let err = parse_header(HEADER, &config).unwrap_err();
    let HeaderError::Syntax(err) = err else {
        panic!("expected a syntax error, got {:?}", err);
    };
    let position = err.position.expect("error inside the input");
    assert_eq!((position.line, position.column), (24, 1));
    assert_eq!(err.found, "identifier 'extern'");
    assert!(err.expected.contains(&"'typedef'".to_string()));
}

#[test]
fn test_load_header_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gdextension_interface.h");
    std::fs::write(&path, HEADER).unwrap();

    let loaded = load_header(&path, &PreprocessorConfig::new()).unwrap();
    assert_eq!(loaded, parse_default());
}

//! Serde roundtrip for symbols as a driver would persist them.

use decl_core::{
    AggregateType, DefinitionState, Dialect, EnumType, Field, Function, GlobalVariable,
    NamedType, Parameter, Payload, Position, QualifiedName, SourceLocation, Symbol, SymbolId,
    SymbolKind, Tag, TypeRef, Variant, Visibility,
};
use pretty_assertions::assert_eq;

fn symbol(name: &str, kind: SymbolKind, payload: Payload) -> Symbol {
    Symbol {
        name: QualifiedName::parse(name),
        kind,
        dialect: Dialect::Cpp,
        location: SourceLocation::new(
            "types.hpp",
            Position {
                offset: 40,
                line: 3,
                column: 7,
            },
        ),
        state: DefinitionState::Defined,
        payload,
    }
}

macro_rules! roundtrip {
    ($name:ident, $instance:expr) => {
        #[test]
        fn $name() {
            let val: Symbol = $instance;
            let json_str = serde_json::to_string_pretty(&val).expect("serialize");
            let recovered: Symbol = serde_json::from_str(&json_str).expect("deserialize");
            assert_eq!(recovered, val, "serde roundtrip failed for {}", stringify!($name));
        }
    };
}

roundtrip!(
    class_with_base_and_placeholder_field,
    symbol(
        "geometry::Circle",
        SymbolKind::Class,
        Payload::Aggregate(AggregateType {
            fields: vec![Field {
                name: "center".to_string(),
                ty: TypeRef::Named(NamedType::placeholder(
                    vec!["Point".to_string()],
                    false,
                    Some(Tag::Struct),
                )),
                visibility: Visibility::Private,
                bit_width: None,
            }],
            methods: vec![SymbolId::new(4)],
            nested: Vec::new(),
            base: Some(decl_core::BaseClass {
                access: Visibility::Public,
                ty: TypeRef::Named(NamedType::resolved(vec!["Shape".to_string()], SymbolId::new(1))),
            }),
            typedef_name: false,
        }),
    )
);

roundtrip!(
    scoped_enum_with_negative_value,
    symbol(
        "Mode",
        SymbolKind::ScopedEnum,
        Payload::Enum(EnumType {
            variants: vec![
                Variant {
                    name: "Off".to_string(),
                    value: -1,
                },
                Variant {
                    name: "On".to_string(),
                    value: 0,
                },
            ],
            scoped: true,
            underlying: Some(TypeRef::primitive("unsigned char")),
        }),
    )
);

roundtrip!(
    const_method,
    symbol(
        "geometry::Point::distance_to",
        SymbolKind::Method,
        Payload::Function(Function {
            return_type: Some(TypeRef::primitive("int")),
            params: vec![Parameter {
                name: Some("other".to_string()),
                ty: TypeRef::Named(NamedType::resolved(
                    vec!["Point".to_string()],
                    SymbolId::new(1),
                ))
                .constant()
                .reference(),
                has_default: false,
            }],
            variadic: false,
            is_const: true,
            is_static: false,
            is_virtual: false,
            is_pure: false,
            visibility: Some(Visibility::Public),
            owner: Some(QualifiedName::parse("geometry::Point")),
            declared_in_class: true,
        }),
    )
);

#[test]
fn json_uses_snake_case_names() {
    let val = symbol(
        "global_count",
        SymbolKind::GlobalVariable,
        Payload::Variable(GlobalVariable {
            ty: TypeRef::primitive("int"),
            is_extern: true,
            is_static: false,
        }),
    );
    let json = serde_json::to_value(&val).expect("serialize");
    assert_eq!(json["kind"], "global_variable");
    assert_eq!(json["dialect"], "cpp");
    assert_eq!(json["payload"]["variable"]["is_extern"], true);
}

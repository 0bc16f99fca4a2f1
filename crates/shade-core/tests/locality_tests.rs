use shade_core::ast::expression::Expression;
use shade_core::ast::Program;
use shade_core::scramble::ScramblePrivateProperties;
use shade_core::traverse::NodeVisitor;
use shade_core::Obfuscator;
use shade_test_helpers::{fetch_name, return_value, AstBuilder, SequentialScrambler};

fn obfuscate(builder: &AstBuilder, program: &mut Program) {
    let interner = builder.interner();
    let pass =
        ScramblePrivateProperties::new(interner.clone(), Box::new(SequentialScrambler::new()));
    let passes: Vec<Box<dyn NodeVisitor>> = vec![Box::new(pass)];
    let mut obfuscator = Obfuscator::with_passes(interner, passes);
    obfuscator
        .obfuscate(program)
        .expect("obfuscation should never fail on well-formed wiring");
}

/// Builds `class Foo { private $bar; function get() { return <access>; } }`
/// and returns the rewritten access name alongside the declaration name.
fn scramble_single_access(b: &AstBuilder, access: Expression) -> (String, String) {
    let mut program = b.program(vec![b.class(
        "Foo",
        vec![
            b.private_prop(&["bar"]),
            b.method("get", vec![b.ret(access)]),
        ],
    )]);
    obfuscate(b, &mut program);

    let class = b.find_class(&program, "Foo");
    let decl = b.prop_names(class).remove(0);
    let fetch = return_value(&b.find_method(class, "get").body.statements[0]).unwrap();
    let access = b.resolve(fetch_name(fetch).expect("literal member name"));
    (decl, access)
}

#[test]
fn self_scoped_access_is_renamed() {
    let b = AstBuilder::new();
    let (decl, access) = scramble_single_access(&b, b.self_fetch("bar"));
    assert_ne!(decl, "bar");
    assert_eq!(access, decl);
}

#[test]
fn same_class_name_access_is_renamed() {
    let b = AstBuilder::new();
    let (decl, access) = scramble_single_access(&b, b.class_fetch("Foo", "bar"));
    assert_eq!(access, decl);
}

#[test]
fn parent_access_is_not_renamed() {
    let b = AstBuilder::new();
    let (decl, access) = scramble_single_access(&b, b.parent_fetch("bar"));
    assert_ne!(decl, "bar");
    assert_eq!(access, "bar");
}

#[test]
fn late_static_binding_access_is_not_renamed() {
    let b = AstBuilder::new();
    let (_, access) = scramble_single_access(&b, b.late_static_fetch("bar"));
    assert_eq!(access, "bar");
}

#[test]
fn runtime_class_target_is_not_renamed() {
    let b = AstBuilder::new();
    let (_, access) = scramble_single_access(&b, b.dynamic_class_fetch("klass", "bar"));
    assert_eq!(access, "bar");
}

#[test]
fn non_this_instance_target_is_not_renamed() {
    let b = AstBuilder::new();
    let (_, access) = scramble_single_access(&b, b.obj_fetch("other", "bar"));
    assert_eq!(access, "bar");
}

#[test]
fn unrelated_class_name_target_is_not_renamed() {
    let b = AstBuilder::new();
    let mut program = b.program(vec![
        b.class("A", vec![b.private_prop(&["x"])]),
        b.class(
            "B",
            vec![b.method("peek", vec![b.ret(b.class_fetch("A", "x"))])],
        ),
    ]);

    obfuscate(&b, &mut program);

    // `A::$x` is not a member of the enclosing class `B`, so it keeps its
    // original name even though the flat map has an entry for `x`.
    let class = b.find_class(&program, "B");
    let fetch = return_value(&b.find_method(class, "peek").body.statements[0]).unwrap();
    assert_eq!(fetch_name(fetch), Some(b.id("x")));
}

#[test]
fn namespaced_class_resolves_relative_and_absolute_self_references() {
    let b = AstBuilder::new();
    let mut program = b.program(vec![b.namespace(
        "App",
        vec![b.class(
            "Foo",
            vec![
                b.private_prop(&["bar"]),
                b.method("relative", vec![b.ret(b.class_fetch("Foo", "bar"))]),
                b.method("absolute", vec![b.ret(b.class_fetch("\\App\\Foo", "bar"))]),
                b.method("sibling", vec![b.ret(b.class_fetch("Other\\Foo", "bar"))]),
            ],
        )],
    )]);

    obfuscate(&b, &mut program);

    let class = b.find_class(&program, "Foo");
    let decl = b.prop_names(class).remove(0);
    assert_ne!(decl, "bar");

    let relative = return_value(&b.find_method(class, "relative").body.statements[0]).unwrap();
    let absolute = return_value(&b.find_method(class, "absolute").body.statements[0]).unwrap();
    let sibling = return_value(&b.find_method(class, "sibling").body.statements[0]).unwrap();

    // `Foo::` and `\App\Foo::` both resolve to the enclosing `App\Foo`.
    assert_eq!(b.resolve(fetch_name(relative).unwrap()), decl);
    assert_eq!(b.resolve(fetch_name(absolute).unwrap()), decl);
    // `Other\Foo::` resolves to `App\Other\Foo`, a different class.
    assert_eq!(fetch_name(sibling), Some(b.id("bar")));
}

#[test]
fn extending_class_does_not_make_base_members_local() {
    let b = AstBuilder::new();
    let mut program = b.program(vec![
        b.class("Base", vec![b.private_prop(&["bar"])]),
        b.class_extends(
            "Derived",
            "Base",
            vec![b.method("peek", vec![b.ret(b.class_fetch("Base", "bar"))])],
        ),
    ]);

    obfuscate(&b, &mut program);

    let derived = b.find_class(&program, "Derived");
    let fetch = return_value(&b.find_method(derived, "peek").body.statements[0]).unwrap();
    assert_eq!(fetch_name(fetch), Some(b.id("bar")));
}

//! The locality decision: does a member access provably target the
//! innermost enclosing class?
//!
//! A false negative only costs an obfuscation opportunity; a false positive
//! rewrites another class's member and silently changes behavior. Every
//! ambiguous shape therefore resolves to "not local".

use crate::ast::expression::{ExpressionKind, PropertyFetch, StaticPropertyFetch, StaticTarget};
use crate::interner::StringId;

/// Borrowed view over the two member-access shapes.
#[derive(Clone, Copy)]
pub enum FetchRef<'a> {
    Instance(&'a PropertyFetch),
    Static(&'a StaticPropertyFetch),
}

/// `this` is the interned self-reference keyword, cached by the caller.
pub fn is_local(fetch: FetchRef<'_>, this: StringId) -> bool {
    let meta = match fetch {
        FetchRef::Instance(f) => &f.meta,
        FetchRef::Static(f) => &f.meta,
    };
    // Never a local member outside a class body.
    let Some(enclosing) = meta.enclosing_class else {
        return false;
    };

    match fetch {
        // `$this` always points at the current instance; any other target
        // has an unprovable runtime class.
        FetchRef::Instance(fetch) => {
            matches!(fetch.target.kind, ExpressionKind::Variable(name) if name == this)
        }
        FetchRef::Static(fetch) => match &fetch.class {
            // `$var::` picks its class at runtime.
            StaticTarget::Dynamic(_) => false,
            // `self::` always points at the current class.
            StaticTarget::SelfRef(_) => true,
            // A literal class name counts only when it resolves to the
            // enclosing class's own fully-qualified name.
            StaticTarget::Name(name) => name.resolved == Some(enclosing.fqcn),
            // `parent::` and `static::` land outside the current class.
            StaticTarget::Parent(_) | StaticTarget::LateStatic(_) => false,
        },
    }
}

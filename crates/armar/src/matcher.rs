//! Constructor matching by argument-type assignability.
//!
//! Pages register their constructors as an ordered list of
//! [`ConstructorSpec`]s. Matching walks that list in declaration order and
//! picks the first spec whose arity equals the argument count and whose
//! every parameter type is satisfied by the corresponding argument. There is
//! no "most specific" scoring: ties resolve by declaration order, and that
//! ordering is contract, not accident.
//!
//! Arguments travel as [`ArgValue`]s: one runtime value carried as an
//! ordered set of typed views. The primary view is the value's runtime type;
//! extra views (supplied pre-upcast by the caller) model "assignable to a
//! supertype" without runtime type introspection.

use crate::result::{ArmarError, ArmarResult};
use std::any::{Any, TypeId};

/// A type identity used for assignability checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// The key for a concrete type
    #[must_use]
    pub fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Human-readable type name
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

type AnyView = Box<dyn Any + Send + Sync>;

/// One constructor argument, viewable as one or more types
pub struct ArgValue {
    views: Vec<(TypeKey, AnyView)>,
}

impl ArgValue {
    /// Wrap a value; its runtime type becomes the primary view
    #[must_use]
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            views: vec![(TypeKey::of::<T>(), Box::new(value))],
        }
    }

    /// Add another typed view of the same argument (e.g. a trait-object
    /// upcast), making it assignable to that parameter type as well
    #[must_use]
    pub fn with_view<U: Any + Send + Sync>(mut self, view: U) -> Self {
        self.views.push((TypeKey::of::<U>(), Box::new(view)));
        self
    }

    /// The argument's runtime type (its primary view)
    #[must_use]
    pub fn runtime_type(&self) -> TypeKey {
        self.views[0].0
    }

    /// Whether this argument can be assigned to a parameter of `key`'s type
    #[must_use]
    pub fn satisfies(&self, key: TypeKey) -> bool {
        self.views.iter().any(|(k, _)| *k == key)
    }

    fn take_view<T: Any>(&mut self) -> Option<T> {
        let index = self
            .views
            .iter()
            .position(|(k, _)| k.id == TypeId::of::<T>())?;
        let (_, view) = self.views.swap_remove(index);
        // Box<dyn Any + Send + Sync> -> Box<dyn Any> for downcast
        let view: Box<dyn Any> = view;
        view.downcast::<T>().ok().map(|boxed| *boxed)
    }
}

impl std::fmt::Debug for ArgValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.views.iter().map(|(k, _)| k.name()).collect();
        f.debug_struct("ArgValue").field("views", &names).finish()
    }
}

/// Caller-supplied constructor arguments, where an entry may be absent.
///
/// The inferred-type path of page creation requires every entry to be
/// present; an absent entry fails with [`ArmarError::ArgumentInference`]
/// before any matching or allocation happens.
#[derive(Debug, Default)]
pub struct PageArgs {
    entries: Vec<Option<ArgValue>>,
}

impl PageArgs {
    /// No extra arguments beyond the driver handle
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an argument value
    #[must_use]
    pub fn arg<T: Any + Send + Sync>(mut self, value: T) -> Self {
        self.entries.push(Some(ArgValue::new(value)));
        self
    }

    /// Append a pre-built argument (for multi-view values)
    #[must_use]
    pub fn arg_value(mut self, value: ArgValue) -> Self {
        self.entries.push(Some(value));
        self
    }

    /// Append an argument that may be absent; `None` fails inference
    #[must_use]
    pub fn arg_opt<T: Any + Send + Sync>(mut self, value: Option<T>) -> Self {
        self.entries.push(value.map(ArgValue::new));
        self
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve every entry, failing on the first absent one
    pub(crate) fn into_values(self) -> ArmarResult<Vec<ArgValue>> {
        self.entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| entry.ok_or(ArmarError::ArgumentInference { index }))
            .collect()
    }
}

/// Arguments handed to the winning constructor's build closure
#[derive(Debug)]
pub struct CtorArgs {
    args: Vec<ArgValue>,
}

impl CtorArgs {
    pub(crate) fn new(args: Vec<ArgValue>) -> Self {
        Self { args }
    }

    /// Number of arguments
    #[must_use]
    pub fn len(&self) -> usize {
        self.args.len()
    }

    /// Whether there are no arguments
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Take argument `index` as type `T` (one of its registered views)
    pub fn take<T: Any>(&mut self, index: usize) -> ArmarResult<T> {
        let type_name = std::any::type_name::<T>();
        let arg = self
            .args
            .get_mut(index)
            .ok_or_else(|| ArmarError::construction(
                type_name,
                format!("constructor argument {index} is out of range"),
                None,
            ))?;
        arg.take_view::<T>().ok_or_else(|| {
            ArmarError::construction(
                type_name,
                format!("constructor argument {index} has no `{type_name}` view"),
                None,
            )
        })
    }
}

type BuildFn<P> = Box<dyn Fn(CtorArgs) -> ArmarResult<P> + Send + Sync>;

/// One registered constructor: parameter types plus a build closure
pub struct ConstructorSpec<P> {
    params: Vec<TypeKey>,
    build: BuildFn<P>,
}

impl<P> ConstructorSpec<P> {
    /// Register a constructor with the given parameter types
    #[must_use]
    pub fn new(
        params: Vec<TypeKey>,
        build: impl Fn(CtorArgs) -> ArmarResult<P> + Send + Sync + 'static,
    ) -> Self {
        Self {
            params,
            build: Box::new(build),
        }
    }

    /// Declared parameter types, in order
    #[must_use]
    pub fn params(&self) -> &[TypeKey] {
        &self.params
    }

    /// Whether every parameter is satisfied by the corresponding argument
    fn accepts(&self, args: &[ArgValue]) -> bool {
        self.params.len() == args.len()
            && self
                .params
                .iter()
                .zip(args)
                .all(|(param, arg)| arg.satisfies(*param))
    }

    /// Invoke the constructor
    pub(crate) fn construct(&self, args: Vec<ArgValue>) -> ArmarResult<P> {
        (self.build)(CtorArgs::new(args))
    }
}

impl<P> std::fmt::Debug for ConstructorSpec<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let params: Vec<&str> = self.params.iter().map(TypeKey::name).collect();
        f.debug_struct("ConstructorSpec")
            .field("params", &params)
            .finish()
    }
}

/// Find the first declared constructor compatible with the arguments.
///
/// First match in declaration order wins; exhaustion is
/// [`ArmarError::NoMatchingConstructor`].
pub fn match_constructor<'a, P>(
    page: &str,
    constructors: &'a [ConstructorSpec<P>],
    args: &[ArgValue],
) -> ArmarResult<&'a ConstructorSpec<P>> {
    constructors
        .iter()
        .find(|spec| spec.accepts(args))
        .ok_or_else(|| ArmarError::NoMatchingConstructor {
            page: page.to_string(),
            arity: args.len(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    struct Dummy {
        tag: usize,
    }

    fn ctor(tag: usize, params: Vec<TypeKey>) -> ConstructorSpec<Dummy> {
        ConstructorSpec::new(params, move |_| Ok(Dummy { tag }))
    }

    mod arg_value_tests {
        use super::*;

        #[test]
        fn test_primary_view() {
            let arg = ArgValue::new(42u32);
            assert_eq!(arg.runtime_type(), TypeKey::of::<u32>());
            assert!(arg.satisfies(TypeKey::of::<u32>()));
            assert!(!arg.satisfies(TypeKey::of::<u64>()));
        }

        #[test]
        fn test_extra_view_satisfies_supertype() {
            let arg = ArgValue::new(42u32).with_view(i64::from(42u32));
            assert!(arg.satisfies(TypeKey::of::<u32>()));
            assert!(arg.satisfies(TypeKey::of::<i64>()));
            // Runtime type stays the primary view
            assert_eq!(arg.runtime_type(), TypeKey::of::<u32>());
        }

        #[test]
        fn test_ctor_args_take() {
            let mut args = CtorArgs::new(vec![ArgValue::new("hi".to_string())]);
            let s: String = args.take(0).unwrap();
            assert_eq!(s, "hi");
        }

        #[test]
        fn test_ctor_args_take_wrong_type() {
            let mut args = CtorArgs::new(vec![ArgValue::new(1u8)]);
            let err = args.take::<String>(0).unwrap_err();
            assert!(matches!(err, crate::ArmarError::Construction { .. }));
        }

        #[test]
        fn test_ctor_args_take_out_of_range() {
            let mut args = CtorArgs::new(vec![]);
            assert!(args.take::<u8>(0).is_err());
        }
    }

    mod page_args_tests {
        use super::*;

        #[test]
        fn test_absent_entry_fails_inference_with_index() {
            let args = PageArgs::new()
                .arg("present".to_string())
                .arg_opt::<u32>(None);
            let err = args.into_values().unwrap_err();
            assert!(matches!(
                err,
                crate::ArmarError::ArgumentInference { index: 1 }
            ));
        }

        #[test]
        fn test_all_present() {
            let args = PageArgs::new().arg(1u8).arg_opt(Some(2u8));
            assert_eq!(args.len(), 2);
            assert_eq!(args.into_values().unwrap().len(), 2);
        }
    }

    mod matching_tests {
        use super::*;

        #[test]
        fn test_first_match_in_declaration_order() {
            // Two constructors with identical parameter lists: the first
            // declared one must win, not the "more specific" one.
            let ctors = vec![
                ctor(0, vec![TypeKey::of::<String>()]),
                ctor(1, vec![TypeKey::of::<String>()]),
            ];
            let args = vec![ArgValue::new("x".to_string())];
            let chosen = match_constructor("Dummy", &ctors, &args).unwrap();
            assert_eq!(chosen.construct(args).unwrap().tag, 0);
        }

        #[test]
        fn test_arity_mismatch_skipped() {
            let ctors = vec![
                ctor(0, vec![TypeKey::of::<String>(), TypeKey::of::<u32>()]),
                ctor(1, vec![TypeKey::of::<String>()]),
            ];
            let args = vec![ArgValue::new("x".to_string())];
            let chosen = match_constructor("Dummy", &ctors, &args).unwrap();
            assert_eq!(chosen.params().len(), 1);
        }

        #[test]
        fn test_exhaustion_is_no_matching_constructor() {
            let ctors = vec![ctor(0, vec![TypeKey::of::<u32>()])];
            let args = vec![ArgValue::new("x".to_string())];
            let err = match_constructor("Dummy", &ctors, &args).unwrap_err();
            match err {
                crate::ArmarError::NoMatchingConstructor { page, arity } => {
                    assert_eq!(page, "Dummy");
                    assert_eq!(arity, 1);
                }
                other => panic!("expected NoMatchingConstructor, got {other:?}"),
            }
        }

        #[test]
        fn test_multi_view_argument_matches_supertype_param() {
            let ctors = vec![ctor(0, vec![TypeKey::of::<i64>()])];
            let args = vec![ArgValue::new(5u32).with_view(5i64)];
            assert!(match_constructor("Dummy", &ctors, &args).is_ok());
        }

        proptest! {
            /// Matching is deterministic: for any mix of u8/u16 single-arg
            /// constructors, repeated matching against the same argument
            /// always selects the first declaration whose parameter matches.
            #[test]
            fn prop_matching_is_deterministic(decls in proptest::collection::vec(any::<bool>(), 1..12)) {
                let ctors: Vec<ConstructorSpec<Dummy>> = decls
                    .iter()
                    .enumerate()
                    .map(|(tag, takes_u8)| {
                        let key = if *takes_u8 {
                            TypeKey::of::<u8>()
                        } else {
                            TypeKey::of::<u16>()
                        };
                        ctor(tag, vec![key])
                    })
                    .collect();
                let args = vec![ArgValue::new(0u8)];
                let expected = decls.iter().position(|takes_u8| *takes_u8);

                for _ in 0..3 {
                    let found = match_constructor("Dummy", &ctors, &args)
                        .ok()
                        .map(|spec| spec.params()[0] == TypeKey::of::<u8>());
                    match expected {
                        Some(_) => prop_assert_eq!(found, Some(true)),
                        None => prop_assert_eq!(found, None),
                    }
                }
            }
        }
    }
}

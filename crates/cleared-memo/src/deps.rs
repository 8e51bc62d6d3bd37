//! Dependency identity lists.
//!
//! A `Deps` is compared position by position against the list from the last
//! evaluated render. Any element that is `PartialEq + 'static` can be a
//! dependency; values that have no meaningful equality (closures, handles)
//! can take part by reference through [`Identity`].
//!
//! ```rust
//! use cleared_memo::{Identity, deps};
//! use std::rc::Rc;
//!
//! let handler: Rc<dyn Fn()> = Rc::new(|| {});
//! let a = deps![1u32, "feed", Identity(handler.clone())];
//! let b = deps![1u32, "feed", Identity(handler)];
//! assert!(!b.changed_from(&a));
//! assert!(deps![2u32].changed_from(&deps![1u32]));
//! ```

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use smallvec::SmallVec;

/// A single dependency identity.
pub trait Dependency: Any {
    fn same_as(&self, other: &dyn Dependency) -> bool;
    fn as_any(&self) -> &dyn Any;
}

impl<T: PartialEq + 'static> Dependency for T {
    fn same_as(&self, other: &dyn Dependency) -> bool {
        other.as_any().downcast_ref::<T>().is_some_and(|o| o == self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Compares by pointer rather than by value.
pub struct Identity<T: ?Sized>(pub Rc<T>);

impl<T: ?Sized> PartialEq for Identity<T> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<T: ?Sized> Clone for Identity<T> {
    fn clone(&self) -> Self {
        Identity(self.0.clone())
    }
}

/// Ordered list of dependency identities.
#[derive(Default)]
pub struct Deps(SmallVec<[Box<dyn Dependency>; 4]>);

impl Deps {
    pub fn new() -> Self {
        Self(SmallVec::new())
    }

    pub fn push<D: Dependency>(&mut self, dep: D) {
        self.0.push(Box::new(dep));
    }

    pub fn with<D: Dependency>(mut self, dep: D) -> Self {
        self.push(dep);
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True if the length differs or any position holds a different value
    /// (a different type at a position counts as different).
    pub fn changed_from(&self, previous: &Deps) -> bool {
        self.len() != previous.len()
            || self
                .0
                .iter()
                .zip(previous.0.iter())
                .any(|(next, prev)| !(**next).same_as(&**prev))
    }
}

impl fmt::Debug for Deps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deps").field("len", &self.len()).finish()
    }
}

/// Builds a [`Deps`] list: `deps![a, b, c]`, or `deps![]` for "never changes".
#[macro_export]
macro_rules! deps {
    () => {
        $crate::Deps::new()
    };
    ($($dep:expr),+ $(,)?) => {{
        let mut deps = $crate::Deps::new();
        $(deps.push($dep);)+
        deps
    }};
}

//! # Cleared memos
//!
//! A memoized value that owns a resource usually needs to give it back: a
//! subscription has to be cancelled when the channel it listens on changes,
//! and again when the component that opened it goes away. `cleared_memo`
//! packages that contract:
//!
//! - the value is computed on the first render and whenever `deps` change,
//! - every computed value is passed to `clear` exactly once, before the next
//!   value is computed or when the component unmounts.
//!
//! ## Runtime
//!
//! The primitive is built on a small slot-based component runtime:
//!
//! - `Component` — one instance: `render`, `commit`, `unmount`.
//! - `remember` / `remember_state` — order-based per-instance storage; the Nth
//!   call in a render always refers to the Nth slot.
//! - `memo` — render-phase memoization keyed by a `Deps` list.
//! - `disposable_effect` — commit-phase side effects with a `Dispose` teardown
//!   that runs before the next setup or on unmount.
//!
//! ```rust
//! use cleared_memo::*;
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let runs = Rc::new(Cell::new(0));
//! let component = Component::new("Counter");
//!
//! for dep in [1, 1, 2] {
//!     let runs = runs.clone();
//!     component
//!         .render(|| memo(move || runs.set(runs.get() + 1), deps![dep]))
//!         .unwrap();
//!     component.commit().unwrap();
//! }
//! assert_eq!(runs.get(), 2);
//! component.unmount();
//! ```
//!
//! Renders are single-threaded; every instance owns its slots exclusively.
//! `RenderHook` drives one hook through mount, rerenders and unmount for
//! tests and demos.

pub mod cleared;
pub mod deps;
pub mod effects;
pub mod error;
pub mod harness;
pub mod memo;
pub mod runtime;
pub mod scope;

pub use cleared::*;
pub use deps::*;
pub use effects::{Dispose, disposable_effect, on_unmount};
pub use error::HookError;
pub use harness::*;
pub use memo::*;
pub use runtime::{Component, Options, remember, remember_disposer, remember_state};
pub use scope::Scope;

use std::cell::RefCell;
use std::rc::Rc;

use crate::effects::{Dispose, disposable_effect};
use crate::error::run_guarded;
use crate::memo::memo;
use crate::runtime::{remember_disposer, remember_state};
use crate::{Deps, deps};

/// The value slot behind [`cleared_memo`]. `None` means nothing is owed to a
/// clear callback: either nothing was computed yet or it was already cleared.
struct ClearedCell<T> {
    current: Option<T>,
}

type Cell<T> = Rc<RefCell<ClearedCell<T>>>;

/// Clears whatever the cell holds. The value leaves the cell before `clear`
/// runs, so it can never be cleared twice, even if `clear` panics.
fn clear_cell<T>(cell: &Cell<T>, clear: &dyn Fn(T)) {
    let previous = cell.borrow_mut().current.take();
    if let Some(previous) = previous {
        run_guarded("cleared_memo clear", || clear(previous));
    }
}

/// Returns the held value, computing one first if the cell is empty.
fn get_or_compute<T: Clone>(cell: &Cell<T>, compute: &dyn Fn() -> T) -> T {
    let held = cell.borrow().current.clone();
    if let Some(value) = held {
        return value;
    }
    let value = compute();
    cell.borrow_mut().current = Some(value.clone());
    value
}

/// Memoizes `compute()` like [`memo`], and guarantees every value it
/// produced is handed to exactly one `clear` call: right before the next value
/// is computed (when `deps` change) or when the component unmounts.
///
/// The typical use is a subscription that must be dropped when the thing it
/// subscribes to changes:
///
/// ```rust
/// use cleared_memo::{RenderHook, cleared_memo, deps};
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let open = Rc::new(Cell::new(0));
/// let mut hook = RenderHook::new(1u32, {
///     let open = open.clone();
///     move |channel: &u32| {
///         let (on, off) = (open.clone(), open.clone());
///         cleared_memo(
///             move || { on.set(on.get() + 1); format!("sub:{}", on.get()) },
///             move |_sub: String| off.set(off.get() - 1),
///             deps![*channel],
///             None,
///         )
///     }
/// })
/// .unwrap();
/// assert_eq!(open.get(), 1);
/// hook.rerender(2).unwrap();
/// assert_eq!(open.get(), 1);
/// hook.unmount();
/// assert_eq!(open.get(), 0);
/// ```
///
/// `clear` is normally captured from the render that mounted the component.
/// Pass a non-empty `clear_deps` to have the unmount path use the `clear`
/// from the latest render instead; the dependency-change path always uses the
/// current render's `clear`.
///
/// The caller gets a clone; the original stays in the cell until it is
/// cleared. When a remount clears and recomputes the value (see
/// `Options::strict_effects`), the result of the render that preceded it is a
/// copy of the already cleared value. The next render returns the new one.
///
/// A component unmounted before any commit still clears what its renders
/// computed.
///
/// A panicking `clear` is logged and swallowed; the value still counts as
/// cleared. A panicking `compute` propagates out of the render and leaves the
/// cell empty.
pub fn cleared_memo<T, C, F>(compute: C, clear: F, deps: Deps, clear_deps: Option<Deps>) -> T
where
    T: Clone + 'static,
    C: Fn() -> T + 'static,
    F: Fn(T) + 'static,
{
    let cell: Cell<T> = remember_state(|| ClearedCell { current: None });
    let latest_clear = remember_state(|| None::<Rc<dyn Fn(T)>>);

    let compute: Rc<dyn Fn() -> T> = Rc::new(compute);
    let clear: Rc<dyn Fn(T)> = Rc::new(clear);

    memo(
        {
            let cell = cell.clone();
            let compute = compute.clone();
            let clear = clear.clone();
            move || {
                clear_cell(&cell, &*clear);
                log::trace!("cleared_memo: computing");
                let next = compute();
                cell.borrow_mut().current = Some(next);
            }
        },
        deps,
    );

    let retain_latest = clear_deps.is_some_and(|d| !d.is_empty());
    *latest_clear.borrow_mut() = retain_latest.then(|| clear.clone());

    disposable_effect(deps![], {
        let cell = cell.clone();
        let compute = compute.clone();
        let latest_clear = latest_clear.clone();
        let clear = clear.clone();
        move || {
            // A teardown may have run without a real unmount (remount). Refill
            // the cell so whatever we hand out is still owed a clear.
            if cell.borrow().current.is_none() {
                log::debug!("cleared_memo: cell cleared before setup; recomputing");
                get_or_compute(&cell, &*compute);
            }

            let cell = cell.clone();
            let latest_clear = latest_clear.clone();
            let mount_clear = clear.clone();
            Dispose::new(move || {
                let clear = latest_clear.borrow().clone().unwrap_or(mount_clear);
                clear_cell(&cell, &*clear);
            })
        }
    });

    // Registered after the effect so a committed teardown drains the cell
    // first; this only finds a value if the effect setup never ran.
    remember_disposer({
        let cell = cell.clone();
        let latest_clear = latest_clear.clone();
        let render_clear = clear.clone();
        move || {
            let clear = latest_clear.borrow().clone().unwrap_or(render_clear);
            clear_cell(&cell, &*clear);
        }
    });

    get_or_compute(&cell, &*compute)
}

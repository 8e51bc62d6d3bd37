use std::cell::RefCell;
use std::rc::Rc;

use crate::Deps;
use crate::runtime::remember;

struct MemoSlot<T> {
    deps: Option<Deps>,
    value: Option<Rc<T>>,
}

/// Render-phase memoization: `compute` runs on the first render and on every
/// render whose `deps` differ from those of the last successful computation.
///
/// If `compute` panics, the slot keeps its previous deps and value, so the
/// next render tries again.
pub fn memo<T: 'static>(compute: impl FnOnce() -> T, deps: Deps) -> Rc<T> {
    let slot = remember(|| {
        RefCell::new(MemoSlot::<T> {
            deps: None,
            value: None,
        })
    });

    let cached = {
        let s = slot.borrow();
        match (&s.deps, &s.value) {
            (Some(prev), Some(value)) if !deps.changed_from(prev) => Some(value.clone()),
            _ => None,
        }
    };
    if let Some(value) = cached {
        return value;
    }

    log::trace!("memo: recomputing ({} deps)", deps.len());
    let value = Rc::new(compute());
    let mut s = slot.borrow_mut();
    s.deps = Some(deps);
    s.value = Some(value.clone());
    value
}

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::error::run_guarded;
use crate::runtime::{current_instance, remember};
use crate::Deps;

#[derive(Clone)]
pub struct Dispose(Rc<RefCell<Option<Box<dyn FnOnce()>>>>);

impl Dispose {
    pub fn new(f: impl FnOnce() + 'static) -> Self {
        Self(Rc::new(RefCell::new(Some(Box::new(f)))))
    }

    /// A teardown that does nothing.
    pub fn none() -> Self {
        Self(Rc::new(RefCell::new(None)))
    }

    /// Runs at most once (safe to call multiple times).
    pub fn run(&self) {
        let f = self.0.borrow_mut().take();
        if let Some(f) = f {
            f()
        }
    }
}

/// Helper to build the teardown returned from an effect setup.
pub fn on_unmount(f: impl FnOnce() + 'static) -> Dispose {
    Dispose::new(f)
}

type Setup = Box<dyn FnMut() -> Dispose>;

/// Per-callsite effect state. Deps and setup are only stored once committed.
#[derive(Default)]
pub(crate) struct EffectSlot {
    deps: RefCell<Option<Deps>>,
    setup: RefCell<Option<Setup>>,
    cleanup: RefCell<Option<Dispose>>,
    installed: Cell<bool>,
}

impl EffectSlot {
    pub(crate) fn teardown(&self) {
        let cleanup = self.cleanup.borrow_mut().take();
        if let Some(d) = cleanup {
            run_guarded("effect teardown", || d.run());
        }
    }

    fn install(&self, deps: Deps, mut setup: Setup) {
        let cleanup = setup();
        *self.cleanup.borrow_mut() = Some(cleanup);
        *self.deps.borrow_mut() = Some(deps);
        *self.setup.borrow_mut() = Some(setup);
    }

    /// Runs the last committed setup again, as a host remount would.
    pub(crate) fn rerun(&self) {
        let setup = self.setup.borrow_mut().take();
        if let Some(mut setup) = setup {
            let cleanup = setup();
            *self.cleanup.borrow_mut() = Some(cleanup);
            *self.setup.borrow_mut() = Some(setup);
        }
    }
}

/// An effect scheduled by a render, waiting for the commit.
pub(crate) struct PendingEffect {
    slot: Rc<EffectSlot>,
    deps: Deps,
    setup: Setup,
}

/// Teardowns of every pending effect run before any setup.
pub(crate) fn commit_effects(pending: Vec<PendingEffect>) {
    for p in &pending {
        p.slot.teardown();
    }
    for p in pending {
        p.slot.install(p.deps, p.setup);
    }
}

/// Runs `setup` after the render commits whenever `deps` changed since the
/// last committed run. The returned `Dispose` runs before the next setup or
/// when the component unmounts.
pub fn disposable_effect(deps: Deps, setup: impl FnMut() -> Dispose + 'static) {
    let Some(instance) = current_instance() else {
        // No component to own the teardown; run now and leak.
        log::warn!("disposable_effect called outside of a render; teardown will never run");
        let mut setup = setup;
        let _ = setup();
        return;
    };

    let slot = remember(EffectSlot::default);

    // Install a single unmount disposer for this callsite.
    if !slot.installed.replace(true) {
        instance.register_effect(slot.clone());
    }

    let changed = slot
        .deps
        .borrow()
        .as_ref()
        .is_none_or(|prev| deps.changed_from(prev));
    if changed {
        instance.schedule(PendingEffect {
            slot,
            deps,
            setup: Box::new(setup),
        });
    }
}

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::effects::{EffectSlot, PendingEffect, commit_effects};
use crate::error::HookError;
use crate::scope::Scope;

thread_local! {
    static CURRENT: RefCell<Vec<Rc<Instance>>> = const { RefCell::new(Vec::new()) };
}

/// Host configuration for a component instance.
#[derive(Clone, Debug, Default)]
pub struct Options {
    /// Replay mount effects once (teardown, then setup) right after the first
    /// commit, the way strict development hosts do.
    pub strict_effects: bool,
}

impl Options {
    pub fn strict_effects(mut self, on: bool) -> Self {
        self.strict_effects = on;
        self
    }
}

#[derive(Default)]
pub(crate) struct Composer {
    slots: Vec<Box<dyn Any>>,
    cursor: usize,
}

pub(crate) struct Instance {
    name: String,
    options: Options,
    composer: RefCell<Composer>,
    pending: RefCell<Vec<PendingEffect>>,
    effects: RefCell<Vec<Rc<EffectSlot>>>,
    rendering: Cell<bool>,
    mounted: Cell<bool>,
    scope: Scope,
}

impl Instance {
    pub(crate) fn schedule(&self, effect: PendingEffect) {
        self.pending.borrow_mut().push(effect);
    }

    pub(crate) fn register_effect(&self, slot: Rc<EffectSlot>) {
        self.effects.borrow_mut().push(slot.clone());
        self.scope.add_disposer(move || slot.teardown());
    }

    fn replay_effects(&self) {
        let effects = self.effects.borrow().clone();
        log::debug!("{}: replaying {} mount effects", self.name, effects.len());
        for e in &effects {
            e.teardown();
        }
        for e in &effects {
            e.rerun();
        }
    }
}

pub(crate) fn current_instance() -> Option<Rc<Instance>> {
    CURRENT.with(|c| c.borrow().last().cloned())
}

/// Pops the current instance even if the render unwinds.
struct RenderGuard<'a> {
    instance: &'a Instance,
}

impl Drop for RenderGuard<'_> {
    fn drop(&mut self) {
        CURRENT.with(|c| {
            c.borrow_mut().pop();
        });
        self.instance.rendering.set(false);
        if std::thread::panicking() {
            // The render never finished; its effects must not be committed.
            let pending = std::mem::take(&mut *self.instance.pending.borrow_mut());
            drop(pending);
        }
    }
}

/// One mounted instance of a component: its slots, scheduled effects and
/// disposal scope.
pub struct Component {
    inner: Rc<Instance>,
}

impl Component {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_options(name, Options::default())
    }

    pub fn with_options(name: impl Into<String>, options: Options) -> Self {
        Self {
            inner: Rc::new(Instance {
                name: name.into(),
                options,
                composer: RefCell::new(Composer::default()),
                pending: RefCell::new(Vec::new()),
                effects: RefCell::new(Vec::new()),
                rendering: Cell::new(false),
                mounted: Cell::new(false),
                scope: Scope::new(),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn is_mounted(&self) -> bool {
        self.inner.mounted.get() && !self.inner.scope.is_disposed()
    }

    pub fn is_unmounted(&self) -> bool {
        self.inner.scope.is_disposed()
    }

    /// Render phase. Hooks called inside `f` bind to this instance's slots in
    /// call order. Effects scheduled by a previous render that was never
    /// committed are discarded.
    pub fn render<R>(&self, f: impl FnOnce() -> R) -> Result<R, HookError> {
        let inner = &self.inner;
        if inner.scope.is_disposed() {
            return Err(HookError::Unmounted(inner.name.clone()));
        }
        if inner.rendering.replace(true) {
            return Err(HookError::ReentrantRender(inner.name.clone()));
        }

        inner.composer.borrow_mut().cursor = 0;
        let discarded = std::mem::take(&mut *inner.pending.borrow_mut());
        if !discarded.is_empty() {
            log::debug!(
                "{}: dropping {} effects from an uncommitted render",
                inner.name,
                discarded.len()
            );
        }
        drop(discarded);

        CURRENT.with(|c| c.borrow_mut().push(inner.clone()));
        let _guard = RenderGuard { instance: inner };
        let out = f();

        let c = inner.composer.borrow();
        if c.cursor < c.slots.len() {
            log::warn!(
                "{}: render used {} of {} slots; hooks must be called unconditionally",
                inner.name,
                c.cursor,
                c.slots.len()
            );
        }
        Ok(out)
    }

    /// Commit phase: runs the effects the last render scheduled.
    pub fn commit(&self) -> Result<(), HookError> {
        let inner = &self.inner;
        if inner.scope.is_disposed() {
            return Err(HookError::Unmounted(inner.name.clone()));
        }
        if inner.rendering.get() {
            return Err(HookError::CommitDuringRender(inner.name.clone()));
        }

        let pending = std::mem::take(&mut *inner.pending.borrow_mut());
        log::trace!("{}: committing {} effects", inner.name, pending.len());
        commit_effects(pending);

        if !inner.mounted.replace(true) {
            log::debug!("{}: mounted", inner.name);
            if inner.options.strict_effects {
                inner.replay_effects();
            }
        }
        Ok(())
    }

    /// Tears the instance down: every installed effect teardown runs once.
    /// Safe to call more than once.
    pub fn unmount(&self) {
        let inner = &self.inner;
        if inner.scope.is_disposed() {
            return;
        }
        if inner.rendering.get() {
            log::warn!("{}: unmount requested during render; ignored", inner.name);
            return;
        }

        log::debug!("{}: unmounting", inner.name);
        drop(std::mem::take(&mut *inner.pending.borrow_mut()));
        inner.scope.dispose();

        let slots = std::mem::take(&mut inner.composer.borrow_mut().slots);
        drop(slots);
        inner.effects.borrow_mut().clear();
    }
}

impl Drop for Component {
    fn drop(&mut self) {
        self.unmount();
    }
}

/// Slot-based remember (sequential composition only)
pub fn remember<T: 'static>(init: impl FnOnce() -> T) -> Rc<T> {
    let Some(instance) = current_instance() else {
        log::warn!("remember called outside of a render; value will not persist");
        return Rc::new(init());
    };

    let cursor = {
        let mut c = instance.composer.borrow_mut();
        let cursor = c.cursor;
        c.cursor += 1;

        if let Some(slot) = c.slots.get(cursor) {
            if let Some(rc) = slot.downcast_ref::<Rc<T>>() {
                return rc.clone();
            }
            // Order changed between renders; replace.
            log::warn!(
                "{}: remember slot {} type changed; replacing. \
                 Hooks must be called in the same order on every render.",
                instance.name,
                cursor
            );
        }
        cursor
    };

    let rc: Rc<T> = Rc::new(init());
    let mut c = instance.composer.borrow_mut();
    if cursor < c.slots.len() {
        c.slots[cursor] = Box::new(rc.clone());
    } else {
        c.slots.push(Box::new(rc.clone()));
    }
    rc
}

/// A per-instance mutable reference cell. Writing to it never triggers a
/// render.
pub fn remember_state<T: 'static>(init: impl FnOnce() -> T) -> Rc<RefCell<T>> {
    remember(|| RefCell::new(init()))
}

/// Registers `dispose` with the current instance on its first render. It runs
/// when the component unmounts, whether or not any render was committed.
pub fn remember_disposer(dispose: impl FnOnce() + 'static) {
    let installed = remember(|| Cell::new(false));
    if installed.replace(true) {
        return;
    }
    match current_instance() {
        Some(instance) => instance.scope.add_disposer(dispose),
        None => log::warn!("remember_disposer called outside of a render; it will never run"),
    }
}

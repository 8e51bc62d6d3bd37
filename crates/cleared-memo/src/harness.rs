//! Drive a single hook through mount, rerenders and unmount, the way a
//! hook-testing library would.

use crate::error::HookError;
use crate::runtime::{Component, Options};

pub struct RenderHook<P, R> {
    component: Component,
    hook: Box<dyn FnMut(&P) -> R>,
    result: R,
}

impl<P, R> RenderHook<P, R> {
    /// Mounts: renders once with `props` and commits.
    pub fn new(props: P, hook: impl FnMut(&P) -> R + 'static) -> Result<Self, HookError> {
        Self::with_options(Options::default(), props, hook)
    }

    pub fn with_options(
        options: Options,
        props: P,
        hook: impl FnMut(&P) -> R + 'static,
    ) -> Result<Self, HookError> {
        let component = Component::with_options("RenderHook", options);
        let mut hook: Box<dyn FnMut(&P) -> R> = Box::new(hook);
        let result = component.render(|| hook(&props))?;
        component.commit()?;
        Ok(Self {
            component,
            hook,
            result,
        })
    }

    /// The value returned by the last render.
    pub fn result(&self) -> &R {
        &self.result
    }

    pub fn component(&self) -> &Component {
        &self.component
    }

    /// Renders and commits with new props.
    pub fn rerender(&mut self, props: P) -> Result<&R, HookError> {
        let hook = &mut self.hook;
        let result = self.component.render(|| hook(&props))?;
        self.component.commit()?;
        self.result = result;
        Ok(&self.result)
    }

    pub fn unmount(&mut self) {
        self.component.unmount();
    }
}

use std::cell::RefCell;

use crate::capability::GlesVersion;
use crate::host::WallpaperHost;
use crate::renderer::SurfaceRenderer;

/// A host call observed by [`RecordingHost`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCall {
    QueryCapability,
    SetContextClientVersion(u32),
    SetPreserveContextOnPause(bool),
    SetRenderer,
}

/// Headless host that reports a fixed capability and records every call.
///
/// Used to dry-run the initializer without a window or GPU.
pub struct RecordingHost<G = ()> {
    capability: GlesVersion,
    calls: RefCell<Vec<HostCall>>,
    renderer: Option<Box<dyn SurfaceRenderer<G>>>,
}

impl<G> RecordingHost<G> {
    pub fn new(capability: GlesVersion) -> Self {
        Self {
            capability,
            calls: RefCell::new(Vec::new()),
            renderer: None,
        }
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.borrow().clone()
    }

    pub fn has_renderer(&self) -> bool {
        self.renderer.is_some()
    }

    /// Take the installed renderer, e.g. to drive it by hand.
    pub fn take_renderer(&mut self) -> Option<Box<dyn SurfaceRenderer<G>>> {
        self.renderer.take()
    }

    /// Last requested context client version, if any.
    pub fn context_client_version(&self) -> Option<u32> {
        self.calls.borrow().iter().rev().find_map(|call| match call {
            HostCall::SetContextClientVersion(major) => Some(*major),
            _ => None,
        })
    }

    /// Last requested preservation flag, if any.
    pub fn preserve_context_on_pause(&self) -> Option<bool> {
        self.calls.borrow().iter().rev().find_map(|call| match call {
            HostCall::SetPreserveContextOnPause(enabled) => Some(*enabled),
            _ => None,
        })
    }
}

impl<G> WallpaperHost for RecordingHost<G> {
    type Gpu = G;

    fn query_capability(&self) -> GlesVersion {
        self.calls.borrow_mut().push(HostCall::QueryCapability);
        self.capability
    }

    fn set_context_client_version(&mut self, major: u32) {
        self.calls.get_mut().push(HostCall::SetContextClientVersion(major));
    }

    fn set_preserve_context_on_pause(&mut self, enabled: bool) {
        self.calls.get_mut().push(HostCall::SetPreserveContextOnPause(enabled));
    }

    fn set_renderer(&mut self, renderer: Box<dyn SurfaceRenderer<G>>) {
        self.calls.get_mut().push(HostCall::SetRenderer);
        self.renderer = Some(renderer);
    }
}

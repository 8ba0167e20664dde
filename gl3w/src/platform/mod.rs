use std::ffi::CStr;

use crate::{Error, Proc};

/// the three things the loader needs from the os. exactly one native implementation is compiled
/// in, see [`Native`].
pub trait Platform {
    /// opens the opengl library. does nothing if it's already open.
    fn open(&mut self) -> Result<(), Error>;

    /// releases the library. does nothing if it's not open.
    fn close(&mut self);

    /// looks `name` up through the platform's chain: context-bound lookup first (where the
    /// platform has one), then the library's exported symbols.
    fn resolve(&self, name: &CStr) -> Option<Proc>;
}

#[cfg(windows)]
mod wgl;

#[cfg(target_vendor = "apple")]
mod cfbundle;

#[cfg(all(unix, not(target_vendor = "apple")))]
mod glx;

#[cfg(windows)]
pub use wgl::Wgl as Native;

#[cfg(target_vendor = "apple")]
pub use cfbundle::CfBundle as Native;

#[cfg(all(unix, not(target_vendor = "apple")))]
pub use glx::Glx as Native;

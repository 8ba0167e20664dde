use std::ffi::{CStr, c_uchar};
use std::mem;

use dynlib::DynLib;

use super::Platform;
use crate::{Error, Proc};

const LIBGL: &CStr = c"libGL.so.1";

type GlxGetProcAddress = unsafe extern "C" fn(name: *const c_uchar) -> Option<Proc>;

#[derive(Default)]
pub struct Glx {
    // NOTE: the fn pointer points into libgl; it must never outlive it.
    get_proc_address: Option<GlxGetProcAddress>,
    libgl: Option<DynLib>,
}

impl Platform for Glx {
    fn open(&mut self) -> Result<(), Error> {
        if self.libgl.is_some() {
            return Ok(());
        }

        let libgl = DynLib::open_with_flags(LIBGL, dynlib::RTLD_LAZY | dynlib::RTLD_GLOBAL)
            .map_err(|err| Error::OpenLibrary(err.to_string()))?;

        // NOTE: glXGetProcAddressARB is the older name, some ancient libGLs only export that one.
        self.get_proc_address = [c"glXGetProcAddress", c"glXGetProcAddressARB"]
            .into_iter()
            .find_map(|name| libgl.lookup_ptr(name))
            .map(|ptr| unsafe { mem::transmute::<*mut _, GlxGetProcAddress>(ptr.as_ptr()) });
        if self.get_proc_address.is_none() {
            log::debug!("{LIBGL:?} does not export glXGetProcAddress, falling back to dlsym");
        }

        self.libgl = Some(libgl);
        Ok(())
    }

    fn close(&mut self) {
        self.get_proc_address = None;
        self.libgl = None;
    }

    fn resolve(&self, name: &CStr) -> Option<Proc> {
        if let Some(get_proc_address) = self.get_proc_address {
            let proc = unsafe { get_proc_address(name.as_ptr().cast()) };
            if proc.is_some() {
                return proc;
            }
        }
        let ptr = self.libgl.as_ref()?.lookup_ptr(name)?;
        Some(unsafe { mem::transmute::<*mut _, Proc>(ptr.as_ptr()) })
    }
}

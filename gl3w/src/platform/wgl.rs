use std::ffi::{CStr, c_char, c_int, c_void};
use std::mem;
use std::ptr::NonNull;

use super::Platform;
use crate::{Error, Proc};

type HMODULE = *mut c_void;
type BOOL = c_int;

#[link(name = "kernel32")]
unsafe extern "system" {
    fn LoadLibraryA(lib_file_name: *const c_char) -> HMODULE;
    fn FreeLibrary(lib_module: HMODULE) -> BOOL;
    fn GetProcAddress(module: HMODULE, proc_name: *const c_char) -> Option<Proc>;
    fn GetLastError() -> u32;
}

const OPENGL32: &CStr = c"opengl32.dll";

type WglGetProcAddress = unsafe extern "system" fn(name: *const c_char) -> Option<Proc>;

#[derive(Default)]
pub struct Wgl {
    get_proc_address: Option<WglGetProcAddress>,
    opengl32: Option<NonNull<c_void>>,
}

// NOTE: some drivers return small integers instead of null for functions they don't know.
// https://www.khronos.org/opengl/wiki/Load_OpenGL_Functions#Windows
fn is_valid(proc: Proc) -> bool {
    !matches!(proc as usize as isize, 1 | 2 | 3 | -1)
}

impl Platform for Wgl {
    fn open(&mut self) -> Result<(), Error> {
        if self.opengl32.is_some() {
            return Ok(());
        }

        let module = NonNull::new(unsafe { LoadLibraryA(OPENGL32.as_ptr()) }).ok_or_else(|| {
            Error::OpenLibrary(format!("{OPENGL32:?} (error {:#x})", unsafe {
                GetLastError()
            }))
        })?;

        self.get_proc_address =
            unsafe { GetProcAddress(module.as_ptr(), c"wglGetProcAddress".as_ptr()) }
                .map(|proc| unsafe { mem::transmute::<Proc, WglGetProcAddress>(proc) });
        self.opengl32 = Some(module);
        Ok(())
    }

    fn close(&mut self) {
        self.get_proc_address = None;
        if let Some(module) = self.opengl32.take() {
            unsafe { FreeLibrary(module.as_ptr()) };
        }
    }

    fn resolve(&self, name: &CStr) -> Option<Proc> {
        if let Some(get_proc_address) = self.get_proc_address {
            let proc = unsafe { get_proc_address(name.as_ptr()) }.filter(|proc| is_valid(*proc));
            if proc.is_some() {
                return proc;
            }
        }
        let module = self.opengl32?;
        unsafe { GetProcAddress(module.as_ptr(), name.as_ptr()) }
    }
}

impl Drop for Wgl {
    fn drop(&mut self) {
        self.close();
    }
}

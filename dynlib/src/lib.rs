use std::ffi::{CStr, c_int, c_void};
use std::ptr::NonNull;
use std::{error, fmt};

use libc::{dlclose, dlerror, dlopen, dlsym};

pub use libc::{RTLD_GLOBAL, RTLD_LAZY};

#[derive(Debug)]
pub struct Error {
    pub filename: String,
    pub reason: String,
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!(
            "could not open {}: {}",
            self.filename, self.reason
        ))
    }
}

// NOTE: the string returned by dlerror is owned by libc and must not be freed.
fn take_dlerror() -> Option<String> {
    unsafe {
        let err = dlerror();
        if err.is_null() {
            None
        } else {
            Some(CStr::from_ptr(err).to_string_lossy().into_owned())
        }
    }
}

pub struct DynLib(NonNull<c_void>);

impl DynLib {
    pub fn open_with_flags(filename: &CStr, flags: c_int) -> Result<Self, Error> {
        let handle = unsafe { dlopen(filename.as_ptr(), flags) };
        match NonNull::new(handle) {
            Some(handle) => Ok(Self(handle)),
            None => Err(Error {
                filename: filename.to_string_lossy().into_owned(),
                reason: take_dlerror().unwrap_or_else(|| "unknown dlerror".to_string()),
            }),
        }
    }

    /// returns the raw address of the symbol, `None` if it's not there (or if it resolves to
    /// null, which for function symbols is the same thing).
    pub fn lookup_ptr(&self, name: &CStr) -> Option<NonNull<c_void>> {
        _ = take_dlerror();
        let addr = unsafe { dlsym(self.0.as_ptr(), name.as_ptr()) };
        if take_dlerror().is_some() {
            return None;
        }
        NonNull::new(addr)
    }
}

impl Drop for DynLib {
    fn drop(&mut self) {
        unsafe {
            dlclose(self.0.as_ptr());
        }
    }
}

#[macro_export]
macro_rules! opaque_struct {
    ($name:ident) => {
        #[repr(C)]
        pub struct $name {
            _data: [u8; 0],
            _marker: std::marker::PhantomData<(*mut u8, std::marker::PhantomPinned)>,
        }
    };
}

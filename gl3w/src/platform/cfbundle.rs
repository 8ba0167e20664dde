use std::ffi::{CStr, c_char, c_uchar, c_void};
use std::mem;
use std::ptr::NonNull;

use dynlib::opaque_struct;

use super::Platform;
use crate::{Error, Proc};

opaque_struct!(__CFAllocator);
opaque_struct!(__CFString);
opaque_struct!(__CFURL);
opaque_struct!(__CFBundle);

type CFAllocatorRef = *const __CFAllocator;
type CFStringRef = *const __CFString;
type CFURLRef = *const __CFURL;
type CFBundleRef = *mut __CFBundle;
type CFIndex = isize;
type CFStringEncoding = u32;
type Boolean = c_uchar;

const K_CF_URL_POSIX_PATH_STYLE: CFIndex = 0;
const K_CF_STRING_ENCODING_ASCII: CFStringEncoding = 0x0600;

#[allow(non_upper_case_globals)]
#[link(name = "CoreFoundation", kind = "framework")]
unsafe extern "C" {
    static kCFAllocatorDefault: CFAllocatorRef;

    fn CFRelease(cf: *const c_void);
    fn CFStringCreateWithCString(
        alloc: CFAllocatorRef,
        c_str: *const c_char,
        encoding: CFStringEncoding,
    ) -> CFStringRef;
    fn CFURLCreateWithFileSystemPath(
        allocator: CFAllocatorRef,
        file_path: CFStringRef,
        path_style: CFIndex,
        is_directory: Boolean,
    ) -> CFURLRef;
    fn CFBundleCreate(allocator: CFAllocatorRef, bundle_url: CFURLRef) -> CFBundleRef;
    fn CFBundleGetFunctionPointerForName(
        bundle: CFBundleRef,
        function_name: CFStringRef,
    ) -> *mut c_void;
}

const OPENGL_FRAMEWORK: &CStr = c"/System/Library/Frameworks/OpenGL.framework";

/// owned CoreFoundation object, released on drop.
struct Owned<T>(NonNull<T>);

impl<T> Owned<T> {
    fn new(ptr: *const T) -> Option<Self> {
        NonNull::new(ptr.cast_mut()).map(Self)
    }

    fn as_ptr(&self) -> *mut T {
        self.0.as_ptr()
    }
}

impl<T> Drop for Owned<T> {
    fn drop(&mut self) {
        unsafe { CFRelease(self.0.as_ptr().cast()) };
    }
}

fn create_string(s: &CStr) -> Option<Owned<__CFString>> {
    Owned::new(unsafe {
        CFStringCreateWithCString(kCFAllocatorDefault, s.as_ptr(), K_CF_STRING_ENCODING_ASCII)
    })
}

/// apple has no context-bound lookup; every entry point is exported by the framework bundle.
#[derive(Default)]
pub struct CfBundle {
    // NOTE: declared before the url so that the bundle is released first.
    bundle: Option<Owned<__CFBundle>>,
    bundle_url: Option<Owned<__CFURL>>,
}

impl Platform for CfBundle {
    fn open(&mut self) -> Result<(), Error> {
        if self.bundle.is_some() {
            return Ok(());
        }

        let path = create_string(OPENGL_FRAMEWORK)
            .ok_or_else(|| Error::OpenLibrary("could not create bundle path".to_string()))?;
        let bundle_url = Owned::new(unsafe {
            CFURLCreateWithFileSystemPath(
                kCFAllocatorDefault,
                path.as_ptr(),
                K_CF_URL_POSIX_PATH_STYLE,
                1,
            )
        })
        .ok_or_else(|| Error::OpenLibrary(format!("could not create url for {OPENGL_FRAMEWORK:?}")))?;
        let bundle = Owned::new(unsafe { CFBundleCreate(kCFAllocatorDefault, bundle_url.as_ptr()) })
            .ok_or_else(|| Error::OpenLibrary(format!("could not open {OPENGL_FRAMEWORK:?}")))?;

        self.bundle = Some(bundle);
        self.bundle_url = Some(bundle_url);
        Ok(())
    }

    fn close(&mut self) {
        self.bundle = None;
        self.bundle_url = None;
    }

    fn resolve(&self, name: &CStr) -> Option<Proc> {
        let bundle = self.bundle.as_ref()?;
        let name = create_string(name)?;
        let ptr = unsafe { CFBundleGetFunctionPointerForName(bundle.as_ptr(), name.as_ptr()) };
        NonNull::new(ptr).map(|ptr| unsafe { mem::transmute::<*mut c_void, Proc>(ptr.as_ptr()) })
    }
}

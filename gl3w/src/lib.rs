//! runtime half of the loader: opens the platform's opengl library, fills a [`ProcTable`] by
//! name and checks that the context is at least 3.0.
//!
//! NOTE: nothing in here is synchronized. a [`Loader`] is meant to be driven from the one
//! thread that has the gl context current.

use std::ffi::{CStr, c_int, c_uint};
use std::{error, fmt, mem};

pub mod platform;

pub use platform::Platform;
#[cfg(any(windows, unix))]
pub use platform::Native as NativePlatform;

/// opaque function pointer; cast it to the real signature before calling.
pub type Proc = unsafe extern "system" fn();

pub type GLenum = c_uint;
pub type GLint = c_int;

pub const MAJOR_VERSION: GLenum = 0x821B;
pub const MINOR_VERSION: GLenum = 0x821C;

type GetIntegerv = unsafe extern "system" fn(pname: GLenum, data: *mut GLint);

/// the oldest major version the loader accepts.
pub const MIN_MAJOR_VERSION: GLint = 3;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version(pub GLint, pub GLint);

impl Version {
    pub fn major(&self) -> GLint {
        self.0
    }

    pub fn minor(&self) -> GLint {
        self.1
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!("{}.{}", self.0, self.1))
    }
}

#[derive(Debug)]
pub enum Error {
    OpenLibrary(String),
    MissingVersionQuery,
    UnsupportedVersion(Version),
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenLibrary(reason) => {
                f.write_fmt(format_args!("could not open opengl library: {reason}"))
            }
            Self::MissingVersionQuery => f.write_str("glGetIntegerv could not be resolved"),
            Self::UnsupportedVersion(version) => f.write_fmt(format_args!(
                "unsupported opengl version {version} (need {MIN_MAJOR_VERSION}.0 or newer)"
            )),
        }
    }
}

/// a set of pointer slots that can be filled by name. the generator emits an implementation of
/// this (see `gl3w_procs.rs`) with one slot per entry point found in the header.
pub trait ProcTable {
    /// resolve every slot. slots that can't be resolved are set to `None`.
    fn load_with(&mut self, resolve: &mut dyn FnMut(&CStr) -> Option<Proc>);

    /// the loaded `glGetIntegerv`, if the table has one and it was resolved.
    fn version_query(&self) -> Option<Proc>;
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum State {
    #[default]
    Uninitialized,
    Initialized,
    /// the library is open but the context is unusable (no version query or too old).
    Failed,
}

pub struct Loader<P: Platform> {
    platform: P,
    version: Version,
    state: State,
}

#[cfg(any(windows, unix))]
pub type NativeLoader = Loader<NativePlatform>;

#[cfg(any(windows, unix))]
impl Default for NativeLoader {
    fn default() -> Self {
        Self::new(NativePlatform::default())
    }
}

impl<P: Platform> Loader<P> {
    pub fn new(platform: P) -> Self {
        Self {
            platform,
            version: Version::default(),
            state: State::Uninitialized,
        }
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// `(0, 0)` unless the last [`Loader::init`] succeeded.
    pub fn version(&self) -> Version {
        self.version
    }

    /// opens the library, loads every slot of `procs` and queries the context version.
    ///
    /// # Safety
    ///
    /// a gl context must be current on the calling thread; the version is queried through the
    /// freshly loaded `glGetIntegerv`.
    pub unsafe fn init<T: ProcTable + ?Sized>(&mut self, procs: &mut T) -> Result<Version, Error> {
        self.version = Version::default();

        if let Err(err) = self.platform.open() {
            log::warn!("{err}");
            self.state = State::Uninitialized;
            return Err(err);
        }

        let platform = &self.platform;
        let mut resolved = 0usize;
        let mut missing = 0usize;
        procs.load_with(&mut |name| {
            let proc = platform.resolve(name);
            if proc.is_some() {
                resolved += 1;
            } else {
                missing += 1;
            }
            proc
        });
        log::debug!("loaded {resolved} procs ({missing} unresolved)");

        match unsafe { parse_version(procs) } {
            Ok(version) => {
                log::debug!("opengl version {version}");
                self.version = version;
                self.state = State::Initialized;
                Ok(version)
            }
            Err(err) => {
                log::warn!("{err}");
                self.state = State::Failed;
                Err(err)
            }
        }
    }

    /// releases the library handle. safe to call in any state, any number of times.
    pub fn shutdown(&mut self) {
        if self.state != State::Uninitialized {
            log::debug!("closing opengl library");
        }
        self.platform.close();
        self.version = Version::default();
        self.state = State::Uninitialized;
    }

    pub fn is_supported(&self, major: GLint, minor: GLint) -> bool {
        if major < MIN_MAJOR_VERSION {
            return false;
        }
        self.version >= Version(major, minor)
    }

    /// resolves a single entry point through the same lookup chain used by [`Loader::init`].
    pub fn get_proc_address(&self, name: Option<&CStr>) -> Option<Proc> {
        self.platform.resolve(name?)
    }
}

impl<P: Platform> Drop for Loader<P> {
    fn drop(&mut self) {
        self.platform.close();
    }
}

unsafe fn parse_version<T: ProcTable + ?Sized>(procs: &T) -> Result<Version, Error> {
    let get_integerv = procs.version_query().ok_or(Error::MissingVersionQuery)?;
    let get_integerv = unsafe { mem::transmute::<Proc, GetIntegerv>(get_integerv) };

    let mut version = Version::default();
    unsafe {
        get_integerv(MAJOR_VERSION, &mut version.0);
        get_integerv(MINOR_VERSION, &mut version.1);
    }

    if version.0 < MIN_MAJOR_VERSION {
        return Err(Error::UnsupportedVersion(version));
    }
    Ok(version)
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    thread_local! {
        static REPORTED_VERSION: Cell<Version> = const { Cell::new(Version(0, 0)) };
    }

    unsafe extern "system" fn fake_get_integerv(pname: GLenum, data: *mut GLint) {
        let version = REPORTED_VERSION.with(|v| v.get());
        let value = match pname {
            MAJOR_VERSION => version.0,
            MINOR_VERSION => version.1,
            _ => unreachable!(),
        };
        unsafe { *data = value };
    }

    unsafe extern "system" fn fake_get_error() {}

    fn as_proc(f: GetIntegerv) -> Proc {
        unsafe { mem::transmute::<GetIntegerv, Proc>(f) }
    }

    #[derive(Default)]
    struct MockPlatform {
        fail_open: bool,
        missing: Vec<&'static CStr>,
        open: bool,
        opens: usize,
        closes: usize,
        resolves: Cell<usize>,
    }

    impl Platform for MockPlatform {
        fn open(&mut self) -> Result<(), Error> {
            self.opens += 1;
            if self.fail_open {
                return Err(Error::OpenLibrary("mock".to_string()));
            }
            self.open = true;
            Ok(())
        }

        fn close(&mut self) {
            if self.open {
                self.closes += 1;
            }
            self.open = false;
        }

        fn resolve(&self, name: &CStr) -> Option<Proc> {
            self.resolves.set(self.resolves.get() + 1);
            if self.missing.iter().any(|missing| *missing == name) {
                return None;
            }
            match name.to_bytes() {
                b"glGetIntegerv" => Some(as_proc(fake_get_integerv)),
                b"glGetError" => Some(fake_get_error as Proc),
                _ => None,
            }
        }
    }

    #[allow(non_snake_case)]
    #[derive(Default)]
    struct Procs {
        glGetError: Option<Proc>,
        glGetIntegerv: Option<Proc>,
        glNotThere: Option<Proc>,
    }

    impl ProcTable for Procs {
        fn load_with(&mut self, resolve: &mut dyn FnMut(&CStr) -> Option<Proc>) {
            self.glGetError = resolve(c"glGetError");
            self.glGetIntegerv = resolve(c"glGetIntegerv");
            self.glNotThere = resolve(c"glNotThere");
        }

        fn version_query(&self) -> Option<Proc> {
            self.glGetIntegerv
        }
    }

    fn init_with_version(version: Version) -> (Loader<MockPlatform>, Result<Version, Error>) {
        REPORTED_VERSION.with(|v| v.set(version));
        let mut loader = Loader::new(MockPlatform::default());
        let mut procs = Procs::default();
        let res = unsafe { loader.init(&mut procs) };
        (loader, res)
    }

    #[test]
    fn is_supported_before_init() {
        let loader = Loader::new(MockPlatform::default());
        assert_eq!(loader.state(), State::Uninitialized);
        assert_eq!(loader.version(), Version(0, 0));
        assert!(!loader.is_supported(3, 0));
        assert!(!loader.is_supported(4, 6));
    }

    #[test]
    fn is_supported_after_init() {
        let (loader, res) = init_with_version(Version(4, 6));
        assert_eq!(res.unwrap(), Version(4, 6));
        assert_eq!(loader.state(), State::Initialized);

        assert!(loader.is_supported(3, 0));
        assert!(loader.is_supported(3, 3));
        assert!(loader.is_supported(4, 0));
        assert!(loader.is_supported(4, 6));
        assert!(!loader.is_supported(4, 7));
        assert!(!loader.is_supported(5, 0));
    }

    #[test]
    fn is_supported_rejects_old_majors() {
        let (loader, _) = init_with_version(Version(4, 6));
        for major in -1..3 {
            for minor in 0..10 {
                assert!(!loader.is_supported(major, minor));
            }
        }
    }

    #[test]
    fn init_loads_procs() {
        REPORTED_VERSION.with(|v| v.set(Version(3, 3)));
        let mut loader = Loader::new(MockPlatform::default());
        let mut procs = Procs::default();
        unsafe { loader.init(&mut procs) }.unwrap();

        assert!(procs.glGetError.is_some());
        assert!(procs.glGetIntegerv.is_some());
        // unresolved symbols are not an error.
        assert!(procs.glNotThere.is_none());
        assert_eq!(loader.platform().resolves.get(), 3);
    }

    #[test]
    fn init_fails_when_library_does_not_open() {
        REPORTED_VERSION.with(|v| v.set(Version(4, 6)));
        let mut loader = Loader::new(MockPlatform {
            fail_open: true,
            ..Default::default()
        });
        let mut procs = Procs::default();
        let res = unsafe { loader.init(&mut procs) };

        assert!(matches!(res, Err(Error::OpenLibrary(_))));
        assert_eq!(loader.state(), State::Uninitialized);
        assert_eq!(loader.platform().resolves.get(), 0);
        assert!(procs.glGetError.is_none());
    }

    #[test]
    fn init_fails_without_version_query() {
        REPORTED_VERSION.with(|v| v.set(Version(4, 6)));
        let mut loader = Loader::new(MockPlatform {
            missing: vec![c"glGetIntegerv"],
            ..Default::default()
        });
        let mut procs = Procs::default();
        let res = unsafe { loader.init(&mut procs) };

        assert!(matches!(res, Err(Error::MissingVersionQuery)));
        assert_eq!(loader.state(), State::Failed);
        assert!(procs.glGetError.is_some());
        assert!(loader.platform().open);
        assert!(!loader.is_supported(3, 0));
    }

    #[test]
    fn init_fails_on_old_context() {
        let (loader, res) = init_with_version(Version(2, 1));
        assert!(matches!(res, Err(Error::UnsupportedVersion(Version(2, 1)))));
        assert_eq!(loader.state(), State::Failed);
        assert_eq!(loader.version(), Version(0, 0));
        assert!(!loader.is_supported(3, 0));
    }

    #[test]
    fn shutdown_is_idempotent() {
        let (mut loader, res) = init_with_version(Version(4, 1));
        res.unwrap();

        loader.shutdown();
        assert_eq!(loader.state(), State::Uninitialized);
        assert_eq!(loader.version(), Version(0, 0));
        assert!(!loader.platform().open);
        assert_eq!(loader.platform().closes, 1);

        loader.shutdown();
        loader.shutdown();
        assert_eq!(loader.state(), State::Uninitialized);
        assert_eq!(loader.platform().closes, 1);
    }

    #[test]
    fn shutdown_after_failure() {
        let (mut loader, res) = init_with_version(Version(2, 0));
        assert!(res.is_err());
        loader.shutdown();
        assert_eq!(loader.state(), State::Uninitialized);
        assert_eq!(loader.platform().closes, 1);
    }

    #[test]
    fn get_proc_address() {
        let loader = Loader::new(MockPlatform::default());

        assert!(loader.get_proc_address(None).is_none());
        assert_eq!(loader.platform().resolves.get(), 0);

        assert!(loader.get_proc_address(Some(c"glGetError")).is_some());
        assert!(loader.get_proc_address(Some(c"glNotThere")).is_none());
        assert_eq!(loader.platform().resolves.get(), 2);
    }

    #[test]
    fn version_ordering() {
        assert!(Version(3, 0) < Version(4, 6));
        assert!(Version(4, 6) < Version(4, 7));
        assert!(Version(4, 6) > Version(3, 9));
        assert_eq!(Version(3, 3).to_string(), "3.3");
    }
}

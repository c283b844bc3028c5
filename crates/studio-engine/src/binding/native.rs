//! Engine binding over a dynamically loaded library.
//!
//! The library is opened once and all four entry points are resolved up
//! front, so a missing symbol fails before any engine is created.

use std::convert::Infallible;
use std::ffi::c_void;
use std::path::{Path, PathBuf};

use libloading::Library;

use super::{EngineBinding, RawHandle, SymbolNames};
use crate::config::LibraryConfig;
use crate::error::EngineError;

type CreateFn = unsafe extern "C" fn() -> *mut c_void;
type HandleFn = unsafe extern "C" fn(*mut c_void);
type ExecuteFn = unsafe extern "C" fn(*mut c_void) -> *mut c_void;

/// [`EngineBinding`] backed by a dynamically loaded engine library.
///
/// The library stays mapped for as long as this value lives, so the resolved
/// entry points are valid for every call made through it.
pub struct NativeBinding {
    path: PathBuf,
    create: CreateFn,
    initialize: HandleFn,
    execute: ExecuteFn,
    terminate: HandleFn,
    _library: Library,
}

impl NativeBinding {
    /// Opens the library at `path` and resolves all four entry points.
    ///
    /// Fails before any engine call is made if the library or one of the
    /// symbols is missing.
    pub fn open(path: impl AsRef<Path>, symbols: &SymbolNames) -> Result<Self, EngineError> {
        let path = path.as_ref().to_path_buf();
        log::info!("loading engine library {}", path.display());

        // SAFETY: loading runs the library's initialisers. The studio only
        // opens the engine library it was configured with.
        let library = unsafe { Library::new(&path) }.map_err(|source| EngineError::Load {
            library: path.clone(),
            source,
        })?;

        // SAFETY: the aliases above are the engine's exported signatures.
        let (create, initialize, execute, terminate) = unsafe {
            (
                resolve::<CreateFn>(&library, &symbols.create)?,
                resolve::<HandleFn>(&library, &symbols.initialize)?,
                resolve::<ExecuteFn>(&library, &symbols.execute)?,
                resolve::<HandleFn>(&library, &symbols.terminate)?,
            )
        };
        log::debug!("resolved engine entry points {symbols:?}");

        Ok(Self {
            path,
            create,
            initialize,
            execute,
            terminate,
            _library: library,
        })
    }

    /// Opens the library described by the `[library]` config section.
    pub fn from_config(config: &LibraryConfig) -> Result<Self, EngineError> {
        Self::open(config.resolve_path(), &config.symbols)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Copies a function pointer out of `library`.
///
/// # Safety
///
/// `T` must match the symbol's real signature, and the returned value must not
/// be called after `library` is dropped.
unsafe fn resolve<T: Copy>(library: &Library, name: &str) -> Result<T, EngineError> {
    let symbol = unsafe { library.get::<T>(name.as_bytes()) }.map_err(|source| {
        EngineError::Symbol {
            symbol: name.to_string(),
            source,
        }
    })?;
    Ok(*symbol)
}

impl EngineBinding for NativeBinding {
    // The exported entry points have no error channel besides a null create.
    type Error = Infallible;

    fn create(&mut self) -> RawHandle {
        // SAFETY: `create` takes no arguments and the library is still loaded.
        RawHandle::from_ptr(unsafe { (self.create)() })
    }

    unsafe fn initialize(&mut self, handle: RawHandle) -> Result<(), Self::Error> {
        // SAFETY: the caller upholds the handle contract of `EngineBinding`.
        unsafe { (self.initialize)(handle.as_ptr()) };
        Ok(())
    }

    unsafe fn execute(&mut self, handle: RawHandle) -> Result<(), Self::Error> {
        // SAFETY: the caller upholds the handle contract of `EngineBinding`.
        let result = unsafe { (self.execute)(handle.as_ptr()) };
        // Meaning of the returned handle is undocumented; not propagated.
        log::trace!("engine execute returned {}", RawHandle::from_ptr(result));
        Ok(())
    }

    unsafe fn terminate(&mut self, handle: RawHandle) -> Result<(), Self::Error> {
        // SAFETY: the caller upholds the handle contract of `EngineBinding`.
        unsafe { (self.terminate)(handle.as_ptr()) };
        Ok(())
    }
}

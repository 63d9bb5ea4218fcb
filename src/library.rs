//! Library handle manager
//!
//! [`ZlibLibrary`] owns the loaded module for the lifetime of the run. Resolved
//! entry points borrow the handle, so none of them can outlive it, and the
//! module is released exactly once when the handle is dropped.

use crate::error::{HarnessError, Result};
use crate::exports::Export;
use crate::naming::NamingScheme;
use crate::platform::{self, HarnessConfig, Linkage};
use libloading::Library;
use std::ffi::c_void;
use std::marker::PhantomData;
use std::ops::Deref;
use std::ptr::NonNull;
use tracing::{debug, trace, warn};

/// Anything entry points can be resolved from
pub trait SymbolSource {
    /// Naming scheme applied to export names before lookup
    fn naming(&self) -> NamingScheme;

    /// Address of the symbol with the given (already decorated) name
    fn address(&self, symbol: &str) -> Result<NonNull<c_void>>;

    /// Resolve `export` to a callable entry point
    fn resolve<F: Copy>(&self, export: &Export<F>) -> Result<Entry<'_, F>> {
        let symbol = self.naming().symbol_name(export);
        let address = self.address(&symbol)?;
        trace!(export = export.name(), symbol = %symbol, "resolved export");
        // SAFETY: `Export<F>` values are only constructed with function pointer
        // types that match the C signature of the named export.
        Ok(unsafe { Entry::from_address(address) })
    }
}

/// A resolved entry point, valid while its source is borrowed
#[derive(Clone, Copy)]
pub struct Entry<'lib, F> {
    func: F,
    source: PhantomData<&'lib ()>,
}

impl<'lib, F: Copy> Entry<'lib, F> {
    /// # Safety
    ///
    /// `address` must point to a function whose ABI matches `F`.
    unsafe fn from_address(address: NonNull<c_void>) -> Self {
        assert_eq!(
            std::mem::size_of::<F>(),
            std::mem::size_of::<*mut c_void>(),
            "entry point type must be a function pointer"
        );
        Entry {
            func: std::mem::transmute_copy(&address.as_ptr()),
            source: PhantomData,
        }
    }
}

impl<'lib, F> Deref for Entry<'lib, F> {
    type Target = F;

    fn deref(&self) -> &F {
        &self.func
    }
}

/// What happens to the module when the handle goes out of scope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleasePolicy {
    /// Nothing to unload (link-time bound library)
    Retain,
    /// Unload the module; failing to do so is fatal
    Unload,
}

impl ReleasePolicy {
    pub fn for_linkage(linkage: Linkage) -> Self {
        if linkage.is_linked() {
            ReleasePolicy::Retain
        } else {
            ReleasePolicy::Unload
        }
    }
}

/// Handle to the zlib library under test
#[derive(Debug)]
pub struct ZlibLibrary {
    name: String,
    /// `None` for the sentinel handle of the static library modes
    module: Option<Library>,
    naming: NamingScheme,
    release: ReleasePolicy,
}

impl ZlibLibrary {
    /// Acquire the library described by `config`
    pub fn acquire(config: &HarnessConfig) -> Result<Self> {
        let name = config.library.clone();
        let module = match config.linkage {
            Linkage::LibMt | Linkage::LibMd => None,
            Linkage::DllStatic => {
                let resident = platform::open_resident(&name).map_err(|source| {
                    HarnessError::LibraryNotFound {
                        library: name.clone(),
                        source,
                    }
                })?;
                match resident {
                    Some(module) => Some(module),
                    None => return Err(HarnessError::ModuleNotResident { library: name }),
                }
            }
            Linkage::DllRuntime => Some(platform::open_library(&name).map_err(|source| {
                HarnessError::LibraryNotFound {
                    library: name.clone(),
                    source,
                }
            })?),
        };

        debug!(
            library = %name,
            linkage = ?config.linkage,
            width = ?config.width,
            convention = ?config.convention,
            optimization = ?config.optimization,
            "acquired library"
        );

        Ok(ZlibLibrary {
            name,
            module,
            naming: NamingScheme::for_config(config),
            release: ReleasePolicy::for_linkage(config.linkage),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn release_policy(&self) -> ReleasePolicy {
        self.release
    }

    /// Whether a real module handle is held
    pub fn has_module(&self) -> bool {
        self.module.is_some()
    }

    /// Release the library now instead of at scope exit
    pub fn release(self) {
        drop(self);
    }

    fn module_address(module: &Library, symbol: &str) -> Result<NonNull<c_void>> {
        let raw = unsafe { module.get::<*mut c_void>(symbol.as_bytes()) }.map_err(|source| {
            HarnessError::SymbolNotFound {
                symbol: symbol.to_string(),
                source,
            }
        })?;
        NonNull::new(*raw).ok_or_else(|| HarnessError::NullSymbol {
            symbol: symbol.to_string(),
        })
    }
}

impl SymbolSource for ZlibLibrary {
    fn naming(&self) -> NamingScheme {
        self.naming
    }

    fn address(&self, symbol: &str) -> Result<NonNull<c_void>> {
        match &self.module {
            Some(module) if self.naming.is_runtime() => Self::module_address(module, symbol),
            _ => linked_address(symbol),
        }
    }
}

impl Drop for ZlibLibrary {
    fn drop(&mut self) {
        let Some(module) = self.module.take() else {
            return;
        };
        match self.release {
            ReleasePolicy::Retain => {
                // Drop only what `open_resident` took; the loader's reference stays.
                if let Err(err) = platform::release_resident(module) {
                    warn!(
                        library = %self.name,
                        error = %err,
                        "failed to release resident handle"
                    );
                }
            }
            ReleasePolicy::Unload => {
                if let Err(err) = module.close() {
                    panic!("failed to unload library '{}': {}", self.name, err);
                }
                debug!(library = %self.name, "released library");
            }
        }
    }
}

#[cfg(any(feature = "lib-mt", feature = "lib-md", feature = "dll-static"))]
fn linked_address(symbol: &str) -> Result<NonNull<c_void>> {
    crate::linked::address(symbol).ok_or_else(|| HarnessError::UnlinkedSymbol {
        symbol: symbol.to_string(),
    })
}

#[cfg(not(any(feature = "lib-mt", feature = "lib-md", feature = "dll-static")))]
fn linked_address(symbol: &str) -> Result<NonNull<c_void>> {
    Err(HarnessError::UnlinkedSymbol {
        symbol: symbol.to_string(),
    })
}

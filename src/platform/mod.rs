//! Platform abstraction layer
//!
//! Build configuration axes and the OS-specific pieces of library loading.

use libloading::Library;
use std::ffi::OsStr;

/// Environment variable that overrides the library file name to load
pub const LIBRARY_ENV: &str = "ZLIBWAPITEST_LIBRARY";

/// Optimization axis, taken from the cargo profile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Optimization {
    Debug,
    Release,
}

/// Address width axis, taken from the target pointer width
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressWidth {
    /// 32-bit pointers
    Narrow,
    /// 64-bit pointers
    Wide,
}

impl AddressWidth {
    /// Size in bytes of one argument slot on the call stack
    pub fn stack_slot(self) -> usize {
        match self {
            AddressWidth::Narrow => 4,
            AddressWidth::Wide => 8,
        }
    }
}

/// Linkage axis, selected by exactly one cargo feature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Linkage {
    /// Static library, static runtime
    LibMt,
    /// Static library, shared runtime
    LibMd,
    /// Import library; the module is loaded by the OS loader at startup
    DllStatic,
    /// Module loaded at runtime and exports looked up by name
    DllRuntime,
}

impl Linkage {
    /// Whether the entry points are bound at link time
    pub fn is_linked(self) -> bool {
        !matches!(self, Linkage::DllRuntime)
    }
}

/// Calling convention of the exports, which decides their symbol decoration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallingConvention {
    /// WINAPI on 32-bit Windows; exports carry `_name@N`
    Stdcall,
    /// Every other target; exports keep their plain name
    C,
}

/// Explicit build configuration, constructed once at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    pub optimization: Optimization,
    pub width: AddressWidth,
    pub linkage: Linkage,
    pub convention: CallingConvention,
    /// File name (or path) of the library to acquire
    pub library: String,
}

impl HarnessConfig {
    /// Configuration of the running binary
    pub fn from_build() -> Self {
        let library = std::env::var(LIBRARY_ENV)
            .ok()
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| default_library_name().to_string());

        HarnessConfig {
            optimization: build_optimization(),
            width: build_width(),
            linkage: build_linkage(),
            convention: build_convention(),
            library,
        }
    }

    /// Same configuration, different library
    pub fn with_library(mut self, library: impl Into<String>) -> Self {
        self.library = library.into();
        self
    }
}

fn build_optimization() -> Optimization {
    if cfg!(debug_assertions) {
        Optimization::Debug
    } else {
        Optimization::Release
    }
}

fn build_width() -> AddressWidth {
    if cfg!(target_pointer_width = "32") {
        AddressWidth::Narrow
    } else {
        AddressWidth::Wide
    }
}

fn build_convention() -> CallingConvention {
    if cfg!(all(windows, target_pointer_width = "32")) {
        CallingConvention::Stdcall
    } else {
        CallingConvention::C
    }
}

fn build_linkage() -> Linkage {
    if cfg!(feature = "lib-mt") {
        Linkage::LibMt
    } else if cfg!(feature = "lib-md") {
        Linkage::LibMd
    } else if cfg!(feature = "dll-static") {
        Linkage::DllStatic
    } else {
        Linkage::DllRuntime
    }
}

/// Default file name of the zlib shared library
pub fn default_library_name() -> &'static str {
    #[cfg(windows)]
    {
        "zlibwapi.dll"
    }

    #[cfg(target_os = "macos")]
    {
        "libz.1.dylib"
    }

    #[cfg(all(unix, not(target_os = "macos")))]
    {
        "libz.so.1"
    }

    #[cfg(not(any(unix, windows)))]
    {
        "libz"
    }
}

/// Load a library from the platform search path
pub fn open_library(name: &str) -> Result<Library, libloading::Error> {
    unsafe { Library::new(OsStr::new(name)) }
}

/// Get a handle to a module that is already mapped into the process
///
/// Returns `Ok(None)` when the module is not resident.
#[cfg(unix)]
pub fn open_resident(name: &str) -> Result<Option<Library>, libloading::Error> {
    use libloading::os::unix::Library as UnixLibrary;

    let flags = libc::RTLD_NOLOAD | libc::RTLD_LAZY;
    match unsafe { UnixLibrary::open(Some(OsStr::new(name)), flags) } {
        Ok(library) => Ok(Some(library.into())),
        Err(libloading::Error::DlOpen { .. }) | Err(libloading::Error::DlOpenUnknown) => Ok(None),
        Err(err) => Err(err),
    }
}

#[cfg(windows)]
pub fn open_resident(name: &str) -> Result<Option<Library>, libloading::Error> {
    use libloading::os::windows::Library as WindowsLibrary;
    use windows_sys::Win32::System::LibraryLoader::GetModuleHandleW;

    let wide = utf8_to_utf16(name);
    let handle = unsafe { GetModuleHandleW(wide.as_ptr()) };
    if handle == 0 {
        return Ok(None);
    }
    Ok(Some(unsafe { WindowsLibrary::from_raw(handle as _) }.into()))
}

#[cfg(not(any(unix, windows)))]
pub fn open_resident(_name: &str) -> Result<Option<Library>, libloading::Error> {
    Ok(None)
}

/// Give up a handle from [`open_resident`] without unloading the module
///
/// `dlopen(RTLD_NOLOAD)` takes a reference of its own, which is dropped again;
/// the loader's reference keeps the module mapped.
#[cfg(unix)]
pub fn release_resident(module: Library) -> Result<(), libloading::Error> {
    module.close()
}

/// `GetModuleHandleW` takes no reference, so there is nothing to drop.
#[cfg(not(unix))]
pub fn release_resident(module: Library) -> Result<(), libloading::Error> {
    std::mem::forget(module);
    Ok(())
}

#[cfg(windows)]
fn utf8_to_utf16(input: &str) -> Vec<u16> {
    use std::os::windows::ffi::OsStrExt;
    let mut wide: Vec<u16> = OsStr::new(input).encode_wide().collect();
    wide.push(0);
    wide
}

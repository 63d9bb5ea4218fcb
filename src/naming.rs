//! Symbol naming schemes
//!
//! Maps an [`Export`] to the name it is looked up by. Checks never see the
//! decorated name; the scheme is picked once from the build configuration.

use crate::exports::Export;
use crate::platform::{AddressWidth, CallingConvention, HarnessConfig};
use std::borrow::Cow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamingScheme {
    /// The export is bound at link time and found by its plain name
    Identity,
    /// Runtime lookup of a C convention export by its plain name
    Undecorated,
    /// Runtime lookup of a stdcall export built for the given width
    Decorated(AddressWidth),
}

impl NamingScheme {
    pub fn for_config(config: &HarnessConfig) -> Self {
        if config.linkage.is_linked() {
            return NamingScheme::Identity;
        }
        match config.convention {
            CallingConvention::Stdcall => NamingScheme::Decorated(config.width),
            CallingConvention::C => NamingScheme::Undecorated,
        }
    }

    /// Whether names are looked up in a module at runtime
    pub fn is_runtime(self) -> bool {
        !matches!(self, NamingScheme::Identity)
    }

    /// Name used to look up `export`
    ///
    /// 32-bit stdcall exports are `_name@N`, with N the argument bytes pushed
    /// by the caller. 64-bit targets have a single convention and no decoration,
    /// and C convention exports are never decorated.
    pub fn symbol_name<F>(&self, export: &Export<F>) -> Cow<'static, str> {
        match self {
            NamingScheme::Identity
            | NamingScheme::Undecorated
            | NamingScheme::Decorated(AddressWidth::Wide) => Cow::Borrowed(export.name()),
            NamingScheme::Decorated(width @ AddressWidth::Narrow) => Cow::Owned(format!(
                "_{}@{}",
                export.name(),
                export.stack_bytes(*width)
            )),
        }
    }
}

//! Index newtypes, one per WebAssembly index space.
//!
//! <https://www.w3.org/TR/wasm-core-2/#indices>
use std::fmt;

macro_rules! index_types {
    ($($(#[$doc:meta])* $name:ident;)+) => {$(
        $(#[$doc])*
        #[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
        pub struct $name(pub u32);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }
    )+};
}

index_types! {
    TypeIdx;
    /// Imported functions come first in this space.
    FuncIdx;
    TableIdx;
    MemIdx;
    GlobalIdx;
    /// Exception tags.
    TagIdx;
}

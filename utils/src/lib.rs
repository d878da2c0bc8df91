pub mod fs;
pub mod str;

/// Declare a private module and re-export everything in it
#[macro_export]
macro_rules! moduse {
    ($modname:ident) => {
        mod $modname;
        pub use $modname::*;
    }
}

// Re-exports the `alloc` counterparts of the std items used throughout the
// `no_std` crates of this workspace.
pub use alloc::borrow::ToOwned;
pub use alloc::boxed::Box;
pub use alloc::collections::BTreeMap;
pub use alloc::format;
pub use alloc::string::{String, ToString};
pub use alloc::vec;
pub use alloc::vec::Vec;
pub use core::prelude::v1::*;

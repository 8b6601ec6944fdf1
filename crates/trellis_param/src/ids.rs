//! Opaque handles for modules and instances.
//!
//! Handles are issued by [`Arena::alloc`](crate::arena::Arena::alloc) and are
//! the only way one graph entity refers to another.

use crate::arena::ArenaId;
use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name {
            index: u32,
            generation: u32,
        }

        impl ArenaId for $name {
            fn from_parts(index: u32, generation: u32) -> Self {
                Self { index, generation }
            }

            fn index(self) -> u32 {
                self.index
            }

            fn generation(self) -> u32 {
                self.generation
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({}v{})", stringify!($name), self.index, self.generation)
            }
        }
    };
}

define_id!(
    /// Handle of an [`HdlModule`](crate::module::HdlModule).
    ModuleId
);

define_id!(
    /// Handle of an [`HdlInstance`](crate::instance::HdlInstance).
    InstanceId
);

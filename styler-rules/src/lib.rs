//! The concrete rule library: the built-in "tidyverse" style guide and the
//! registry callers use to look up a style guide by name.

pub mod registry;
pub mod tidyverse;

pub use registry::StyleGuideRegistry;
pub use tidyverse::tidyverse;

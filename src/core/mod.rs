// Domain-layer modules and shared errors/models
pub mod demo {
    pub use crate::demo::*;
}

pub mod fallback {
    pub use crate::fallback::*;
}

pub mod models {
    pub use crate::models::*;
}

pub mod errors {
    pub use crate::errors::*;
}

//! External service integrations.

pub mod huly_client {
    pub use crate::huly_client::*;
}

pub mod twenty_client {
    pub use crate::twenty_client::*;
}

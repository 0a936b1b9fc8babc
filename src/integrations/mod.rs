//! External service integrations.

pub mod geocoder {
    pub use crate::geocoder::*;
}

pub mod table {
    pub use crate::table::*;
}

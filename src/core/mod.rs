// Domain-layer modules and shared errors/models
pub mod validation {
    pub use crate::validation::*;
}

pub mod address {
    pub use crate::address::*;
}

pub mod resolver {
    pub use crate::resolver::*;
}

pub mod pipeline {
    pub use crate::pipeline::*;
}

pub mod models {
    pub use crate::models::*;
}

pub mod errors {
    pub use crate::errors::*;
}

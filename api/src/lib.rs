pub mod consts;
pub mod curve;
pub mod discrete;
pub mod error;
pub mod table;
pub mod trade;
pub mod utils;

pub mod prelude {
    pub use crate::consts::*;
    pub use crate::curve::*;
    pub use crate::discrete::*;
    pub use crate::error::*;
    pub use crate::table::*;
    pub use crate::trade::*;
    pub use crate::utils::*;

    pub use brine_fp::UnsignedNumeric;
}

pub mod crop;
pub mod field;
pub mod harvest;
pub mod soil;
pub mod weather;

pub use crop::*;
pub use field::*;
pub use harvest::*;
pub use soil::*;
pub use weather::*;

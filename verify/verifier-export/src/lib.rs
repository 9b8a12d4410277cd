pub mod export;
pub mod solidity;

pub use export::*;
pub use solidity::*;

pub mod assumptions;
pub mod descriptive;
pub mod dispatch;
pub mod effect;

pub use assumptions::*;
pub use descriptive::*;
pub use dispatch::*;
pub use effect::*;
pub use tests::*;

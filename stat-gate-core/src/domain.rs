pub mod assumptions;
pub mod descriptive;
pub mod effect;
pub mod figure;
pub mod hypothesis;
pub mod result;
pub mod study;

pub use assumptions::*;
pub use descriptive::*;
pub use effect::*;
pub use figure::*;
pub use hypothesis::*;
pub use result::*;
pub use study::*;

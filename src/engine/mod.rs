pub mod clock;
pub mod field;
pub mod normalize;
pub mod teams;

pub use field::YardlineError;
pub use normalize::{normalize, RawForm};
pub use teams::TeamCodes;

pub mod seed;
pub mod serve;

pub use seed::seed;
pub use serve::serve;

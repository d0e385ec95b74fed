pub mod builder;
pub mod window;

pub use builder::TaskQuery;
pub use window::Window;

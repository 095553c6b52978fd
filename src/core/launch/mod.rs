pub mod classpath;
pub mod command;

pub use classpath::build_classpath;
pub use command::{LaunchCommand, LaunchParams};

pub mod config;
pub mod console;
pub mod display;
pub mod error;
pub mod greeter;
pub mod pending;
pub mod translation;

pub use error::GreeterError;
pub use greeter::Greeter;
pub use pending::Pending;

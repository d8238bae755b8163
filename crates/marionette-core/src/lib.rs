// marionette-core: configuration data, errors, and Euler-order math for Marionette IK.

pub mod config;
pub mod error;
pub mod euler;

pub use config::{ChainConfig, IkConfig, JointConfig};
pub use error::ConfigError;
pub use euler::RotationOrder;

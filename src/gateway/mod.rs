pub mod provider;
pub mod sportmonks;

pub use provider::{DataGateway, Entity, FixtureWindow, FIXTURE_INCLUDES};
pub use sportmonks::SportmonksClient;

#[cfg(test)]
pub mod mock;

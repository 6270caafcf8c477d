pub mod barrier;
pub mod decode;
pub mod fonts;
pub mod loader;
pub mod orchestrator;
pub mod resolve;

// Library crate: the generator pipeline plus the headless harness and
// command interface used by integration tests, the CLI and the server.

pub mod cable;
pub mod command;
pub mod error;
pub mod export;
pub mod fixtures;
pub mod geometry;
pub mod glyph;
pub mod harness;
pub mod layout;
pub mod material;
pub mod plate;
pub mod scene;
pub mod settings;
pub mod sign;
pub mod validation;

pub use error::{NeonError, NeonResult};
pub use scene::SceneContext;
pub use settings::SignSettings;
pub use sign::{GeneratedSign, SignGenerator};

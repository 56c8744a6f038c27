pub mod cli_args;
pub mod formatter;
pub mod scene;

pub use cli_args::{CliArgs, OutputFormat};
pub use formatter::{OutputFormatter, TransitionSummary};
pub use scene::{FootprintSpec, Scene, SceneElement, SceneMeasure};

//! Modelshot - AI model photoshoots from product photos.
//!
//! Upload a product photo, generate a synthetic model photoshoot through
//! the Gemini image API, then refine the result with natural-language
//! instructions. The session controller keeps the interaction state
//! consistent: one operation in flight, typed errors, and a free/pro tier
//! switch backed by a personal-credential selection flow.
//!
//! ```no_run
//! use modelshot::{
//!     EnvCredentialSelector, FittingConfig, GeminiClient, StudioConfig, StudioSession,
//! };
//!
//! #[tokio::main]
//! async fn main() -> modelshot::Result<()> {
//!     let client = GeminiClient::new(StudioConfig::from_env())?;
//!     let mut session = StudioSession::new(client, EnvCredentialSelector::new());
//!
//!     session.select_source_data_uri("data:image/png;base64,...")?;
//!     session.set_fitting_config(FittingConfig::new().with_pose("Walking"));
//!
//!     let shot = session.generate().await?;
//!     shot.save("photoshoot.png")?;
//!
//!     let refined = session.refine("make the background warmer").await?;
//!     refined.save("photoshoot-refined.png")?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod credentials;
pub mod error;
pub mod gemini;
pub mod logger;
pub mod models;
pub mod session;

pub use config::StudioConfig;
pub use credentials::{CredentialSelector, EnvCredentialSelector, PersonalCredential};
pub use error::{Result, StudioError};
pub use gemini::{GeminiClient, ShotClient, StudioBackend};
pub use models::{
    AspectRatio, EditRequest, FittingConfig, GeneratedShot, ModelInfo, ShotRequest, SourceImage,
    StudioTier,
};
pub use session::{SessionEvent, SessionPhase, SessionState, StudioSession};

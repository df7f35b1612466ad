use modelshot::{
    EnvCredentialSelector, FittingConfig, GeminiClient, ShotClient, SourceImage, StudioConfig,
    StudioSession, StudioTier,
};
use std::env;
use std::fs;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    modelshot::logger::init_with_config(
        modelshot::logger::LoggerConfig::development()
            .with_level(modelshot::logger::LogLevel::Debug),
    )?;

    match dotenv::dotenv() {
        Ok(_) => log::info!("✅ .env file loaded"),
        Err(_) => log::warn!("⚠️  No .env file found, using system environment variables"),
    }

    let mut args = env::args().skip(1);
    let image_path = args.next().unwrap_or_else(|| "product.png".to_string());
    let instruction = args.next();

    log::info!("📚 Available photoshoot models:");
    for model in ShotClient::supported_models() {
        log::info!(
            "  {} - {} ({} tier, {})",
            model.id,
            model.name,
            model.tier,
            model.image_size
        );
    }

    let config = StudioConfig::from_env();
    if config.api_key.is_none() {
        log::error!("❌ MODELSHOT_API_KEY (or GEMINI_API_KEY) is not set");
        return Err("missing API key".into());
    }

    log::info!("🔄 Creating studio session...");
    let client = GeminiClient::new(config)?;
    let mut session = StudioSession::new(client, EnvCredentialSelector::new());

    log::info!("🖼️  Loading product photo: {}", image_path);
    let bytes = fs::read(&image_path)?;
    let mime = match image_path.rsplit('.').next() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        _ => "image/png",
    };
    session.select_source(SourceImage::from_bytes(&bytes, mime));
    session.set_fitting_config(FittingConfig::default());

    // Try to upgrade; a missing personal credential just keeps us on free.
    match session.select_tier(StudioTier::Pro).await {
        Ok(()) => log::info!("✨ Pro tier active"),
        Err(e) => log::warn!("⚠️  Staying on the free tier: {}", e),
    }

    log::info!("📸 Generating photoshoot...");
    match session.generate().await {
        Ok(shot) => {
            shot.save("photoshoot.png")?;
            log::info!("✅ Saved photoshoot.png (model: {})", shot.model);
        }
        Err(e) => {
            log::error!("❌ Generation failed: {}", e);
            return Err(e.into());
        }
    }

    if let Some(instruction) = instruction {
        log::info!("🪄 Refining shot: {}", instruction);
        match session.refine(instruction).await {
            Ok(shot) => {
                shot.save("photoshoot-refined.png")?;
                log::info!("✅ Saved photoshoot-refined.png");
            }
            Err(e) => log::error!("❌ Refinement failed: {}", e),
        }
    }

    session.reset();
    log::info!("🧹 Session reset, ready for the next product");

    Ok(())
}

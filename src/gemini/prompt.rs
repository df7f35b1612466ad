use crate::models::FittingConfig;

/// Renders the photoshoot prompt for a fitting configuration.
///
/// Deterministic template substitution: the same configuration always
/// yields the same prompt, and every non-empty field appears verbatim.
pub fn photoshoot_prompt(config: &FittingConfig) -> String {
    let mut prompt = format!(
        "Professional e-commerce fashion photoshoot. A {} model ({}) wearing the \
         product from the attached photo, fitted naturally. Pose: {}. Background: {}. \
         High-end studio quality, realistic fabric drape, faithful colors, textures \
         and patterns of the original product.",
        config.model_type, config.model_race, config.pose, config.background
    );

    if let Some(custom) = &config.custom_instructions {
        if !custom.trim().is_empty() {
            prompt.push_str("\nAdditional instructions: ");
            prompt.push_str(custom);
        }
    }

    prompt
}

/// Wraps a free-text refinement instruction in the fixed editing template.
///
/// The template pins two invariants the model is asked to preserve across
/// edits: the model's pose and the fabric/texture fidelity of the garment.
pub fn refinement_prompt(instruction: &str) -> String {
    format!(
        "Please edit the provided photoshoot image based on these instructions: \
         \"{}\". Maintain the model's pose and the specific fabric textures and \
         patterns of the garment. Ensure the result is high-end studio quality.",
        instruction
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AspectRatio;

    #[test]
    fn photoshoot_prompt_contains_every_field_verbatim() {
        let config = FittingConfig::new()
            .with_model_type("female")
            .with_model_race("East Asian")
            .with_pose("Shop Display")
            .with_background("Golden Hour Outdoors")
            .with_aspect_ratio(AspectRatio::StandardPortrait)
            .with_custom_instructions("roll up the sleeves");

        let prompt = photoshoot_prompt(&config);
        assert!(prompt.contains("female"));
        assert!(prompt.contains("East Asian"));
        assert!(prompt.contains("Shop Display"));
        assert!(prompt.contains("Golden Hour Outdoors"));
        assert!(prompt.contains("roll up the sleeves"));
    }

    #[test]
    fn photoshoot_prompt_is_deterministic() {
        let config = FittingConfig::default();
        assert_eq!(photoshoot_prompt(&config), photoshoot_prompt(&config));
    }

    #[test]
    fn blank_custom_instructions_are_dropped() {
        let with_blank = FittingConfig::new().with_custom_instructions("   ");
        let without = FittingConfig::new();
        assert_eq!(photoshoot_prompt(&with_blank), photoshoot_prompt(&without));
        assert!(!photoshoot_prompt(&with_blank).contains("Additional instructions"));
    }

    #[test]
    fn refinement_prompt_pins_pose_and_fabric() {
        let prompt = refinement_prompt("make the sunset brighter");
        assert!(prompt.contains("\"make the sunset brighter\""));
        assert!(prompt.contains("pose"));
        assert!(prompt.contains("fabric textures"));
    }
}

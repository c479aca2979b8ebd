use clap::builder::PossibleValuesParser;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use veo_prompt_crafter::config::API_KEY_VAR;
use veo_prompt_crafter::mt::{MockGenerator, MockMode};
use veo_prompt_crafter::{
    CrafterConfig, FieldValues, InputKind, PromptCrafter, TranslationGateway, assemble,
    field_registry,
};

fn build_command() -> Command {
    let mut command = Command::new("prompt-crafter")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Assemble a video-scene prompt and translate it, keeping dialogue verbatim")
        .arg(
            Arg::new("fields")
                .long("fields")
                .short('f')
                .value_name("FILE")
                .value_parser(clap::value_parser!(PathBuf))
                .help("JSON file with field values; flags override it"),
        )
        .arg(
            Arg::new("no-translate")
                .long("no-translate")
                .short('n')
                .help("Only print the assembled prompt")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("mock")
                .long("mock")
                .short('m')
                .help("Use the mock provider instead of Gemini")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print the final session state as JSON")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("list-fields")
                .long("list-fields")
                .help("List every field and its options, then exit")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Show detailed progress")
                .action(ArgAction::SetTrue),
        );

    for def in field_registry() {
        let mut arg = Arg::new(def.id.key())
            .long(def.id.flag())
            .value_name("TEXT")
            .help(def.label);
        if def.is_select() {
            arg = arg
                .value_name("CHOICE")
                .value_parser(PossibleValuesParser::new(def.choice_values()));
        }
        command = command.arg(arg);
    }

    command
}

fn load_values(path: &Path) -> Result<FieldValues, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read file '{}': {}", path.display(), e))?;
    let values = serde_json::from_str(&content)
        .map_err(|e| format!("Failed to parse JSON from '{}': {}", path.display(), e))?;
    Ok(values)
}

fn collect_values(matches: &ArgMatches) -> Result<FieldValues, Box<dyn std::error::Error>> {
    let mut values = match matches.get_one::<PathBuf>("fields") {
        Some(path) => load_values(path)?,
        None => FieldValues::new(),
    };

    for def in field_registry() {
        if let Some(value) = matches.get_one::<String>(def.id.key()) {
            values.set(def.id, value.clone());
        }
        // Values from a file bypass clap's choice checking
        if !def.allows(values.get(def.id)) {
            return Err(format!(
                "Invalid value '{}' for {}; expected one of: {}",
                values.get(def.id),
                def.id.flag(),
                def.choice_values().collect::<Vec<_>>().join(", ")
            )
            .into());
        }
    }

    Ok(values)
}

fn print_fields() {
    for def in field_registry() {
        let kind = match def.kind {
            InputKind::Text => "text",
            InputKind::MultiLine { .. } => "multi-line text",
            InputKind::Select => "select",
        };
        println!("--{:<16} {} ({})", def.id.flag(), def.label, kind);
        for value in def.choice_values() {
            println!("    {}", value);
        }
    }
}

/// Lines printed to stderr when crafting did not produce a translation
fn failure_hints(gateway_available: bool, error: Option<&str>) -> Vec<String> {
    if gateway_available {
        return error.map(|message| format!("❌ {}", message)).into_iter().collect();
    }
    vec![
        format!("❌ {} environment variable not set", API_KEY_VAR),
        format!("   Set it with: export {}=your_api_key", API_KEY_VAR),
        "   Or use --mock / --no-translate".to_string(),
    ]
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = build_command().get_matches();
    let verbose = matches.get_flag("verbose");

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(if verbose { "info" } else { "warn" })),
        )
        .init();

    if matches.get_flag("list-fields") {
        print_fields();
        return Ok(());
    }

    let values = collect_values(&matches)?;

    if matches.get_flag("no-translate") {
        println!("{}", assemble(&values));
        return Ok(());
    }

    let config = CrafterConfig::from_env()?;
    let gateway = if matches.get_flag("mock") {
        let mock = MockGenerator::new(MockMode::Tagged(config.target_language.clone()));
        TranslationGateway::new(
            Arc::new(mock),
            config.source_language.clone(),
            config.target_language.clone(),
        )
    } else {
        TranslationGateway::from_config(&config)
    };

    if verbose {
        eprintln!("🌍 {} → {}", gateway.source_language(), gateway.target_language());
        if let Some(provider) = gateway.provider_name() {
            eprintln!("🔌 Provider: {}", provider);
        }
    }

    let crafter = PromptCrafter::new(gateway);
    crafter.with_session(|s| s.set_values(values));
    let outcome = crafter.craft().await;
    let snapshot = crafter.snapshot();

    if matches.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        if verbose {
            eprintln!("📝 Prompt ({}):", crafter.gateway().source_language());
        }
        println!("{}", snapshot.source_text);
        if !snapshot.translated_text.is_empty() {
            if verbose {
                eprintln!("✅ Translation ({}):", crafter.gateway().target_language());
            }
            println!();
            println!("{}", snapshot.translated_text);
        }
    }

    if let Err(e) = outcome {
        for line in failure_hints(crafter.gateway().is_available(), snapshot.error.as_deref()) {
            eprintln!("{}", line);
        }
        return Err(e.into());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use veo_prompt_crafter::FieldId;

    #[test]
    fn test_command_is_well_formed() {
        build_command().debug_assert();
    }

    #[test]
    fn test_flags_populate_values() {
        let matches = build_command()
            .try_get_matches_from([
                "prompt-crafter",
                "--subject",
                "a cat",
                "--camera-movement",
                "dolly_in",
                "--spoken-line",
                "Hello there!",
            ])
            .unwrap();
        let values = collect_values(&matches).unwrap();
        assert_eq!(values.get(FieldId::Subject), "a cat");
        assert_eq!(values.get(FieldId::CameraMovement), "dolly_in");
        assert_eq!(values.get(FieldId::SpokenLine), "Hello there!");
        assert_eq!(values.get(FieldId::Place), "");
    }

    #[test]
    fn test_missing_key_hint_names_variable() {
        let hints = failure_hints(false, Some("Translation service unavailable (API key not configured)."));
        assert_eq!(hints[0], "❌ GEMINI_API_KEY environment variable not set");
        assert!(hints[1].contains("export GEMINI_API_KEY="));
    }

    #[test]
    fn test_failure_hint_shows_message() {
        let hints = failure_hints(true, Some("Failed to translate the prompt. Please try again."));
        assert_eq!(hints, vec!["❌ Failed to translate the prompt. Please try again."]);
    }

    #[test]
    fn test_unknown_choice_rejected() {
        let result = build_command().try_get_matches_from([
            "prompt-crafter",
            "--camera-movement",
            "barrel_roll",
        ]);
        assert!(result.is_err());
    }
}

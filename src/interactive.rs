use crate::languages;
use crate::translate::{TranslateOptions, TranslationResult, Translator};
use console::style;
use dialoguer::{Confirm, FuzzySelect, Input};

/// Languages offered first in the target picker.
const COMMON_LANGUAGES: &[&str] = &[
    "fr", "en", "es", "de", "it", "pt", "ja", "zh-CN", "ko", "ru", "ar", "hi", "nl", "pl", "tr",
];

/// Prompt loop: pick a target language, then translate lines until the user stops.
pub async fn run_interactive(translator: &Translator) -> anyhow::Result<()> {
    print_header();

    let mut target = select_language("Translate into:", translator.default_target())?;

    loop {
        let text: String = Input::new()
            .with_prompt(format!("Text ({})", language_label(&target)))
            .allow_empty(true)
            .interact_text()?;

        if text.trim().is_empty() {
            if Confirm::new()
                .with_prompt("Change target language?")
                .default(false)
                .interact()?
            {
                target = select_language("Translate into:", &target)?;
                continue;
            }
            break;
        }

        let options = TranslateOptions::new().to(target.clone());
        match translator.translate(&text, &options).await {
            Ok(result) => print_result(&result),
            Err(e) => println!("{} {}", style("✗").red(), e),
        }
    }

    println!("{}", style("Bye!").dim());
    Ok(())
}

fn print_header() {
    println!();
    println!("{}", style("╔═══════════════════════════════════════╗").cyan());
    println!("{}", style("║     transloader - interactive mode    ║").cyan());
    println!("{}", style("╚═══════════════════════════════════════╝").cyan());
    println!("  Submit an empty line to change language or quit.\n");
}

fn picker_items() -> Vec<(&'static str, &'static str)> {
    let mut items: Vec<(&str, &str)> = COMMON_LANGUAGES
        .iter()
        .filter_map(|code| languages::name(code).map(|name| (*code, name)))
        .collect();

    items.extend(
        languages::all()
            .iter()
            .filter(|(code, _)| *code != "auto" && !COMMON_LANGUAGES.contains(code))
            .copied(),
    );
    items
}

fn select_language(prompt: &str, current: &str) -> anyhow::Result<String> {
    let items = picker_items();
    let labels: Vec<String> = items
        .iter()
        .map(|(code, name)| format!("{} ({})", name, code))
        .collect();

    let current = languages::iso_code(current).unwrap_or("fr");
    let default = items.iter().position(|(code, _)| *code == current).unwrap_or(0);

    let selection = FuzzySelect::new()
        .with_prompt(prompt)
        .items(&labels)
        .default(default)
        .interact()?;

    Ok(items[selection].0.to_string())
}

fn language_label(code: &str) -> String {
    languages::name(code)
        .map(|name| format!("{} ({})", name, code))
        .unwrap_or_else(|| code.to_string())
}

fn print_result(result: &TranslationResult) {
    println!("  {} {}", style("→").green(), style(&result.text).bold());

    let detected = &result.from.language;
    if detected.did_you_mean {
        println!(
            "  {} Detected language: {}",
            style("!").yellow(),
            language_label(&detected.iso)
        );
    }

    let source = &result.from.text;
    if source.auto_corrected {
        println!("  {} Auto-corrected: {}", style("!").yellow(), source.value);
    } else if source.did_you_mean {
        println!("  {} Did you mean: {}", style("?").yellow(), source.value);
    }
    println!();
}

use anyhow::{anyhow, Result};
use clap::Parser;
use std::fs;
use std::path::Path;

// Import from pagermark-core
use pagermark_core::rules::validation::{validate_rules, RuleSetIssue};
use pagermark_core::{
    AlertMessage, AnnotatedMessage, AnnotationConfig, ConfigManager, FileRuleStore, Rule, RuleSet,
    RuleStore,
};

#[derive(Parser)]
#[command(name = "pagermark")]
#[command(about = "A pager-alert message annotator with configurable rules")]
struct Args {
    /// Path to a JSON feed of alert messages to annotate
    #[arg(short, long)]
    input: Option<String>,

    /// Annotate a single raw message instead of a feed
    #[arg(short, long)]
    message: Option<String>,

    /// Context (agency) whose rule set applies; overrides each message's own
    #[arg(long)]
    context: Option<String>,

    /// Path to annotation config file (YAML format)
    #[arg(short, long)]
    config: Option<String>,

    /// Path to a JSON rule set applied to every message (bypasses contexts)
    #[arg(short, long)]
    rules: Option<String>,

    /// Directory of per-context rule sets written by the dashboard
    #[arg(long)]
    store_dir: Option<String>,

    /// Output format: html, json, or text
    #[arg(short = 'f', long, default_value = "html")]
    output_format: String,

    /// Output file path (stdout if not specified)
    #[arg(short, long)]
    output: Option<String>,

    /// CSS class for styled highlights (overrides config)
    #[arg(long)]
    highlight_class: Option<String>,

    /// Validate every configured rule set and exit
    #[arg(long)]
    check_rules: bool,

    /// Show available config options and exit
    #[arg(long)]
    show_configs: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    println!("📟 Pagermark Message Annotator");

    if args.show_configs {
        show_help();
        return Ok(());
    }

    // Load config using the functional fallback pattern
    let mut config = AnnotationConfig::load_with_fallback(args.config.as_deref());

    if let Some(config_path) = &args.config {
        println!("📋 Loaded config from: {}", config_path);
    } else {
        println!("📋 Using default config");
    }

    // Apply CLI overrides to config
    if let Some(class) = &args.highlight_class {
        config.highlight_class = class.clone();
    }

    let override_rules = match &args.rules {
        Some(path) => Some(load_rule_set(path)?),
        None => None,
    };

    let manager = ConfigManager::from_config(config);

    if args.check_rules {
        return check_rules(&manager, override_rules.as_deref());
    }

    let messages = collect_messages(&args)?;
    if messages.is_empty() {
        println!("⚠️  Nothing to annotate. Pass --message or --input.");
        return Ok(());
    }

    let store = match &args.store_dir {
        Some(dir) => Some(FileRuleStore::new(dir)?),
        None => None,
    };

    let engine = manager.engine();
    println!("📄 Annotating {} message(s)", messages.len());

    let mut annotated = Vec::new();
    let mut skipped_total = 0;
    for message in &messages {
        let context = args.context.as_deref().unwrap_or(&message.agency);
        let rules = resolve_rules(context, override_rules.as_ref(), store.as_ref(), &manager)?;

        let result = engine.annotate(&message.message, &rules);
        skipped_total += result.skipped.len();
        annotated.push(AnnotatedMessage {
            message: message.clone(),
            markup: result.markup,
            skipped: result.skipped,
        });
    }

    write_output(&annotated, args.output.as_deref(), &args.output_format)?;

    println!("✅ Annotated {} message(s)", annotated.len());
    if skipped_total > 0 {
        println!(
            "⚠️  {} rule application(s) skipped, run --check-rules for details",
            skipped_total
        );
    }

    Ok(())
}

/// Rule precedence: explicit --rules file, then the dashboard's stored
/// per-context rules, then the config file's contexts with default fallback.
fn resolve_rules(
    context: &str,
    override_rules: Option<&RuleSet>,
    store: Option<&FileRuleStore>,
    manager: &ConfigManager,
) -> Result<RuleSet> {
    if let Some(rules) = override_rules {
        return Ok(rules.clone());
    }

    if let Some(store) = store {
        if let Some(rules) = store.get_rules(context)? {
            return Ok(rules);
        }
    }

    Ok(manager.rules_for(context).clone())
}

fn collect_messages(args: &Args) -> Result<Vec<AlertMessage>> {
    if let Some(text) = &args.message {
        let context = args.context.as_deref().unwrap_or("default");
        return Ok(vec![AlertMessage::new("0000000", context, "cli", text)]);
    }

    let Some(input) = &args.input else {
        return Ok(Vec::new());
    };

    if !Path::new(input).exists() {
        println!("⚠️  Input feed not found at: {}", input);
        println!("   Please check the file path.");
        return Ok(Vec::new());
    }

    let json_str = fs::read_to_string(input)?;
    let messages: Vec<AlertMessage> = serde_json::from_str(&json_str)
        .map_err(|e| anyhow!("Failed to parse message feed {}: {}", input, e))?;
    Ok(messages)
}

fn load_rule_set(path: &str) -> Result<RuleSet> {
    let json_str = fs::read_to_string(path)
        .map_err(|e| anyhow!("Failed to read rule set {}: {}", path, e))?;
    let rules: RuleSet = serde_json::from_str(&json_str)
        .map_err(|e| anyhow!("Failed to parse rule set {}: {}", path, e))?;
    println!("📋 Loaded {} rule(s) from: {}", rules.len(), path);
    Ok(rules)
}

/// Validate every rule set in play and exit non-zero when any rule would be
/// skipped at render time. Suspicious-but-applicable rules only warn.
fn check_rules(manager: &ConfigManager, override_rules: Option<&[Rule]>) -> Result<()> {
    if let Some(rules) = override_rules {
        println!("\n🔍 Checking rule set override...");
        if report_rules(rules) {
            std::process::exit(1);
        }
        return Ok(());
    }

    let config = manager.config();
    let mut failed = false;

    println!("\n🔍 Checking default rules...");
    failed |= report_rules(&config.default_rules);

    for (context, rules) in &config.contexts {
        println!("\n🔍 Checking context: {context}");
        failed |= report_rules(rules);
    }

    if failed {
        std::process::exit(1);
    }
    Ok(())
}

/// Returns true when the set contains rules the engine would skip.
fn report_rules(rules: &[Rule]) -> bool {
    let report = validate_rules(rules);
    report.print();
    report.issues.iter().any(|issue| {
        matches!(
            issue,
            RuleSetIssue::InvalidPattern { .. } | RuleSetIssue::EmptyPattern { .. }
        )
    })
}

fn write_output(annotated: &[AnnotatedMessage], output: Option<&str>, format: &str) -> Result<()> {
    let rendered = match format {
        "json" => serde_json::to_string_pretty(annotated)?,
        "text" => annotated
            .iter()
            .map(|a| format!("{} | {} | {}", a.message.agency, a.message.alias, a.markup))
            .collect::<Vec<_>>()
            .join("\n"),
        other => {
            if other != "html" {
                println!("⚠️  Unknown output format '{}', using html", other);
            }
            annotated
                .iter()
                .map(|a| a.markup.clone())
                .collect::<Vec<_>>()
                .join("\n")
        }
    };

    match output {
        Some(path) => {
            fs::write(path, rendered)?;
            println!("💾 Results saved to: {}", path);
        }
        None => println!("{rendered}"),
    }

    Ok(())
}

fn show_help() {
    println!("\n📋 Available Configuration Options:");
    println!("  --config <path>          Load annotation config file (YAML)");
    println!("  --rules <path>           JSON rule set applied to every message");
    println!("  --store-dir <path>       Directory of per-context rule sets");
    println!("  --input <path>           JSON feed of alert messages");
    println!("  --message <text>         Annotate a single raw message");
    println!("  --context <name>         Context (agency) whose rules apply");
    println!("  --output <path>          Output file path (stdout if not specified)");
    println!("  --output-format <fmt>    Output format: html, json, or text");
    println!("  --highlight-class <css>  CSS class for styled highlights");
    println!("  --check-rules            Validate configured rule sets and exit");

    println!("\n📄 Output Formats:");
    println!("  html  - Annotated markup, one message per line (default)");
    println!("  json  - Full annotated records with skipped-rule diagnostics");
    println!("  text  - agency | alias | markup summary lines");

    println!("\n📝 Example config (YAML):");
    let mut sample = AnnotationConfig::default();
    sample.contexts.insert(
        "FIRE-DISPATCH".to_string(),
        vec![
            Rule::replace("Code 3", "Priority"),
            Rule::styled("ALARM", "Fire alarm"),
        ],
    );
    if let Ok(yaml) = serde_yaml::to_string(&sample) {
        println!("{yaml}");
    }

    println!("📝 Usage Examples:");
    println!("  cargo run -- -m 'Unit 42 responding' -r rules.json");
    println!("  cargo run -- -i feed.json -c annotation.yaml");
    println!("  cargo run -- -i feed.json -f json -o annotated.json");
}

//! Terminal harness for the order resolution pipeline.
//!
//! Plays the role of the customer-facing caller: collects the free-text
//! order and the preference controls as flags, resolves, then prints the raw
//! ticket JSON and the rendered chef ticket.

use anyhow::{anyhow, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use waiter_agentic::{
    format, menu::Menu, preferences::PreferenceInput, resolve_order, DEFAULT_MODEL,
};

#[derive(Parser, Debug)]
#[command(name = "waiter_harness", about = "Turn a free-text order into a kitchen ticket")]
struct Args {
    /// Free-text order, e.g. "a Butter Chicken and 2 Naans, extra spicy"
    #[arg(required_unless_present = "show_menu")]
    order: Option<String>,

    /// Groq API key; falls back to the environment when omitted
    #[arg(long, env = "GROQ_API_KEY", default_value = "", hide_env_values = true)]
    api_key: String,

    /// Model to use
    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,

    /// Spice level, 0-5
    #[arg(long, default_value_t = 2)]
    spice: u8,

    /// Oil level: low, medium or high
    #[arg(long, default_value = "medium")]
    oil: String,

    /// Sweetness, 0-5
    #[arg(long, default_value_t = 1)]
    sweetness: u8,

    /// Salt level: low, normal or high
    #[arg(long, default_value = "normal")]
    salt: String,

    /// Diet type: none, vegetarian, vegan, jain, eggetarian or non-veg
    #[arg(long, default_value = "none")]
    diet: String,

    /// Declared allergy (repeatable): nuts, dairy, gluten, soy or shellfish
    #[arg(long = "allergy")]
    allergies: Vec<String>,

    /// Leave out onion and garlic
    #[arg(long)]
    no_onion_garlic: bool,

    /// Print the menu and exit
    #[arg(long)]
    show_menu: bool,
}

fn parse_prefs(args: &Args) -> Result<PreferenceInput> {
    let allergies = args
        .allergies
        .iter()
        .map(|a| a.parse().map_err(|e: String| anyhow!(e)))
        .collect::<Result<Vec<_>>>()?;

    Ok(PreferenceInput {
        spice: args.spice.min(5),
        oil: args.oil.parse().map_err(|e: String| anyhow!(e))?,
        sweetness: args.sweetness.min(5),
        salt: args.salt.parse().map_err(|e: String| anyhow!(e))?,
        diet: args.diet.parse().map_err(|e: String| anyhow!(e))?,
        allergies,
        onion_garlic_allowed: !args.no_onion_garlic,
    })
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    if args.show_menu {
        println!("{}", format::render_menu(Menu::builtin()));
        return Ok(());
    }

    let order = args.order.as_deref().unwrap_or_default();
    let prefs = parse_prefs(&args)?;

    let ticket = resolve_order(order, &prefs, &args.api_key, &args.model).await?;

    println!("--- raw ticket ---");
    println!("{}", serde_json::to_string_pretty(ticket.as_value())?);
    println!("\n--- chef view ---");
    println!("{}", format::render_chef_ticket(&ticket));

    Ok(())
}

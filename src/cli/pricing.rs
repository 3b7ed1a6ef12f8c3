use clap::{Args, Subcommand};
use rust_decimal::Decimal;
use vitrine::{
    order::currency::{find_currency, format_amount},
    pricing::multiplier::Multiplier,
};

#[derive(Debug, Args)]
pub(crate) struct PricingCommand {
    #[command(subcommand)]
    command: PricingSubcommand,
}

#[derive(Debug, Subcommand)]
enum PricingSubcommand {
    /// Convert between a markup percentage and a multiplier
    Convert(ConvertArgs),
}

#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
struct ConvertArgs {
    /// Markup percentage, e.g. 10 or -10
    #[arg(long, allow_negative_numbers = true)]
    percent: Option<Decimal>,

    /// Multiplier, e.g. 1.1
    #[arg(long)]
    multiplier: Option<Multiplier>,
}

pub(super) fn run(command: PricingCommand, currency: &str) -> Result<(), String> {
    let currency = find_currency(currency).map_err(|error| format!("invalid currency: {error}"))?;
    let PricingSubcommand::Convert(args) = command.command;

    let multiplier = match (args.percent, args.multiplier) {
        (Some(percent), _) => Multiplier::from_percent(percent),
        (None, Some(multiplier)) => Ok(multiplier),
        (None, None) => return Err("pass --percent or --multiplier".to_string()),
    }
    .map_err(|error| format!("invalid markup: {error}"))?;

    let example = multiplier
        .example_price()
        .map_err(|error| format!("invalid markup: {error}"))?;

    println!("multiplicador: {}", multiplier.value());
    println!("percentual: {}", multiplier.percent_label());
    println!(
        "exemplo: {} → {}",
        format_amount(Decimal::ONE_HUNDRED, currency),
        format_amount(example, currency)
    );

    Ok(())
}

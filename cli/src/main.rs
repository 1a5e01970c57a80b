use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use flipcash_pricing_api::prelude::*;

#[derive(Parser)]
#[command(name = "flipcash-pricing")]
#[command(about = "Offline quotes against the Flipcash discrete bonding curve")]
struct Cli {
    #[arg(long, short, global = true, help = "Log quote details at debug level")]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Spot price at a whole-token supply
    Price {
        #[arg(long, help = "Circulating supply in whole tokens")]
        supply: u64,
    },

    /// Cost to mint tokens starting at a supply
    Cost {
        #[arg(long, help = "Circulating supply in whole tokens")]
        supply: u64,

        #[arg(long, help = "Number of whole tokens to mint")]
        tokens: u64,
    },

    /// Tokens purchasable with a value starting at a supply
    Tokens {
        #[arg(long, help = "Circulating supply in whole tokens")]
        supply: u64,

        #[arg(long, help = "Value to spend (e.g., 12.50)")]
        value: String,
    },

    /// Market cap for a supply given in quarks
    MarketCap {
        #[arg(long, help = "Circulating supply in token quarks (10 decimals)")]
        supply_quarks: u64,
    },

    /// Supply backed by a reserve balance
    Supply {
        #[arg(long, help = "Reserve balance in quarks (e.g., 1_000_000 = 1 USDC)")]
        tvl: u64,
    },

    /// Quote a buy
    Buy {
        #[arg(long, help = "Reserve amount to spend in quarks (e.g., 1_000_000 = 1 USDC)")]
        amount: u64,

        #[arg(long, default_value_t = 0, help = "Fee in basis points")]
        fee_bps: u32,

        #[arg(long, help = "Current reserve balance in quarks")]
        tvl: u64,
    },

    /// Quote a sell
    Sell {
        #[arg(long, help = "Token amount to sell in quarks (10 decimals)")]
        amount: u64,

        #[arg(long, default_value_t = 0, help = "Fee in basis points")]
        fee_bps: u32,

        #[arg(long, help = "Current reserve balance in quarks")]
        tvl: u64,
    },

    /// Convert a fiat amount into tokens
    Exchange {
        #[arg(long, help = "Fiat amount (e.g., 5.00)")]
        fiat: String,

        #[arg(long, default_value = "1", help = "Fiat units per unit of reserve (e.g., 1.38262 for CAD)")]
        rate: String,

        #[arg(long, help = "Current reserve balance in quarks")]
        tvl: u64,
    },

    /// Value a token holding in fiat at the current spot price
    Value {
        #[arg(long, help = "Token amount held in quarks (10 decimals)")]
        amount: u64,

        #[arg(long, default_value = "1", help = "Fiat units per unit of reserve")]
        rate: String,

        #[arg(long, help = "Circulating supply in token quarks (10 decimals)")]
        supply_quarks: u64,
    },

    /// Print entries from the embedded pricing tables
    Table {
        #[arg(long, default_value_t = 0, help = "First step index")]
        from: usize,

        #[arg(long, default_value_t = 10, help = "Number of entries to print")]
        count: usize,
    },
}

fn parse_decimal(name: &str, input: &str) -> Result<UnsignedNumeric> {
    parse_numeric(input).ok_or_else(|| anyhow!("Invalid {}: '{}' (expected a plain decimal with at most 18 fractional digits)", name, input))
}

fn print_estimate(label: &str, unit: &str, estimate: &TradeEstimate) {
    println!("{}", label.bold());
    println!("  {} {} {}", "Gross:".cyan(), estimate.gross_amount.to_string(), unit);
    println!("  {} {} {}", "Fees: ".cyan(), estimate.fees.to_string(), unit);
    println!("  {} {} {}", "Net:  ".cyan(), estimate.net_amount.to_string().green(), unit);
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let curve = DiscreteCurve::default();

    match cli.command {
        Commands::Price { supply } => {
            let price = curve
                .spot_price(supply)
                .with_context(|| format!("No price at supply {}", supply))?;
            println!("{} {}", "Spot price:".cyan(), price.to_string().green());
        }

        Commands::Cost { supply, tokens } => {
            let cost = curve
                .tokens_to_value(supply, tokens)
                .with_context(|| format!("Cannot mint {} tokens from supply {}", tokens, supply))?;
            println!("{} {}", "Cost:".cyan(), cost.to_string().green());
        }

        Commands::Tokens { supply, value } => {
            let value = parse_decimal("value", &value)?;
            let tokens = curve
                .value_to_tokens(supply, &value)
                .with_context(|| format!("Cannot spend {} from supply {}", value.to_string(), supply))?;
            println!("{} {}", "Tokens:".cyan(), tokens.to_string().green());
        }

        Commands::MarketCap { supply_quarks } => {
            let cap = curve
                .market_cap(supply_quarks)
                .with_context(|| format!("No market cap for {} quarks", supply_quarks))?;
            println!("{} {}", "Market cap:".cyan(), cap.to_string().green());
        }

        Commands::Supply { tvl } => {
            let supply = curve
                .supply_from_tvl(tvl)
                .with_context(|| format!("No supply for tvl {}", tvl))?;
            println!("{} {}", "Supply:".cyan(), supply.to_string().green());
        }

        Commands::Buy { amount, fee_bps, tvl } => {
            let estimate = curve
                .buy(amount, fee_bps, tvl)
                .with_context(|| format!("Buy of {} quarks failed at tvl {}", amount, tvl))?;
            print_estimate("Buy quote", "tokens", &estimate);
        }

        Commands::Sell { amount, fee_bps, tvl } => {
            let estimate = curve
                .sell(amount, fee_bps, tvl)
                .with_context(|| format!("Sell of {} quarks failed at tvl {}", amount, tvl))?;
            print_estimate("Sell quote", "USDC", &estimate);
        }

        Commands::Exchange { fiat, rate, tvl } => {
            let fiat = parse_decimal("fiat", &fiat)?;
            let rate = parse_decimal("rate", &rate)?;
            let valuation = curve
                .tokens_for_value_exchange(&fiat, &rate, tvl)
                .with_context(|| format!("Exchange failed at tvl {}", tvl))?;
            println!("{} {}", "Tokens:".cyan(), valuation.tokens.to_string().green());
            println!("{} {}", "Fx:    ".cyan(), valuation.fx.to_string());
        }

        Commands::Value { amount, rate, supply_quarks } => {
            let rate = parse_decimal("rate", &rate)?;
            let valuation = curve
                .value_for_tokens(amount, &rate, supply_quarks)
                .with_context(|| format!("Cannot value holding at supply {} quarks", supply_quarks))?;
            let fiat = valuation
                .fiat_value()
                .ok_or_else(|| anyhow!("Holding value overflows"))?;
            println!("{} {}", "Tokens:".cyan(), valuation.tokens.to_string());
            println!("{} {}", "Fx:    ".cyan(), valuation.fx.to_string());
            println!("{} {}", "Value: ".cyan(), fiat.to_string().green());
        }

        Commands::Table { from, count } => {
            if from >= curve.table_len() {
                bail!("Step {} is beyond the table (len {})", from, curve.table_len());
            }

            let end = from.saturating_add(count).min(curve.table_len());
            println!("{:>8}  {:>12}  {:>28}  {:>40}", "step".bold(), "supply".bold(), "price".bold(), "cumulative".bold());
            for step in from..end {
                let price = curve.price_at(step)?;
                let cumulative = curve.cumulative_at(step)?;
                println!(
                    "{:>8}  {:>12}  {:>28}  {:>40}",
                    step,
                    step as u64 * curve.step_size(),
                    price.to_string(),
                    cumulative.to_string()
                );
            }
        }
    }

    Ok(())
}

use dialoguer::{Input, Select};

use staking_rewards_report::{network::Network, rewards::Quarter, Result};

pub fn select_network() -> Result<Network> {
    let names: Vec<&str> = Network::ALL.iter().map(|n| n.display_name()).collect();
    let choice = Select::new()
        .with_prompt("Select the network")
        .items(&names)
        .default(0)
        .interact()?;
    Ok(Network::ALL[choice])
}

pub fn input_year() -> Result<String> {
    let year: String = Input::new()
        .with_prompt("Enter the year")
        .validate_with(|input: &String| -> std::result::Result<(), &str> {
            if is_valid_year(input) {
                Ok(())
            } else {
                Err("Please enter a valid year")
            }
        })
        .interact_text()?;
    Ok(year)
}

pub fn select_quarter() -> Result<Quarter> {
    let names: Vec<String> = Quarter::ALL.iter().map(|q| q.to_string()).collect();
    let choice = Select::new()
        .with_prompt("Select the quarter")
        .items(&names)
        .default(0)
        .interact()?;
    Ok(Quarter::ALL[choice])
}

pub fn input_address() -> Result<String> {
    let address: String = Input::new()
        .with_prompt("Enter the wallet address")
        .validate_with(|input: &String| -> std::result::Result<(), &str> {
            if input.trim().is_empty() {
                Err("Please enter a valid wallet address")
            } else {
                Ok(())
            }
        })
        .interact_text()?;
    Ok(address.trim().to_string())
}

/// Empty input means the price should be fetched
pub fn input_price(currency: &str) -> Result<Option<String>> {
    let price: String = Input::new()
        .with_prompt(format!(
            "Enter the token price in {} (leave empty to fetch from CoinGecko)",
            currency.to_uppercase()
        ))
        .allow_empty(true)
        .validate_with(|input: &String| -> std::result::Result<(), &str> {
            if input.trim().is_empty() || input.trim().parse::<f64>().is_ok() {
                Ok(())
            } else {
                Err("Please enter a valid number")
            }
        })
        .interact_text()?;

    let price = price.trim();
    Ok((!price.is_empty()).then(|| price.to_string()))
}

pub fn is_valid_year(input: &str) -> bool {
    let input = input.trim();
    input.len() == 4 && input.chars().all(|c| c.is_ascii_digit())
}

//! Estimate command - one-shot footprint report.

use verda_chat::{estimate, ActivityInput};

pub(crate) fn run(activity: ActivityInput, json: bool) -> miette::Result<()> {
    let footprint = estimate(&activity);

    if json {
        let rendered = serde_json::to_string_pretty(&footprint)
            .map_err(|e| miette::miette!("Failed to serialize result: {}", e))?;
        println!("{}", rendered);
        return Ok(());
    }

    println!("Estimated weekly footprint");
    println!("==========================");
    println!();
    println!("Transport: {:>8.1} kg CO2", footprint.transport_kg);
    println!("Food:      {:>8.1} kg CO2", footprint.food_kg);
    println!("Total:     {:>8.1} kg CO2", footprint.total_kg);
    println!();
    println!("That's roughly:");
    println!("  - {} trees absorbing CO2 for a year", footprint.trees);
    println!("  - {} short flights", footprint.flights);
    println!("  - {} x 100 km of driving", footprint.driving_100km);

    Ok(())
}

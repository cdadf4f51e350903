use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::{
    analysis::{dto::AnalysisResult, ExpiryHorizon},
    app,
    leaderboard::LeaderboardEntry,
    state::AppState,
};

#[derive(Parser)]
#[command(
    name = "foodprint",
    about = "Household food waste forecasting from fridge photos"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a fridge photo
    Analyze {
        /// Path to the fridge image
        image: PathBuf,
        /// Credit the avoided emissions to this user on the leaderboard
        #[arg(long)]
        username: Option<String>,
    },
    /// Show the top contributors
    Leaderboard {
        /// Number of users to show (defaults to LEADERBOARD_LIMIT)
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Run the HTTP API
    Serve,
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let state = AppState::init().context("load configuration")?;

    match cli.command {
        Commands::Analyze { image, username } => {
            println!("Analyzing fridge contents...");
            let result = state
                .coordinator
                .analyze(&image)
                .with_context(|| format!("analyze {}", image.display()))?;
            print!("{}", render_analysis(&result, state.coordinator.horizon()));

            if let Some(username) = username {
                let (entry, rank) = state
                    .coordinator
                    .contribute(&username, &(&result.emission_results).into())?;
                println!(
                    "\nAdded contribution for user: {} (rank {rank})",
                    entry.username
                );
                let top = state.coordinator.top(state.config.leaderboard_limit)?;
                print!("\n{}", render_leaderboard(&top));
            }
        }
        Commands::Leaderboard { limit } => {
            let top = state
                .coordinator
                .top(limit.unwrap_or(state.config.leaderboard_limit))?;
            if top.is_empty() {
                println!("No contributions yet.");
            } else {
                print!("{}", render_leaderboard(&top));
            }
        }
        Commands::Serve => {
            let addr = state.config.bind_addr()?;
            app::serve(app::build_app(state), addr).await?;
        }
    }
    Ok(())
}

pub fn render_analysis(result: &AnalysisResult, horizon: ExpiryHorizon) -> String {
    let mut out = String::from("\nDetected items:\n");
    for item in &result.detected_items {
        let status = if horizon.is_expiring(item) {
            " (EXPIRING SOON!)"
        } else {
            ""
        };
        out.push_str(&format!(
            "- {}: {} items, expires in {} days{}\n",
            item.name, item.quantity, item.days_until_expiry, status
        ));
    }

    let waste = &result.waste_prediction;
    out.push_str("\nWaste prediction:\n");
    out.push_str(&format!(
        "- {} items expiring soon out of {} total\n",
        waste.expiring_soon, waste.total_items
    ));
    out.push_str(&format!(
        "- Estimated waste: {:.1}%\n",
        waste.estimated_waste_percentage
    ));

    out.push_str("\nRecommended recipes:\n");
    for recipe in &result.recommended_recipes {
        out.push_str(&format!(
            "- {} (Prep time: {} mins)\n",
            recipe.name, recipe.preparation_time_minutes
        ));
    }

    let em = &result.emission_results;
    out.push_str("\nEnvironmental impact:\n");
    out.push_str(&format!(
        "- Emissions that can be avoided: {} kg CO2\n",
        em.avoided_emissions_kg
    ));
    out.push_str(&format!(
        "- Items saved from waste: {} out of {}\n",
        em.items_saved, em.total_items
    ));
    out.push_str(&format!(
        "- Waste prevented: {:.1}%\n",
        em.waste_prevented_percentage
    ));
    out
}

pub fn render_leaderboard(entries: &[LeaderboardEntry]) -> String {
    let mut out = String::from("Top contributors:\n");
    for (i, e) in entries.iter().enumerate() {
        out.push_str(&format!(
            "{}. {}: {:.1} kg CO2 avoided\n",
            i + 1,
            e.username,
            e.total_emissions_avoided_kg
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::AppConfig, coordinator::Coordinator};
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_analyze_with_username() {
        let cli = Cli::try_parse_from(["foodprint", "analyze", "fridge.jpg", "--username", "Alice"])
            .unwrap();
        match cli.command {
            Commands::Analyze { image, username } => {
                assert_eq!(image, PathBuf::from("fridge.jpg"));
                assert_eq!(username.as_deref(), Some("Alice"));
            }
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn report_marks_expiring_items() {
        let dir = tempfile::tempdir().unwrap();
        let c = Coordinator::new(&AppConfig::with_data_dir(dir.path()));
        let result = c.analyze_items(crate::analysis::sample_fridge());

        let report = render_analysis(&result, c.horizon());
        assert!(report.contains("- tomato: 3 items, expires in 2 days (EXPIRING SOON!)"));
        assert!(report.contains("- milk: 1 items, expires in 5 days\n"));
        assert!(report.contains("- 6 items expiring soon out of 7 total"));
        assert!(report.contains("Estimated waste: 85.7%"));
        assert!(report.contains("- Banana Bread (Prep time: 30 mins)"));
        assert!(report.contains("Emissions that can be avoided: 6.1 kg CO2"));
    }

    #[test]
    fn leaderboard_lines_are_numbered() {
        let dir = tempfile::tempdir().unwrap();
        let c = Coordinator::new(&AppConfig::with_data_dir(dir.path()));
        let summary = |kg| crate::analysis::dto::ContributionSummary {
            avoided_emissions_kg: kg,
            items_saved: 1,
        };
        c.contribute("Bob", &summary(3.7)).unwrap();
        c.contribute("Charlie", &summary(7.1)).unwrap();

        let text = render_leaderboard(&c.top(10).unwrap());
        assert_eq!(
            text,
            "Top contributors:\n1. Charlie: 7.1 kg CO2 avoided\n2. Bob: 3.7 kg CO2 avoided\n"
        );
    }
}

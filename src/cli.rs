use clap::{Parser, Subcommand};
use tracing::info;

use crate::controller::{Action, Outcome, ViewController};
use crate::jobs::{DateOrder, FilterCriteria};
use crate::render::render_detail;

#[derive(Parser)]
#[command(name = "job-board", version, about = "Server-rendered job board")]
pub struct Cmd {
    #[command(subcommand)]
    pub command: Option<SubCommandType>,
}

#[derive(Subcommand)]
pub enum SubCommandType {
    /// Run the web front end (default)
    Serve,
    /// Print the filtered listing as JSON
    Jobs {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value = "all")]
        category: String,
        #[arg(long, default_value_t = DateOrder::Newest)]
        order: DateOrder,
    },
    /// Print the rendered detail view of one job
    Show { id: i64 },
}

/// One-shot commands; `Serve` is handled by `main`
pub async fn run(command: SubCommandType, controller: ViewController) -> Result<(), String> {
    controller.initialize().await;

    match command {
        SubCommandType::Serve => Ok(()),
        SubCommandType::Jobs {
            search,
            category,
            order,
        } => {
            let criteria = FilterCriteria::default()
                .with_search(search)
                .with_category(category)
                .with_order(order);
            info!("Listing jobs for {:?}", criteria);

            match controller.dispatch(Action::ApplyFilter(criteria)).await {
                Outcome::Applied => {
                    let listing = controller.inspect(|state| state.listing.clone()).await;
                    let json = serde_json::to_string_pretty(&listing).map_err(|e| e.to_string())?;
                    println!("{}", json);
                    Ok(())
                }
                _ => Err(failure(&controller, "Failed to load jobs").await),
            }
        }
        SubCommandType::Show { id } => match controller.dispatch(Action::SelectJob(id)).await {
            Outcome::Applied => {
                let html = controller
                    .inspect(|state| state.detail.as_ref().map(render_detail).unwrap_or_default())
                    .await;
                println!("{}", html);
                Ok(())
            }
            _ => Err(failure(&controller, "Job not found").await),
        },
    }
}

async fn failure(controller: &ViewController, fallback: &str) -> String {
    controller
        .present(|state| state.notice.as_ref().map(|n| n.message.clone()))
        .await
        .unwrap_or_else(|| fallback.to_string())
}

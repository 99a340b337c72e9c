use trip_planner::phases::run;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    run::run().await?;
    Ok(())
}

// Overlays two synthetic series, derives a ratio and a momentum indicator,
// and prints the merged chart as CSV.
//
// Run with: RUST_LOG=debug cargo run --example overlay_formula
use macro_lens_workspace::series_data::utils::generate_test_series;
use macro_lens_workspace::{CalculationType, Timeframe, Workspace};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut workspace = Workspace::load_default();

    let payrolls = generate_test_series("payrolls", 365, 150_000.0, 0.01)?;
    let claims = generate_test_series("claims", 365, 220.0, 0.05)?;

    let a = workspace.add_series("Payrolls", payrolls.points().to_vec())?;
    let b = workspace.add_series("Initial claims", claims.points().to_vec())?;

    // Switch to monthly buckets; the "fetch" here just hands back the same data
    let token = workspace.begin_refetch(Timeframe::Monthly);
    let outcome = workspace.apply_refetch(
        token,
        Ok(vec![
            (a.clone(), payrolls.points().to_vec()),
            (b.clone(), claims.points().to_vec()),
        ]),
    )?;
    log::info!("Refetch outcome: {:?}", outcome);

    let ratio = workspace.create_formula("DIVIDE(A, B)")?;
    let momentum = workspace.create_formula("RSI(A, 3)")?;

    for series in workspace.list() {
        println!(
            "{:<16} {:>4} points  axis={:?}  formula={}",
            series.name,
            series.len(),
            series.y_axis,
            series.source_formula.as_deref().unwrap_or("-")
        );
    }

    // Keep the chart to payrolls and its momentum
    workspace.set_visible(&b, false)?;
    workspace.set_visible(&ratio, false)?;
    workspace.set_calculation_type(CalculationType::PeriodToPeriodPercent);

    println!();
    workspace.export_csv(std::io::stdout())?;

    if let Some(last) = workspace.series(&momentum).and_then(|s| s.points().last()) {
        println!("\nLatest RSI(3) on {}: {:?}", last.date, last.value);
    }

    Ok(())
}

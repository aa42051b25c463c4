use anyhow::Context;
use pond_dash::chart::{build_chart, write_chart, ChartConfig};
use pond_dash::pond_plot::parse_cli;
use pond_dash::utils::init_logging;
use pond_dash::{ReadingTable, DEFAULT_RADIO_VALUE};

fn main() -> anyhow::Result<()> {
    init_logging(false);
    let (csvin, htmlout, today, window_days) = parse_cli();
    log::info!(
        "read data from {} and plot to {}, window ending {}",
        csvin.display(),
        htmlout.display(),
        today
    );
    let table = ReadingTable::from_csv(&csvin)
        .with_context(|| format!("could not load readings from {}", csvin.display()))?;
    let config = ChartConfig {
        window_days,
        ..Default::default()
    };
    let plot = build_chart(&table, DEFAULT_RADIO_VALUE, today, &config)?;
    write_chart(&plot, &htmlout)
        .with_context(|| format!("could not write {}", htmlout.display()))?;
    Ok(())
}

use anyhow::Context;
use pond_dash::chart::{ChartBuilder, ChartConfig, UpdateSink};
use pond_dash::dashboard::{self, PageLayout};
use pond_dash::pond_dash::parse_cli;
use pond_dash::utils::{init_logging, open_browser};
use pond_dash::ReadingTable;
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = parse_cli();
    init_logging(args.verbose);
    log::debug!("{:?}", args);

    let table = ReadingTable::from_csv(&args.csvin)
        .with_context(|| format!("could not load readings from {}", args.csvin.display()))?;

    if args.sink == UpdateSink::File {
        log::warn!(
            "updates only rewrite {}, the page graph is not redrawn (use --sink both)",
            args.htmlout.display()
        );
    }

    let config = ChartConfig {
        window_days: args.window_days,
        ..Default::default()
    };
    let builder = ChartBuilder::new(Arc::new(table), config, &args.htmlout, args.sink);
    let app = dashboard::router(builder, &PageLayout::default(), &args.assets);

    let listener = TcpListener::bind(args.addr)
        .await
        .with_context(|| format!("could not bind {}", args.addr))?;
    let url = format!("http://{}", args.addr);
    if args.open_browser {
        if let Err(e) = open_browser(&url) {
            log::warn!("could not open the browser at {}: {}", url, e);
        }
    }
    log::info!("dashboard running at {}", url);
    dashboard::serve(listener, app).await?;
    Ok(())
}

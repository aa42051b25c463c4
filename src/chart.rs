use crate::utils::*;
use crate::{PondSeries, ReadingTable, DEFAULT_WINDOW_DAYS};
use chrono::prelude::*;
use plotly::color::NamedColor;
use plotly::common::{AxisSide, Line, Mode, Title};
use plotly::layout::{
    Axis, Layout, RangeSelector, RangeSlider, SelectorButton, SelectorStep, StepMode,
};
use plotly::{Plot, Scatter};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

/// Static configuration of the pond chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartConfig {
    /// Fixed range of the pond level axis.
    pub pond_range: (f64, f64),
    /// Fixed range of the rain axis.
    pub rain_range: (f64, f64),
    /// Days shown by default, counted back from today.
    pub window_days: i64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        ChartConfig {
            pond_range: (0., 4.),
            rain_range: (0., 2.),
            window_days: DEFAULT_WINDOW_DAYS,
        }
    }
}

/// Where a rebuilt chart goes.
///
/// The chart is always written to the html file.
/// With `File` nothing is handed back to the page, so the graph on the page stays as it is;
/// with `Both` the figure is also returned and the page redraws it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdateSink {
    #[default]
    File,
    Both,
}

impl FromStr for UpdateSink {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "file" => Ok(UpdateSink::File),
            "both" => Ok(UpdateSink::Both),
            other => Err(format!("unknown update sink {}, use file or both", other)),
        }
    }
}

/// Bordered axis as used for all three axes.
fn bordered_axis() -> Axis {
    Axis::new()
        .show_line(true)
        .line_width(2)
        .line_color(NamedColor::Black)
        .mirror(true)
}

fn range_selector() -> RangeSelector {
    RangeSelector::new().buttons(vec![
        SelectorButton::new()
            .count(1)
            .label("1m")
            .step(SelectorStep::Month)
            .step_mode(StepMode::Backward),
        SelectorButton::new()
            .count(6)
            .label("6m")
            .step(SelectorStep::Month)
            .step_mode(StepMode::Backward),
        SelectorButton::new()
            .count(1)
            .label("YTD")
            .step(SelectorStep::Year)
            .step_mode(StepMode::ToDate),
        SelectorButton::new()
            .count(1)
            .label("1y")
            .step(SelectorStep::Year)
            .step_mode(StepMode::Backward),
        SelectorButton::new().step(SelectorStep::All),
    ])
}

/// Build the two-axis pond chart:
/// pond level on the left axis and rain on the right one, both against the date.
/// The y ranges are fixed, values beyond them are only clipped by the plot.
/// The selection from the page is accepted but does not change the chart.
pub fn build_chart(
    table: &ReadingTable,
    selection: &str,
    today: NaiveDate,
    config: &ChartConfig,
) -> Result<Plot, PondError> {
    log::debug!("building chart for selection {:?} and today {}", selection, today);
    let series = PondSeries::from_table(table)?;

    let pond_trace = Scatter::new(series.date.clone(), series.pond_level)
        .name("PondLevel")
        .mode(Mode::Lines)
        .show_legend(false)
        .line(Line::new().color(NamedColor::Red));
    let rain_trace = Scatter::new(series.date, series.rain)
        .name("Rain (in.)")
        .mode(Mode::Lines)
        .show_legend(false)
        .line(Line::new().color(NamedColor::Blue))
        .y_axis("y2");

    let (then, now) = default_window(today, config.window_days)?;
    let x_axis = bordered_axis()
        .title(Title::new("Date"))
        .range(vec![then.to_string(), now.to_string()])
        .range_slider(RangeSlider::new().visible(false))
        .range_selector(range_selector());
    let pond_axis = bordered_axis()
        .title(Title::new("<b>Pond Level</b>"))
        .color(NamedColor::Red)
        .range(vec![config.pond_range.0, config.pond_range.1]);
    let rain_axis = bordered_axis()
        .title(Title::new("<b>Rain</b>"))
        .color(NamedColor::Blue)
        .range(vec![config.rain_range.0, config.rain_range.1])
        .overlaying("y")
        .side(AxisSide::Right);

    let layout = Layout::new()
        .x_axis(x_axis)
        .y_axis(pond_axis)
        .y_axis2(rain_axis);

    let mut plot = Plot::new();
    plot.add_trace(pond_trace);
    plot.add_trace(rain_trace);
    plot.set_layout(layout);
    Ok(plot)
}

/// Write the chart as a standalone html page, overwriting any previous file.
pub fn write_chart<P>(plot: &Plot, fout: P) -> Result<(), PondError>
where
    P: AsRef<Path>,
{
    let fout = fout.as_ref();
    std::fs::write(fout, plot.to_html())?;
    log::info!("chart written to {}", fout.display());
    Ok(())
}

/// The figure as plotly.js expects it: data, layout, and config.
pub fn figure_json(plot: &Plot) -> Result<serde_json::Value, PondError> {
    Ok(serde_json::from_str(&plot.to_json())?)
}

/// Rebuilds the chart whenever the page selection changes.
#[derive(Debug, Clone)]
pub struct ChartBuilder {
    table: Arc<ReadingTable>,
    config: ChartConfig,
    htmlout: PathBuf,
    sink: UpdateSink,
}

impl ChartBuilder {
    pub fn new<P>(
        table: Arc<ReadingTable>,
        config: ChartConfig,
        htmlout: P,
        sink: UpdateSink,
    ) -> ChartBuilder
    where
        P: Into<PathBuf>,
    {
        ChartBuilder {
            table,
            config,
            htmlout: htmlout.into(),
            sink,
        }
    }

    pub fn sink(&self) -> UpdateSink {
        self.sink
    }

    pub fn htmlout(&self) -> &Path {
        &self.htmlout
    }

    /// Update callback, the default window ends at the local date of the call.
    pub fn update(&self, selection: &str) -> Result<Option<Plot>, PondError> {
        self.update_at(selection, Local::now().date_naive())
    }

    /// Rebuild the chart for the given date and write it to the html file.
    /// Return the chart only when the sink includes the page.
    pub fn update_at(
        &self,
        selection: &str,
        today: NaiveDate,
    ) -> Result<Option<Plot>, PondError> {
        let plot = build_chart(&self.table, selection, today, &self.config)?;
        write_chart(&plot, &self.htmlout)?;
        match self.sink {
            UpdateSink::File => Ok(None),
            UpdateSink::Both => Ok(Some(plot)),
        }
    }
}

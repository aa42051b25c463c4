use super::*;
use chrono::prelude::*;
use clap::{value_parser, Arg, ArgMatches, Command};
use std::path::PathBuf;

pub fn build_cli() -> Command {
    let arg_csvin = Arg::new("input_csvfile")
        .help("name for the csv file")
        .short('f')
        .long("csvfile")
        .num_args(1)
        .value_parser(value_parser!(PathBuf))
        .default_value(DEFAULT_CSV);
    let arg_htmlout = Arg::new("output_htmlfile")
        .help("name of the output html file")
        .short('o')
        .long("htmlfile")
        .num_args(1)
        .value_parser(value_parser!(PathBuf));
    let arg_today = Arg::new("today")
        .help("last day of the default window, YYYY-MM-DD, local date if not given")
        .long("today")
        .num_args(1)
        .value_parser(utils::parse_date);
    let arg_window_days = Arg::new("window_days")
        .help("days shown by default")
        .long("window_days")
        .num_args(1)
        .value_parser(value_parser!(i64).range(1..=MAX_WINDOW_DAYS))
        .default_value("30");
    Command::new("Pond_plot")
        .version(VERSION.unwrap_or("unknown"))
        .about("cli app to plot the pond level and rain to html")
        .arg(arg_csvin)
        .arg(arg_htmlout)
        .arg(arg_today)
        .arg(arg_window_days)
}

/// Returns the csv input, the html output, the date the default window ends at,
/// and the number of days in the window.
pub fn plot_args(cli_args: &ArgMatches) -> (PathBuf, PathBuf, NaiveDate, i64) {
    // csvin and window_days have a default, safe to unwrap
    let csvin: PathBuf = cli_args
        .get_one::<PathBuf>("input_csvfile")
        .unwrap()
        .to_owned();
    // htmlout does not have a default because it is defined based on the csvin name
    let htmlout = match cli_args.get_one::<PathBuf>("output_htmlfile") {
        Some(p) => p.to_owned(),
        None => csvin.with_extension("html"),
    };
    let today = match cli_args.get_one::<NaiveDate>("today") {
        Some(d) => *d,
        None => Local::now().date_naive(),
    };
    let window_days = *cli_args.get_one::<i64>("window_days").unwrap();
    (csvin, htmlout, today, window_days)
}

/// Takes the CLI arguments that control the one-off plot of the pond readings.
pub fn parse_cli() -> (PathBuf, PathBuf, NaiveDate, i64) {
    plot_args(&build_cli().get_matches())
}

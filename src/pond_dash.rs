use super::*;
use crate::chart::UpdateSink;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

/// Settings of the dashboard server.
#[derive(Debug, Clone, PartialEq)]
pub struct DashArgs {
    pub csvin: PathBuf,
    pub htmlout: PathBuf,
    pub addr: SocketAddr,
    pub assets: PathBuf,
    pub window_days: i64,
    pub sink: UpdateSink,
    pub open_browser: bool,
    pub verbose: bool,
}

pub fn build_cli() -> Command {
    let arg_csvin = Arg::new("input_csvfile")
        .help("name of the csv file with the Date, PondLevel, and Rain columns")
        .short('f')
        .long("csvfile")
        .num_args(1)
        .value_parser(value_parser!(PathBuf))
        .default_value(DEFAULT_CSV);
    let arg_htmlout = Arg::new("output_htmlfile")
        .help("html file rewritten with the chart on every update")
        .short('o')
        .long("htmlfile")
        .num_args(1)
        .value_parser(value_parser!(PathBuf))
        .default_value(DEFAULT_HTML);
    let arg_ip = Arg::new("ip_address")
        .help("ip address to serve the dashboard on")
        .long("ip")
        .num_args(1)
        .value_parser(value_parser!(IpAddr))
        .default_value(DEFAULT_IP);
    let arg_port = Arg::new("port")
        .help("port to serve the dashboard on")
        .short('p')
        .long("port")
        .num_args(1)
        .value_parser(value_parser!(u16))
        .default_value("8050");
    let arg_assets = Arg::new("assets")
        .help("directory with the page images, served under /assets")
        .long("assets")
        .num_args(1)
        .value_parser(value_parser!(PathBuf))
        .default_value(DEFAULT_ASSETS);
    let arg_window_days = Arg::new("window_days")
        .help("days shown by default, counted back from today")
        .long("window_days")
        .num_args(1)
        .value_parser(value_parser!(i64).range(1..=MAX_WINDOW_DAYS))
        .default_value("30");
    let arg_sink = Arg::new("sink")
        .help("where the updated chart goes: only the html file, or both the file and the page")
        .long("sink")
        .num_args(1)
        .value_parser(["file", "both"])
        .default_value("file");
    let arg_no_browser = Arg::new("no_browser")
        .help("do not open the dashboard in the default web browser")
        .long("no_browser")
        .action(ArgAction::SetTrue);
    let arg_verbose = Arg::new("verbose")
        .help("print verbose information")
        .short('v')
        .long("verbose")
        .action(ArgAction::SetTrue);
    Command::new("Pond_dash")
        .version(VERSION.unwrap_or("unknown"))
        .about("dashboard app to plot the farm pond level and rain")
        .arg(arg_csvin)
        .arg(arg_htmlout)
        .arg(arg_ip)
        .arg(arg_port)
        .arg(arg_assets)
        .arg(arg_window_days)
        .arg(arg_sink)
        .arg(arg_no_browser)
        .arg(arg_verbose)
}

/// All the arguments have a default or are flags,
/// so get_one always returns Some and it is safe to unwrap.
pub fn dash_args(cli_args: &ArgMatches) -> DashArgs {
    let csvin = cli_args
        .get_one::<PathBuf>("input_csvfile")
        .unwrap()
        .to_owned();
    let htmlout = cli_args
        .get_one::<PathBuf>("output_htmlfile")
        .unwrap()
        .to_owned();
    let ip = *cli_args.get_one::<IpAddr>("ip_address").unwrap();
    let port = *cli_args.get_one::<u16>("port").unwrap();
    let assets = cli_args.get_one::<PathBuf>("assets").unwrap().to_owned();
    let window_days = *cli_args.get_one::<i64>("window_days").unwrap();
    // the possible values are enforced by clap
    let sink = cli_args
        .get_one::<String>("sink")
        .unwrap()
        .parse::<UpdateSink>()
        .unwrap_or_default();
    DashArgs {
        csvin,
        htmlout,
        addr: SocketAddr::new(ip, port),
        assets,
        window_days,
        sink,
        open_browser: !cli_args.get_flag("no_browser"),
        verbose: cli_args.get_flag("verbose"),
    }
}

/// Takes the CLI arguments of the dashboard server.
pub fn parse_cli() -> DashArgs {
    dash_args(&build_cli().get_matches())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_dashboard() {
        let m = build_cli().try_get_matches_from(["pond_dash"]).unwrap();
        let args = dash_args(&m);
        assert_eq!(args.csvin, PathBuf::from("FarmData.csv"));
        assert_eq!(args.htmlout, PathBuf::from("graph.html"));
        assert_eq!(args.addr, "127.0.0.1:8050".parse::<SocketAddr>().unwrap());
        assert_eq!(args.window_days, DEFAULT_WINDOW_DAYS);
        assert_eq!(args.sink, UpdateSink::File);
        assert!(args.open_browser);
        assert!(!args.verbose);
    }

    #[test]
    fn overrides() {
        let m = build_cli()
            .try_get_matches_from([
                "pond_dash",
                "-f",
                "pond.csv",
                "--port",
                "9000",
                "--sink",
                "both",
                "--no_browser",
                "-v",
            ])
            .unwrap();
        let args = dash_args(&m);
        assert_eq!(args.csvin, PathBuf::from("pond.csv"));
        assert_eq!(args.addr.port(), 9000);
        assert_eq!(args.sink, UpdateSink::Both);
        assert!(!args.open_browser);
        assert!(args.verbose);
    }

    #[test]
    fn window_days_are_bounded() {
        assert!(build_cli()
            .try_get_matches_from(["pond_dash", "--window_days", "9999999999999"])
            .is_err());
        assert!(build_cli()
            .try_get_matches_from(["pond_dash", "--window_days", "0"])
            .is_err());
        let m = build_cli()
            .try_get_matches_from(["pond_dash", "--window_days", "36500"])
            .unwrap();
        assert_eq!(dash_args(&m).window_days, MAX_WINDOW_DAYS);
    }

    #[test]
    fn unknown_sink_is_rejected() {
        assert!(build_cli()
            .try_get_matches_from(["pond_dash", "--sink", "page"])
            .is_err());
    }
}

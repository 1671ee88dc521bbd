use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::{ArgAction, Parser};
use log::{debug, info};

use rtrsub::config::{parse_asn_filter, Afi, Config};
use rtrsub::errors::LoadError;
use rtrsub::output::RenderContext;
use rtrsub::{load_roas_from_reader, RoaData};

#[derive(Parser)]
#[command(version, about, long_about = None, disable_version_flag = true)]
struct Cli {
    /// Location of the RPKI cache export in JSON format, `-` for stdin
    #[arg(short, long, default_value = "-")]
    cache: PathBuf,

    /// Address family to process: ipv4, ipv6 or mixed
    #[arg(long, required = true)]
    afi: Afi,

    /// Comma-separated list of origin AS numbers to restrict the ROA list
    /// to
    #[arg(short, long)]
    asns: Option<String>,

    /// Output file, `-` for stdout
    #[arg(short, long, default_value = "-")]
    output: PathBuf,

    /// Pretty-print the JSON output
    #[arg(long, default_value_t = false)]
    pretty: bool,

    /// Log more, may be repeated
    #[arg(long, action = ArgAction::Count)]
    verbose: u8,

    /// Display the rtrsub version
    #[arg(short = 'v', long, action = ArgAction::Version)]
    #[allow(dead_code)]
    version: Option<bool>,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(level),
    )
    .init();
}

fn is_stdio(path: &Path) -> bool {
    path.as_os_str() == "-"
}

fn load(args: &Cli) -> Result<RoaData, LoadError> {
    let mut config = Config::new(args.afi);
    if let Some(asns) = &args.asns {
        config = config.with_asn_filter(parse_asn_filter(asns)?);
    }
    debug!("config {:?}", config);

    if is_stdio(&args.cache) {
        let mut buf = vec![];
        io::stdin().read_to_end(&mut buf)?;
        load_roas_from_reader(buf.as_slice(), &config)
    } else {
        info!("reading {}", args.cache.display());
        let file = File::open(&args.cache)?;
        load_roas_from_reader(BufReader::new(file), &config)
    }
}

fn write(args: &Cli, data: &RoaData) -> Result<(), io::Error> {
    let context = RenderContext::new(data);
    let mut writer: Box<dyn Write> = if is_stdio(&args.output) {
        Box::new(BufWriter::new(io::stdout().lock()))
    } else {
        Box::new(BufWriter::new(File::create(&args.output)?))
    };
    if args.pretty {
        context.to_writer_pretty(&mut writer)?;
    } else {
        context.to_writer(&mut writer)?;
    }
    writeln!(writer)?;
    writer.flush()
}

fn main() {
    let args = Cli::parse();
    init_logging(args.verbose);

    let data = match load(&args) {
        Ok(data) => data,
        Err(err) => {
            eprintln!("{}", err);
            process::exit(2);
        }
    };

    if let Err(err) = write(&args, &data) {
        eprintln!("Error: cannot write output: {}", err);
        process::exit(1);
    }
}

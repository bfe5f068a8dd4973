use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing::{Level, info, trace};

mod engine;
mod host;

use engine::{DEFAULT_INTERVAL_US, Engine, Report};
use host::fifo::Fifo;

/// How often the driver loop requests a report, mirroring the 8 ms interrupt
/// endpoint interval of a full-speed HID keyboard.
const POLL_PERIOD: Duration = Duration::from_millis(8);

/// Virtual HID keyboard driven by piped text
/// Decodes text and `\`-escapes from a named FIFO into boot-protocol reports
#[derive(Parser)]
#[command(name = "pipekey")]
#[command(about = "A virtual HID boot-protocol keyboard driven by piped text")]
struct Args {
    /// Path for the input FIFO (default: /tmp/pipekey/buffer_<pid>)
    #[arg(long)]
    fifo: Option<PathBuf>,

    /// Minimum microseconds between decoded key events
    #[arg(long, default_value_t = DEFAULT_INTERVAL_US)]
    interval_us: u64,

    /// Print every polled report, not just changes
    #[arg(long)]
    all_reports: bool,

    /// Print the HID report descriptor as hex and exit
    #[arg(long)]
    descriptor: bool,

    /// Log to a file in the temp dir instead of stdout
    #[arg(long)]
    log_file: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> io::Result<()> {
    let args = Args::parse();
    if args.descriptor {
        let hex: Vec<String> = engine::report::REPORT_DESCRIPTOR
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect();
        println!("{}", hex.join(" "));
        return Ok(());
    }
    let level = if args.verbose {
        Level::TRACE
    } else {
        Level::INFO
    };
    if args.log_file {
        host::logging::setup_logging_file(level)?;
    } else {
        host::logging::setup_logging_stdio(level);
    }

    let fifo = match &args.fifo {
        Some(path) => Fifo::create_at(path)?,
        None => Fifo::create_default()?,
    };
    info!("pipekey starting");
    info!(
        "Pipe text into {:?}, e.g.: printf 'ls\\\\cr' > {}",
        fifo.path(),
        fifo.path().display()
    );

    let mut engine = Engine::new(fifo, Duration::from_micros(args.interval_us));
    let mut stdout = io::stdout();
    let mut previous = Report::idle();
    loop {
        let report = engine.poll();
        trace!("polled {report:?}");
        if args.all_reports || report != previous {
            let hex: Vec<String> = report.as_bytes().iter().map(|b| format!("{b:02x}")).collect();
            writeln!(stdout, "{}", hex.join(" "))?;
            stdout.flush()?;
            previous = report;
        }
        std::thread::sleep(POLL_PERIOD);
    }
}

//! wwctl — drive an IBM Wheelwriter through its serial interface board.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::error;
use wheelwriter_client::{
    ClientError, Keyboard, SerialTransport, Session, SessionConfig, Typewriter,
};

#[derive(Parser)]
#[command(
    name = "wwctl",
    version,
    about = "Drive an IBM Wheelwriter through its serial interface board"
)]
struct Cli {
    /// Serial device of the interface board
    #[arg(short, long)]
    device: String,

    /// Baud rate of the serial link
    #[arg(long, default_value_t = 115200)]
    baud: u32,

    /// Disable XON/XOFF software flow control
    #[arg(long)]
    no_flow_control: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Stream a text file through the board's type mode
    Type {
        /// Text file to send
        file: PathBuf,

        /// Additional line advances after the text
        #[arg(short, long, default_value_t = 0)]
        endlines: u32,

        /// Keyboard layout id (1 = US, 103 = full ASCII)
        #[arg(short, long, default_value = "1", value_parser = parse_keyboard)]
        keyboard: Keyboard,
    },

    /// Passively report bus traffic until interrupted
    Read,

    /// Query the typewriter model and mounted printwheel
    Query,

    /// Reset the typewriter
    Reset,
}

fn parse_keyboard(arg: &str) -> Result<Keyboard, String> {
    let id: u8 = arg
        .parse()
        .map_err(|_| format!("`{arg}` is not a keyboard id"))?;
    Keyboard::from_id(id).ok_or_else(|| format!("unknown keyboard id {id}"))
}

#[derive(Debug, thiserror::Error)]
enum WwctlError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("failed to install interrupt handler: {0}")]
    Interrupt(#[from] ctrlc::Error),
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), WwctlError> {
    let transport = SerialTransport::open(&cli.device, cli.baud, !cli.no_flow_control)
        .map_err(ClientError::from)?;
    let mut session = Session::new(transport, SessionConfig::default());
    session.connect().map_err(fatal_connect)?;

    match cli.command {
        Command::Type {
            file,
            endlines,
            keyboard,
        } => {
            let reader = BufReader::new(File::open(file).map_err(ClientError::from)?);
            let mut type_mode = session.enter_type(keyboard)?;
            type_mode.send_reader(reader)?;
            type_mode.advance_lines(endlines)?;
            let sent = type_mode.chars_sent();
            type_mode.exit()?;
            println!("sent {sent} characters");
        }

        Command::Read => {
            let cancel = Arc::new(AtomicBool::new(false));
            let handler_flag = cancel.clone();
            ctrlc::set_handler(move || handler_flag.store(true, Ordering::Relaxed))?;

            eprintln!("reporting bus traffic, press Ctrl+C to stop");
            let mut read_mode = session.enter_read()?;
            read_mode.run(&cancel, |line| println!("{line}"))?;
            read_mode.exit()?;
        }

        Command::Query => {
            let relay = session.enter_relay()?;
            let mut tw = Typewriter::new(relay);
            let model = tw.query_model()?;
            let wheel = tw.calibrate_pitch()?;
            tw.exit()?;
            println!("model: {model}");
            println!("printwheel: {wheel}");
        }

        Command::Reset => {
            let relay = session.enter_relay()?;
            let mut tw = Typewriter::new(relay);
            tw.reset()?;
            tw.exit()?;
        }
    }

    Ok(())
}

/// Connection failures are the expected "board not there" case; report them
/// plainly before the non-zero exit.
fn fatal_connect(e: ClientError) -> WwctlError {
    if let ClientError::ConnectionTimeout { attempts } = &e {
        eprintln!("no answer from the interface board after {attempts} attempts");
    }
    WwctlError::Client(e)
}

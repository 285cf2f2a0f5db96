use std::{
    path::{Path, PathBuf},
    process::ExitCode,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use aht10::{Aht10Builder, SlaveAddress as AhtSlaveAddress};
use clap::Parser;
use linux_embedded_hal::{Delay, I2cdev};
use vl53l0x::Vl53l0xBuilder;

// Local imports
mod acquisition;
mod data_format;
mod datalog;
mod error;

use acquisition::Acquisition;
pub use data_format::LogRecord;
use datalog::Datalog;
pub use error::Error;

/// Polls an AHT10 and a VL53L0X and appends every reading to a CSV datalog
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the I2C bus of the AHT10 (e.g., /dev/i2c-2)
    #[arg(long, default_value = "/dev/i2c-2")]
    aht10_bus: PathBuf,
    /// Use the alternate AHT10 address 0x39 (ADDR pin high)
    #[arg(long, default_value_t = false)]
    aht10_alt_address: bool,
    /// Path to the I2C bus of the VL53L0X (e.g., /dev/i2c-3)
    #[arg(long, default_value = "/dev/i2c-3")]
    vl53l0x_bus: PathBuf,
    /// 7-bit address of the VL53L0X, decimal or 0x-prefixed hex
    #[arg(long, default_value = "0x29", value_parser = parse_address)]
    vl53l0x_address: u8,
    /// Log humidity and temperature only
    #[arg(long, default_value_t = false)]
    no_distance: bool,
    /// CSV datalog, usually on removable storage
    #[arg(long, default_value = "/media/caninos/adata64/data.txt")]
    log_file: PathBuf,
    /// Sleep between cycles, in milliseconds
    #[arg(long, default_value_t = 1000)]
    interval_ms: u32,
}

fn parse_address(s: &str) -> Result<u8, String> {
    let s = s.trim();
    let addr = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => s.parse(),
    }
    .map_err(|e| format!("invalid address {s:?}: {e}"))?;
    if addr > 0x7f {
        return Err(format!("0x{addr:02x} is not a 7-bit address"));
    }
    Ok(addr)
}

fn open_bus(path: &Path) -> Result<I2cdev, Error> {
    I2cdev::new(path).map_err(|e| Error::Open {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

fn main() -> ExitCode {
    // Initialize the logger
    env_logger::init();
    // Parse command line arguments
    let args = Args::parse();
    log::info!("Arguments: {args:#?}");
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Error> {
    let with_distance = !args.no_distance;
    if with_distance {
        println!("Starting AHT10 + VL53L0X monitoring!\n");
    } else {
        println!("Starting AHT10 monitoring!\n");
    }
    // Synchronizer
    let running = Arc::new(AtomicBool::new(true));
    // Handle Ctrl+C to stop between cycles
    {
        let running = running.clone();
        ctrlc::set_handler(move || {
            log::info!("Received Ctrl+C, stopping after the current cycle...");
            running.store(false, Ordering::Relaxed);
        })
        .map_err(Error::Signal)?;
    }

    let datalog = Datalog::open(&args.log_file, with_distance).map_err(Error::File)?;
    log::info!("[LOG] Writing to {}", datalog.path().display());

    let mut delay = Delay;
    log::info!("[AHT] {}> Opening bus", args.aht10_bus.display());
    let address = AhtSlaveAddress::default().with_a0(args.aht10_alt_address);
    let aht10 = Aht10Builder::default()
        .with_address(address)
        .build(open_bus(&args.aht10_bus)?, &mut delay)
        .map_err(Error::aht10)?;
    log::info!(
        "[AHT] {}> Sensor 0x{:02x} initialized",
        args.aht10_bus.display(),
        aht10.address()
    );

    let vl53l0x = if with_distance {
        log::info!("[TOF] {}> Opening bus", args.vl53l0x_bus.display());
        let tof = Vl53l0xBuilder::default()
            .with_address(args.vl53l0x_address)
            .build(open_bus(&args.vl53l0x_bus)?, &mut delay)
            .map_err(Error::vl53l0x)?;
        log::info!(
            "[TOF] {}> Sensor 0x{:02x} ranging continuously",
            args.vl53l0x_bus.display(),
            tof.address()
        );
        Some(tof)
    } else {
        None
    };

    println!("{}", LogRecord::header(with_distance));
    let acquisition = Acquisition::new(aht10, vl53l0x, datalog, delay, args.interval_ms);
    let stdout = std::io::stdout();
    let (aht_bus, tof_bus) = acquisition.run(&running, &mut stdout.lock())?;
    drop(aht_bus);
    drop(tof_bus);
    println!("\nMonitoring stopped!\n");
    Ok(())
}

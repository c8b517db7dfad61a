//! # Antenna Tracker Executable
//!
//! This executable points the antenna at whatever the ground station's tracking software asks for:
//! - Pointing commands are read from a serial port
//! - Tracking control maps them onto the azimuth and elevation servos, limiting the slew rate
//! - If commands stop arriving the antenna returns to its home position

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use color_eyre::{
    eyre::{eyre, WrapErr},
    Result,
};
use log::info;
use std::time::Duration;
use structopt::StructOpt;

// Internal
use track_lib::{
    clock::FixedPeriodClock,
    link::SerialLink,
    params::TrackExecParams,
    servo_ctrl::{DriverKind, ServoDriver, ServoOutput, ServoParams, SimServoDriver},
    track_ctrl::TrackCtrl,
    tracker::Tracker,
};
use util::{
    host,
    logger::{logger_init, LevelFilter},
    module::State,
    session::Session,
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, StructOpt)]
#[structopt(name = "track_exec", about = "Antenna tracker control executable")]
struct Opt {
    /// Serial port to read pointing commands from, overrides the parameter file
    #[structopt(short, long)]
    port: Option<String>,

    /// Use the simulated servo driver whatever the servo parameters say
    #[structopt(long)]
    sim: bool,

    /// Executable parameter file, relative to the params directory or absolute
    #[structopt(long, default_value = "track_exec.toml")]
    params: String,

    /// Log every cycle
    #[structopt(short, long)]
    verbose: bool,
}

// ------------------------------------------------------------------------------------------------
// MAIN
// ------------------------------------------------------------------------------------------------

fn main() -> Result<()> {
    color_eyre::install()?;

    let opt = Opt::from_args();

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("track_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    let log_level = if opt.verbose {
        LevelFilter::Trace
    } else {
        LevelFilter::Debug
    };
    logger_init(log_level, &session).wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Antenna Tracker Executable\n");
    info!(
        "Running on: {:#?}",
        host::get_uname().wrap_err("Failed to get host information")?
    );
    info!("Session directory: {:?}\n", session.session_root);

    info!("Initialising...");

    // ---- LOAD PARAMETERS ----

    let exec_params: TrackExecParams =
        util::params::load(&opt.params).wrap_err("Could not load exec params")?;
    let servo_params: ServoParams =
        util::params::load("servo_ctrl.toml").wrap_err("Could not load servo params")?;

    info!("Parameters loaded");

    // ---- INITIALISE MODULES ----

    let mut track_ctrl = TrackCtrl::default();
    track_ctrl
        .init("track_ctrl.toml", &session)
        .wrap_err("Failed to initialise TrackCtrl")?;
    info!("TrackCtrl init complete");

    // ---- INITIALISE LINK ----

    let port_name = opt.port.unwrap_or(exec_params.port_name);
    let link = SerialLink::open(
        &port_name,
        exec_params.baud_rate,
        Duration::from_millis(exec_params.read_timeout_ms),
    )
    .wrap_err("Failed to open the command link")?;
    info!("Listening for pointing commands on {}", port_name);

    let clock = FixedPeriodClock::new(track_ctrl.params().cycle_period_ms);

    // ---- INITIALISE SERVOS ----

    let driver_kind = if opt.sim {
        DriverKind::Sim
    } else {
        servo_params.driver
    };
    info!("Using {:?} servo driver", driver_kind);

    match driver_kind {
        DriverKind::Sim => {
            let output = ServoOutput::new(SimServoDriver::new(), &servo_params)
                .wrap_err("Invalid servo calibration")?;
            run(Tracker::new(link, track_ctrl, output, clock, exec_params.echo_status))
        }
        DriverKind::Pca9685 => {
            let driver = open_pca9685(&servo_params)?;
            let output =
                ServoOutput::new(driver, &servo_params).wrap_err("Invalid servo calibration")?;
            run(Tracker::new(link, track_ctrl, output, clock, exec_params.echo_status))
        }
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Home the servos and run the control loop.
fn run<D: ServoDriver>(mut tracker: Tracker<SerialLink, D, FixedPeriodClock>) -> Result<()> {
    tracker.home().wrap_err("Failed to move to the home pose")?;

    info!("Initialisation complete, entering main loop\n");

    tracker.run().wrap_err("Tracker stopped")
}

/// Open the PCA9685 board on the Raspberry Pi's I2C bus.
#[cfg(all(target_arch = "arm", target_os = "linux"))]
fn open_pca9685(
    params: &ServoParams,
) -> Result<track_lib::servo_ctrl::pca9685::Pca9685Driver<rppal::i2c::I2c>> {
    use pwm_pca9685::{Address, Pca9685};
    use track_lib::servo_ctrl::pca9685::{prescale_for_period, Pca9685Driver};

    let i2c = rppal::i2c::I2c::new().wrap_err("Failed to open the I2C bus")?;

    let mut dev = Pca9685::new(i2c, Address::from(params.i2c_address))
        .map_err(|e| eyre!("Failed to initialise the PCA9685: {:?}", e))?;
    dev.set_prescale(prescale_for_period(params.pwm_period_us))
        .map_err(|e| eyre!("Failed to set the PCA9685 prescale: {:?}", e))?;
    dev.enable()
        .map_err(|e| eyre!("Failed to enable the PCA9685: {:?}", e))?;

    Ok(Pca9685Driver::new(dev, params.pwm_period_us))
}

#[cfg(not(all(target_arch = "arm", target_os = "linux")))]
fn open_pca9685(_params: &ServoParams) -> Result<SimServoDriver> {
    Err(eyre!(
        "The PCA9685 driver is only available on Raspberry Pi targets, use --sim to run without \
         servo hardware"
    ))
}

//! # Tracker Module
//!
//! Ties the command parser, tracking control and servo output together into the per-cycle control
//! loop:
//!
//! 1. Drain pointing commands from the link
//! 2. Process tracking control, which maps, slew limits and runs the watchdog
//! 3. Drive the servos to the commanded angles
//! 4. Report status and archive
//! 5. Wait for the next cycle

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::{info, warn};
use util::{archive::Archived, module::State};

use crate::{
    clock::Clock,
    cmd_parser::CommandParser,
    link::{ByteLink, LinkError},
    servo_ctrl::{ServoDriver, ServoError, ServoOutput},
    track_ctrl::{InputData, OutputData, StatusReport, TrackCtrl, TrackCtrlError},
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// The complete tracker control loop.
pub struct Tracker<L, D, C>
where
    L: ByteLink,
    D: ServoDriver,
    C: Clock,
{
    parser: CommandParser,
    link: L,
    track_ctrl: TrackCtrl,
    output: ServoOutput<D>,
    clock: C,

    /// Write status lines back over the link
    echo_status: bool,

    /// Last output a status line was produced for
    last_status: Option<OutputData>,
}

/// What happened during one cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CycleSummary {
    pub output: OutputData,
    pub report: StatusReport,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(thiserror::Error, Debug)]
pub enum TrackerError {
    #[error("Link error: {0}")]
    Link(#[from] LinkError),

    #[error("Servo error: {0}")]
    Servo(#[from] ServoError),

    #[error("TrackCtrl error: {0}")]
    TrackCtrl(#[from] TrackCtrlError),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl<L, D, C> Tracker<L, D, C>
where
    L: ByteLink,
    D: ServoDriver,
    C: Clock,
{
    /// Assemble the tracker.
    ///
    /// The frame marker comes from the tracking control parameters.
    pub fn new(
        link: L,
        track_ctrl: TrackCtrl,
        output: ServoOutput<D>,
        clock: C,
        echo_status: bool,
    ) -> Self {
        if clock.cycle_period_ms() != track_ctrl.params().cycle_period_ms {
            warn!(
                "Clock period ({} ms) doesn't match the TrackCtrl cycle period ({} ms), the \
                 watchdog will run at the wrong rate",
                clock.cycle_period_ms(),
                track_ctrl.params().cycle_period_ms
            );
        }

        Self {
            parser: CommandParser::new(track_ctrl.params().frame_marker_byte()),
            link,
            track_ctrl,
            output,
            clock,
            echo_status,
            last_status: None,
        }
    }

    pub fn link(&self) -> &L {
        &self.link
    }

    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }

    pub fn track_ctrl(&self) -> &TrackCtrl {
        &self.track_ctrl
    }

    pub fn output(&self) -> &ServoOutput<D> {
        &self.output
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Drive the servos to the home pose.
    ///
    /// Must be called before the first cycle so the servos are where tracking control believes
    /// them to be.
    pub fn home(&mut self) -> Result<(), TrackerError> {
        info!("Moving servos to home pose");
        self.output.home()?;
        Ok(())
    }

    /// Execute a single cycle without waiting on the clock.
    pub fn cycle(&mut self) -> Result<CycleSummary, TrackerError> {
        let cmds = self.parser.drain(&mut self.link)?;

        let (output, report) = self.track_ctrl.proc(&InputData { cmds })?;

        self.output.drive_angles(&output.commanded)?;

        self.report_status(&output);

        if let Err(e) = self.track_ctrl.write() {
            warn!("Could not archive TrackCtrl: {}", e);
        }

        Ok(CycleSummary { output, report })
    }

    /// Run cycles forever, only returning if an error occurs.
    pub fn run(&mut self) -> Result<(), TrackerError> {
        loop {
            self.cycle()?;
            self.clock.wait_for_next_cycle();
        }
    }

    /// Run a fixed number of cycles, waiting on the clock after each.
    pub fn run_cycles(&mut self, num_cycles: usize) -> Result<Vec<CycleSummary>, TrackerError> {
        let mut summaries = Vec::with_capacity(num_cycles);

        for _ in 0..num_cycles {
            summaries.push(self.cycle()?);
            self.clock.wait_for_next_cycle();
        }

        Ok(summaries)
    }

    /// Produce a status line if the requested or commanded position changed.
    fn report_status(&mut self, output: &OutputData) {
        let changed = match self.last_status {
            Some(last) => last.requested != output.requested || last.commanded != output.commanded,
            None => true,
        };

        if !changed {
            return;
        }

        let line = status_line(output);
        info!("{}", line);

        if self.echo_status {
            if let Err(e) = self.link.write_line(&line) {
                warn!("Could not echo status: {}", e);
            }
        }

        self.last_status = Some(*output);
    }
}

// ------------------------------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Human readable status line for an output.
pub fn status_line(output: &OutputData) -> String {
    format!(
        "Requested {} | Driving {}",
        output.requested, output.commanded
    )
}

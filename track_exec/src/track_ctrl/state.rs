//! Implementations for the TrackCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info, trace};
use serde::Serialize;

// Internal
use super::{
    map_position, Params, RequestedPosition, ServoAngles, TrackCtrlError, Watchdog,
};
use crate::cmd_parser::PointingCmd;
use util::{
    archive::{Archived, Archiver},
    module::State,
    params,
    session::{self, Session},
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Tracking control module state
#[derive(Default)]
pub struct TrackCtrl {
    pub(crate) params: Params,

    pub(crate) report: StatusReport,

    /// The pointing direction currently being tracked.
    pub(crate) requested: RequestedPosition,

    /// The servo angles sent on the previous cycle.
    pub(crate) commanded: ServoAngles,

    pub(crate) watchdog: Watchdog,

    pub(crate) output: Option<OutputData>,

    arch_status: Archiver,
}

/// Input data to Tracking Control.
#[derive(Clone, Debug, Default)]
pub struct InputData {
    /// Pointing commands recieved since the last cycle, oldest first. Empty if
    /// nothing was recieved.
    pub cmds: Vec<PointingCmd>,
}

/// Output from TrackCtrl that the servo output must execute.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutputData {
    /// The pointing direction used on this cycle.
    pub requested: RequestedPosition,

    /// Servo angles which would achieve the requested direction.
    pub target: ServoAngles,

    /// Rate limited servo angles to drive this cycle.
    pub commanded: ServoAngles,
}

/// Status report for TrackCtrl processing.
#[derive(Clone, Copy, Default, Serialize, Debug, PartialEq, Eq)]
pub struct StatusReport {
    /// A new pointing command was applied this cycle.
    pub cmd_received: bool,

    /// The watchdog fired at the end of this cycle and the tracker will head
    /// home.
    pub watchdog_fired: bool,

    /// The azimuth servo step was clamped to its maximum.
    pub az_slew_limited: bool,

    /// The elevation servo step was clamped to its maximum.
    pub el_slew_limited: bool,
}

/// One line of the status archive.
#[derive(Serialize)]
struct StatusRecord {
    time_s: f64,
    req_az_deg: i32,
    req_el_deg: i32,
    target_az_servo_deg: i32,
    target_el_servo_deg: i32,
    cmd_az_servo_deg: i32,
    cmd_el_servo_deg: i32,
    watchdog_elapsed_ms: u64,
    cmd_received: bool,
    watchdog_fired: bool,
    az_slew_limited: bool,
    el_slew_limited: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl State for TrackCtrl {
    type InitData = &'static str;
    type InitError = TrackCtrlError;

    type InputData = InputData;
    type OutputData = OutputData;
    type StatusReport = StatusReport;
    type ProcError = TrackCtrlError;

    /// Initialise the TrackCtrl module.
    ///
    /// Expected init data is the path to the parameter file
    fn init(&mut self, init_data: Self::InitData, session: &Session) -> Result<(), Self::InitError> {
        let params: Params = params::load(init_data)?;

        *self = Self::new(params)?;

        self.arch_status = Archiver::from_path(session, "track_ctrl/status.csv")
            .map_err(|e| TrackCtrlError::ArchiveError(e.to_string()))?;

        Ok(())
    }

    /// Perform cyclic processing of Tracking Control.
    fn proc(
        &mut self,
        input_data: &Self::InputData,
    ) -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError> {
        // Clear the status report
        self.report = StatusReport::default();

        // Only the most recent command matters, earlier ones are stale
        if let Some(cmd) = input_data.cmds.last() {
            if input_data.cmds.len() > 1 {
                debug!(
                    "{} commands recieved this cycle, using the latest",
                    input_data.cmds.len()
                );
            }

            self.watchdog.reset();
            self.requested = RequestedPosition::new(cmd.az_deg, cmd.el_deg);
            self.report.cmd_received = true;

            debug!("New pointing command {:?} -> {}", cmd, self.requested);
        }

        let target = map_position(&self.requested);

        let az = self
            .params
            .az_slew
            .step(self.commanded.az_servo_deg, target.az_servo_deg);
        let el = self
            .params
            .el_slew
            .step(self.commanded.el_servo_deg, target.el_servo_deg);

        self.commanded = ServoAngles {
            az_servo_deg: az.next_deg,
            el_servo_deg: el.next_deg,
        };
        self.report.az_slew_limited = az.limited;
        self.report.el_slew_limited = el.limited;

        let output = OutputData {
            requested: self.requested,
            target,
            commanded: self.commanded,
        };

        // The watchdog only affects the next cycle's target
        if self.watchdog.advance(self.params.cycle_period_ms) {
            info!(
                "No command recieved for more than {} ms, returning home",
                self.watchdog.limit_ms()
            );
            self.requested = RequestedPosition::home();
            self.report.watchdog_fired = true;
        }

        trace!(
            "TrackCtrl output:\n    target: {}\n    commanded: {}",
            output.target,
            output.commanded
        );

        self.output = Some(output);

        Ok((output, self.report))
    }
}

impl Archived for TrackCtrl {
    fn write(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let output = match self.output {
            Some(o) => o,
            None => return Ok(()),
        };

        self.arch_status.serialise(StatusRecord {
            time_s: session::get_elapsed_seconds(),
            req_az_deg: output.requested.az_deg,
            req_el_deg: output.requested.el_deg,
            target_az_servo_deg: output.target.az_servo_deg,
            target_el_servo_deg: output.target.el_servo_deg,
            cmd_az_servo_deg: output.commanded.az_servo_deg,
            cmd_el_servo_deg: output.commanded.el_servo_deg,
            watchdog_elapsed_ms: self.watchdog.elapsed_ms(),
            cmd_received: self.report.cmd_received,
            watchdog_fired: self.report.watchdog_fired,
            az_slew_limited: self.report.az_slew_limited,
            el_slew_limited: self.report.el_slew_limited,
        })
    }
}

impl TrackCtrl {
    /// Create a tracking controller from already loaded parameters.
    ///
    /// The tracker starts pointing at home with the servos in the home pose,
    /// which the caller must drive the servos to before the first cycle.
    pub fn new(params: Params) -> Result<Self, TrackCtrlError> {
        params.validate()?;

        Ok(Self {
            watchdog: Watchdog::new(params.watchdog_limit_ms),
            params,
            ..Default::default()
        })
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn requested(&self) -> RequestedPosition {
        self.requested
    }

    pub fn commanded(&self) -> ServoAngles {
        self.commanded
    }

    pub fn watchdog(&self) -> &Watchdog {
        &self.watchdog
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::track_ctrl::SlewLimits;

    fn params() -> Params {
        Params {
            cycle_period_ms: 100,
            watchdog_limit_ms: 1000,
            frame_marker: 'A',
            az_slew: SlewLimits {
                min_step_deg: 3,
                max_step_deg: 15,
            },
            el_slew: SlewLimits {
                min_step_deg: 3,
                max_step_deg: 15,
            },
        }
    }

    fn cmd(az_deg: i32, el_deg: i32) -> InputData {
        InputData {
            cmds: vec![PointingCmd { az_deg, el_deg }],
        }
    }

    #[test]
    fn test_starts_home() {
        let mut tc = TrackCtrl::new(params()).unwrap();
        assert_eq!(tc.requested(), RequestedPosition::home());
        assert_eq!(tc.commanded(), ServoAngles::home());

        // No commands keeps it at home
        let (out, report) = tc.proc(&InputData::default()).unwrap();
        assert_eq!(out.commanded, ServoAngles::home());
        assert_eq!(report, StatusReport::default());
    }

    #[test]
    fn test_rejects_invalid_params() {
        let mut p = params();
        p.cycle_period_ms = 0;
        assert!(TrackCtrl::new(p).is_err());
    }

    #[test]
    fn test_slews_to_target() {
        // Keep the watchdog out of the way while the servos settle
        let mut p = params();
        p.watchdog_limit_ms = 60_000;
        let mut tc = TrackCtrl::new(p).unwrap();

        // AZ 90 EL 45 maps to servo (180, 135)
        let (out, report) = tc.proc(&cmd(90, 45)).unwrap();
        assert!(report.cmd_received);
        assert_eq!(
            out.target,
            ServoAngles {
                az_servo_deg: 180,
                el_servo_deg: 135
            }
        );
        assert_eq!(
            out.commanded,
            ServoAngles {
                az_servo_deg: 105,
                el_servo_deg: 15
            }
        );
        assert!(report.az_slew_limited);
        assert!(report.el_slew_limited);

        let mut last = out.commanded;
        for _ in 0..30 {
            let (out, _) = tc.proc(&InputData::default()).unwrap();
            assert!((out.commanded.az_servo_deg - last.az_servo_deg).abs() <= 15);
            assert!((out.commanded.el_servo_deg - last.el_servo_deg).abs() <= 15);
            last = out.commanded;
        }

        assert_eq!(last, out.target);
    }

    #[test]
    fn test_latest_command_wins() {
        let mut tc = TrackCtrl::new(params()).unwrap();

        let input = InputData {
            cmds: vec![
                PointingCmd {
                    az_deg: 10,
                    el_deg: 10,
                },
                PointingCmd {
                    az_deg: 370,
                    el_deg: 100,
                },
            ],
        };
        let (out, _) = tc.proc(&input).unwrap();
        assert_eq!(out.requested, RequestedPosition { az_deg: 10, el_deg: 90 });
    }

    #[test]
    fn test_watchdog_returns_home() {
        let mut tc = TrackCtrl::new(params()).unwrap();

        tc.proc(&cmd(45, 30)).unwrap();
        assert_eq!(tc.watchdog().elapsed_ms(), 100);

        // 1000 ms limit, elapsed reaches 1000 after 9 more idle cycles
        for _ in 0..9 {
            let (_, report) = tc.proc(&InputData::default()).unwrap();
            assert!(!report.watchdog_fired);
            assert_eq!(tc.requested(), RequestedPosition { az_deg: 45, el_deg: 30 });
        }
        assert_eq!(tc.watchdog().elapsed_ms(), 1000);

        let (out, report) = tc.proc(&InputData::default()).unwrap();
        assert!(report.watchdog_fired);
        assert_eq!(out.requested, RequestedPosition { az_deg: 45, el_deg: 30 });
        assert_eq!(tc.requested(), RequestedPosition::home());
        assert_eq!(tc.watchdog().elapsed_ms(), 0);

        // Servos then head back to the home pose
        let mut last = tc.commanded();
        for _ in 0..30 {
            last = tc.proc(&InputData::default()).unwrap().0.commanded;
        }
        assert_eq!(last, ServoAngles::home());
    }

    #[test]
    fn test_command_resets_watchdog() {
        let mut tc = TrackCtrl::new(params()).unwrap();

        for _ in 0..8 {
            tc.proc(&InputData::default()).unwrap();
        }
        assert_eq!(tc.watchdog().elapsed_ms(), 800);

        tc.proc(&cmd(100, 20)).unwrap();
        assert_eq!(tc.watchdog().elapsed_ms(), 100);
    }
}

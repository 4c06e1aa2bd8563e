use crate::config::{SimConfig, WaveParams};
use crate::error::SetupError;
use crate::simulation::buffers::BufferSet;
use crate::simulation::clock::FrameClock;
use crate::simulation::grid::Grid;
use crate::simulation::initial;
use crate::simulation::kernel::{KernelParams, Kernels, Phase};
use crate::simulation::mouse::MouseState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopped,
}

/// Drives the two-phase update and the presentation pass once per frame.
///
/// Per step: velocity update, swap, position update, swap, present. The two
/// swaps return the buffer roles to where they started, so presentation
/// always reads slot A.
pub struct SimulationLoop<K: Kernels> {
    kernels: K,
    buffers: BufferSet<K::Target>,
    clock: FrameClock,
    wave: WaveParams,
    initial: Grid,
    state: LoopState,
    frame_number: u64,
}

impl<K: Kernels> SimulationLoop<K> {
    /// Seed `a` with the initial condition, clear `b`, and start running
    pub fn new(
        mut kernels: K,
        mut a: K::Target,
        mut b: K::Target,
        config: &SimConfig,
    ) -> Result<Self, SetupError> {
        config.validate()?;

        let initial = initial::generate(config.rows, config.cols, config.channels, &config.peak);
        kernels.upload(&mut a, &initial);
        kernels.upload(&mut b, &Grid::new(config.rows, config.cols, config.channels));

        Ok(Self {
            kernels,
            buffers: BufferSet::new(a, b),
            clock: FrameClock::new(config.max_delta_ms),
            wave: config.wave,
            initial,
            state: LoopState::Running,
            frame_number: 0,
        })
    }

    /// Advance one frame at `timestamp` (ms). Returns whether another frame
    /// should be scheduled.
    pub fn step(&mut self, timestamp: f64, mouse: &mut MouseState) -> bool {
        if self.state != LoopState::Running {
            return false;
        }

        let delta_time = self.clock.delta(timestamp) as f32;

        self.kernels.begin_frame();

        self.run_phase(Phase::Velocity, delta_time, mouse);
        self.run_phase(Phase::Position, delta_time, mouse);

        self.kernels.present(self.buffers.read());
        self.kernels.end_frame();

        mouse.consume();
        self.clock.advance(timestamp);
        self.frame_number = self.frame_number.wrapping_add(1);

        true
    }

    fn run_phase(&mut self, phase: Phase, delta_time: f32, mouse: &MouseState) {
        let params = KernelParams::new(phase, delta_time, mouse, self.wave);
        let (input, output) = self.buffers.io_mut();
        self.kernels.invoke(&params, input, output);
        self.buffers.swap();
    }

    /// Stop scheduling frames. Safe to call when already stopped.
    pub fn stop(&mut self) {
        if self.state == LoopState::Running {
            log::info!("Simulation stopped at frame {}", self.frame_number);
            self.state = LoopState::Stopped;
        }
    }

    /// Restart after `stop`, treating `timestamp` as the previous frame time
    /// so the pause is not fed to the kernel.
    pub fn resume(&mut self, timestamp: f64) {
        if self.state == LoopState::Stopped {
            log::info!("Simulation resumed");
            self.clock.advance(timestamp);
            self.state = LoopState::Running;
        }
    }

    /// Restore the initial condition
    pub fn reset(&mut self) {
        self.buffers.reset();
        let zeros = Grid::new(self.initial.rows(), self.initial.cols(), self.initial.channels());
        let (_, back) = self.buffers.io_mut();
        self.kernels.upload(back, &zeros);
        self.kernels.upload(self.buffers.read_mut(), &self.initial);
        log::info!("Simulation reset to initial condition");
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn frame_number(&self) -> u64 {
        self.frame_number
    }

    pub fn buffers(&self) -> &BufferSet<K::Target> {
        &self.buffers
    }

    pub fn initial(&self) -> &Grid {
        &self.initial
    }

    pub fn kernels(&self) -> &K {
        &self.kernels
    }

    pub fn kernels_mut(&mut self) -> &mut K {
        &mut self.kernels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::buffers::Slot;

    /// Buffer stand-in that remembers which write produced its contents
    #[derive(Debug)]
    struct Tagged {
        name: char,
        tag: u32,
    }

    #[derive(Debug, PartialEq)]
    enum Event {
        Invoke {
            phase: Phase,
            read: (char, u32),
            write: char,
            delta_time: f32,
            mouse_updated: bool,
        },
        Present {
            read: (char, u32),
        },
    }

    #[derive(Default)]
    struct Recorder {
        counter: u32,
        events: Vec<Event>,
        frames_begun: u32,
        frames_ended: u32,
    }

    impl Kernels for Recorder {
        type Target = Tagged;

        fn begin_frame(&mut self) {
            self.frames_begun += 1;
        }

        fn invoke(&mut self, params: &KernelParams, input: &Tagged, output: &mut Tagged) {
            self.counter += 1;
            self.events.push(Event::Invoke {
                phase: params.phase,
                read: (input.name, input.tag),
                write: output.name,
                delta_time: params.delta_time_ms,
                mouse_updated: params.mouse_updated,
            });
            output.tag = self.counter;
        }

        fn present(&mut self, input: &Tagged) {
            self.events.push(Event::Present {
                read: (input.name, input.tag),
            });
        }

        fn end_frame(&mut self) {
            self.frames_ended += 1;
        }

        fn upload(&mut self, target: &mut Tagged, _grid: &Grid) {
            target.tag = 0;
        }
    }

    fn small_config() -> SimConfig {
        SimConfig {
            rows: 4,
            cols: 4,
            ..SimConfig::default()
        }
    }

    fn recorder_loop() -> SimulationLoop<Recorder> {
        SimulationLoop::new(
            Recorder::default(),
            Tagged { name: 'A', tag: 99 },
            Tagged { name: 'B', tag: 99 },
            &small_config(),
        )
        .unwrap()
    }

    #[test]
    fn test_phase_ordering_within_frame() {
        let mut sim = recorder_loop();
        let mut mouse = MouseState::default();
        assert!(sim.step(16.0, &mut mouse));

        let events = &sim.kernels().events;
        assert_eq!(events.len(), 3);
        assert_eq!(
            events[0],
            Event::Invoke {
                phase: Phase::Velocity,
                read: ('A', 0),
                write: 'B',
                delta_time: 16.0,
                mouse_updated: false,
            }
        );
        // Position reads exactly what the velocity pass wrote
        assert_eq!(
            events[1],
            Event::Invoke {
                phase: Phase::Position,
                read: ('B', 1),
                write: 'A',
                delta_time: 16.0,
                mouse_updated: false,
            }
        );
        // Presentation reads exactly what the position pass wrote
        assert_eq!(events[2], Event::Present { read: ('A', 2) });
        assert_eq!(sim.kernels().frames_begun, 1);
        assert_eq!(sim.kernels().frames_ended, 1);
    }

    #[test]
    fn test_presentation_reads_same_slot_every_frame() {
        let mut sim = recorder_loop();
        let mut mouse = MouseState::default();
        for frame in 1..=4 {
            sim.step(frame as f64 * 16.0, &mut mouse);
            assert_eq!(sim.buffers().read_slot(), Slot::A);
        }
        let presents: Vec<_> = sim
            .kernels()
            .events
            .iter()
            .filter_map(|e| match e {
                Event::Present { read } => Some(*read),
                _ => None,
            })
            .collect();
        assert_eq!(presents, vec![('A', 2), ('A', 4), ('A', 6), ('A', 8)]);
    }

    #[test]
    fn test_first_frame_delta_time() {
        let mut sim = recorder_loop();
        let mut mouse = MouseState::default();
        sim.step(16.7, &mut mouse);
        match &sim.kernels().events[0] {
            Event::Invoke { delta_time, .. } => assert_eq!(*delta_time, 16.7f32),
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_mouse_update_seen_by_both_phases_then_cleared() {
        let mut sim = recorder_loop();
        let mut mouse = MouseState::default();
        mouse.press(3, 4);
        assert!(mouse.updated);

        sim.step(16.0, &mut mouse);
        assert!(!mouse.updated);
        assert!(mouse.dragging);
        let seen: Vec<bool> = sim
            .kernels()
            .events
            .iter()
            .filter_map(|e| match e {
                Event::Invoke { mouse_updated, .. } => Some(*mouse_updated),
                _ => None,
            })
            .collect();
        assert_eq!(seen, vec![true, true]);

        sim.step(32.0, &mut mouse);
        assert!(matches!(
            sim.kernels().events[3],
            Event::Invoke {
                mouse_updated: false,
                ..
            }
        ));
    }

    #[test]
    fn test_stop_is_idempotent_and_halts_frames() {
        let mut sim = recorder_loop();
        let mut mouse = MouseState::default();
        sim.step(16.0, &mut mouse);
        sim.stop();
        sim.stop();
        assert_eq!(sim.state(), LoopState::Stopped);
        assert!(!sim.step(32.0, &mut mouse));
        assert_eq!(sim.kernels().events.len(), 3);
        assert_eq!(sim.frame_number(), 1);
    }

    #[test]
    fn test_resume_rebases_clock() {
        let mut sim = recorder_loop();
        let mut mouse = MouseState::default();
        sim.step(16.0, &mut mouse);
        sim.stop();
        sim.resume(5_000.0);
        assert!(sim.is_running());
        assert!(sim.step(5_010.0, &mut mouse));
        match &sim.kernels().events[3] {
            Event::Invoke { delta_time, .. } => assert_eq!(*delta_time, 10.0),
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_reset_restores_initial_roles() {
        let mut sim = recorder_loop();
        let mut mouse = MouseState::default();
        sim.step(16.0, &mut mouse);
        sim.reset();
        assert_eq!(sim.buffers().read_slot(), Slot::A);
        assert_eq!(sim.buffers().read().tag, 0);
        assert_eq!(sim.buffers().write().tag, 0);
    }

    #[test]
    fn test_invalid_config_never_starts() {
        let config = SimConfig {
            rows: 1,
            ..SimConfig::default()
        };
        let result = SimulationLoop::new(
            Recorder::default(),
            Tagged { name: 'A', tag: 0 },
            Tagged { name: 'B', tag: 0 },
            &config,
        );
        assert!(result.is_err());
    }
}

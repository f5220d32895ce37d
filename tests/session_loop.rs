//! Integration tests for the session loop, driven through mock camera,
//! alarm, preview and keyboard implementations.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, Instant};

use image::{GrayImage, Luma};
use tempfile::TempDir;

use change_sentry::alarm::{AlarmError, AlarmSink, CHANGE_LABEL};
use change_sentry::camera::{CameraBackend, CameraError, Frame, FrameSource};
use change_sentry::input::{KeyCommand, KeySource};
use change_sentry::reference::ReferenceSet;
use change_sentry::session::{CameraState, LoopControl, Session, SessionError};
use change_sentry::terminal::{Preview, PreviewFrame};

const WIDTH: u32 = 64;
const HEIGHT: u32 = 48;

#[derive(Debug, Default)]
struct CameraLog {
    opens: u32,
    open_handles: u32,
    reads: u32,
}

/// Camera producing a solid frame, or failing every read.
struct MockCamera {
    log: Rc<RefCell<CameraLog>>,
    color: [u8; 3],
    fail_reads: bool,
}

impl FrameSource for MockCamera {
    fn read_frame(&mut self) -> Result<Frame, CameraError> {
        self.log.borrow_mut().reads += 1;
        if self.fail_reads {
            return Err(CameraError::ReadFailed("device unplugged".to_string()));
        }
        Ok(Frame::solid(WIDTH, HEIGHT, self.color))
    }
}

impl Drop for MockCamera {
    fn drop(&mut self) {
        self.log.borrow_mut().open_handles -= 1;
    }
}

struct MockBackend {
    log: Rc<RefCell<CameraLog>>,
    color: [u8; 3],
    fail_reads: bool,
}

impl MockBackend {
    fn new(color: [u8; 3]) -> (Self, Rc<RefCell<CameraLog>>) {
        let log = Rc::new(RefCell::new(CameraLog::default()));
        let backend = Self {
            log: Rc::clone(&log),
            color,
            fail_reads: false,
        };
        (backend, log)
    }

    fn failing() -> (Self, Rc<RefCell<CameraLog>>) {
        let (mut backend, log) = Self::new([0, 0, 0]);
        backend.fail_reads = true;
        (backend, log)
    }
}

impl CameraBackend for MockBackend {
    type Device = MockCamera;

    fn open(&mut self, _index: u32) -> Result<MockCamera, CameraError> {
        let mut log = self.log.borrow_mut();
        log.opens += 1;
        log.open_handles += 1;
        Ok(MockCamera {
            log: Rc::clone(&self.log),
            color: self.color,
            fail_reads: self.fail_reads,
        })
    }
}

#[derive(Debug, Default)]
struct CountingAlarm {
    sounded: u32,
}

impl AlarmSink for CountingAlarm {
    fn sound(&mut self) -> Result<(), AlarmError> {
        self.sounded += 1;
        Ok(())
    }
}

struct BrokenAlarm;

impl AlarmSink for BrokenAlarm {
    fn sound(&mut self) -> Result<(), AlarmError> {
        Err(AlarmError::SoundNotFound(PathBuf::from("beep.wav")))
    }
}

#[derive(Debug, Default)]
struct RecordingPreview {
    shown: u32,
    closed: u32,
    labels: Vec<String>,
    statuses: Vec<String>,
}

impl Preview for RecordingPreview {
    fn show(&mut self, view: &PreviewFrame<'_>) -> io::Result<()> {
        self.shown += 1;
        self.labels
            .extend(view.labels.iter().map(|label| label.text.clone()));
        self.statuses.push(view.status.format());
        Ok(())
    }

    fn close(&mut self) -> io::Result<()> {
        self.closed += 1;
        Ok(())
    }
}

/// Replays scripted commands; quits once the script runs out.
struct ScriptedKeys(VecDeque<Option<KeyCommand>>);

impl ScriptedKeys {
    fn new(commands: impl IntoIterator<Item = Option<KeyCommand>>) -> Self {
        Self(commands.into_iter().collect())
    }
}

impl KeySource for ScriptedKeys {
    fn poll_command(&mut self, _timeout: Duration) -> io::Result<Option<KeyCommand>> {
        Ok(self.0.pop_front().unwrap_or(Some(KeyCommand::Quit)))
    }
}

/// Keys that never quit.
struct IdleKeys;

impl KeySource for IdleKeys {
    fn poll_command(&mut self, _timeout: Duration) -> io::Result<Option<KeyCommand>> {
        Ok(None)
    }
}

fn write_reference(dir: &TempDir, name: &str, value: u8) -> PathBuf {
    let path = dir.path().join(name);
    GrayImage::from_pixel(WIDTH, HEIGHT, Luma([value]))
        .save(&path)
        .unwrap();
    path
}

fn references(paths: Vec<PathBuf>, now: Instant) -> ReferenceSet {
    ReferenceSet::load(paths, now).unwrap()
}

#[test]
fn test_identical_frame_raises_no_alarm() {
    let dir = TempDir::new().unwrap();
    let start = Instant::now();
    let refs = references(vec![write_reference(&dir, "gray.png", 100)], start);
    let (backend, _log) = MockBackend::new([100, 100, 100]);
    let mut session = Session::new(backend, 0, refs, CountingAlarm::default(), RecordingPreview::default());

    session.toggle_camera();
    session.process_frame(start).unwrap();

    assert_eq!(session.last_detection().unwrap().changed_pixels, 0);
    assert_eq!(session.alarm().sounded, 0);
    assert!(session.preview().labels.is_empty());
    assert_eq!(session.preview().shown, 1);
}

#[test]
fn test_black_reference_white_frame_sounds_alarm_and_labels() {
    let dir = TempDir::new().unwrap();
    let start = Instant::now();
    let refs = references(vec![write_reference(&dir, "black.png", 0)], start);
    let (backend, _log) = MockBackend::new([255, 255, 255]);
    let mut session = Session::new(backend, 0, refs, CountingAlarm::default(), RecordingPreview::default());

    session.toggle_camera();
    session.process_frame(start).unwrap();

    let detection = session.last_detection().unwrap();
    assert_eq!(detection.changed_pixels, (WIDTH * HEIGHT) as usize);
    assert!(detection.is_change());
    assert_eq!(session.alarm().sounded, 1);
    assert_eq!(session.alarms_raised(), 1);
    assert_eq!(session.preview().labels, vec![CHANGE_LABEL.to_string()]);
    assert!(session.preview().statuses[0].contains("ALARM"));
}

#[test]
fn test_alarm_fires_every_changed_frame() {
    let dir = TempDir::new().unwrap();
    let start = Instant::now();
    let refs = references(vec![write_reference(&dir, "black.png", 0)], start);
    let (backend, _log) = MockBackend::new([255, 255, 255]);
    let mut session = Session::new(backend, 0, refs, CountingAlarm::default(), RecordingPreview::default());

    session.toggle_camera();
    for _ in 0..3 {
        session.process_frame(start).unwrap();
    }
    assert_eq!(session.alarm().sounded, 3);
}

#[test]
fn test_alarm_failure_ends_session() {
    let dir = TempDir::new().unwrap();
    let refs = references(vec![write_reference(&dir, "black.png", 0)], Instant::now());
    let (backend, log) = MockBackend::new([255, 255, 255]);
    let mut session = Session::new(backend, 0, refs, BrokenAlarm, RecordingPreview::default());

    session.toggle_camera();
    let err = session.run(&mut IdleKeys).unwrap_err();

    assert!(matches!(err, SessionError::Alarm(AlarmError::SoundNotFound(_))));
    assert_eq!(log.borrow().open_handles, 0);
}

#[test]
fn test_toggle_off_then_on_leaves_one_handle() {
    let dir = TempDir::new().unwrap();
    let refs = references(vec![write_reference(&dir, "black.png", 0)], Instant::now());
    let (backend, log) = MockBackend::new([0, 0, 0]);
    let mut session = Session::new(backend, 0, refs, CountingAlarm::default(), RecordingPreview::default());

    assert_eq!(session.toggle_camera(), CameraState::Enabled);
    assert_eq!(session.toggle_camera(), CameraState::Disabled);
    assert_eq!(log.borrow().open_handles, 0);
    assert_eq!(session.preview().closed, 1);

    assert_eq!(session.toggle_camera(), CameraState::Enabled);
    assert_eq!(log.borrow().open_handles, 1);
    assert_eq!(log.borrow().opens, 2);
}

#[test]
fn test_single_reference_is_reloaded_on_rotation() {
    let dir = TempDir::new().unwrap();
    let start = Instant::now();
    let refs = references(vec![write_reference(&dir, "only.png", 0)], start);
    let (backend, _log) = MockBackend::new([0, 0, 0]);
    let mut session = Session::new(backend, 0, refs, CountingAlarm::default(), RecordingPreview::default());
    let mut keys = ScriptedKeys::new([Some(KeyCommand::ToggleCamera), None]);

    assert_eq!(session.step(&mut keys, start).unwrap(), LoopControl::Continue);
    assert_eq!(session.references().loads(), 1);

    session.step(&mut keys, start + Duration::from_secs(1)).unwrap();
    assert_eq!(session.references().index(), 0);
    assert_eq!(session.references().loads(), 2);
}

#[test]
fn test_rotation_waits_for_interval() {
    let dir = TempDir::new().unwrap();
    let start = Instant::now();
    let paths = vec![
        write_reference(&dir, "a.png", 0),
        write_reference(&dir, "b.png", 0),
    ];
    let (backend, _log) = MockBackend::new([0, 0, 0]);
    let mut session = Session::new(backend, 0, references(paths, start), CountingAlarm::default(), RecordingPreview::default());
    session.toggle_camera();

    session.process_frame(start + Duration::from_millis(200)).unwrap();
    assert_eq!(session.references().index(), 0);

    session.process_frame(start + Duration::from_millis(600)).unwrap();
    assert_eq!(session.references().index(), 1);
}

#[test]
fn test_no_rotation_while_camera_off() {
    let dir = TempDir::new().unwrap();
    let start = Instant::now();
    let refs = references(vec![write_reference(&dir, "only.png", 0)], start);
    let (backend, log) = MockBackend::new([0, 0, 0]);
    let mut session = Session::new(backend, 0, refs, CountingAlarm::default(), RecordingPreview::default());

    session.process_frame(start + Duration::from_secs(5)).unwrap();
    assert_eq!(session.references().loads(), 1);
    assert_eq!(log.borrow().reads, 0);
    assert_eq!(session.preview().shown, 0);
}

#[test]
fn test_read_failure_stops_after_one_read_and_releases_camera() {
    let dir = TempDir::new().unwrap();
    let refs = references(vec![write_reference(&dir, "black.png", 0)], Instant::now());
    let (backend, log) = MockBackend::failing();
    let mut session = Session::new(backend, 0, refs, CountingAlarm::default(), RecordingPreview::default());

    session.toggle_camera();
    let err = session.run(&mut IdleKeys).unwrap_err();

    assert!(matches!(err, SessionError::Camera(CameraError::ReadFailed(_))));
    assert_eq!(log.borrow().reads, 1);
    assert_eq!(log.borrow().open_handles, 0);
    assert_eq!(session.camera_state(), CameraState::Disabled);
}

#[test]
fn test_quit_while_camera_off() {
    let dir = TempDir::new().unwrap();
    let refs = references(vec![write_reference(&dir, "black.png", 0)], Instant::now());
    let (backend, log) = MockBackend::new([0, 0, 0]);
    let mut session = Session::new(backend, 0, refs, CountingAlarm::default(), RecordingPreview::default());

    session
        .run(&mut ScriptedKeys::new([None, None, Some(KeyCommand::Quit)]))
        .unwrap();

    assert_eq!(log.borrow().opens, 0);
    assert_eq!(session.preview().shown, 0);
}

#[test]
fn test_quit_while_camera_on_releases_camera() {
    let dir = TempDir::new().unwrap();
    let refs = references(vec![write_reference(&dir, "black.png", 0)], Instant::now());
    let (backend, log) = MockBackend::new([0, 0, 0]);
    let mut session = Session::new(backend, 0, refs, CountingAlarm::default(), RecordingPreview::default());

    session
        .run(&mut ScriptedKeys::new([
            Some(KeyCommand::ToggleCamera),
            None,
            Some(KeyCommand::Quit),
        ]))
        .unwrap();

    // Iterations two and three each process a frame before polling keys
    assert_eq!(log.borrow().reads, 2);
    assert_eq!(session.preview().shown, 2);
    assert_eq!(log.borrow().open_handles, 0);
    assert!(session.preview().closed >= 1);
}

#[test]
fn test_toggle_key_makes_exactly_one_transition() {
    let dir = TempDir::new().unwrap();
    let refs = references(vec![write_reference(&dir, "black.png", 0)], Instant::now());
    let (backend, log) = MockBackend::new([0, 0, 0]);
    let mut session = Session::new(backend, 0, refs, CountingAlarm::default(), RecordingPreview::default());
    let mut keys = ScriptedKeys::new([Some(KeyCommand::ToggleCamera), None, Some(KeyCommand::ToggleCamera)]);
    let now = Instant::now();

    session.step(&mut keys, now).unwrap();
    assert_eq!(session.camera_state(), CameraState::Enabled);
    assert_eq!(log.borrow().opens, 1);

    session.step(&mut keys, now).unwrap();
    assert_eq!(session.camera_state(), CameraState::Enabled);

    session.step(&mut keys, now).unwrap();
    assert_eq!(session.camera_state(), CameraState::Disabled);
    assert_eq!(log.borrow().opens, 1);
    assert_eq!(log.borrow().open_handles, 0);
}

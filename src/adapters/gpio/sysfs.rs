//! Linux GPIO sysfs event source.
//!
//! Exports each configured pin under the sysfs root, configures it as an
//! input and samples its `value` file on a fixed interval, reporting every
//! level change to the sink. The level read during setup is reported as a
//! plain sample, not an edge. Pull resistors and board wiring are outside
//! what sysfs can configure and must be set up on the board.
//!
//! ```text
//! /sys/class/gpio/
//! ├── export            ← "18"
//! ├── unexport          ← "18" on shutdown, for pins exported here
//! └── gpio18/
//!     ├── direction     ← "in"
//!     └── value         → "0" | "1"
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};

use crate::config::PinMapping;
use crate::domain::button::Level;
use crate::domain::foundation::ButtonId;
use crate::ports::{EventSource, SourceError, TransitionSink};

/// Polls GPIO value files under a sysfs root.
pub struct SysfsGpioSource {
    root: PathBuf,
    pins: Vec<PinMapping>,
    poll_interval: Duration,
}

#[derive(Debug)]
struct WatchedPin {
    pin: u32,
    button: ButtonId,
    value_path: PathBuf,
    last: Level,
    exported_here: bool,
}

impl SysfsGpioSource {
    pub fn new(root: impl Into<PathBuf>, pins: Vec<PinMapping>, poll_interval: Duration) -> Self {
        Self {
            root: root.into(),
            pins,
            poll_interval,
        }
    }

    async fn configure(&self, mapping: PinMapping) -> Result<WatchedPin, SourceError> {
        let pin = mapping.pin;
        let pin_dir = self.root.join(format!("gpio{}", pin));
        let mut exported_here = false;

        if !is_dir(&pin_dir).await {
            tokio::fs::write(self.root.join("export"), pin.to_string())
                .await
                .map_err(|e| SourceError::configuration(pin, format!("export failed: {}", e)))?;
            exported_here = true;
            if !is_dir(&pin_dir).await {
                return Err(SourceError::configuration(
                    pin,
                    format!("{} did not appear after export", pin_dir.display()),
                ));
            }
        }

        tokio::fs::write(pin_dir.join("direction"), "in")
            .await
            .map_err(|e| SourceError::configuration(pin, format!("set direction failed: {}", e)))?;

        let value_path = pin_dir.join("value");
        let raw = tokio::fs::read_to_string(&value_path)
            .await
            .map_err(|e| SourceError::configuration(pin, format!("read value failed: {}", e)))?;
        let last = Level::from_sysfs(&raw).ok_or_else(|| {
            SourceError::configuration(pin, format!("unexpected value {:?}", raw.trim()))
        })?;

        tracing::info!(
            pin,
            button = %mapping.button,
            level = %last,
            "GPIO input configured"
        );

        Ok(WatchedPin {
            pin,
            button: mapping.button,
            value_path,
            last,
            exported_here,
        })
    }
}

#[async_trait]
impl EventSource for SysfsGpioSource {
    async fn start(
        &self,
        sink: Arc<dyn TransitionSink>,
        shutdown: watch::Receiver<bool>,
    ) -> Result<(), SourceError> {
        if !is_dir(&self.root).await {
            return Err(SourceError::Unavailable(format!(
                "{} not found; is this a GPIO-capable board?",
                self.root.display()
            )));
        }

        let mut watched = Vec::with_capacity(self.pins.len());
        for mapping in &self.pins {
            watched.push(self.configure(*mapping).await?);
        }
        for pin in &watched {
            sink.on_level(pin.button, pin.last);
        }

        tokio::spawn(poll_loop(
            watched,
            sink,
            self.poll_interval,
            shutdown,
            self.root.clone(),
        ));
        Ok(())
    }

    fn name(&self) -> &'static str {
        "sysfs-gpio"
    }
}

async fn poll_loop(
    mut pins: Vec<WatchedPin>,
    sink: Arc<dyn TransitionSink>,
    poll_interval: Duration,
    mut shutdown: watch::Receiver<bool>,
    root: PathBuf,
) {
    let mut interval = time::interval(poll_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
            _ = interval.tick() => {
                for pin in &mut pins {
                    sample(pin, sink.as_ref()).await;
                }
            }
        }
    }

    for pin in pins.iter().filter(|p| p.exported_here) {
        if let Err(e) = tokio::fs::write(root.join("unexport"), pin.pin.to_string()).await {
            tracing::debug!(pin = pin.pin, "Unexport failed: {}", e);
        }
    }
    tracing::debug!("GPIO polling stopped");
}

async fn sample(pin: &mut WatchedPin, sink: &dyn TransitionSink) {
    match tokio::fs::read_to_string(&pin.value_path).await {
        Ok(raw) => match Level::from_sysfs(&raw) {
            Some(level) if level != pin.last => {
                pin.last = level;
                sink.on_transition(pin.button, level);
            }
            Some(_) => {}
            None => tracing::trace!(pin = pin.pin, "Ignoring unexpected value {:?}", raw.trim()),
        },
        Err(e) => tracing::warn!(pin = pin.pin, "Failed to read GPIO value: {}", e),
    }
}

async fn is_dir(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use tempfile::TempDir;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<(ButtonId, Level)>>);

    impl TransitionSink for Recorder {
        fn on_transition(&self, button: ButtonId, level: Level) {
            self.0.lock().push((button, level));
        }
    }

    /// Records plain samples separately from edges.
    #[derive(Default)]
    struct LevelRecorder {
        levels: Mutex<Vec<(ButtonId, Level)>>,
        edges: Mutex<Vec<(ButtonId, Level)>>,
    }

    impl TransitionSink for LevelRecorder {
        fn on_transition(&self, button: ButtonId, level: Level) {
            self.edges.lock().push((button, level));
        }

        fn on_level(&self, button: ButtonId, level: Level) {
            self.levels.lock().push((button, level));
        }
    }

    fn fake_pin(root: &Path, pin: u32, value: &str) {
        let dir = root.join(format!("gpio{}", pin));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("direction"), "out").unwrap();
        std::fs::write(dir.join("value"), value).unwrap();
    }

    fn mapping(pin: u32, button: u16) -> PinMapping {
        PinMapping {
            pin,
            button: ButtonId::new(button),
        }
    }

    async fn eventually(check: impl Fn() -> bool) -> bool {
        for _ in 0..100 {
            if check() {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        false
    }

    #[tokio::test]
    async fn reports_level_changes() {
        let dir = TempDir::new().unwrap();
        fake_pin(dir.path(), 18, "0\n");
        let source = SysfsGpioSource::new(dir.path(), vec![mapping(18, 1)], Duration::from_millis(1));
        let recorder = Arc::new(Recorder::default());
        let (_tx, rx) = watch::channel(false);

        source.start(recorder.clone(), rx).await.unwrap();
        assert_eq!(
            std::fs::read_to_string(dir.path().join("gpio18/direction")).unwrap(),
            "in"
        );

        std::fs::write(dir.path().join("gpio18/value"), "1\n").unwrap();
        assert!(eventually(|| !recorder.0.lock().is_empty()).await);
        assert_eq!(recorder.0.lock()[0], (ButtonId::new(1), Level::High));
    }

    #[tokio::test]
    async fn unchanged_level_is_not_reported() {
        let dir = TempDir::new().unwrap();
        fake_pin(dir.path(), 19, "1");
        let source = SysfsGpioSource::new(dir.path(), vec![mapping(19, 2)], Duration::from_millis(1));
        let recorder = Arc::new(Recorder::default());
        let (_tx, rx) = watch::channel(false);

        source.start(recorder.clone(), rx).await.unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;

        assert!(recorder.0.lock().is_empty());
    }

    #[tokio::test]
    async fn initial_levels_are_reported_as_samples() {
        let dir = TempDir::new().unwrap();
        fake_pin(dir.path(), 18, "1\n");
        fake_pin(dir.path(), 19, "0\n");
        let source = SysfsGpioSource::new(
            dir.path(),
            vec![mapping(18, 1), mapping(19, 2)],
            Duration::from_millis(1),
        );
        let recorder = Arc::new(LevelRecorder::default());
        let (_tx, rx) = watch::channel(false);

        source.start(recorder.clone(), rx).await.unwrap();

        assert_eq!(
            recorder.levels.lock().as_slice(),
            &[(ButtonId::new(1), Level::High), (ButtonId::new(2), Level::Low)]
        );
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(recorder.edges.lock().is_empty());
    }

    #[tokio::test]
    async fn pin_that_cannot_be_exported_is_fatal() {
        let dir = TempDir::new().unwrap();
        let source = SysfsGpioSource::new(dir.path(), vec![mapping(21, 1)], Duration::from_millis(1));
        let (_tx, rx) = watch::channel(false);

        let err = source.start(Arc::new(Recorder::default()), rx).await.unwrap_err();

        assert!(matches!(err, SourceError::Configuration { pin: 21, .. }));
    }

    #[tokio::test]
    async fn missing_sysfs_root_is_unavailable() {
        let dir = TempDir::new().unwrap();
        let source = SysfsGpioSource::new(
            dir.path().join("nope"),
            vec![mapping(18, 1)],
            Duration::from_millis(1),
        );
        let (_tx, rx) = watch::channel(false);

        let err = source.start(Arc::new(Recorder::default()), rx).await.unwrap_err();

        assert!(matches!(err, SourceError::Unavailable(_)));
    }

    #[tokio::test]
    async fn garbage_value_is_a_configuration_error() {
        let dir = TempDir::new().unwrap();
        fake_pin(dir.path(), 18, "maybe");
        let source = SysfsGpioSource::new(dir.path(), vec![mapping(18, 1)], Duration::from_millis(1));
        let (_tx, rx) = watch::channel(false);

        let err = source.start(Arc::new(Recorder::default()), rx).await.unwrap_err();

        assert!(matches!(err, SourceError::Configuration { pin: 18, .. }));
    }

    #[tokio::test]
    async fn shutdown_stops_polling() {
        let dir = TempDir::new().unwrap();
        fake_pin(dir.path(), 18, "0");
        let source = SysfsGpioSource::new(dir.path(), vec![mapping(18, 1)], Duration::from_millis(1));
        let recorder = Arc::new(Recorder::default());
        let (tx, rx) = watch::channel(false);

        source.start(recorder.clone(), rx).await.unwrap();
        tx.send(true).unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        std::fs::write(dir.path().join("gpio18/value"), "1").unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;

        assert!(recorder.0.lock().is_empty());
    }
}

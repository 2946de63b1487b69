use crate::assetto::Snapshot;
use crate::components::engine::{WINDOW_HEIGHT, WINDOW_WIDTH};
use crate::components::{Component, RpmPower, SizeLabel};
use crate::config::Config;
use crate::host::{Canvas, HostError, Size, WindowHost, WindowId};
use crate::metrics::EngineSample;
use crate::options::{Capability, OptionSet, PanelId, Resolution};
use crate::panel::{draw_components, Panel, PanelWindow};

pub struct EnginePanel {
    active: bool,
    sample: EngineSample,
    options: OptionSet,
    window: PanelWindow,
    components: Vec<(Capability, RpmPower)>,
    size_label: SizeLabel,
}

impl EnginePanel {
    pub fn new(config: &Config, host: &mut dyn WindowHost) -> Result<EnginePanel, HostError> {
        let resolution = config.size();
        let window = PanelWindow::open(
            host,
            "Live Telemetry Engine",
            config.window_position(PanelId::Engine),
            Size::new(WINDOW_WIDTH, WINDOW_HEIGHT),
            resolution,
        )?;

        let active = config.is_window_active(PanelId::Engine);
        window.show(host, active);

        Ok(EnginePanel {
            active,
            sample: EngineSample::default(),
            options: OptionSet::new(vec![(Capability::RpmPower, config.bool_option(Capability::RpmPower))]),
            window,
            components: vec![(Capability::RpmPower, RpmPower::new(resolution))],
            size_label: SizeLabel::new(resolution),
        })
    }

    pub fn sample(&self) -> &EngineSample {
        &self.sample
    }

    pub fn position(&self, host: &dyn WindowHost) -> Result<(i32, i32), HostError> {
        host.position(self.window.id())
    }
}

impl Panel for EnginePanel {
    fn id(&self) -> PanelId {
        PanelId::Engine
    }

    fn window_id(&self) -> WindowId {
        self.window.id()
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn set_active(&mut self, host: &mut dyn WindowHost, active: bool) {
        self.active = active;
        self.window.show(host, active);
    }

    fn option(&self, capability: Capability) -> bool {
        self.options.get(capability)
    }

    fn set_option(&mut self, capability: Capability, value: bool) -> bool {
        self.options.set(capability, value)
    }

    fn update(&mut self, snapshot: &Snapshot) {
        self.sample.update(snapshot);
        for (_, component) in &mut self.components {
            component.update(&self.sample);
        }
    }

    fn draw(&self, canvas: &mut dyn Canvas) {
        if !self.active {
            return;
        }
        draw_components(&self.components, &self.options, &self.sample, canvas);
        self.size_label.draw(canvas);
    }

    fn resize(&mut self, host: &mut dyn WindowHost, resolution: Resolution) {
        self.window.resize(host, resolution);
        for (_, component) in &mut self.components {
            component.resize(resolution);
        }
        self.size_label.resize(resolution);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScreenSize;
    use crate::host::headless::{HeadlessHost, RecordingCanvas};

    fn snapshot(rpm: i32) -> Snapshot {
        let mut snapshot = Snapshot::default();
        snapshot.physics.rpms = rpm;
        snapshot.statics.max_rpm = 7500;
        snapshot.statics.max_power = 250_000.0;
        snapshot.statics.max_torque = 400.0;
        snapshot
    }

    #[test]
    fn samples_and_draws_the_rpm_gauge() {
        let mut config = Config::defaults("test", ScreenSize::default());
        config.set_window_active(PanelId::Engine, true);
        let mut host = HeadlessHost::new();
        let mut panel = EnginePanel::new(&config, &mut host).unwrap();

        let window = host.window(panel.window_id()).unwrap();
        assert_eq!(window.size, Size::new(384.0, 63.75));
        assert_eq!(window.position, (460, 509));

        panel.update(&snapshot(5200));
        assert_eq!(panel.sample().rpm, 5200);
        assert_eq!(panel.sample().max_rpm, 7500);

        let mut canvas = RecordingCanvas::new();
        panel.draw(&mut canvas);
        assert_eq!(canvas.texts(), vec!["5200 / 7500 rpm", "250000 W  400 Nm", "FHD"]);

        assert!(panel.set_option(Capability::RpmPower, false));
        let mut canvas = RecordingCanvas::new();
        panel.draw(&mut canvas);
        assert_eq!(canvas.clears(), vec![panel.components[0].1.bounds()]);
        assert_eq!(canvas.texts(), vec!["FHD"]);
    }

    #[test]
    fn shows_the_current_size_preset() {
        let mut config = Config::defaults("test", ScreenSize::default());
        config.set_window_active(PanelId::Engine, true);
        let mut host = HeadlessHost::new();
        let mut panel = EnginePanel::new(&config, &mut host).unwrap();

        let next = config.size().next();
        panel.resize(&mut host, next);
        let mut canvas = RecordingCanvas::new();
        panel.draw(&mut canvas);
        assert_eq!(canvas.texts().last(), Some(&next.name()));
        assert_eq!(next, Resolution::Qhd);
    }

    #[test]
    fn update_is_safe_before_the_first_draw() {
        let config = Config::defaults("test", ScreenSize::default());
        let mut host = HeadlessHost::new();
        let mut panel = EnginePanel::new(&config, &mut host).unwrap();
        assert!(!panel.is_active());

        panel.update(&snapshot(900));
        panel.update(&snapshot(950));
        assert_eq!(panel.sample().rpm, 950);

        let mut canvas = RecordingCanvas::new();
        panel.draw(&mut canvas);
        assert!(canvas.calls.is_empty());
    }
}

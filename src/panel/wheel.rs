use crate::assetto::Snapshot;
use crate::components::wheel::{WINDOW_HEIGHT, WINDOW_WIDTH};
use crate::components::{Component, WheelComponent, WheelGauge};
use crate::config::Config;
use crate::host::{Canvas, HostError, Size, WindowHost, WindowId};
use crate::metrics::{WheelPos, WheelSample};
use crate::options::{Capability, OptionSet, PanelId, Resolution};
use crate::panel::{draw_components, Panel, PanelWindow};

pub struct WheelPanel {
    wheel: WheelPos,
    active: bool,
    sample: WheelSample,
    data_log: Vec<WheelSample>,
    options: OptionSet,
    window: PanelWindow,
    components: Vec<(Capability, WheelComponent)>,
}

impl WheelPanel {
    pub fn new(wheel: WheelPos, config: &Config, host: &mut dyn WindowHost) -> Result<WheelPanel, HostError> {
        let id = PanelId::Wheel(wheel);
        let resolution = config.size();
        let window = PanelWindow::open(
            host,
            &format!("Live Telemetry {}", wheel),
            config.window_position(id),
            Size::new(WINDOW_WIDTH, WINDOW_HEIGHT),
            resolution,
        )?;

        let components = WheelGauge::ORDER
            .iter()
            .map(|gauge| (gauge.capability(), WheelComponent::new(*gauge, wheel, resolution)))
            .collect();

        let mut keys: Vec<Capability> = WheelGauge::ORDER.iter().map(|gauge| gauge.capability()).collect();
        keys.push(Capability::Logging);
        let options = OptionSet::new(keys.into_iter().map(|key| (key, config.bool_option(key))));

        let active = config.is_window_active(id);
        window.show(host, active);
        debug!("Created {} panel on window {}", wheel, window.id());

        Ok(WheelPanel {
            wheel,
            active,
            sample: WheelSample::default(),
            data_log: Vec::new(),
            options,
            window,
            components,
        })
    }

    pub fn wheel(&self) -> WheelPos {
        self.wheel
    }

    pub fn sample(&self) -> &WheelSample {
        &self.sample
    }

    /// Every sample recorded while logging was on, oldest first.
    pub fn data_log(&self) -> &[WheelSample] {
        &self.data_log
    }

    pub fn has_data_logged(&self) -> bool {
        !self.data_log.is_empty()
    }

    pub fn position(&self, host: &dyn WindowHost) -> Result<(i32, i32), HostError> {
        host.position(self.window.id())
    }

    /// Gauges in the order they are drawn.
    pub fn render_order(&self) -> impl Iterator<Item = WheelGauge> + '_ {
        self.components.iter().map(|(_, component)| component.gauge())
    }
}

impl Panel for WheelPanel {
    fn id(&self) -> PanelId {
        PanelId::Wheel(self.wheel)
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
        self.sample.update(self.wheel, snapshot);
        if self.options.get(Capability::Logging) {
            self.data_log.push(self.sample);
        }

        for (_, component) in &mut self.components {
            component.update(&self.sample);
        }
    }

    fn draw(&self, canvas: &mut dyn Canvas) {
        if !self.active {
            return;
        }
        draw_components(&self.components, &self.options, &self.sample, canvas);
    }

    fn resize(&mut self, host: &mut dyn WindowHost, resolution: Resolution) {
        self.window.resize(host, resolution);
        for (_, component) in &mut self.components {
            component.resize(resolution);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScreenSize;
    use crate::host::headless::{DrawCall, HeadlessHost, RecordingCanvas};
    use pretty_assertions::assert_eq;

    fn config(logging: bool) -> Config {
        let mut config = Config::defaults("test", ScreenSize::default());
        config.set_option(Capability::Logging, logging);
        config.set_window_active(PanelId::Wheel(WheelPos::FrontLeft), true);
        config
    }

    fn snapshot(tick: i32) -> Snapshot {
        let mut snapshot = Snapshot::default();
        snapshot.graphics.i_current_time = tick;
        snapshot.physics.wheel_load = [tick as f32 * 49.03325; 4];
        snapshot.physics.suspension_travel = [0.04, 0.05, 0.04, 0.05];
        snapshot.physics.ride_height = [0.08, 0.09];
        snapshot
    }

    #[test]
    fn window_is_created_from_config() {
        let mut host = HeadlessHost::new();
        let panel = WheelPanel::new(WheelPos::FrontLeft, &config(false), &mut host).unwrap();

        let window = host.window(panel.window_id()).unwrap();
        assert_eq!(window.title, "");
        assert_eq!(window.position, (10, 80));
        assert_eq!(window.size, Size::new(384.0, 203.25));
        assert_eq!(window.background_opacity, 0.0);
        assert!(!window.border);
        assert!(panel.is_active());
        assert_eq!(panel.id(), PanelId::Wheel(WheelPos::FrontLeft));
    }

    #[test]
    fn nothing_is_logged_while_logging_is_off() {
        let mut host = HeadlessHost::new();
        let mut panel = WheelPanel::new(WheelPos::FrontLeft, &config(false), &mut host).unwrap();
        for tick in 0..5 {
            panel.update(&snapshot(tick));
        }
        assert!(!panel.has_data_logged());
        assert_eq!(panel.sample().timestamp, 4);
    }

    #[test]
    fn logged_samples_are_independent_copies() {
        let mut host = HeadlessHost::new();
        let mut panel = WheelPanel::new(WheelPos::FrontLeft, &config(true), &mut host).unwrap();

        panel.update(&snapshot(100));
        let first = *panel.sample();
        panel.update(&snapshot(101));
        panel.update(&snapshot(102));

        assert_eq!(panel.data_log().len(), 3);
        assert_eq!(panel.data_log()[0], first);
        assert_eq!(panel.data_log()[0].timestamp, 100);
        assert_eq!(panel.data_log()[2].timestamp, 102);
        assert_eq!(panel.sample().timestamp, 102);

        panel.set_option(Capability::Logging, false);
        panel.update(&snapshot(103));
        assert_eq!(panel.data_log().len(), 3);
    }

    #[test]
    fn load_is_rendered_last() {
        let mut host = HeadlessHost::new();
        let mut panel = WheelPanel::new(WheelPos::RearRight, &config(false), &mut host).unwrap();
        assert_eq!(panel.render_order().last(), Some(WheelGauge::Load));

        panel.set_active(&mut host, true);
        panel.update(&snapshot(10));
        for capability in [Capability::Temps, Capability::Tire, Capability::Wear] {
            panel.set_option(capability, false);
        }
        let mut canvas = RecordingCanvas::new();
        panel.draw(&mut canvas);
        assert!(matches!(canvas.calls.last(), Some(DrawCall::FillCircle(..))));
    }

    #[test]
    fn disabling_an_option_clears_its_gauge() {
        let mut host = HeadlessHost::new();
        let mut panel = WheelPanel::new(WheelPos::FrontLeft, &config(false), &mut host).unwrap();
        panel.update(&snapshot(1));

        let mut canvas = RecordingCanvas::new();
        panel.draw(&mut canvas);
        assert!(canvas.clears().is_empty());

        assert!(panel.set_option(Capability::Height, false));
        let mut canvas = RecordingCanvas::new();
        panel.draw(&mut canvas);
        let height = panel
            .components
            .iter()
            .find(|(capability, _)| *capability == Capability::Height)
            .map(|(_, component)| component.bounds())
            .unwrap();
        assert_eq!(canvas.clears(), vec![height]);
        assert!(!canvas.texts().iter().any(|text| text.ends_with(" mm")));
    }

    #[test]
    fn disabled_gauges_do_not_erase_enabled_ones_sharing_their_area() {
        let mut host = HeadlessHost::new();
        let mut panel = WheelPanel::new(WheelPos::FrontLeft, &config(false), &mut host).unwrap();
        panel.update(&snapshot(3));
        assert!(panel.set_option(Capability::Dirt, false));
        assert!(panel.set_option(Capability::Load, false));

        let mut canvas = RecordingCanvas::new();
        panel.draw(&mut canvas);

        let bounds = |capability: Capability| {
            panel
                .components
                .iter()
                .find(|(key, _)| *key == capability)
                .map(|(_, component)| component.bounds())
                .unwrap()
        };
        assert_eq!(canvas.clears(), vec![bounds(Capability::Dirt), bounds(Capability::Load)]);

        let first_draw = canvas
            .calls
            .iter()
            .position(|call| !matches!(call, DrawCall::Clear(_)))
            .unwrap();
        assert_eq!(first_draw, 2);
        assert!(canvas.calls[first_draw..]
            .iter()
            .all(|call| !matches!(call, DrawCall::Clear(_))));

        // Temps still paints its three columns over the cleared tire area.
        let temp_columns = canvas.calls[first_draw..]
            .iter()
            .filter(|call| matches!(call, DrawCall::FillRect(rect, _) if rect.height == bounds(Capability::Temps).height))
            .count();
        assert!(temp_columns >= 3);
    }

    #[test]
    fn inactive_panels_do_not_draw_but_keep_sampling() {
        let mut host = HeadlessHost::new();
        let mut panel = WheelPanel::new(WheelPos::FrontLeft, &config(true), &mut host).unwrap();
        assert!(host.window(panel.window_id()).unwrap().visible);

        panel.set_active(&mut host, false);
        assert!(!host.window(panel.window_id()).unwrap().visible);
        panel.update(&snapshot(7));

        let mut canvas = RecordingCanvas::new();
        panel.draw(&mut canvas);
        assert!(canvas.calls.is_empty());
        assert_eq!(panel.data_log().len(), 1);

        panel.set_active(&mut host, true);
        assert!(host.window(panel.window_id()).unwrap().visible);
    }

    #[test]
    fn windows_of_inactive_panels_start_hidden() {
        let mut host = HeadlessHost::new();
        let panel = WheelPanel::new(WheelPos::RearLeft, &config(false), &mut host).unwrap();
        assert!(!panel.is_active());
        assert!(!host.window(panel.window_id()).unwrap().visible);
    }

    #[test]
    fn resize_is_idempotent() {
        let mut host = HeadlessHost::new();
        let mut panel = WheelPanel::new(WheelPos::FrontRight, &config(false), &mut host).unwrap();

        panel.resize(&mut host, Resolution::Uhd);
        let once = (host.window(panel.window_id()).unwrap().size, panel.components.clone());
        panel.resize(&mut host, Resolution::Uhd);
        let twice = (host.window(panel.window_id()).unwrap().size, panel.components.clone());

        assert_eq!(once, twice);
        assert_eq!(once.0, Size::new(768.0, 406.5));
    }

    #[test]
    fn unknown_options_are_rejected() {
        let mut host = HeadlessHost::new();
        let mut panel = WheelPanel::new(WheelPos::FrontLeft, &config(false), &mut host).unwrap();
        assert!(!panel.set_option(Capability::RpmPower, true));
        assert!(!panel.option(Capability::RpmPower));
    }
}

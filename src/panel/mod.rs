pub mod engine;
pub mod wheel;

use crate::assetto::Snapshot;
use crate::components::Component;
use crate::config::Config;
use crate::host::{Canvas, HostError, Size, WindowHost, WindowId};
use crate::options::{Capability, OptionSet, PanelId, Resolution};

pub use engine::EnginePanel;
pub use wheel::WheelPanel;

/// One overlay window: a sample, its gauges and their option flags.
pub trait Panel {
    fn id(&self) -> PanelId;
    fn window_id(&self) -> WindowId;
    fn is_active(&self) -> bool;
    /// Shows or hides the panel's window along with the active flag.
    fn set_active(&mut self, host: &mut dyn WindowHost, active: bool);
    fn option(&self, capability: Capability) -> bool;
    /// Returns `false` if this panel has no such option.
    fn set_option(&mut self, capability: Capability, value: bool) -> bool;
    /// Resamples from `snapshot`. Safe to call whether or not the panel is
    /// active or has ever been drawn.
    fn update(&mut self, snapshot: &Snapshot);
    fn draw(&self, canvas: &mut dyn Canvas);
    fn resize(&mut self, host: &mut dyn WindowHost, resolution: Resolution);
}

/// The host window backing a panel. Its size is always the base size times
/// the current multiplier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelWindow {
    id: WindowId,
    base_size: Size,
}

impl PanelWindow {
    pub fn open(
        host: &mut dyn WindowHost,
        title: &str,
        position: (i32, i32),
        base_size: Size,
        resolution: Resolution,
    ) -> Result<PanelWindow, HostError> {
        let id = host.create_window(title)?;
        host.set_border(id, false);
        host.set_background_opacity(id, 0.0);
        host.set_title(id, "");
        host.set_position(id, position);

        let window = PanelWindow { id, base_size };
        window.resize(host, resolution);
        Ok(window)
    }

    pub fn id(&self) -> WindowId {
        self.id
    }

    pub fn resize(&self, host: &mut dyn WindowHost, resolution: Resolution) {
        host.set_size(self.id, self.base_size.scaled(resolution.multiplier()));
    }

    pub fn show(&self, host: &mut dyn WindowHost, visible: bool) {
        host.set_visible(self.id, visible);
    }
}

/// Flips `capability` on every panel that has it and records the new value in
/// `config`. Returns the new value.
pub fn toggle_option<'a>(
    config: &mut Config,
    panels: impl IntoIterator<Item = &'a mut (dyn Panel + 'a)>,
    capability: Capability,
) -> bool {
    let enabled = !config.bool_option(capability);
    config.set_option(capability, enabled);
    let changed = panels
        .into_iter()
        .map(|panel| panel.set_option(capability, enabled))
        .filter(|changed| *changed)
        .count();
    debug!("{} is now {} on {} panels", capability, if enabled { "on" } else { "off" }, changed);
    enabled
}

/// Clears every disabled component, then draws the enabled ones in order.
///
/// Gauges share screen area (the tire gauges are stacked and Load sits on
/// top of them), so all clears happen before the first draw.
pub(crate) fn draw_components<C: Component>(
    components: &[(Capability, C)],
    options: &OptionSet,
    sample: &C::Sample,
    canvas: &mut dyn Canvas,
) {
    for (_, component) in components.iter().filter(|(capability, _)| !options.get(*capability)) {
        component.clear(canvas);
    }
    for (_, component) in components.iter().filter(|(capability, _)| options.get(*capability)) {
        component.draw(sample, canvas);
    }
}

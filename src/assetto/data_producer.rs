use std::time::Duration;

use async_std::channel::Sender;
use async_std::task;
#[cfg(windows)]
use async_std::stream::StreamExt;

use crate::assetto::{Graphics, Physics, SessionInfo, Snapshot, Statics, Status, Update};
#[cfg(windows)]
use crate::assetto::shared_memory::{SharedMemoryConnection, SharedMemoryError};

#[cfg(windows)]
const RECONNECT_DELAY: Duration = Duration::from_secs(1);

/// Forwards shared-memory updates to the overlay until the receiving side hangs up.
#[cfg(windows)]
pub struct SharedMemoryTask {
    sender: Sender<Update>,
}

#[cfg(windows)]
impl SharedMemoryTask {
    pub fn new(sender: Sender<Update>) -> SharedMemoryTask {
        SharedMemoryTask { sender }
    }

    pub async fn execute(self) {
        let mut waiting_logged = false;
        loop {
            let mut connection = match SharedMemoryConnection::new() {
                Ok(connection) => connection,
                Err(SharedMemoryError::NotRunning(page)) => {
                    if !waiting_logged {
                        info!("Assetto Corsa not detected ({} missing). Retrying!", page);
                        waiting_logged = true;
                    }
                    task::sleep(RECONNECT_DELAY).await;
                    continue;
                }
            };
            waiting_logged = false;
            debug!("Mapped shared memory pages");

            let mut packets: u64 = 0;
            while let Some(update) = connection.next().await {
                if let Update::Telemetry(_) = update {
                    packets += 1;
                    if packets == 1 {
                        info!("Receiving telemetry");
                    }
                    if packets % 600 == 0 {
                        debug!("Packet count: {}", packets);
                    }
                } else if let Update::Session(session) = &update {
                    info!("Session: {} at {} {}", session.car_model, session.track, session.track_configuration);
                }

                if self.sender.send(update).await.is_err() {
                    info!("Overlay closed, stopping telemetry reader");
                    return;
                }
            }

            if packets > 0 {
                info!("Simulator left the session after {} packets", packets);
            }
            drop(connection);
            task::sleep(RECONNECT_DELAY).await;
        }
    }
}

/// Feeds the overlay a slowly oscillating fake car, for running without the simulator.
pub struct SyntheticTask {
    sender: Sender<Update>,
    interval: Duration,
}

impl SyntheticTask {
    pub fn new(sender: Sender<Update>) -> SyntheticTask {
        SyntheticTask {
            sender,
            interval: Duration::from_millis(16),
        }
    }

    pub async fn execute(self) {
        let session = SessionInfo {
            car_model: "synthetic".to_string(),
            track: "test_track".to_string(),
            track_configuration: String::new(),
        };
        if self.sender.send(Update::Session(session)).await.is_err() {
            return;
        }

        let mut tick: i32 = 0;
        loop {
            tick = tick.wrapping_add(1);
            if self.sender.send(Update::Telemetry(synthetic_snapshot(tick))).await.is_err() {
                debug!("Synthetic telemetry stopped after {} ticks", tick);
                return;
            }
            task::sleep(self.interval).await;
        }
    }
}

/// A plausible car state for the given tick; the left side loads up as the
/// right side unloads, like a long sweeping corner.
pub fn synthetic_snapshot(tick: i32) -> Snapshot {
    let phase = tick as f32 * 0.02;
    let sway = phase.sin();
    let wheel = |left: f32, right: f32| [left, right, left, right];

    let physics = Physics {
        packet_id: tick,
        rpms: 4500 + (2500.0 * (phase * 1.7).sin()) as i32,
        wheel_load: wheel(3500.0 + 1500.0 * sway, 3500.0 - 1500.0 * sway),
        wheels_pressure: wheel(27.5 + sway, 27.5 - sway),
        tyre_wear: wheel(98.0 - (tick % 1000) as f32 * 0.001, 98.5),
        tyre_dirty_level: wheel(0.0, 0.25 * sway.abs()),
        tyre_core_temperature: wheel(82.0 + 6.0 * sway, 82.0 - 6.0 * sway),
        camber_rad: wheel(-0.05, 0.05),
        suspension_travel: wheel(0.06 + 0.03 * sway, 0.06 - 0.03 * sway),
        ride_height: [0.065 + 0.01 * (phase * 0.5).cos(), 0.075],
        tyre_temp_i: wheel(88.0 + 10.0 * sway, 88.0 - 10.0 * sway),
        tyre_temp_m: wheel(84.0 + 8.0 * sway, 84.0 - 8.0 * sway),
        tyre_temp_o: wheel(78.0 + 6.0 * sway, 78.0 - 6.0 * sway),
    };

    Snapshot {
        physics,
        graphics: Graphics {
            packet_id: tick,
            status: Status::Live,
            i_current_time: tick.wrapping_mul(16),
        },
        statics: Statics {
            max_torque: 420.0,
            max_power: 330_000.0,
            max_rpm: 7800,
            suspension_max_travel: [0.12; 4],
        },
    }
}

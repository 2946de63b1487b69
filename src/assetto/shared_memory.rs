//! Reader for the simulator's named shared-memory pages.

use std::ffi::c_void;
use std::ffi::OsStr;
use std::os::windows::ffi::OsStrExt;
use std::ptr;
use std::time::Duration;

use async_std::pin::Pin;
use async_std::stream::Stream;
use async_std::task;
use async_std::task::{Context, Poll};
use thiserror::Error;
use windows::{
    Win32::Foundation::*,
    Win32::System::Memory::*,
};

use crate::assetto::layout::{self, RawGraphics, RawPhysics, RawStatic};
use crate::assetto::{SessionInfo, Status, Update};

const PHYSICS_PAGE: &str = "Local\\acpmf_physics";
const GRAPHICS_PAGE: &str = "Local\\acpmf_graphics";
const STATIC_PAGE: &str = "Local\\acpmf_static";

/// The simulator updates physics at a few hundred Hz.
const POLL_INTERVAL: Duration = Duration::from_millis(2);

struct PwString {
    content: Vec<u16>,
}

impl PwString {
    fn from(input: &str) -> PwString {
        let content: Vec<u16> = OsStr::new(input).encode_wide().chain(Some(0)).collect();
        PwString { content }
    }

    fn pwstr(&mut self) -> PWSTR {
        PWSTR(self.content.as_mut_ptr())
    }
}

#[derive(Debug, Error)]
pub enum SharedMemoryError {
    #[error("shared memory page {0} is not available")]
    NotRunning(&'static str),
}

struct Page {
    name: &'static str,
    mem_file: HANDLE,
    view: *const c_void,
}

impl Page {
    fn open(name: &'static str) -> Result<Page, SharedMemoryError> {
        let mut filename = PwString::from(name);
        let mem_file = unsafe { OpenFileMappingW(FILE_MAP_READ.0, false, filename.pwstr()) };
        let view = unsafe { MapViewOfFile(mem_file, FILE_MAP_READ, 0, 0, 0) };
        if view.is_null() {
            debug!("Could not map {}, error: {:?}", name, unsafe { GetLastError() });
            unsafe {
                CloseHandle(mem_file);
            }
            return Err(SharedMemoryError::NotRunning(name));
        }

        Ok(Page {
            name,
            mem_file,
            view: view as *const c_void,
        })
    }

    /// Copies the leading `T` out of the page. The mapping is page aligned and
    /// at least as large as any of the layouts.
    fn read<T: Copy>(&self) -> T {
        unsafe { ptr::read_volatile(self.view as *const T) }
    }
}

impl Drop for Page {
    fn drop(&mut self) {
        debug!("Unmapping {}", self.name);
        unsafe {
            UnmapViewOfFile(self.view);
            CloseHandle(self.mem_file);
        }
    }
}

pub struct SharedMemoryConnection {
    physics: Page,
    graphics: Page,
    statics: Page,

    seen_packet_id: i32,
    session: Option<SessionInfo>,
}

// The views are only ever read, and only by the task that owns the connection.
unsafe impl Send for SharedMemoryConnection {}

impl SharedMemoryConnection {
    pub fn new() -> Result<SharedMemoryConnection, SharedMemoryError> {
        Ok(SharedMemoryConnection {
            physics: Page::open(PHYSICS_PAGE)?,
            graphics: Page::open(GRAPHICS_PAGE)?,
            statics: Page::open(STATIC_PAGE)?,
            seen_packet_id: -1,
            session: None,
        })
    }
}

impl Stream for SharedMemoryConnection {
    type Item = Update;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let graphics: RawGraphics = self.graphics.read();
        if Status::from(graphics.status) == Status::Off {
            return Poll::Ready(None);
        }

        let statics: RawStatic = self.statics.read();
        let session = SessionInfo::from(&statics);
        if self.session.as_ref() != Some(&session) {
            self.session = Some(session.clone());
            return Poll::Ready(Some(Update::Session(session)));
        }

        let physics: RawPhysics = self.physics.read();
        if physics.packet_id == self.seen_packet_id {
            // Nothing new yet, poll again shortly
            let waker = cx.waker().clone();
            task::spawn(async move {
                task::sleep(POLL_INTERVAL).await;
                waker.wake();
            });
            return Poll::Pending;
        }

        // The simulator writes without locking; retry when the packet moved on mid-copy.
        if self.physics.read::<RawPhysics>().packet_id != physics.packet_id {
            cx.waker().wake_by_ref();
            return Poll::Pending;
        }

        self.seen_packet_id = physics.packet_id;
        Poll::Ready(Some(Update::Telemetry(layout::snapshot(&physics, &graphics, &statics))))
    }
}

//! Background task alternating the status icon.
//!
//! Each cycle waits one interval, pushes a freshly generated flat-color
//! placeholder, waits again, then restores the bundled default icon.

use std::io::Cursor;
use std::ops::Range;
use std::sync::Arc;
use std::time::Duration;

use image::{ImageFormat, Rgba, RgbaImage};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::host::TrayHost;

/// Edge length of generated placeholder icons, in pixels.
pub const ICON_SIZE: u32 = 256;

/// Time between status icon pushes.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(2);

const GREEN_RANGE: Range<u8> = 50..205;
const BLUE_RANGE: Range<u8> = 0..55;

/// Picks an opaque placeholder color with no red component.
pub fn placeholder_color<R: Rng + ?Sized>(rng: &mut R) -> Rgba<u8> {
    Rgba([0, rng.gen_range(GREEN_RANGE), rng.gen_range(BLUE_RANGE), 255])
}

/// Returns a square raster uniformly filled with `color`.
pub fn placeholder_raster(color: Rgba<u8>) -> RgbaImage {
    RgbaImage::from_pixel(ICON_SIZE, ICON_SIZE, color)
}

pub fn encode_png(raster: &RgbaImage) -> Result<Vec<u8>, image::ImageError> {
    let mut buf = Cursor::new(Vec::new());
    raster.write_to(&mut buf, ImageFormat::Png)?;
    Ok(buf.into_inner())
}

/// Cycles the host's status icon until cancelled.
pub struct StatusAnimator {
    host: Arc<dyn TrayHost>,
    default_icon: Vec<u8>,
    interval: Duration,
}

impl StatusAnimator {
    pub fn new(host: Arc<dyn TrayHost>, default_icon: Vec<u8>, interval: Duration) -> Self {
        Self {
            host,
            default_icon,
            interval,
        }
    }

    /// Spawns the animation loop on the given runtime.
    pub fn spawn(self, handle: &Handle, cancel: CancellationToken) -> JoinHandle<()> {
        handle.spawn(self.run(cancel))
    }

    /// Runs the animation loop until `cancel` fires.
    ///
    /// Never fails: a placeholder that cannot be encoded skips its whole
    /// cycle so generated and default pushes keep alternating, and a
    /// rejected push is only logged.
    pub async fn run(self, cancel: CancellationToken) {
        let mut rng = StdRng::from_entropy();
        tracing::info!(
            interval_ms = self.interval.as_millis() as u64,
            "status animator started"
        );

        loop {
            if !self.pause(&cancel).await {
                break;
            }

            let color = placeholder_color(&mut rng);
            match encode_png(&placeholder_raster(color)) {
                Ok(png) => {
                    tracing::trace!(g = color[1], b = color[2], "pushing placeholder icon");
                    self.push(&png);
                }
                Err(e) => {
                    tracing::warn!("failed to encode placeholder icon, skipping cycle: {e}");
                    if !self.pause(&cancel).await {
                        break;
                    }
                    continue;
                }
            }

            if !self.pause(&cancel).await {
                break;
            }

            tracing::trace!("restoring default icon");
            self.push(&self.default_icon);
        }

        tracing::info!("status animator stopped");
    }

    /// Sleeps one interval. Returns `false` if cancelled first.
    async fn pause(&self, cancel: &CancellationToken) -> bool {
        tokio::select! {
            _ = cancel.cancelled() => false,
            _ = tokio::time::sleep(self.interval) => true,
        }
    }

    fn push(&self, png: &[u8]) {
        if let Err(e) = self.host.set_status_icon(png) {
            tracing::warn!("failed to set status icon: {e}");
        }
    }
}

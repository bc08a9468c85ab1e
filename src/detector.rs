// Background decoder feeding the overlay.
// Visual: while a code is in view, dots flicker on its finder corners; once it
// decodes, the overlay freezes on the code.
//
// Frames go in through a one-slot channel; when the decoder is still busy the
// frame is dropped rather than queued, so the preview never waits on it.

use crate::camera::LumaCrop;
use rqrr::PreparedImage;
use std::sync::mpsc::{self, Receiver, Sender, SyncSender, TryRecvError, TrySendError};
use std::thread::{self, JoinHandle};
use tracing::{debug, info, trace};
use viewfinder_overlay::{Error, PointSink, ResultPoint};

pub enum DetectorEvent {
    Decoded { content: String },
}

pub struct Detector {
    frames: Option<SyncSender<LumaCrop>>,
    events: Receiver<DetectorEvent>,
    worker: Option<JoinHandle<()>>,
}

impl Detector {
    /// Start the decoder thread; candidate points go straight into `sink`.
    pub fn spawn(sink: PointSink) -> Result<Self, Error> {
        let (frame_tx, frame_rx) = mpsc::sync_channel::<LumaCrop>(1);
        let (event_tx, event_rx) = mpsc::channel();
        let worker = thread::Builder::new()
            .name("qr-detector".into())
            .spawn(move || run(frame_rx, event_tx, sink))
            .map_err(|e| Error::Detector(format!("Spawn thread: {e}")))?;

        Ok(Self { frames: Some(frame_tx), events: event_rx, worker: Some(worker) })
    }

    /// Offer a frame; false if the decoder was busy and the frame was dropped.
    pub fn submit(&self, crop: LumaCrop) -> bool {
        let Some(frames) = &self.frames else { return false };
        match frames.try_send(crop) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                trace!("detector busy, frame dropped");
                false
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }

    pub fn poll(&self) -> Option<DetectorEvent> {
        match self.events.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }
}

impl Drop for Detector {
    fn drop(&mut self) {
        // Closing the channel ends the worker loop.
        self.frames.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

fn run(frames: Receiver<LumaCrop>, events: Sender<DetectorEvent>, sink: PointSink) {
    for crop in frames {
        if crop.width == 0 || crop.height == 0 {
            continue;
        }
        let mut prepared =
            PreparedImage::prepare_from_greyscale(crop.width, crop.height, |x, y| crop.luma[y * crop.width + x]);
        let grids = prepared.detect_grids();
        if !grids.is_empty() {
            trace!(count = grids.len(), "grids in view");
        }

        for grid in &grids {
            for corner in &grid.bounds {
                sink.add_point(ResultPoint::new(corner.x as f32, corner.y as f32));
            }
            match grid.decode() {
                Ok((_, content)) => {
                    info!(%content, "code decoded");
                    if events.send(DetectorEvent::Decoded { content }).is_err() {
                        return;
                    }
                }
                Err(e) => debug!(error = ?e, "grid found but not decodable"),
            }
        }
    }
}

use std::sync::{Arc, mpsc};

use crate::command::record::Command;
use crate::foundation::core::BoxI;
use crate::foundation::error::{PaintError, PaintResult};
use crate::foundation::image::Image;
use crate::render::backend::execute_commands;
use crate::render::cpu::CpuBackend;

/// Band-parallel executor for recorded command sequences.
///
/// The target is split into horizontal bands, one per worker. Every worker owns a bounded
/// single-producer/single-consumer queue; the producer (the flushing thread) pushes shared record
/// batches to every queue and blocks while a queue is full. Workers only read records, never the
/// engine context. Each worker hands its finished band back and the producer stitches the bands
/// into the target.
pub struct DeferredExecutor {
    pool: rayon::ThreadPool,
    workers: usize,
    queue_capacity: usize,
    batch_size: usize,
}

impl std::fmt::Debug for DeferredExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeferredExecutor")
            .field("workers", &self.workers)
            .field("queue_capacity", &self.queue_capacity)
            .field("batch_size", &self.batch_size)
            .finish()
    }
}

impl DeferredExecutor {
    /// Build an executor with `workers` band threads.
    pub fn new(workers: usize, queue_capacity: usize, batch_size: usize) -> PaintResult<Self> {
        if queue_capacity == 0 {
            return Err(PaintError::invalid_argument("queue_capacity must be >= 1"));
        }
        if batch_size == 0 {
            return Err(PaintError::invalid_argument("batch_size must be >= 1"));
        }
        let pool = build_thread_pool(workers)?;
        Ok(Self {
            pool,
            workers,
            queue_capacity,
            batch_size,
        })
    }

    /// Number of band workers.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Execute `cmds` against `target`.
    #[tracing::instrument(level = "debug", skip_all, fields(records = cmds.len(), workers = self.workers))]
    pub fn execute(&self, target: &mut Image, cmds: &[Command]) -> PaintResult<()> {
        if cmds.is_empty() || target.height() == 0 || target.width() == 0 {
            return Ok(());
        }
        let surface = target.bounds();
        let bands = split_bands(target, self.workers)?;

        let mut results: Vec<Option<PaintResult<Image>>> = Vec::new();
        results.resize_with(bands.len(), || None);
        let mut senders = Vec::with_capacity(bands.len());

        self.pool.in_place_scope(|s| {
            for ((band, origin_y), slot) in bands.into_iter().zip(results.iter_mut()) {
                let (tx, rx) = mpsc::sync_channel::<Arc<[Command]>>(self.queue_capacity);
                senders.push(Some(tx));
                s.spawn(move |_| {
                    *slot = Some(run_band(band, origin_y, surface, rx));
                });
            }

            for chunk in cmds.chunks(self.batch_size) {
                let shared: Arc<[Command]> = chunk.to_vec().into();
                for sender in &mut senders {
                    let Some(tx) = sender else { continue };
                    // A worker that stopped early has dropped its queue; its error surfaces below.
                    if tx.send(shared.clone()).is_err() {
                        *sender = None;
                    }
                }
                if senders.iter().all(Option::is_none) {
                    break;
                }
            }
            senders.clear();
        });

        let mut first_err = None;
        let mut finished = Vec::with_capacity(results.len());
        for r in results {
            match r {
                Some(Ok(img)) => finished.push(img),
                Some(Err(e)) => {
                    first_err.get_or_insert(e);
                }
                None => {
                    first_err.get_or_insert(PaintError::execution("band worker did not report"));
                }
            }
        }
        if let Some(e) = first_err {
            return Err(e);
        }
        stitch_bands(target, &finished)
    }
}

fn run_band(
    mut band: Image,
    origin_y: i32,
    surface: BoxI,
    rx: mpsc::Receiver<Arc<[Command]>>,
) -> PaintResult<Image> {
    {
        let mut backend = CpuBackend::band(&mut band, origin_y, surface);
        while let Ok(batch) = rx.recv() {
            execute_commands(&mut backend, &batch)?;
        }
    }
    Ok(band)
}

fn split_bands(target: &Image, workers: usize) -> PaintResult<Vec<(Image, i32)>> {
    let h = target.height() as usize;
    let n = workers.clamp(1, h);
    let rows = h.div_ceil(n);
    let stride = target.width() as usize * 4;
    let mut out = Vec::with_capacity(n);
    let mut y = 0usize;
    while y < h {
        let bh = rows.min(h - y);
        let bytes = target.data()[y * stride..(y + bh) * stride].to_vec();
        out.push((
            Image::from_premul_bytes(target.width(), bh as u32, bytes)?,
            y as i32,
        ));
        y += bh;
    }
    Ok(out)
}

fn stitch_bands(target: &mut Image, bands: &[Image]) -> PaintResult<()> {
    let expected = target.data().len();
    let got: usize = bands.iter().map(|b| b.data().len()).sum();
    if got != expected {
        return Err(PaintError::execution("band sizes do not cover the target"));
    }
    let mut off = 0usize;
    let data = target.data_mut();
    for band in bands {
        let len = band.data().len();
        data[off..off + len].copy_from_slice(band.data());
        off += len;
    }
    Ok(())
}

pub(crate) fn build_thread_pool(threads: usize) -> PaintResult<rayon::ThreadPool> {
    if threads == 0 {
        return Err(PaintError::invalid_argument("'threads' must be >= 1"));
    }
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("raster-paint-band-{i}"))
        .build()
        .map_err(|e| PaintError::execution(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/render/deferred.rs"]
mod tests;

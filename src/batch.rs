use std::sync::Arc;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tracing::{info, warn};

use crate::record::{Assembler, MedicineRecord};

/// Counts returned after a batch completes.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct BatchStats {
    pub total: usize,
    pub ok: usize,
    pub errors: usize,
}

pub struct BatchOutcome {
    pub name: String,
    pub result: Result<MedicineRecord, String>,
}

/// Look up every name with at most `concurrency` lookups in flight, handing
/// each outcome to `sink` as soon as it arrives (completion order).
pub async fn lookup_all<F>(
    assembler: Arc<Assembler>,
    names: Vec<String>,
    concurrency: usize,
    mut sink: F,
) -> Result<BatchStats>
where
    F: FnMut(&BatchOutcome) -> Result<()>,
{
    let concurrency = concurrency.max(1);
    let semaphore = Arc::new(Semaphore::new(concurrency));
    let total = names.len();

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec}, eta {eta})")?
            .progress_chars("=> "),
    );

    // Workers send outcomes, this loop hands them to the sink
    let (tx, mut rx) = tokio::sync::mpsc::channel::<BatchOutcome>(concurrency * 2);

    for name in names {
        let assembler = Arc::clone(&assembler);
        let sem = Arc::clone(&semaphore);
        let tx = tx.clone();

        tokio::spawn(async move {
            let Ok(_permit) = sem.acquire().await else {
                return;
            };
            let result = assembler.assemble(&name).await.map_err(|e| {
                warn!(name = %name, error = %e, "Lookup failed");
                e.to_string()
            });
            let _ = tx.send(BatchOutcome { name, result }).await;
        });
    }

    // rx closes once every worker has dropped its sender
    drop(tx);

    let mut stats = BatchStats {
        total,
        ..Default::default()
    };
    while let Some(outcome) = rx.recv().await {
        if outcome.result.is_ok() {
            stats.ok += 1;
        } else {
            stats.errors += 1;
        }
        sink(&outcome)?;
        pb.inc(1);
    }

    pb.finish_and_clear();
    info!("Looked up {} medicines ({} ok, {} errors)", total, stats.ok, stats.errors);
    Ok(stats)
}

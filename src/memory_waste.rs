use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use sysinfo::System;
use tracing::{debug, info};

/// Value written into every byte of the buffer during the fill step.
pub const FILL_BYTE: u8 = 1;

pub const BYTES_PER_MB: usize = 1024 * 1024;

/// Allocate `megabytes`, touch every byte, hold for `seconds`, then release.
///
/// The buffer is dropped before this returns; the caller owns the summary
/// line on stdout, everything here goes through `tracing`.
pub fn waste_memory(megabytes: usize, seconds: u64) -> Result<()> {
    log_memory_usage("before allocation");

    info!(megabytes, "allocating memory block");
    let mut block = allocate(megabytes)?;

    fill(&mut block);

    info!(seconds, "holding allocation");
    hold(seconds);

    drop(block);
    log_memory_usage("after release");

    Ok(())
}

/// Reserve capacity for `megabytes` without touching any page.
///
/// The reservation is fallible, so an out-of-memory request surfaces as an
/// error instead of an allocator abort, and the fill step never runs against
/// an invalid buffer.
pub fn allocate(megabytes: usize) -> Result<Vec<u8>> {
    let bytes = megabytes
        .checked_mul(BYTES_PER_MB)
        .with_context(|| format!("{megabytes} MB does not fit in usize"))?;

    let mut block = Vec::new();
    block
        .try_reserve_exact(bytes)
        .with_context(|| format!("failed to allocate {megabytes} MB"))?;
    Ok(block)
}

/// Write `FILL_BYTE` into every index, from 0 to size-1. The writes fault
/// every page in, so the whole buffer ends up resident rather than merely
/// reserved address space.
pub fn fill(block: &mut Vec<u8>) {
    let bytes = block.capacity();
    block.resize(bytes, FILL_BYTE);
    debug!(bytes, "buffer filled");
}

/// Block the calling thread for the full duration. This is the only
/// suspension point in the program and exposes no cancellation hook.
pub fn hold(seconds: u64) {
    thread::sleep(Duration::from_secs(seconds));
}

fn log_memory_usage(stage: &str) {
    let mut sys = System::new();
    sys.refresh_memory();

    debug!(
        stage,
        total_mb = sys.total_memory() / BYTES_PER_MB as u64,
        used_mb = sys.used_memory() / BYTES_PER_MB as u64,
        "system memory"
    );
}

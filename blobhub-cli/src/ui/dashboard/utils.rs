//! Utility functions for the dashboard.
//!
//! This module contains formatting helpers and non-TUI output functions
//! that can be used independently of the terminal UI.

use std::time::Duration;

use blobhub::hub::HubStatus;

/// Format duration as HH:MM:SS or MM:SS.
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    let hours = secs / 3600;
    let mins = (secs % 3600) / 60;
    let secs = secs % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, mins, secs)
    } else {
        format!("{:02}:{:02}", mins, secs)
    }
}

/// Simple non-TUI fallback for non-interactive terminals.
pub fn print_simple_status(status: &HubStatus, items: usize) {
    let metrics = &status.metrics;
    println!(
        "[{}] Sources: {} | Batches: {} ({:.1}/s, {} rejected) | Sets: {} | Tracks: {}",
        format_duration(metrics.uptime),
        status.source_count,
        metrics.batches_received,
        metrics.batches_per_second(),
        metrics.batches_rejected,
        metrics.sets_published,
        items,
    );
}

/// Print final session summary.
pub fn print_session_summary(status: &HubStatus) {
    let metrics = &status.metrics;
    println!();
    println!("Session Summary");
    println!("───────────────");
    println!("  Uptime:            {}", format_duration(metrics.uptime));
    println!("  Sources:           {}", status.source_count);
    println!(
        "  Batches received:  {} ({} rejected)",
        metrics.batches_received, metrics.batches_rejected
    );
    println!("  Detections:        {}", metrics.detections_received);
    println!("  Sets published:    {}", metrics.sets_published);
    println!();
}

use std::time::Duration;

use colored::*;

use scoutr_common::event::DiscoverySource;
use scoutr_common::network::host::DiscoveredHost;
use scoutr_core::ResultAggregator;

/// One live line per discovered endpoint, printed as it arrives.
pub fn found_line(host: &DiscoveredHost) -> String {
    format!(
        "{} {}  {}  {}",
        "[+]".green().bold(),
        host.display_name.bold(),
        endpoint(host),
        tags(host).dimmed()
    )
}

/// Final table once the session is over.
pub fn summary(results: &ResultAggregator, elapsed: Duration) {
    println!();

    if results.permission_denied() {
        println!(
            "{} the OS denied local-network browsing; results below come from probing only.",
            "[-]".red().bold()
        );
        println!("    Grant local network access in system settings and rescan.");
        println!();
    }

    let hosts = results.hosts();
    if hosts.is_empty() {
        println!("{}", "No SSH endpoints found on this segment.".yellow());
        return;
    }

    for host in &hosts {
        println!(
            "  {}  {}  {}",
            host.display_name.bold(),
            endpoint(host),
            tags(host).dimmed()
        );
    }

    println!();
    let count = format!("{} endpoint(s)", hosts.len()).green().bold();
    let took = format!("{:.2}s", elapsed.as_secs_f64()).yellow();
    println!("Scan complete: {count} in {took}");
}

fn endpoint(host: &DiscoveredHost) -> String {
    format!("{}:{}", host.host, host.port)
}

fn tags(host: &DiscoveredHost) -> String {
    let mut tags: Vec<String> = host
        .sources
        .iter()
        .map(|source| {
            match source {
                DiscoverySource::ServiceDiscovery => "mdns",
                DiscoverySource::ActiveProbe => "probe",
            }
            .to_string()
        })
        .collect();

    if let Some(ms) = host.latency_ms {
        tags.push(format!("{ms}ms"));
    }

    format!("[{}]", tags.join(", "))
}

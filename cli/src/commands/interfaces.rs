use colored::*;

use scoutr_common::network::interface::{
    InterfaceProvider, SystemInterfaces, qualify, select_scan_link,
};
use scoutr_common::network::subnet;

/// Lists every OS interface with its qualification verdict, marking the
/// one a scan would actually use.
pub fn interfaces() -> anyhow::Result<()> {
    let snapshot = SystemInterfaces.interfaces();
    if snapshot.is_empty() {
        println!("{}", "no network interfaces found".yellow());
        return Ok(());
    }

    let selected = select_scan_link(&snapshot);

    for interface in &snapshot {
        match qualify(interface) {
            Ok(link) => {
                let marker = if selected.as_ref() == Some(&link) {
                    "▶".green().bold()
                } else {
                    " ".normal()
                };
                let candidates = subnet::enumerate(&link).len();
                println!(
                    "{} {}  {}/{}  {} probe candidate(s)",
                    marker,
                    link.name.bold(),
                    link.addr,
                    subnet::prefix_len(link.netmask),
                    candidates.to_string().cyan()
                );
            }
            Err(reason) => {
                println!("  {}  {}", interface.name.dimmed(), reason.to_string().dimmed());
            }
        }
    }

    Ok(())
}

use colored::*;

use lansweep_common::network::interface::LAN_PREFIX;
use lansweep_common::network::range::NetworkRange;
use lansweep_common::system::{LocalIdentity, OrNotFound, SystemRepository};
use lansweep_core::system::SystemRepo;

use crate::mprint;
use crate::terminal::{colors, print};

const KEY_WIDTH: usize = 15;

pub fn info() -> anyhow::Result<()> {
    print::print(&format!(
        "{}",
        "Lansweep finds live hosts on an IPv4 subnet.".color(colors::TEXT_DEFAULT)
    ));
    mprint!();

    print_about_the_tool();
    print_local_system(&SystemRepo.local_identity());
    print::end_of_program();
    Ok(())
}

fn print_about_the_tool() {
    print::aligned_line("Version", KEY_WIDTH, env!("CARGO_PKG_VERSION"));
    print::aligned_line("License", KEY_WIDTH, "MIT");
}

fn print_local_system(identity: &LocalIdentity) {
    print::header("local system");
    print::aligned_line("Computer Name", KEY_WIDTH, OrNotFound(&identity.hostname).to_string());
    print::aligned_line("OS", KEY_WIDTH, identity.os.as_str());
    print::aligned_line("IP Address", KEY_WIDTH, OrNotFound(&identity.ip).to_string());
    print::aligned_line("MAC Address", KEY_WIDTH, OrNotFound(&identity.mac).to_string());
    print::aligned_line("Default Gateway", KEY_WIDTH, OrNotFound(&identity.gateway).to_string());

    let lan = identity
        .ip
        .and_then(|ip| NetworkRange::new(ip, LAN_PREFIX).ok())
        .map(|range| format!("{range} ({} hosts)", range.host_count()));
    print::aligned_line("LAN Range", KEY_WIDTH, OrNotFound(&lan).to_string());
}
